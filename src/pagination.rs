//! This modules defines the common functionality for paging data.

use maud::{Markup, html};
use serde::Serialize;

use crate::html::{LINK_STYLE, PAGINATION_STYLE};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum rows to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The page sizes a user can pick from.
    pub page_size_options: Vec<u64>,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 5,
            page_size_options: vec![5, 10, 20],
            max_pages: 5,
        }
    }
}

impl PaginationConfig {
    /// Use `requested` if it is one of the offered page sizes, otherwise the default.
    pub fn page_size_or_default(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(size) if self.page_size_options.contains(&size) => size,
            _ => self.default_page_size,
        }
    }
}

/// The number of pages needed to show `item_count` items, `page_size` at a time.
pub fn page_count(item_count: u64, page_size: u64) -> u64 {
    item_count.div_ceil(page_size.max(1))
}

/// Clamp `page` into `[1, max(page_count, 1)]`.
pub fn clamp_page(page: u64, page_count: u64) -> u64 {
    page.clamp(1, page_count.max(1))
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    if page_count == 0 {
        return Vec::new();
    }

    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

#[derive(Serialize)]
struct PageParams<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    search: &'a str,
    page: u64,
    per_page: u64,
}

/// The URL for `page` of the list at `route`, keeping the search term and page size.
pub fn page_url(route: &str, search: &str, per_page: u64, page: u64) -> String {
    let params = PageParams {
        search,
        page,
        per_page,
    };

    match serde_urlencoded::to_string(&params) {
        Ok(query) => format!("{route}?{query}"),
        Err(error) => {
            tracing::error!("could not encode pagination parameters: {error}");
            route.to_owned()
        }
    }
}

/// Where the pagination controls send their requests.
pub struct PaginationTarget<'a> {
    /// The list route the links point at.
    pub route: &'a str,
    /// The element the fetched fragment replaces, e.g. `#budget-table`.
    pub target: &'a str,
    pub search: &'a str,
    pub per_page: u64,
}

/// Render the page links below a table.
pub fn pagination_nav(indicators: &[PaginationIndicator], target: &PaginationTarget) -> Markup {
    let link = |page: u64, text: String| {
        let url = page_url(target.route, target.search, target.per_page, page);

        html!(
            a
                href=(url)
                hx-get=(url)
                hx-target=(target.target)
                hx-swap="outerHTML"
                hx-push-url="true"
                class=(LINK_STYLE)
            {
                (text)
            }
        )
    };

    html!(
        nav class=(PAGINATION_STYLE) aria-label="Pagination"
        {
            ul class="flex items-center gap-3"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::Page(page) => (link(*page, page.to_string())),
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class="font-bold" { (page) }
                            }
                            PaginationIndicator::Ellipsis => span { "..." },
                            PaginationIndicator::BackButton(page) => (link(*page, "Back".to_owned())),
                            PaginationIndicator::NextButton(page) => (link(*page, "Next".to_owned())),
                        }
                    }
                }
            }
        }
    )
}

/// Render the rows-per-page picker.
pub fn page_size_select(options: &[u64], target: &PaginationTarget) -> Markup {
    html!(
        label class="flex items-center gap-2 text-sm"
        {
            "Rows per page"

            select
                name="per_page"
                hx-get=(target.route)
                hx-target=(target.target)
                hx-swap="outerHTML"
                hx-include="[name='search']"
                class="rounded border border-gray-300 bg-gray-50 p-1 dark:border-gray-600 dark:bg-gray-700"
            {
                @for option in options {
                    option value=(option) selected[*option == target.per_page] { (option) }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use crate::pagination::{
        PaginationConfig, PaginationIndicator, clamp_page, create_pagination_indicators,
        page_count, page_url,
    };

    #[test]
    fn shows_all_pages() {
        let max_pages = 5;
        let page_count = 5;
        let curr_page = 1;
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_nothing_for_zero_pages() {
        let got = create_pagination_indicators(1, 0, 5);

        assert!(got.is_empty());
    }

    #[test]
    fn shows_page_subset_on_left() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 1;
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_right() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 10;
        let want = [
            PaginationIndicator::BackButton(9),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Page(8),
            PaginationIndicator::Page(9),
            PaginationIndicator::CurrPage(10),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn pagination_indicator_shows_page_subset_in_center() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 5;
        let want = [
            PaginationIndicator::BackButton(4),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::CurrPage(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(6),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(12, 5), 3);
        assert_eq!(page_count(12, 0), 12);
    }

    #[test]
    fn clamps_page_into_range() {
        assert_eq!(clamp_page(5, 3), 3);
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn falls_back_to_default_page_size() {
        let config = PaginationConfig::default();

        assert_eq!(config.page_size_or_default(Some(10)), 10);
        assert_eq!(config.page_size_or_default(Some(7)), 5);
        assert_eq!(config.page_size_or_default(None), 5);
    }

    #[test]
    fn page_url_keeps_search_and_page_size() {
        assert_eq!(
            page_url("/budgets", "pwp 1", 10, 2),
            "/budgets?search=pwp+1&page=2&per_page=10"
        );
        assert_eq!(page_url("/budgets", "", 5, 1), "/budgets?page=1&per_page=5");
    }
}

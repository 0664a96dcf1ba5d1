//! Categories: the read-only groups that listings are filed under.

mod categories_page;

use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    data_client::{Collection, DataClient, SelectQuery, decode_rows},
    database_id::DatabaseId,
    endpoints,
    html::{CARD_SELECTED_STYLE, CARD_STYLE},
};

pub use categories_page::get_categories_page;

/// A product category, identified by its unique code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: DatabaseId,
    pub name: String,
    pub code: String,
}

/// Fetch every category, sorted by name.
pub async fn get_categories<C: DataClient>(client: &C) -> Result<Vec<Category>, Error> {
    let rows = client
        .select(
            &SelectQuery::all(Collection::Categories)
                .columns(&["id", "name", "code"])
                .order_by("name", true),
        )
        .await?;

    decode_rows(rows)
}

/// Fetch the category with `code`.
///
/// # Errors
/// Returns [Error::NotFound] if no category has that code.
pub async fn get_category<C: DataClient>(client: &C, code: &str) -> Result<Category, Error> {
    let rows = client
        .select(
            &SelectQuery::all(Collection::Categories)
                .columns(&["id", "name", "code"])
                .eq("code", code),
        )
        .await?;

    decode_rows(rows)?.into_iter().next().ok_or(Error::NotFound)
}

/// The grid of category cards. Each card opens the listings of its category.
pub fn category_grid(categories: &[Category], selected_code: Option<&str>) -> Markup {
    html!(
        @if categories.is_empty() {
            p class="text-gray-500 dark:text-gray-400" { "No categories found." }
        } @else {
            ul class="grid grid-cols-2 md:grid-cols-4 gap-4 w-full" data-category-grid
            {
                @for category in categories {
                    @let is_selected = selected_code == Some(category.code.as_str());
                    li
                    {
                        a
                            href=(endpoints::format_endpoint(endpoints::LISTINGS_VIEW, &category.code))
                            class=(if is_selected { CARD_SELECTED_STYLE } else { CARD_STYLE })
                            aria-current=[is_selected.then_some("true")]
                        {
                            span class="block font-semibold" { (category.name) }
                            span class="block text-xs text-gray-500 dark:text-gray-400" { (category.code) }
                        }
                    }
                }
            }
        }
    )
}

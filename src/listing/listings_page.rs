//! The category grid with the listings of the selected category.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use tokio::sync::Mutex;

use crate::{
    AppState, Error,
    alert::{Alert, PendingAlert},
    category::{Category, category_grid, get_categories},
    data_client::Backend,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_EMPTY_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, search_input,
    },
    list_view::{ListQuery, ListSnapshot, ListView},
    listing::{Listing, select_category},
    navigation::NavBar,
    pagination::{
        PaginationConfig, PaginationTarget, create_pagination_indicators, page_size_select,
        pagination_nav,
    },
};

const TABLE_ID: &str = "listing-table";
const TABLE_TARGET: &str = "#listing-table";

/// The state needed for the listings page.
#[derive(Debug, Clone)]
pub struct ListingsPageState {
    pub data_client: Backend,
    pub listings: Arc<Mutex<ListView<Listing>>>,
    pub pagination_config: PaginationConfig,
    pub pending_alert: PendingAlert,
}

impl FromRef<AppState> for ListingsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            data_client: state.data_client.clone(),
            listings: state.listings.clone(),
            pagination_config: state.pagination_config.clone(),
            pending_alert: state.pending_alert.clone(),
        }
    }
}

/// Render the category grid and the listings of `category_code`.
///
/// A full page load fetches the categories and the listings. Requests from htmx
/// only filter the listings already fetched, unless they are for another category
/// or nothing has been fetched yet.
///
/// # Errors
/// Returns [Error::NotFound] if there is no category with that code.
pub async fn get_listings_page(
    Path(category_code): Path<String>,
    State(state): State<ListingsPageState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<ListQuery>,
) -> Result<Response, Error> {
    let mut listings = state.listings.lock().await;

    let is_other_category = listings
        .scope()
        .as_ref()
        .is_none_or(|category| category.code != category_code);

    let mut alert = None;
    if !is_htmx_request || is_other_category || !listings.is_loaded() {
        if !is_htmx_request {
            alert = state.pending_alert.take().await;
        }

        select_category(&state.data_client, &mut listings, &category_code)
            .await
            .inspect_err(|error| {
                tracing::error!("Could not select category {category_code}: {error}")
            })?;

        if let Err(error) = listings.load(&state.data_client).await {
            tracing::error!("Could not fetch listings: {error}");

            if is_htmx_request {
                return Ok(error.into_alert_response());
            }

            alert = Some(Alert::ErrorSimple {
                message: format!("Error fetching listings: {error}"),
            });
        }
    }

    query.apply_to(&mut listings, &state.pagination_config);
    let snapshot = listings.snapshot();
    let Some(category) = listings.scope().clone() else {
        return Err(Error::NotFound);
    };
    drop(listings);

    let table = listing_table_view(&category, &snapshot, &state.pagination_config);

    if is_htmx_request {
        return Ok(table.into_response());
    }

    let categories = match get_categories(&state.data_client).await {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Could not fetch categories: {error}");
            alert = Some(Alert::ErrorSimple {
                message: format!("Error fetching categories: {error}"),
            });
            Vec::new()
        }
    };

    Ok(listings_view(&categories, &category, &snapshot.search_term, &table, alert).into_response())
}

fn listings_view(
    categories: &[Category],
    category: &Category,
    search_term: &str,
    table: &Markup,
    alert: Option<Alert>,
) -> Markup {
    let listings_url = endpoints::format_endpoint(endpoints::LISTINGS_VIEW, &category.code);
    let new_listing_url = endpoints::format_endpoint(endpoints::NEW_LISTING_VIEW, &category.code);
    let nav_bar = NavBar::new(&listings_url).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Categories" }

                (category_grid(categories, Some(&category.code)))

                section class="space-y-4" data-listing-panel
                {
                    header class="flex justify-between flex-wrap items-end gap-4"
                    {
                        h2 class="text-lg font-semibold"
                        {
                            "Listings under: " (category.name)
                        }

                        a href=(new_listing_url) class=(LINK_STYLE) { "Add Listing" }
                    }

                    (search_input(&listings_url, TABLE_TARGET, "Search by name...", search_term))

                    (table)
                }
            }
        }
    );

    base("Listings", &content, alert)
}

fn listing_table_view(
    category: &Category,
    snapshot: &ListSnapshot<Listing>,
    config: &PaginationConfig,
) -> Markup {
    let listings_url = endpoints::format_endpoint(endpoints::LISTINGS_VIEW, &category.code);
    let target = PaginationTarget {
        route: &listings_url,
        target: TABLE_TARGET,
        search: &snapshot.search_term,
        per_page: snapshot.page_size,
    };
    let indicators =
        create_pagination_indicators(snapshot.current_page, snapshot.total_pages, config.max_pages);

    html!(
        div id=(TABLE_ID) class="dark:bg-gray-800 w-full overflow-x-auto"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for listing in &snapshot.rows {
                        (listing_row_view(&category.code, listing))
                    }

                    @if snapshot.rows.is_empty() {
                        tr
                        {
                            td colspan="3" class=(TABLE_EMPTY_STYLE)
                            {
                                "No listings match your search."
                            }
                        }
                    }
                }
            }

            div class="flex justify-between items-center flex-wrap gap-4 px-6"
            {
                (page_size_select(&config.page_size_options, &target))
                (pagination_nav(&indicators, &target))
            }
        }
    )
}

fn listing_row_view(category_code: &str, listing: &Listing) -> Markup {
    let edit_url = endpoints::format_endpoint(
        &endpoints::format_endpoint(endpoints::EDIT_LISTING_VIEW, category_code),
        listing.id,
    );
    let delete_url = endpoints::format_endpoint(
        &endpoints::format_endpoint(endpoints::LISTING_API, category_code),
        listing.id,
    );

    html!(
        tr class=(TABLE_ROW_STYLE) data-listing-id=(listing.id)
        {
            td class=(TABLE_CELL_STYLE) { (listing.name) }
            td class=(TABLE_CELL_STYLE) { (listing.description.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure? You won't be able to undo this!"
                        hx-target="closest tr"
                        hx-swap="delete"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}

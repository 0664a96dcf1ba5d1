//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};

use crate::{
    AppState,
    budget::{
        create_budget_endpoint, get_budgets_page, get_edit_budget_page, get_new_budget_page,
        update_budget_endpoint,
    },
    category::get_categories_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    listing::{
        create_listing_endpoint, delete_listing_endpoint, get_edit_listing_page,
        get_listings_page, get_new_listing_page, update_listing_endpoint,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::BUDGETS_VIEW, get(get_budgets_page))
        .route(endpoints::NEW_BUDGET_VIEW, get(get_new_budget_page))
        .route(endpoints::EDIT_BUDGET_VIEW, get(get_edit_budget_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::LISTINGS_VIEW, get(get_listings_page))
        .route(endpoints::NEW_LISTING_VIEW, get(get_new_listing_page))
        .route(endpoints::EDIT_LISTING_VIEW, get(get_edit_listing_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::BUDGETS_API, post(create_budget_endpoint))
        .route(endpoints::BUDGET_API, put(update_budget_endpoint))
        .route(endpoints::LISTINGS_API, post(create_listing_endpoint))
        .route(
            endpoints::LISTING_API,
            put(update_listing_endpoint).delete(delete_listing_endpoint),
        );

    page_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the budgets page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::BUDGETS_VIEW)
}

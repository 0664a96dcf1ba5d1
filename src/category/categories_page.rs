//! The page with the category grid and no category selected.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use tokio::sync::Mutex;

use crate::{
    AppState,
    alert::{Alert, PendingAlert},
    category::{category_grid, get_categories},
    data_client::Backend,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    list_view::ListView,
    listing::Listing,
    navigation::NavBar,
};

/// The state needed for the categories page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub data_client: Backend,
    pub listings: Arc<Mutex<ListView<Listing>>>,
    pub pending_alert: PendingAlert,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            data_client: state.data_client.clone(),
            listings: state.listings.clone(),
            pending_alert: state.pending_alert.clone(),
        }
    }
}

/// Render the category grid with nothing selected.
pub async fn get_categories_page(State(state): State<CategoriesPageState>) -> Response {
    state.listings.lock().await.select_scope(None);

    let mut alert = state.pending_alert.take().await;
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

    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Categories" }

                (category_grid(&categories, None))

                p class="text-gray-500 dark:text-gray-400"
                {
                    "Select a category to view its listings."
                }
            }
        }
    );

    base("Categories", &content, alert).into_response()
}

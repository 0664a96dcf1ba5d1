//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    alert::PendingAlert, budget::Budget, data_client::Backend, list_view::ListView,
    listing::Listing, pagination::PaginationConfig,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the service that stores the records.
    pub data_client: Backend,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// The list of badgets shown on the budgets page.
    pub budgets: Arc<Mutex<ListView<Budget>>>,

    /// The listings of the selected category.
    pub listings: Arc<Mutex<ListView<Listing>>>,

    /// The alert to show on the next full page load.
    pub pending_alert: PendingAlert,
}

impl AppState {
    /// Create a new [AppState] that reads and writes records through `data_client`.
    pub fn new(data_client: Backend, pagination_config: PaginationConfig) -> Self {
        let page_size = pagination_config.default_page_size;

        Self {
            data_client,
            pagination_config,
            budgets: Arc::new(Mutex::new(ListView::new(page_size))),
            listings: Arc::new(Mutex::new(ListView::new(page_size))),
            pending_alert: PendingAlert::default(),
        }
    }
}

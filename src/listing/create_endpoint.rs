//! The endpoint for creating a listing.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use tokio::sync::Mutex;

use crate::{
    AppState, Error,
    alert::PendingAlert,
    data_client::Backend,
    endpoints,
    form::RecordForm,
    list_view::ListView,
    listing::{Listing, ListingDraft, select_category},
};

/// The state needed for creating, updating or deleting a listing.
#[derive(Debug, Clone)]
pub struct ListingEndpointState {
    pub data_client: Backend,
    pub listings: Arc<Mutex<ListView<Listing>>>,
    pub pending_alert: PendingAlert,
}

impl FromRef<AppState> for ListingEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            data_client: state.data_client.clone(),
            listings: state.listings.clone(),
            pending_alert: state.pending_alert.clone(),
        }
    }
}

/// Save the posted listing form under `category_code`, then redirect to the
/// listings of that category.
///
/// A category code that does not resolve leaves the listing without a category,
/// which fails validation.
pub(super) async fn submit_listing_form(
    state: ListingEndpointState,
    category_code: &str,
    mut form: RecordForm<ListingDraft>,
    fields: Vec<(String, String)>,
) -> Response {
    if let Err(error) = form.update_fields(fields) {
        return error.into_alert_response();
    }

    let mut listings = state.listings.lock().await;

    let category = match select_category(&state.data_client, &mut listings, category_code).await {
        Ok(category) => Some(category),
        Err(Error::NotFound) => None,
        Err(error) => {
            tracing::error!("Could not fetch category {category_code}: {error}");
            return error.into_alert_response();
        }
    };

    match form.submit(&state.data_client, &mut listings, &category).await {
        Ok(alert) => {
            state.pending_alert.set(alert).await;

            (
                HxRedirect(endpoints::format_endpoint(
                    endpoints::LISTINGS_VIEW,
                    category_code,
                )),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not save listing: {error}");
            error.into_alert_response()
        }
    }
}

/// Handle the listing creation form submission.
pub async fn create_listing_endpoint(
    Path(category_code): Path<String>,
    State(state): State<ListingEndpointState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let mut form = RecordForm::<ListingDraft>::default();
    form.begin_edit(None);

    submit_listing_form(state, &category_code, form, fields).await
}

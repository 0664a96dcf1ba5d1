//! The endpoint for updating a listing.

use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};

use crate::{
    database_id::DatabaseId,
    form::RecordForm,
    listing::{
        ListingDraft,
        create_endpoint::{ListingEndpointState, submit_listing_form},
        get_listing_under,
    },
};

/// Handle the listing update form submission.
///
/// The listing stays under its category, only the name and description change.
/// A listing that is not filed under `category_code` is reported as not found.
pub async fn update_listing_endpoint(
    Path((category_code, listing_id)): Path<(String, DatabaseId)>,
    State(state): State<ListingEndpointState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    if let Err(error) = get_listing_under(&state.data_client, &category_code, listing_id).await {
        tracing::error!("Could not find listing {listing_id} under {category_code}: {error}");
        return error.into_alert_response();
    }

    let mut form = RecordForm::<ListingDraft>::default();
    form.begin_update(listing_id);

    submit_listing_form(state, &category_code, form, fields).await
}

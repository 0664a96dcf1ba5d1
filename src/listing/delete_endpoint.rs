//! The endpoint for deleting a listing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    database_id::DatabaseId,
    listing::{create_endpoint::ListingEndpointState, get_listing_under},
};

/// Delete a listing and drop it from the list without fetching the list again.
///
/// The confirmation happens in the browser before the request is sent. The
/// response body is an out-of-band alert, the row itself is removed by htmx.
/// A listing that is not filed under `category_code` is reported as not found.
pub async fn delete_listing_endpoint(
    Path((category_code, listing_id)): Path<(String, DatabaseId)>,
    State(state): State<ListingEndpointState>,
) -> Response {
    if let Err(error) = get_listing_under(&state.data_client, &category_code, listing_id).await {
        tracing::error!("Could not find listing {listing_id} under {category_code}: {error}");
        return error.into_alert_response();
    }

    let mut listings = state.listings.lock().await;

    match listings.delete(&state.data_client, listing_id).await {
        Ok(()) => {
            tracing::info!("Deleted listing {listing_id} under {category_code}");

            (
                StatusCode::OK,
                Alert::Success {
                    message: "Deleted!".to_owned(),
                    details: "The listing has been deleted.".to_owned(),
                }
                .into_oob_html(),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete listing {listing_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_listing_endpoint_tests {
    use axum::{
        extract::{FromRef, Path, State},
        http::StatusCode,
    };

    use crate::{
        Error,
        listing::{
            create_endpoint::ListingEndpointState, delete_listing_endpoint, get_listing,
            select_category,
        },
        test_utils::{
            assert_alert, insert_category, insert_listing, parse_html_fragment, test_state,
        },
    };

    #[tokio::test]
    async fn deletes_listing() {
        let state = ListingEndpointState::from_ref(&test_state());
        insert_category(&state.data_client, "Food", "FOOD").await;
        insert_listing(&state.data_client, "Apples", "FOOD").await;
        insert_listing(&state.data_client, "Pears", "FOOD").await;
        {
            let mut listings = state.listings.lock().await;
            select_category(&state.data_client, &mut listings, "FOOD")
                .await
                .unwrap();
            listings.load(&state.data_client).await.unwrap();
        }

        let response =
            delete_listing_endpoint(Path(("FOOD".to_owned(), 1)), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_alert(&html, "success", "Deleted!", "The listing has been deleted.");
        assert_eq!(
            get_listing(&state.data_client, 1).await,
            Err(Error::NotFound)
        );
        let listings = state.listings.lock().await;
        assert!(listings.find(1).is_none());
        assert!(listings.find(2).is_some());
    }

    #[tokio::test]
    async fn delete_missing_listing_returns_not_found() {
        let state = ListingEndpointState::from_ref(&test_state());

        let response = delete_listing_endpoint(Path(("FOOD".to_owned(), 1)), State(state)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_listing_under_other_category_returns_not_found() {
        let state = ListingEndpointState::from_ref(&test_state());
        insert_category(&state.data_client, "Food", "FOOD").await;
        insert_category(&state.data_client, "Drinks", "DRINK").await;
        insert_listing(&state.data_client, "Water", "DRINK").await;

        let response =
            delete_listing_endpoint(Path(("FOOD".to_owned(), 1)), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(get_listing(&state.data_client, 1).await.is_ok());
    }
}

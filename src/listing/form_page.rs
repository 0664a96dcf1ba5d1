//! The pages for creating and editing a listing.

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    category::{Category, get_category},
    data_client::Backend,
    database_id::DatabaseId,
    endpoints,
    form::{Draft, RecordForm},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, text_input},
    listing::{ListingDraft, get_listing_under},
    navigation::NavBar,
};

/// The state needed for the listing form pages.
#[derive(Debug, Clone)]
pub struct ListingFormPageState {
    pub data_client: Backend,
}

impl FromRef<AppState> for ListingFormPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            data_client: state.data_client.clone(),
        }
    }
}

/// Render the page for creating a listing under `category_code`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no category with that code.
pub async fn get_new_listing_page(
    Path(category_code): Path<String>,
    State(state): State<ListingFormPageState>,
) -> Result<Response, Error> {
    let category = get_category(&state.data_client, &category_code).await?;

    let mut form = RecordForm::<ListingDraft>::default();
    form.begin_edit(None);

    Ok(listing_form_view(&form, &category).into_response())
}

/// Render the page for editing the listing `listing_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the category or the listing does not exist, or
/// the listing is filed under another category.
pub async fn get_edit_listing_page(
    Path((category_code, listing_id)): Path<(String, DatabaseId)>,
    State(state): State<ListingFormPageState>,
) -> Result<Response, Error> {
    let category = get_category(&state.data_client, &category_code).await?;
    let listing = get_listing_under(&state.data_client, &category.code, listing_id)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve listing {listing_id}: {error}"))?;

    let mut form = RecordForm::<ListingDraft>::default();
    form.begin_edit(Some(&listing));

    Ok(listing_form_view(&form, &category).into_response())
}

fn listing_form_view(form: &RecordForm<ListingDraft>, category: &Category) -> Markup {
    let draft = form.draft();
    let listings_url = endpoints::format_endpoint(endpoints::LISTINGS_VIEW, &category.code);
    let (title, submit_text) = match draft.id() {
        Some(_) => ("Edit Listing", "Update Listing"),
        None => ("Add Listing", "Create Listing"),
    };
    let nav_bar = NavBar::new(&listings_url).into_html();

    let create_url = endpoints::format_endpoint(endpoints::LISTINGS_API, &category.code);
    let update_url = draft.id().map(|id| {
        endpoints::format_endpoint(
            &endpoints::format_endpoint(endpoints::LISTING_API, &category.code),
            id,
        )
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { (title) }

            p class="mb-4 text-sm" { "Category: " (category.name) }

            form
                hx-post=[update_url.is_none().then_some(&create_url)]
                hx-put=[update_url.as_ref()]
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (text_input("Name", "name", &draft.name, "text", true))
                (text_input("Description", "description", &draft.description, "text", false))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }

                a href=(listings_url) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base(title, &content, None)
}

#[cfg(test)]
mod listing_form_page_tests {
    use axum::{
        extract::{FromRef, Path, State},
        http::StatusCode,
    };

    use crate::{
        Error,
        listing::{form_page::ListingFormPageState, get_edit_listing_page, get_new_listing_page},
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_valid_html, insert_category, insert_listing,
            must_get_form, parse_html_document, test_state,
        },
    };

    #[tokio::test]
    async fn render_new_listing_page() {
        let state = ListingFormPageState::from_ref(&test_state());
        insert_category(&state.data_client, "Food", "FOOD").await;

        let response = get_new_listing_page(Path("FOOD".to_owned()), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/categories/FOOD/listings", "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "description", "text");
        assert_form_submit_button_with_text(&form, "Create Listing");
    }

    #[tokio::test]
    async fn render_edit_listing_page() {
        let state = ListingFormPageState::from_ref(&test_state());
        insert_category(&state.data_client, "Food", "FOOD").await;
        insert_listing(&state.data_client, "Apples", "FOOD").await;

        let response = get_edit_listing_page(Path(("FOOD".to_owned(), 1)), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/categories/FOOD/listings/1", "hx-put");
        assert_form_input_with_value(&form, "name", "text", "Apples");
        assert_form_submit_button_with_text(&form, "Update Listing");
    }

    #[tokio::test]
    async fn listing_under_other_category_is_not_found() {
        let state = ListingFormPageState::from_ref(&test_state());
        insert_category(&state.data_client, "Food", "FOOD").await;
        insert_category(&state.data_client, "Drinks", "DRINK").await;
        insert_listing(&state.data_client, "Tea", "DRINK").await;

        let result = get_edit_listing_page(Path(("FOOD".to_owned(), 1)), State(state)).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn new_listing_page_for_missing_category_is_not_found() {
        let state = ListingFormPageState::from_ref(&test_state());

        let result = get_new_listing_page(Path("NOPE".to_owned()), State(state)).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }
}

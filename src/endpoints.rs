//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/budgets/{budget_id}/edit', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the budgets page.
pub const ROOT: &str = "/";
/// The page listing every badget.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The page for creating a new badget.
pub const NEW_BUDGET_VIEW: &str = "/budgets/new";
/// The page for viewing and editing an existing badget.
pub const EDIT_BUDGET_VIEW: &str = "/budgets/{budget_id}/edit";
/// The page with the category grid and nothing selected.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The category grid with the listings of the selected category.
pub const LISTINGS_VIEW: &str = "/categories/{category_code}/listings";
/// The page for creating a listing under a category.
pub const NEW_LISTING_VIEW: &str = "/categories/{category_code}/listings/new";
/// The page for editing a listing.
pub const EDIT_LISTING_VIEW: &str = "/categories/{category_code}/listings/{listing_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to create a badget.
pub const BUDGETS_API: &str = "/api/budgets";
/// The route to update a badget.
pub const BUDGET_API: &str = "/api/budgets/{budget_id}";
/// The route to create a listing.
pub const LISTINGS_API: &str = "/api/categories/{category_code}/listings";
/// The route to update or delete a listing.
pub const LISTING_API: &str = "/api/categories/{category_code}/listings/{listing_id}";
/// The SMS relay's route for sending a text message.
pub const SEND_SMS: &str = "/api/send-sms";

/// Replace the first parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/budgets/{budget_id}', '{budget_id}' is the parameter.
/// Paths with two parameters are filled by calling this function twice.
///
/// This function assumes that an endpoint path only contains ASCII characters.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::BUDGETS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_BUDGET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_BUDGET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LISTINGS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_LISTING_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_LISTING_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);

        assert_endpoint_is_valid_uri(endpoints::BUDGETS_API);
        assert_endpoint_is_valid_uri(endpoints::BUDGET_API);
        assert_endpoint_is_valid_uri(endpoints::LISTINGS_API);
        assert_endpoint_is_valid_uri(endpoints::LISTING_API);
        assert_endpoint_is_valid_uri(endpoints::SEND_SMS);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn fills_two_parameters_in_order() {
        let formatted_path = format_endpoint(
            &format_endpoint(endpoints::EDIT_LISTING_VIEW, "FOOD"),
            42,
        );

        assert_eq!(formatted_path, "/categories/FOOD/listings/42/edit");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}

//! Badget Console is a web console for managing promotional budgets ("badgets")
//! and the listings filed under product categories.
//!
//! This library provides a REST API that directly serves HTML pages. The records
//! live in a hosted data service (or a local SQLite database during development),
//! and a separate relay forwards SMS notifications to the SMS provider.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod budget;
mod category;
mod data_client;
mod database_id;
mod endpoints;
mod form;
mod html;
mod internal_server_error;
mod list_view;
mod listing;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod sms;

#[cfg(test)]
mod test_utils;

pub use alert::Alert;
pub use app_state::AppState;
pub use data_client::{Backend, DataClient, RestClient, SqliteClient};
pub use form::ValidationError;
pub use logging::{add_tracing_layer, init_tracing, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use sms::{SmsProvider, SmsState, VonageConfig, build_sms_router};

use crate::{internal_server_error::InternalServerError, not_found::NotFoundError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user submitted a form that breaks a validation rule.
    ///
    /// Nothing is sent to the data service when this happens.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The data service could not be reached or rejected the request.
    ///
    /// The message is the one reported by the data service and is shown to the user as-is.
    #[error("{0}")]
    DataService(String),

    /// Tried to update a record that does not exist
    #[error("tried to update a record that is not in the database")]
    UpdateMissingRecord,

    /// Tried to delete a record that does not exist
    #[error("tried to delete a record that is not in the database")]
    DeleteMissingRecord,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A form was posted with a field the record does not have.
    #[error("unknown form field \"{0}\"")]
    UnknownField(String),

    /// A row from the data service could not be decoded into a record.
    #[error("could not decode record: {0}")]
    InvalidRecord(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The SMS provider could not be reached or refused to send the message.
    #[error("{0}")]
    SmsProvider(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::DataService(message) => {
                tracing::error!("The data service request failed: {message}");
                InternalServerError {
                    description: "Could not reach the data service",
                    fix: &message,
                }
                .into_response()
            }
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Validation(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: error.title().to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::DataService(message) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Error".to_owned(),
                    details: message,
                },
            ),
            Error::UpdateMissingRecord => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update record".to_owned(),
                    details: "The record could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingRecord => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete record".to_owned(),
                    details: "The record could not be found. \
                    Try refreshing the page to see if the record has already been deleted."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The record could not be found.".to_owned(),
                },
            ),
            Error::UnknownField(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid form".to_owned(),
                    details: format!("The form has no field called \"{name}\"."),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;

    use crate::{
        Error, ValidationError,
        test_utils::{assert_alert, parse_html_fragment},
    };

    #[tokio::test]
    async fn not_found_alert() {
        let response = Error::NotFound.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_alert(&html, "error", "Not found", "The record could not be found.");
    }

    #[tokio::test]
    async fn validation_error_alert() {
        let response = Error::from(ValidationError::MissingCode).into_alert_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        assert_alert(&html, "error", "Validation Error", "PWP Code is required.");
    }

    #[tokio::test]
    async fn data_service_error_alert_shows_message_verbatim() {
        let response =
            Error::DataService("duplicate key value".to_owned()).into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = parse_html_fragment(response).await;
        assert_alert(&html, "error", "Error", "duplicate key value");
    }

    #[tokio::test]
    async fn missing_record_alerts() {
        assert_eq!(
            Error::UpdateMissingRecord.into_alert_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::DeleteMissingRecord.into_alert_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn query_without_rows_is_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}

//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the fixed `#alert-container` element. Handlers that
//! respond to htmx requests either target the container directly
//! (`hx-target-error="#alert-container"`) or swap it out-of-band.
//! Handlers that redirect leave the alert in [PendingAlert] so the next full page
//! can show it.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use tokio::sync::Mutex;

/// A success or error message shown to the user.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Alert {
    Success { message: String, details: String },
    SuccessSimple { message: String },
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    fn is_success(&self) -> bool {
        matches!(self, Alert::Success { .. } | Alert::SuccessSimple { .. })
    }

    /// The headline of the alert.
    pub fn message(&self) -> &str {
        match self {
            Alert::Success { message, .. }
            | Alert::SuccessSimple { message }
            | Alert::Error { message, .. }
            | Alert::ErrorSimple { message } => message,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            Alert::Success { details, .. } | Alert::Error { details, .. } => Some(details),
            Alert::SuccessSimple { .. } | Alert::ErrorSimple { .. } => None,
        }
    }

    /// Render the alert for swapping into the alert container.
    pub fn into_html(self) -> Markup {
        let (container_style, icon) = if self.is_success() {
            (
                "flex items-start gap-3 p-4 mb-4 rounded-lg shadow text-green-800 \
                bg-green-50 dark:bg-gray-800 dark:text-green-400",
                "✓",
            )
        } else {
            (
                "flex items-start gap-3 p-4 mb-4 rounded-lg shadow text-red-800 \
                bg-red-50 dark:bg-gray-800 dark:text-red-400",
                "!",
            )
        };

        html!(
            div
                role="alert"
                class=(container_style)
                data-alert-kind=(if self.is_success() { "success" } else { "error" })
            {
                span class="font-bold" { (icon) }

                div class="flex-1"
                {
                    p class="font-medium" { (self.message()) }

                    @if let Some(details) = self.details().filter(|details| !details.is_empty()) {
                        p class="text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        )
    }

    /// Render the alert so that htmx swaps it into the alert container
    /// regardless of the request's target.
    pub fn into_oob_html(self) -> Markup {
        html!(
            div id="alert-container" hx-swap-oob="true"
            {
                (self.into_html())
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

/// An alert waiting for the next full page load.
///
/// Successful form submissions redirect with `HX-Redirect`, which throws away
/// the response body, so the success message is parked here instead.
#[derive(Debug, Clone, Default)]
pub struct PendingAlert(Arc<Mutex<Option<Alert>>>);

impl PendingAlert {
    /// Replace the pending alert with `alert`.
    pub async fn set(&self, alert: Alert) {
        *self.0.lock().await = Some(alert);
    }

    /// Take the pending alert, leaving none behind.
    pub async fn take(&self) -> Option<Alert> {
        self.0.lock().await.take()
    }
}

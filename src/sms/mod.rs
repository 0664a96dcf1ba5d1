//! The SMS relay: a single endpoint that forwards text messages to the SMS provider.

mod endpoint;
mod provider;

use axum::{Router, routing::post};
use tower_http::cors::CorsLayer;

use crate::endpoints;

pub use endpoint::{SmsMessage, send_sms_endpoint};
pub use provider::{SmsProvider, VonageConfig};

/// The state of the SMS relay.
#[derive(Debug, Clone)]
pub struct SmsState {
    /// The client for the SMS provider.
    pub provider: SmsProvider,
}

/// Return a router with the SMS relay's route.
///
/// Any origin may call the relay.
pub fn build_sms_router(state: SmsState) -> Router {
    Router::new()
        .route(endpoints::SEND_SMS, post(send_sms_endpoint))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

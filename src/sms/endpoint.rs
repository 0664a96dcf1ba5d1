use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::sms::SmsState;

/// A text message to relay.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsMessage {
    /// The recipient's phone number.
    pub to: String,
    /// The message body.
    #[serde(default)]
    pub text: String,
    /// The sender name, the relay's configured sender if not given.
    #[serde(default)]
    pub from: Option<String>,
}

/// Forward a text message to the SMS provider.
///
/// Responds with the provider's response on success, and a 502 with the error
/// message if the provider could not be reached or rejected the message.
pub async fn send_sms_endpoint(
    State(state): State<SmsState>,
    Json(message): Json<SmsMessage>,
) -> Response {
    match state
        .provider
        .send(&message.to, &message.text, message.from.as_deref())
        .await
    {
        Ok(data) => {
            tracing::info!("SMS sent to {}", message.to);
            Json(json!({ "success": true, "data": data })).into_response()
        }
        Err(error) => {
            tracing::error!("Could not send SMS to {}: {error}", message.to);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "success": false, "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

//! The client for the Vonage SMS API.

use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use crate::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The credentials and endpoint for the Vonage SMS API.
#[derive(Debug, Clone)]
pub struct VonageConfig {
    pub api_key: String,
    pub api_secret: String,
    /// The sender name used when a message does not name one.
    pub sender: String,
    /// The SMS endpoint that messages are posted to.
    pub url: String,
}

impl VonageConfig {
    /// The Vonage endpoint for sending SMS messages.
    pub const DEFAULT_URL: &'static str = "https://rest.nexmo.com/sms/json";
}

#[derive(Serialize)]
struct SmsRequest<'a> {
    api_key: &'a str,
    api_secret: &'a str,
    from: &'a str,
    to: &'a str,
    text: &'a str,
}

/// Sends text messages through the Vonage SMS API.
#[derive(Debug, Clone)]
pub struct SmsProvider {
    client: Client,
    config: VonageConfig,
}

impl SmsProvider {
    /// Create a provider client.
    ///
    /// # Errors
    /// Returns [Error::SmsProvider] if the HTTP client cannot be built.
    pub fn new(config: VonageConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| Error::SmsProvider(format!("could not build HTTP client: {error}")))?;

        Ok(Self { client, config })
    }

    /// Send `text` to `to`, from `from` or the configured sender.
    ///
    /// Returns the provider's response as is.
    ///
    /// # Errors
    /// Returns [Error::SmsProvider] if the provider cannot be reached, or it
    /// rejects any part of the message.
    pub async fn send(&self, to: &str, text: &str, from: Option<&str>) -> Result<Value, Error> {
        let body = serde_urlencoded::to_string(SmsRequest {
            api_key: &self.config.api_key,
            api_secret: &self.config.api_secret,
            from: from.unwrap_or(&self.config.sender),
            to,
            text,
        })
        .map_err(|error| Error::SmsProvider(format!("could not encode message: {error}")))?;

        let response = self
            .client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|error| {
                Error::SmsProvider(format!("could not reach the SMS provider: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::SmsProvider(format!(
                "the SMS provider responded with {status}: {message}"
            )));
        }

        let data = response
            .json::<Value>()
            .await
            .map_err(|error| Error::SmsProvider(format!("invalid provider response: {error}")))?;

        check_message_status(&data)?;

        Ok(data)
    }
}

/// Vonage reports each message part with a `status`, where "0" means accepted.
fn check_message_status(data: &Value) -> Result<(), Error> {
    let messages = data
        .get("messages")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for message in messages {
        let status = message.get("status").and_then(Value::as_str).unwrap_or("0");

        if status != "0" {
            let error_text = message
                .get("error-text")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");

            return Err(Error::SmsProvider(format!(
                "Message failed with error: {error_text}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod provider_tests {
    use serde_json::json;

    use crate::{Error, sms::provider::check_message_status};

    #[test]
    fn accepts_all_zero_statuses() {
        let data = json!({
            "message-count": "2",
            "messages": [{"status": "0"}, {"status": "0"}],
        });

        assert_eq!(check_message_status(&data), Ok(()));
    }

    #[test]
    fn rejects_any_failed_part() {
        let data = json!({
            "message-count": "2",
            "messages": [
                {"status": "0"},
                {"status": "4", "error-text": "Bad Credentials"},
            ],
        });

        assert_eq!(
            check_message_status(&data),
            Err(Error::SmsProvider(
                "Message failed with error: Bad Credentials".to_owned()
            ))
        );
    }
}

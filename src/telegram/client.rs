//! Bot API HTTP client

use super::types::{ApiResponse, ChatId, GetUpdatesRequest, SendMessageRequest, Update, User};
use super::TelegramError;
use crate::state_machine::OutboundMessage;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Slack on top of the long-poll timeout before the HTTP request gives up
const HTTP_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// Thin client over the Bot API methods this bot uses
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(poll_timeout + HTTP_TIMEOUT_MARGIN)
            .build()
            .map_err(|e| TelegramError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        })
    }

    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: vec!["message"],
        };
        self.call("getUpdates", &request).await
    }

    pub async fn send_message(
        &self,
        chat_id: ChatId,
        message: &OutboundMessage,
    ) -> Result<(), TelegramError> {
        let request = SendMessageRequest::new(chat_id, message);
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // The URL embeds the token, so it never goes into error messages
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                if e.is_timeout() {
                    TelegramError::network(format!("{method}: request timeout: {e}"))
                } else if e.is_connect() {
                    TelegramError::network(format!("{method}: connection failed: {e}"))
                } else {
                    TelegramError::network(format!("{method}: request failed: {e}"))
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::network(format!("{method}: failed to read response: {}", e.without_url())))?;

        decode_response(method, status, &body)
    }
}

/// Unwrap the `{ok, result}` envelope, classifying failures.
///
/// Telegram reports errors both through the HTTP status and the envelope's
/// `error_code`; the envelope wins when present.
pub(crate) fn decode_response<T: DeserializeOwned>(
    method: &str,
    status: u16,
    body: &str,
) -> Result<T, TelegramError> {
    let envelope: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if (200..300).contains(&status) => {
            return Err(TelegramError::unknown(format!(
                "{method}: failed to parse response: {e}"
            )));
        }
        Err(_) => {
            return Err(TelegramError::from_status(
                status,
                format!("{method}: HTTP {status}"),
            ));
        }
    };

    if envelope.ok {
        return envelope
            .result
            .ok_or_else(|| TelegramError::unknown(format!("{method}: response has no result")));
    }

    let code = envelope.error_code.unwrap_or(status);
    let description = envelope
        .description
        .unwrap_or_else(|| "no description".to_string());
    let mut err = TelegramError::from_status(code, format!("{method}: {description}"));
    if let Some(seconds) = envelope.parameters.and_then(|p| p.retry_after) {
        err = err.with_retry_after(Duration::from_secs(seconds));
    }
    Err(err)
}

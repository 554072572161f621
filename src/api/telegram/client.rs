use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client as HttpClient;
use serde_json::json;
use tracing::warn;

use super::models::{ApiError, ApiResponse, InlineKeyboardMarkup, Message, Update};

/// Telegram Bot API client; the only contact point with the messaging platform
pub struct TelegramClient {
    http_client: HttpClient,
    base_url: String,
    token: String,
}

impl TelegramClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.telegram.org";
    /// Server-side long-poll window for getUpdates
    pub const POLL_TIMEOUT_SECS: u64 = 30;
    // Client timeout must outlive the long-poll window
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(Self::POLL_TIMEOUT_SECS + 15);

    /// Create a new Bot API client
    pub fn new(token: String) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::RequestError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            token,
        })
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(token: String, base_url: String) -> Result<Self, ApiError> {
        let mut client = Self::new(token)?;
        client.base_url = base_url;
        Ok(client)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// getUpdates long poll; returns the next batch of updates at or after
    /// `offset`, blocking server-side up to `POLL_TIMEOUT_SECS`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, ApiError> {
        let response = self
            .http_client
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", Self::POLL_TIMEOUT_SECS.to_string()),
                ("allowed_updates", r#"["message","callback_query"]"#.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("request failed: {}", e)))?;

        Self::parse_response::<Vec<Update>>(response).await
    }

    /// sendMessage with plain text
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ApiError> {
        let body = json!({ "chat_id": chat_id, "text": text });
        self.post_json("sendMessage", body).await
    }

    /// sendMessage with an inline keyboard attached
    pub async fn send_message_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        markup: &InlineKeyboardMarkup,
    ) -> Result<(), ApiError> {
        let body = json!({ "chat_id": chat_id, "text": text, "reply_markup": markup });
        self.post_json("sendMessage", body).await
    }

    /// sendPhoto with in-memory PNG bytes and an optional caption
    pub async fn send_photo(
        &self,
        chat_id: i64,
        png_bytes: Vec<u8>,
        caption: Option<String>,
    ) -> Result<(), ApiError> {
        let photo = Part::bytes(png_bytes)
            .file_name("chart.png")
            .mime_str("image/png")
            .map_err(|e| ApiError::RequestError(format!("invalid photo part: {}", e)))?;

        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", photo);
        if let Some(caption) = caption {
            form = form.text("caption", caption);
        }

        let response = self
            .http_client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("request failed: {}", e)))?;

        Self::parse_response::<Message>(response).await?;
        Ok(())
    }

    /// answerCallbackQuery; stops the client-side loading spinner
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), ApiError> {
        let body = json!({ "callback_query_id": callback_query_id });
        self.post_json("answerCallbackQuery", body).await
    }

    async fn post_json(&self, method: &str, body: serde_json::Value) -> Result<(), ApiError> {
        let response = self
            .http_client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("request failed: {}", e)))?;

        Self::parse_response::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// Decode the `{ok, result, description}` envelope, mapping failures
    /// onto the status-specific error variants.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body_text = response.text().await.unwrap_or_default();

        let envelope: ApiResponse<T> = match serde_json::from_str(&body_text) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(ApiError::DeserializationError(e.to_string()))
            }
            Err(_) => return Err(Self::status_error(status.as_u16(), body_text)),
        };

        if envelope.ok {
            return envelope
                .result
                .ok_or_else(|| ApiError::DeserializationError("missing result field".to_string()));
        }

        let description = envelope
            .description
            .unwrap_or_else(|| "no description".to_string());
        if status.as_u16() == 429 {
            let retry_after = envelope
                .parameters
                .and_then(|p| p.retry_after)
                .unwrap_or(1);
            warn!("Rate limited by Telegram, retry after {}s", retry_after);
            return Err(ApiError::RateLimited { retry_after });
        }
        Err(Self::status_error(status.as_u16(), description))
    }

    fn status_error(code: u16, description: String) -> ApiError {
        match code {
            400 => ApiError::BadRequest(description),
            401 => ApiError::Unauthorized(description),
            500..=599 => ApiError::ServerError(code, description),
            _ => ApiError::HttpError(code, description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url_embeds_token() {
        let client = TelegramClient::new("abc123".to_string()).unwrap();
        assert!(client
            .method_url("sendMessage")
            .ends_with("/botabc123/sendMessage"));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_request_error() {
        // Port 9 (discard) refuses quickly; nothing listens there
        let client =
            TelegramClient::with_base_url("token".to_string(), "http://127.0.0.1:9".to_string())
                .unwrap();
        let err = client.send_message(1, "hi").await.unwrap_err();
        assert!(matches!(err, ApiError::RequestError(_)));
    }
}

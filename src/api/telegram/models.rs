use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Envelope every Bot API method answers with
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

/// One long-poll update; exactly one of the payload fields is set
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
    pub from: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
}

/// Inline keyboard button press
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

/// Error type for Bot API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("bad request: {0}")]
    BadRequest(String),
    /// 401 Unauthorized (bad token)
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// 429 Too Many Requests
    #[error("rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },
    /// 5xx from Telegram
    #[error("server error ({0}): {1}")]
    ServerError(u16, String),
    /// Other non-success HTTP statuses
    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/transport failure (includes timeouts)
    #[error("request failed: {0}")]
    RequestError(String),
    /// Payload did not match the expected shape
    #[error("failed to parse response: {0}")]
    DeserializationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_update() {
        let payload = r#"{
            "update_id": 731,
            "message": {
                "message_id": 42,
                "chat": {"id": 12345, "type": "private"},
                "from": {"id": 777, "is_bot": false, "first_name": "Ada"},
                "text": "/chart AAPL 180"
            }
        }"#;
        let update: Update = serde_json::from_str(payload).unwrap();
        assert_eq!(update.update_id, 731);
        let msg = update.message.unwrap();
        assert_eq!(msg.chat.id, 12345);
        assert_eq!(msg.text.as_deref(), Some("/chart AAPL 180"));
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn test_parse_callback_query_update() {
        let payload = r#"{
            "update_id": 732,
            "callback_query": {
                "id": "4382",
                "from": {"id": 777, "is_bot": false, "first_name": "Ada"},
                "message": {
                    "message_id": 43,
                    "chat": {"id": 12345, "type": "private"}
                },
                "data": "TSLA"
            }
        }"#;
        let update: Update = serde_json::from_str(payload).unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.data.as_deref(), Some("TSLA"));
        assert_eq!(query.message.unwrap().chat.id, 12345);
    }

    #[test]
    fn test_keyboard_serialization_skips_empty_callback() {
        let markup = InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: "Apple".to_string(),
                callback_data: Some("AAPL".to_string()),
            }]],
        };
        let json = serde_json::to_string(&markup).unwrap();
        assert!(json.contains("\"callback_data\":\"AAPL\""));
    }
}

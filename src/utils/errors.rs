use thiserror::Error;

/// Domain error for a single chart request.
///
/// Every failure is scoped to the request that produced it; nothing here is
/// fatal to the process. `user_message` is the text sent back to the chat.
#[derive(Debug, Error)]
pub enum BotError {
    /// Bad command syntax or argument values
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The provider answered but has no rows for this symbol/window
    #[error("no data available for '{0}'")]
    DataUnavailable(String),

    /// Transport or HTTP failure talking to the data provider
    #[error("market data provider error: {0}")]
    Provider(String),

    /// Series shorter than an indicator's minimum window
    #[error("{indicator} needs at least {required} data points, got {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    /// Chart generation failure
    #[error("chart rendering failed: {0}")]
    Render(String),

    /// Failure sending the reply through the messaging platform
    #[error("failed to deliver reply: {0}")]
    Delivery(String),

    /// Watchlist persistence failure
    #[error("watchlist storage error: {0}")]
    Storage(String),
}

impl BotError {
    /// Human-readable text for the requesting chat.
    pub fn user_message(&self) -> String {
        match self {
            BotError::InvalidArgument(msg) => format!("❌ {}", msg),
            BotError::DataUnavailable(symbol) => format!(
                "❌ Could not fetch data for '{}'. Try a different symbol or a longer period.",
                symbol
            ),
            BotError::Provider(_) => {
                "⚠️ Could not fetch market data right now. Please try again in a moment.".to_string()
            }
            BotError::InsufficientData { indicator, .. } => format!(
                "⚠️ Not enough history to compute {} for this window.",
                indicator
            ),
            BotError::Render(_) => "❌ Failed to generate the chart image.".to_string(),
            // Undeliverable by definition; kept for completeness
            BotError::Delivery(msg) => format!("❌ {}", msg),
            BotError::Storage(_) => "❌ Could not update the watchlist.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_nonempty() {
        let errors = vec![
            BotError::InvalidArgument("usage".to_string()),
            BotError::DataUnavailable("XYZ".to_string()),
            BotError::Provider("timeout".to_string()),
            BotError::InsufficientData {
                indicator: "RSI",
                required: 15,
                available: 3,
            },
            BotError::Render("empty".to_string()),
            BotError::Delivery("413".to_string()),
            BotError::Storage("permission denied".to_string()),
        ];
        for e in errors {
            assert!(!e.user_message().is_empty());
        }
    }

    #[test]
    fn test_data_unavailable_message_names_symbol() {
        let e = BotError::DataUnavailable("NOSUCH".to_string());
        assert!(e.user_message().contains("NOSUCH"));
    }
}

//! Chart request parsing

use crate::utils::BotError;

/// Lookback applied when the user gives only a symbol
pub const DEFAULT_LOOKBACK_DAYS: u32 = 180;

/// Upper bound accepted for a lookback window; Yahoo serves roughly a decade
/// of daily bars for most symbols
pub const MAX_LOOKBACK_DAYS: u32 = 3650;

/// Parsed arguments of a `/chart` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub symbol: String,
    pub lookback_days: u32,
}

impl ChartRequest {
    /// Parse `/chart <SYMBOL> [LOOKBACK_DAYS]` arguments.
    pub fn parse(args: &[&str]) -> Result<Self, BotError> {
        let symbol = match args.first() {
            Some(s) if !s.trim().is_empty() => s.trim().to_uppercase(),
            _ => {
                return Err(BotError::InvalidArgument(
                    "Usage: /chart <SYMBOL> [DAYS]\nExamples: /chart AAPL 180, /chart BTC-USD 30"
                        .to_string(),
                ))
            }
        };

        let lookback_days = match args.get(1) {
            None => DEFAULT_LOOKBACK_DAYS,
            Some(raw) => {
                let days: i64 = raw.parse().map_err(|_| {
                    BotError::InvalidArgument(format!("'{}' is not a number of days", raw))
                })?;
                if days <= 0 {
                    return Err(BotError::InvalidArgument(
                        "The lookback must be a positive number of days".to_string(),
                    ));
                }
                if days > MAX_LOOKBACK_DAYS as i64 {
                    return Err(BotError::InvalidArgument(format!(
                        "The lookback cannot exceed {} days",
                        MAX_LOOKBACK_DAYS
                    )));
                }
                days as u32
            }
        };

        Ok(ChartRequest {
            symbol,
            lookback_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_only_uses_default_lookback() {
        let req = ChartRequest::parse(&["TSLA"]).unwrap();
        assert_eq!(req.symbol, "TSLA");
        assert_eq!(req.lookback_days, DEFAULT_LOOKBACK_DAYS);
    }

    #[test]
    fn test_symbol_and_lookback() {
        let req = ChartRequest::parse(&["BTC-USD", "30"]).unwrap();
        assert_eq!(req.symbol, "BTC-USD");
        assert_eq!(req.lookback_days, 30);
    }

    #[test]
    fn test_symbol_is_uppercased() {
        let req = ChartRequest::parse(&["aapl"]).unwrap();
        assert_eq!(req.symbol, "AAPL");
    }

    #[test]
    fn test_missing_symbol_is_invalid() {
        assert!(matches!(
            ChartRequest::parse(&[]),
            Err(BotError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_lookback_is_invalid() {
        assert!(matches!(
            ChartRequest::parse(&["AAPL", "0"]),
            Err(BotError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_negative_lookback_is_invalid() {
        assert!(matches!(
            ChartRequest::parse(&["AAPL", "-5"]),
            Err(BotError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_non_numeric_lookback_is_invalid() {
        assert!(matches!(
            ChartRequest::parse(&["AAPL", "month"]),
            Err(BotError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_oversized_lookback_is_invalid() {
        assert!(matches!(
            ChartRequest::parse(&["AAPL", "100000"]),
            Err(BotError::InvalidArgument(_))
        ));
    }
}

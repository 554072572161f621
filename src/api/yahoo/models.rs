use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Candle, PriceSeries};

/// Top-level payload of the v8 chart endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Error object Yahoo embeds in the payload (e.g. code "Not Found")
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: Option<String>,
    #[serde(rename = "exchangeName")]
    pub exchange_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    pub quote: Vec<Quote>,
}

/// Parallel arrays, one slot per timestamp; halted days come through as null
#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<Option<f64>>,
}

/// Error type for Yahoo chart API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Symbol unknown to the provider
    #[error("symbol not found: {0}")]
    NotFound(String),
    /// 429 Too Many Requests
    #[error("rate limited by provider")]
    RateLimited,
    /// 5xx from the provider
    #[error("provider server error ({0}): {1}")]
    ServerError(u16, String),
    /// Other non-success HTTP statuses
    #[error("provider HTTP error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/transport failure (includes timeouts)
    #[error("request failed: {0}")]
    RequestError(String),
    /// Payload did not match the expected shape
    #[error("failed to parse provider response: {0}")]
    DeserializationError(String),
    /// Well-formed payload with zero usable rows
    #[error("provider returned no rows for {0}")]
    EmptyData(String),
}

impl ChartResult {
    /// Flatten the parallel-array payload into a validated `PriceSeries`.
    ///
    /// Rows missing any OHLC field are dropped; a missing volume is zero.
    pub fn into_series(self) -> Result<PriceSeries, ApiError> {
        let symbol = self.meta.symbol.clone();
        let timestamps = self.timestamp.unwrap_or_default();
        let quote = self
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::EmptyData(symbol.clone()))?;

        let mut candles = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            let date = match DateTime::from_timestamp(*ts, 0) {
                Some(dt) => dt.date_naive(),
                None => continue,
            };
            let row = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
            );
            if let (Some(open), Some(high), Some(low), Some(close)) = row {
                candles.push(Candle {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
                });
            }
        }

        if candles.is_empty() {
            return Err(ApiError::EmptyData(symbol));
        }
        Ok(PriceSeries::new(candles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "currency": "USD", "exchangeName": "NMS"},
                "timestamp": [1704204000, 1704290400, 1704376800],
                "indicators": {
                    "quote": [{
                        "open":   [185.1, 186.0, null],
                        "high":   [186.5, 187.2, 188.0],
                        "low":    [184.2, 185.0, 186.1],
                        "close":  [186.0, 186.9, 187.5],
                        "volume": [52000000, null, 48000000]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    const NOT_FOUND: &str = r#"{
        "chart": {
            "result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
        }
    }"#;

    #[test]
    fn test_parse_chart_payload() {
        let resp: ChartResponse = serde_json::from_str(FIXTURE).unwrap();
        let result = resp.chart.result.unwrap().remove(0);
        assert_eq!(result.meta.symbol, "AAPL");

        let series = result.into_series().unwrap();
        // Third row has a null open and is dropped
        assert_eq!(series.len(), 2);
        assert_eq!(series.candles()[0].close, 186.0);
        // Null volume becomes zero
        assert_eq!(series.candles()[1].volume, 0.0);
    }

    #[test]
    fn test_parse_error_payload() {
        let resp: ChartResponse = serde_json::from_str(NOT_FOUND).unwrap();
        assert!(resp.chart.result.is_none());
        assert_eq!(resp.chart.error.unwrap().code, "Not Found");
    }

    #[test]
    fn test_all_null_rows_is_empty_data() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "HALTED"},
                    "timestamp": [1704204000],
                    "indicators": {
                        "quote": [{
                            "open": [null], "high": [null], "low": [null],
                            "close": [null], "volume": [null]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(payload).unwrap();
        let result = resp.chart.result.unwrap().remove(0);
        assert!(matches!(result.into_series(), Err(ApiError::EmptyData(_))));
    }
}

use std::time::Duration;

use chrono::Utc;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{ApiError, ChartResponse};
use crate::models::PriceSeries;

/// Yahoo Finance chart API client for fetching daily OHLCV history
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
}

impl YahooClient {
    const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com/v8/finance/chart";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    // Yahoo rejects requests without a browser-ish user agent
    const USER_AGENT: &'static str = "Mozilla/5.0 (X11; Linux x86_64) candlegram/0.1";

    /// Create a new chart API client with a bounded request timeout
    pub fn new() -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(Self::USER_AGENT)
            .build()
            .map_err(|e| ApiError::RequestError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Result<Self, ApiError> {
        let mut client = Self::new()?;
        client.base_url = base_url;
        Ok(client)
    }

    /// GET /{symbol}?period1=..&period2=..&interval=1d
    ///
    /// Fetches daily bars covering the trailing `lookback_days`. The window
    /// end is pushed one day forward so the current session is included.
    pub async fn fetch_daily_history(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<PriceSeries, ApiError> {
        let period2 = Utc::now().timestamp() + 86_400;
        let period1 = period2 - i64::from(lookback_days) * 86_400;
        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        );
        debug!("Fetching daily history: {} ({} days)", symbol, lookback_days);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Self::handle_error_response(symbol, status, body_text));
        }

        let payload: ChartResponse = response
            .json()
            .await
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;

        if let Some(err) = payload.chart.error {
            warn!("Provider error for {}: {} ({})", symbol, err.code, err.description);
            return Err(ApiError::NotFound(symbol.to_string()));
        }

        let result = payload
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| ApiError::EmptyData(symbol.to_string()))?;

        result.into_series()
    }

    /// Map a non-success HTTP status onto an `ApiError`
    fn handle_error_response(symbol: &str, status: reqwest::StatusCode, body: String) -> ApiError {
        match status.as_u16() {
            // Yahoo answers 404 with a JSON error body for unknown symbols
            404 => ApiError::NotFound(symbol.to_string()),
            429 => {
                warn!("Rate limited by provider while fetching {}", symbol);
                ApiError::RateLimited
            }
            code @ 500..=599 => {
                warn!("Provider server error {} for {}: {}", code, symbol, body);
                ApiError::ServerError(code, body)
            }
            code => ApiError::HttpError(code, body),
        }
    }
}

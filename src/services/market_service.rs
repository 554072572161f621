use tracing::info;

use crate::api::yahoo::{self, YahooClient};
use crate::models::{ChartRequest, PriceSeries};
use crate::utils::BotError;

/// Fetch the daily history a chart request asks for.
///
/// Provider errors are folded into the two domain kinds the caller cares
/// about: the symbol has no data, or the provider itself failed.
pub async fn fetch_history(
    client: &YahooClient,
    request: &ChartRequest,
) -> Result<PriceSeries, BotError> {
    let series = client
        .fetch_daily_history(&request.symbol, request.lookback_days)
        .await
        .map_err(|e| map_api_error(&request.symbol, e))?;

    info!(
        "Fetched {} daily bars for {} ({} day window)",
        series.len(),
        request.symbol,
        request.lookback_days
    );
    Ok(series)
}

fn map_api_error(symbol: &str, error: yahoo::ApiError) -> BotError {
    match error {
        yahoo::ApiError::NotFound(_) | yahoo::ApiError::EmptyData(_) => {
            BotError::DataUnavailable(symbol.to_string())
        }
        other => BotError::Provider(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_data_unavailable() {
        let err = map_api_error("NOSUCH", yahoo::ApiError::NotFound("NOSUCH".to_string()));
        assert!(matches!(err, BotError::DataUnavailable(_)));
    }

    #[test]
    fn test_empty_data_maps_to_data_unavailable() {
        let err = map_api_error("THIN", yahoo::ApiError::EmptyData("THIN".to_string()));
        assert!(matches!(err, BotError::DataUnavailable(_)));
    }

    #[test]
    fn test_transport_failure_maps_to_provider_error() {
        let err = map_api_error("AAPL", yahoo::ApiError::RequestError("timeout".to_string()));
        assert!(matches!(err, BotError::Provider(_)));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_provider_error_not_panic() {
        // Port 9 (discard) refuses quickly; nothing listens there
        let client = YahooClient::with_base_url("http://127.0.0.1:9".to_string()).unwrap();
        let request = ChartRequest {
            symbol: "AAPL".to_string(),
            lookback_days: 30,
        };
        let err = fetch_history(&client, &request).await.unwrap_err();
        assert!(matches!(err, BotError::Provider(_)));
    }
}

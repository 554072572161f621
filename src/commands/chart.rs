use tracing::info;

use crate::models::{ChartRequest, IndicatorOverlay, PriceSeries};
use crate::services::{chart_service, indicator_service, market_service};
use crate::utils::BotError;
use crate::BotContext;

pub async fn execute(ctx: &BotContext, chat_id: i64, args: &[&str]) -> Result<(), BotError> {
    info!("📈 Chart command from chat {} with args: {:?}", chat_id, args);
    let request = ChartRequest::parse(args)?;
    send_chart(ctx, chat_id, &request).await
}

/// Full chart flow: fetch → indicators → render → reply.
///
/// Also entered from watchlist button presses, which carry a symbol and the
/// default lookback.
pub async fn send_chart(
    ctx: &BotContext,
    chat_id: i64,
    request: &ChartRequest,
) -> Result<(), BotError> {
    let series = market_service::fetch_history(&ctx.market, request).await?;

    let overlay = indicator_service::compute_overlay(
        &series,
        indicator_service::DEFAULT_RSI_PERIOD,
        indicator_service::DEFAULT_DONCHIAN_WINDOW,
    );

    let png = chart_service::render_chart(&series, &overlay, &request.symbol, request.lookback_days)?;
    info!(
        "✓ Chart generated for {}: {} bytes",
        request.symbol,
        png.len()
    );

    let caption = build_caption(request, &series, &overlay);
    ctx.telegram
        .send_photo(chat_id, png, Some(caption))
        .await
        .map_err(|e| BotError::Delivery(e.to_string()))?;

    info!("✓ Chart sent to chat {} for {}", chat_id, request.symbol);
    Ok(())
}

/// Photo caption: last close plus the floor-trader levels
fn build_caption(request: &ChartRequest, series: &PriceSeries, overlay: &IndicatorOverlay) -> String {
    let mut caption = match series.last() {
        Some(last) => format!(
            "{} · {} · close {:.2}",
            request.symbol,
            last.date.format("%Y-%m-%d"),
            last.close
        ),
        None => request.symbol.clone(),
    };
    if let Some(levels) = &overlay.pivots {
        caption.push_str(&format!(
            "\n📊 Levels: Pivot={:.2}, R1={:.2}, S1={:.2}, R2={:.2}, S2={:.2}",
            levels.pivot, levels.r1, levels.s1, levels.r2, levels.s2
        ));
    }
    caption
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candle;
    use chrono::NaiveDate;

    #[test]
    fn test_caption_carries_close_and_levels() {
        let series = PriceSeries::new(vec![Candle {
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            open: 10.0,
            high: 12.0,
            low: 9.0,
            close: 10.5,
            volume: 100.0,
        }]);
        let request = ChartRequest {
            symbol: "TEST".to_string(),
            lookback_days: 30,
        };
        let overlay = crate::services::indicator_service::compute_overlay(&series, 14, 20);

        let caption = build_caption(&request, &series, &overlay);
        assert!(caption.contains("TEST"));
        assert!(caption.contains("close 10.50"));
        assert!(caption.contains("Pivot=10.50"));
    }
}

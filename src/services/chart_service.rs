use plotters::prelude::*;

use crate::models::{IndicatorOverlay, PriceSeries};
use crate::utils::BotError;

pub const CHART_WIDTH: u32 = 1400;
pub const CHART_HEIGHT: u32 = 700;

const UP_COLOR: RGBColor = RGBColor(0, 128, 0);
const DOWN_COLOR: RGBColor = RGBColor(200, 30, 30);
const BAND_COLOR: RGBColor = RGBColor(30, 60, 200);
const VOLUME_COLOR: RGBColor = RGBColor(128, 0, 128);

/// Render the candlestick chart with its indicator panes as PNG bytes.
///
/// Layout is three stacked panes: price with Donchian bands (60%), RSI with
/// 70/30 guides (20%), volume bars (20%). The x-axis is the candle index
/// with date labels, so weekends and halts leave no gaps.
pub fn render_chart(
    series: &PriceSeries,
    overlay: &IndicatorOverlay,
    symbol: &str,
    lookback_days: u32,
) -> Result<Vec<u8>, BotError> {
    render_chart_with_size(series, overlay, symbol, lookback_days, CHART_WIDTH, CHART_HEIGHT)
}

pub fn render_chart_with_size(
    series: &PriceSeries,
    overlay: &IndicatorOverlay,
    symbol: &str,
    lookback_days: u32,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, BotError> {
    if series.is_empty() {
        return Err(BotError::Render("empty price series".to_string()));
    }

    let candles = series.candles();
    let n = candles.len();
    let dates: Vec<String> = candles
        .iter()
        .map(|c| c.date.format("%Y-%m-%d").to_string())
        .collect();

    // Use a temporary file path for BitMapBackend
    let temp_file = format!(
        "/tmp/candlegram_chart_{}_{}.png",
        symbol.replace('/', "_"),
        chrono::Utc::now().timestamp_millis()
    );

    {
        let backend = BitMapBackend::new(&temp_file, (width, height));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| BotError::Render(format!("failed to fill canvas: {}", e)))?;

        // 60/20/20 vertical split: price, RSI, volume
        let (price_area, rest) = root.split_vertically((height * 6) / 10);
        let (rsi_area, volume_area) = rest.split_vertically((height * 2) / 10);

        let x_range = 0f64..n as f64;
        let label_formatter = |x: &f64| -> String {
            let idx = *x as usize;
            dates.get(idx).cloned().unwrap_or_default()
        };

        // --- Price pane: candlesticks + Donchian bands ---
        let min_low = series.lows().iter().cloned().fold(f64::INFINITY, f64::min);
        let max_high = series
            .highs()
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let y_min = min_low * 0.98;
        let y_max = max_high * 1.02;

        let mut price_chart = ChartBuilder::on(&price_area)
            .caption(
                format!("{} - Last {} Days", symbol, lookback_days),
                ("sans-serif", 28.0).into_font(),
            )
            .margin(10)
            .x_label_area_size(25)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_min..y_max)
            .map_err(|e| BotError::Render(format!("failed to build price pane: {}", e)))?;

        price_chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&label_formatter)
            .light_line_style(&RGBColor(230, 230, 230))
            .draw()
            .map_err(|e| BotError::Render(format!("failed to draw price mesh: {}", e)))?;

        let candle_width = (((width as f64 * 0.6) / n as f64) as u32).clamp(1, 12);
        price_chart
            .draw_series(candles.iter().enumerate().map(|(i, c)| {
                CandleStick::new(
                    i as f64 + 0.5,
                    c.open,
                    c.high,
                    c.low,
                    c.close,
                    UP_COLOR.filled(),
                    DOWN_COLOR.filled(),
                    candle_width,
                )
            }))
            .map_err(|e| BotError::Render(format!("failed to draw candlesticks: {}", e)))?;

        if let Some(donchian) = &overlay.donchian {
            let band_points = |values: &[Option<f64>]| -> Vec<(f64, f64)> {
                values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| (i as f64 + 0.5, v)))
                    .collect()
            };
            for bound in [&donchian.upper, &donchian.lower] {
                price_chart
                    .draw_series(LineSeries::new(band_points(bound), &BAND_COLOR))
                    .map_err(|e| BotError::Render(format!("failed to draw Donchian band: {}", e)))?;
            }
            price_chart
                .draw_series(DashedLineSeries::new(
                    band_points(&donchian.middle),
                    4,
                    3,
                    BAND_COLOR.stroke_width(1),
                ))
                .map_err(|e| BotError::Render(format!("failed to draw Donchian midline: {}", e)))?;
        }

        // --- RSI pane ---
        let rsi_points: Vec<(f64, f64)> = overlay
            .rsi
            .as_ref()
            .map(|rsi| {
                rsi.values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| (i as f64 + 0.5, v)))
                    .collect()
            })
            .unwrap_or_default();

        let (rsi_min, rsi_max) = if rsi_points.is_empty() {
            (0.0, 100.0)
        } else {
            let lo = rsi_points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
            let hi = rsi_points
                .iter()
                .map(|p| p.1)
                .fold(f64::NEG_INFINITY, f64::max);
            ((lo * 0.98).max(0.0), (hi * 1.02).min(100.0))
        };

        let rsi_period = overlay
            .rsi
            .as_ref()
            .map(|r| r.period)
            .unwrap_or(super::indicator_service::DEFAULT_RSI_PERIOD);
        let mut rsi_chart = ChartBuilder::on(&rsi_area)
            .caption(format!("RSI ({})", rsi_period), ("sans-serif", 18.0).into_font())
            .margin(10)
            .x_label_area_size(0)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), rsi_min..rsi_max)
            .map_err(|e| BotError::Render(format!("failed to build RSI pane: {}", e)))?;

        rsi_chart
            .configure_mesh()
            .disable_x_mesh()
            .y_labels(4)
            .light_line_style(&RGBColor(230, 230, 230))
            .draw()
            .map_err(|e| BotError::Render(format!("failed to draw RSI mesh: {}", e)))?;

        if !rsi_points.is_empty() {
            rsi_chart
                .draw_series(LineSeries::new(rsi_points, &BAND_COLOR))
                .map_err(|e| BotError::Render(format!("failed to draw RSI line: {}", e)))?;
        }
        for (level, color) in [(70.0, &DOWN_COLOR), (30.0, &UP_COLOR)] {
            if level >= rsi_min && level <= rsi_max {
                rsi_chart
                    .draw_series(DashedLineSeries::new(
                        vec![(0.0, level), (n as f64, level)],
                        6,
                        4,
                        color.stroke_width(1),
                    ))
                    .map_err(|e| BotError::Render(format!("failed to draw RSI guide: {}", e)))?;
            }
        }

        // --- Volume pane ---
        let max_volume = candles
            .iter()
            .map(|c| c.volume)
            .fold(f64::NEG_INFINITY, f64::max)
            .max(1.0);

        let mut volume_chart = ChartBuilder::on(&volume_area)
            .caption("Volume", ("sans-serif", 18.0).into_font())
            .margin(10)
            .x_label_area_size(25)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, 0f64..max_volume * 1.1)
            .map_err(|e| BotError::Render(format!("failed to build volume pane: {}", e)))?;

        volume_chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&label_formatter)
            .y_labels(3)
            .light_line_style(&RGBColor(230, 230, 230))
            .draw()
            .map_err(|e| BotError::Render(format!("failed to draw volume mesh: {}", e)))?;

        volume_chart
            .draw_series(candles.iter().enumerate().map(|(i, c)| {
                Rectangle::new(
                    [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, c.volume)],
                    VOLUME_COLOR.mix(0.5).filled(),
                )
            }))
            .map_err(|e| BotError::Render(format!("failed to draw volume bars: {}", e)))?;

        root.present()
            .map_err(|e| BotError::Render(format!("failed to render chart: {}", e)))?;
    }

    // Read the temporary file into memory and clean up
    let image_data =
        std::fs::read(&temp_file).map_err(|e| BotError::Render(format!("failed to read chart file: {}", e)))?;
    let _ = std::fs::remove_file(&temp_file);

    Ok(image_data)
}

//! Technical indicator computation
//!
//! All functions are pure over the price series; results are aligned
//! index-for-index with the input, `None` until the window has filled.

use tracing::warn;

use crate::models::{Candle, DonchianSeries, IndicatorOverlay, PivotLevels, PriceSeries, RsiSeries};
use crate::utils::BotError;

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_DONCHIAN_WINDOW: usize = 20;

/// Relative Strength Index with Wilder smoothing.
///
/// The seed averages are simple means of the first `period` deltas; every
/// later average folds the new gain/loss in as
/// `(prev * (period - 1) + current) / period`. Needs `period + 1` closes
/// for the first defined value.
pub fn rsi(closes: &[f64], period: usize) -> Result<RsiSeries, BotError> {
    if period == 0 {
        return Err(BotError::InvalidArgument(
            "RSI period must be positive".to_string(),
        ));
    }
    if closes.len() <= period {
        return Err(BotError::InsufficientData {
            indicator: "RSI",
            required: period + 1,
            available: closes.len(),
        });
    }

    let mut values: Vec<Option<f64>> = vec![None; closes.len()];

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in 1..=period {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gain_sum += delta;
        } else {
            loss_sum -= delta;
        }
    }
    let mut avg_gain = gain_sum / period as f64;
    let mut avg_loss = loss_sum / period as f64;
    values[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        values[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    Ok(RsiSeries { period, values })
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Donchian channel: rolling max of highs / min of lows over `window` days,
/// plus the midline between them.
pub fn donchian(highs: &[f64], lows: &[f64], window: usize) -> Result<DonchianSeries, BotError> {
    if window == 0 {
        return Err(BotError::InvalidArgument(
            "Donchian window must be positive".to_string(),
        ));
    }
    let len = highs.len().min(lows.len());
    if len < window {
        return Err(BotError::InsufficientData {
            indicator: "Donchian channel",
            required: window,
            available: len,
        });
    }

    let mut upper: Vec<Option<f64>> = vec![None; len];
    let mut lower: Vec<Option<f64>> = vec![None; len];
    let mut middle: Vec<Option<f64>> = vec![None; len];

    for i in (window - 1)..len {
        let start = i + 1 - window;
        let hi = highs[start..=i].iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let lo = lows[start..=i].iter().cloned().fold(f64::INFINITY, f64::min);
        upper[i] = Some(hi);
        lower[i] = Some(lo);
        middle[i] = Some((hi + lo) / 2.0);
    }

    Ok(DonchianSeries {
        window,
        upper,
        lower,
        middle,
    })
}

/// Classic floor-trader pivot levels from the most recent trading day
pub fn pivot_levels(last: &Candle) -> PivotLevels {
    let pivot = (last.high + last.low + last.close) / 3.0;
    PivotLevels {
        pivot,
        r1: 2.0 * pivot - last.low,
        s1: 2.0 * pivot - last.high,
        r2: pivot + (last.high - last.low),
        s2: pivot - (last.high - last.low),
    }
}

/// Compute every overlay the chart can carry.
///
/// An indicator whose minimum window exceeds the series length is omitted
/// (logged, slot left `None`); the request itself never fails here.
pub fn compute_overlay(
    series: &PriceSeries,
    rsi_period: usize,
    donchian_window: usize,
) -> IndicatorOverlay {
    let closes = series.closes();
    let highs = series.highs();
    let lows = series.lows();

    let rsi = match rsi(&closes, rsi_period) {
        Ok(series) => Some(series),
        Err(e) => {
            warn!("Omitting RSI overlay: {}", e);
            None
        }
    };

    let donchian = match donchian(&highs, &lows, donchian_window) {
        Ok(series) => Some(series),
        Err(e) => {
            warn!("Omitting Donchian overlay: {}", e);
            None
        }
    };

    IndicatorOverlay {
        rsi,
        donchian,
        pivots: series.last().map(pivot_levels),
    }
}

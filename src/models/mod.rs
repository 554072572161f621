//! Data models shared across commands and services
//!
//! Everything here is request-scoped plain data; nothing persists past the
//! request that produced it (the watchlist map lives in its service).

pub mod candle;
pub mod chart;
pub mod indicator;

pub use candle::{Candle, PriceSeries};
pub use chart::{ChartRequest, DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS};
pub use indicator::{DonchianSeries, IndicatorOverlay, PivotLevels, RsiSeries};

//! Indicator result structs
//!
//! All per-day series are aligned index-for-index with the `PriceSeries`
//! they were computed from; `None` marks days before the window has filled.

/// RSI values, one slot per trading day
#[derive(Debug, Clone, PartialEq)]
pub struct RsiSeries {
    pub period: usize,
    pub values: Vec<Option<f64>>,
}

/// Donchian channel bounds, one slot per trading day
#[derive(Debug, Clone, PartialEq)]
pub struct DonchianSeries {
    pub window: usize,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
}

/// Classic floor-trader pivot levels derived from the last trading day
#[derive(Debug, Clone, PartialEq)]
pub struct PivotLevels {
    pub pivot: f64,
    pub r1: f64,
    pub s1: f64,
    pub r2: f64,
    pub s2: f64,
}

/// Everything the renderer overlays on a price series.
///
/// Each component is `None` when the series was too short to compute it;
/// the chart is still rendered with whatever is present.
#[derive(Debug, Clone, Default)]
pub struct IndicatorOverlay {
    pub rsi: Option<RsiSeries>,
    pub donchian: Option<DonchianSeries>,
    pub pivots: Option<PivotLevels>,
}

use chrono::NaiveDate;

/// One trading day of OHLCV data
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Daily price history for one symbol, ordered by date ascending.
///
/// Dates are strictly increasing; the constructor sorts incoming rows and
/// collapses duplicate dates keeping the latest row (providers repeat the
/// live bar at the end of the feed).
#[derive(Debug, Clone)]
pub struct PriceSeries {
    candles: Vec<Candle>,
}

impl PriceSeries {
    pub fn new(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.date);
        let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
        for candle in candles {
            match deduped.last_mut() {
                Some(last) if last.date == candle.date => *last = candle,
                _ => deduped.push(candle),
            }
        }
        PriceSeries { candles: deduped }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(date: &str, close: f64) -> Candle {
        Candle {
            date: date.parse().unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn test_series_sorts_by_date() {
        let series = PriceSeries::new(vec![
            candle("2024-01-03", 3.0),
            candle("2024-01-01", 1.0),
            candle("2024-01-02", 2.0),
        ]);
        let dates: Vec<_> = series.candles().iter().map(|c| c.date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_duplicate_dates_keep_latest_row() {
        let series = PriceSeries::new(vec![
            candle("2024-01-01", 1.0),
            candle("2024-01-02", 2.0),
            candle("2024-01-02", 5.0),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 5.0);
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::new(vec![]);
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }
}

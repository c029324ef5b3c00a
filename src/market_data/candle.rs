use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar as returned by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

// ---------------------------------------------------------------------------
// OhlcSeries -- time-ordered bars for one ticker
// ---------------------------------------------------------------------------

/// Raw price history for one ticker, ordered by timestamp ascending.
///
/// The series is immutable once built; indicators are computed into separate
/// columns instead of being written back here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OhlcSeries {
    candles: Vec<Candle>,
}

impl OhlcSeries {
    /// Build a series, sorting the bars by timestamp.
    pub fn new(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        Self { candles }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

/// Build a series from close prices alone, one bar per minute starting at
/// the UNIX epoch. Open/high/low equal the close.
#[cfg(test)]
pub fn series_from_closes(closes: &[f64]) -> OhlcSeries {
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let ts = DateTime::from_timestamp(i as i64 * 60, 0).unwrap();
            Candle::new(ts, c, c, c, c, 1_000.0)
        })
        .collect();
    OhlcSeries::new(candles)
}

// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD   = EMA_fast(close) - EMA_slow(close)
//   Signal = EMA_signal(MACD)
//   Hist   = MACD - Signal
//
// Every column is aligned row-for-row with the closes, and each row carries
// its own buy/sell label (buy iff MACD > Signal).
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;
use crate::types::MacdSignal;

pub const FAST_SPAN: usize = 12;
pub const SLOW_SPAN: usize = 26;
pub const SIGNAL_SPAN: usize = 9;

/// Derived MACD columns for one close-price series.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MacdColumns {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
    pub labels: Vec<MacdSignal>,
}

impl MacdColumns {
    /// Label of the most recent row, if any.
    pub fn latest_label(&self) -> Option<MacdSignal> {
        self.labels.last().copied()
    }
}

/// Compute the standard 12/26/9 MACD over `closes`.
pub fn compute_macd(closes: &[f64]) -> MacdColumns {
    compute_macd_with(closes, FAST_SPAN, SLOW_SPAN, SIGNAL_SPAN)
}

/// Compute MACD with explicit spans.
///
/// Returns empty columns for empty input or a zero span.
pub fn compute_macd_with(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> MacdColumns {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);
    if ema_fast.is_empty() || ema_slow.is_empty() || signal_span == 0 {
        return MacdColumns::default();
    }

    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = calculate_ema(&macd, signal_span);
    let hist = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
    let labels = macd
        .iter()
        .zip(&signal)
        .map(|(&m, &s)| MacdSignal::classify(m, s))
        .collect();

    MacdColumns {
        ema_fast,
        ema_slow,
        macd,
        signal,
        hist,
        labels,
    }
}

#[cfg(test)]
impl MacdColumns {
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

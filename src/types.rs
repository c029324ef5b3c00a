// =============================================================================
// Shared types used across the scanner
// =============================================================================

use serde::{Deserialize, Serialize};

/// Bar size requested from the market-data provider.
///
/// Restricted to the intraday sizes the UI offers; anything else is rejected
/// when the request body is deserialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    SixtyMinutes,
}

impl Interval {
    /// Every interval offered by the UI, in display order.
    pub const ALL: [Interval; 3] = [
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
    ];

    /// Query-string form understood by the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::SixtyMinutes => "60m",
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::FifteenMinutes
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-row MACD classification. Ties between MACD and Signal are `Sell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdSignal {
    Buy,
    Sell,
}

impl MacdSignal {
    pub fn classify(macd: f64, signal: f64) -> Self {
        if macd > signal {
            Self::Buy
        } else {
            Self::Sell
        }
    }
}

impl std::fmt::Display for MacdSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Whether a scan is currently being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPhase {
    Idle,
    Running,
}

impl Default for ScanPhase {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_uses_provider_spelling() {
        let json = serde_json::to_string(&Interval::ALL).unwrap();
        assert_eq!(json, r#"["15m","30m","60m"]"#);
        let parsed: Interval = serde_json::from_str(r#""60m""#).unwrap();
        assert_eq!(parsed, Interval::SixtyMinutes);
    }

    #[test]
    fn interval_rejects_unlisted_sizes() {
        assert!(serde_json::from_str::<Interval>(r#""1d""#).is_err());
        assert!(serde_json::from_str::<Interval>(r#""5m""#).is_err());
    }

    #[test]
    fn macd_signal_ties_are_sell() {
        assert_eq!(MacdSignal::classify(1.0, 0.5), MacdSignal::Buy);
        assert_eq!(MacdSignal::classify(0.5, 1.0), MacdSignal::Sell);
        assert_eq!(MacdSignal::classify(0.25, 0.25), MacdSignal::Sell);
        assert_eq!(serde_json::to_string(&MacdSignal::Buy).unwrap(), r#""buy""#);
    }
}

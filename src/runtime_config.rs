// =============================================================================
// Runtime Configuration — scanner settings with serde defaults
// =============================================================================
//
// Every tunable lives here: the ticker universe, the fetch pool size, the
// provider endpoint and the defaults/bounds the UI offers. All fields carry
// `#[serde(default)]` so a partial JSON file (or none at all) still loads.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::market_data::fetcher::DEFAULT_CONCURRENCY;
use crate::market_data::yahoo::DEFAULT_BASE_URL;
use crate::types::Interval;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

/// Bovespa tickers scanned on every run.
fn default_tickers() -> Vec<String> {
    [
        "RAIL3.SA", "ABEV3.SA", "AZUL4.SA", "BBAS3.SA", "BBDC4.SA", "BRFS3.SA",
        "B3SA3.SA", "CIEL3.SA", "CMIG4.SA", "CPLE6.SA", "CSAN3.SA", "CSNA3.SA",
        "CYRE3.SA", "ELET3.SA", "EMBR3.SA", "EQTL3.SA", "GGBR4.SA", "PRIO3.SA",
        "HYPE3.SA", "ITSA4.SA", "ITUB4.SA", "JBSS3.SA", "LREN3.SA", "MGLU3.SA",
        "MRVE3.SA", "MULT3.SA", "NTCO3.SA", "PETR3.SA", "PETR4.SA", "RENT3.SA",
        "SBSP3.SA", "TIMS3.SA", "TOTS3.SA", "UGPA3.SA", "USIM5.SA", "VALE3.SA",
        "WEGE3.SA", "RADL3.SA", "BBSE3.SA", "KLBN11.SA", "BPAC11.SA", "SUZB3.SA",
        "VBBR3.SA", "HAPV3.SA", "RRRP3.SA", "RDOR3.SA", "ASAI3.SA", "GMAT3.SA",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_fetch_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_period() -> String {
    "1d".to_string()
}

fn default_short_window() -> usize {
    50
}

fn default_long_window() -> usize {
    200
}

fn default_max_short_window() -> usize {
    100
}

fn default_max_long_window() -> usize {
    500
}

fn default_provider_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the scanner service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Universe & fetching ------------------------------------------------

    /// Symbols scanned on every run, in display order.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,

    /// Maximum number of provider requests in flight.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Base URL of the chart API.
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // --- UI defaults & bounds -----------------------------------------------

    #[serde(default = "default_period")]
    pub default_period: String,

    #[serde(default)]
    pub default_interval: Interval,

    #[serde(default = "default_short_window")]
    pub default_short_window: usize,

    #[serde(default = "default_long_window")]
    pub default_long_window: usize,

    /// Upper bound of the short SMA window (lower bound is 1).
    #[serde(default = "default_max_short_window")]
    pub max_short_window: usize,

    /// Upper bound of the long SMA window (lower bound is 1).
    #[serde(default = "default_max_long_window")]
    pub max_long_window: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            fetch_concurrency: default_fetch_concurrency(),
            provider_base_url: default_provider_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_period: default_period(),
            default_interval: Interval::default(),
            default_short_window: default_short_window(),
            default_long_window: default_long_window(),
            max_short_window: default_max_short_window(),
            max_long_window: default_max_long_window(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scanner config from {}", path.display()))?;

        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scanner config from {}", path.display()))?;
        config.tickers = normalize_tickers(config.tickers);

        info!(
            path = %path.display(),
            tickers = config.tickers.len(),
            fetch_concurrency = config.fetch_concurrency,
            "scanner config loaded"
        );

        Ok(config)
    }

    /// Replace the universe with a comma-separated list (e.g. from the
    /// `SCANNER_TICKERS` environment variable).
    pub fn set_tickers_from_csv(&mut self, csv: &str) {
        self.tickers = normalize_tickers(csv.split(',').map(String::from).collect());
    }
}

/// Trim and upper-case symbols, dropping blanks and repeats while keeping the
/// first occurrence's position.
pub fn normalize_tickers(tickers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tickers.len());
    for t in tickers {
        let t = t.trim().to_uppercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

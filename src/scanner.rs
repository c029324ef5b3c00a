// =============================================================================
// Scanner — the "Analisar" run
// =============================================================================
//
// One run, start to finish:
//   1. fetch every ticker in the universe through the bounded pool;
//   2. drop tickers whose fetch failed;
//   3. enrich each remaining series with MACD and the two SMA columns;
//   4. keep tickers whose SMAs crossed bullishly on the last bar;
//   5. build one chart per qualifying ticker.
//
// Nothing is cached between runs. Fetch failures are only visible in the
// logs; a failed ticker is simply absent from the result.
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chart::{build_chart, Figure};
use crate::indicators::{compute_macd, cross_in_columns, rolling_mean, MacdColumns};
use crate::market_data::{fetch_all, MarketDataProvider, OhlcSeries};
use crate::runtime_config::RuntimeConfig;
use crate::types::Interval;

/// Shown when no ticker qualifies.
pub const NO_SIGNAL_MESSAGE: &str = "Nenhuma ação com sinal.";

// =============================================================================
// Request
// =============================================================================

/// User inputs for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Lookback passed verbatim to the provider (e.g. `1d`, `5d`, `2mo`).
    pub period: String,
    pub interval: Interval,
    pub short_window: usize,
    pub long_window: usize,
}

impl ScanRequest {
    /// The request the UI starts with.
    pub fn from_defaults(config: &RuntimeConfig) -> Self {
        Self {
            period: config.default_period.clone(),
            interval: config.default_interval,
            short_window: config.default_short_window,
            long_window: config.default_long_window,
        }
    }

    /// Check the inputs against the UI bounds. The period is only required
    /// to be non-blank; the provider decides whether it is meaningful.
    pub fn validate(&self, config: &RuntimeConfig) -> Result<()> {
        if self.period.trim().is_empty() {
            bail!("period must not be empty");
        }
        if !(1..=config.max_short_window).contains(&self.short_window) {
            bail!(
                "short_window must be between 1 and {} (got {})",
                config.max_short_window,
                self.short_window
            );
        }
        if !(1..=config.max_long_window).contains(&self.long_window) {
            bail!(
                "long_window must be between 1 and {} (got {})",
                config.max_long_window,
                self.long_window
            );
        }
        Ok(())
    }
}

// =============================================================================
// Enriched series
// =============================================================================

/// A raw series plus every derived column, computed without touching the raw
/// bars.
#[derive(Debug, Clone)]
pub struct EnrichedSeries {
    pub ticker: String,
    pub series: OhlcSeries,
    pub short_window: usize,
    pub long_window: usize,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub macd: MacdColumns,
}

impl EnrichedSeries {
    /// Whether the SMAs crossed bullishly on the last bar.
    pub fn golden_cross(&self) -> bool {
        cross_in_columns(
            self.series.len(),
            self.long_window,
            &self.sma_short,
            &self.sma_long,
        )
    }
}

/// Compute MACD and both SMA columns for `series`.
pub fn enrich(
    ticker: impl Into<String>,
    series: OhlcSeries,
    short_window: usize,
    long_window: usize,
) -> EnrichedSeries {
    let closes = series.closes();
    EnrichedSeries {
        ticker: ticker.into(),
        short_window,
        long_window,
        sma_short: rolling_mean(&closes, short_window),
        sma_long: rolling_mean(&closes, long_window),
        macd: compute_macd(&closes),
        series,
    }
}

// =============================================================================
// Report
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TickerChart {
    pub ticker: String,
    pub figure: Figure,
    /// Full MACD frame behind the chart, row-aligned with the candles.
    pub macd: MacdColumns,
}

/// What the UI shows after a run: the qualifying tickers and their charts,
/// or the "no signal" message.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub run_id: Uuid,
    pub tickers: Vec<String>,
    pub charts: Vec<TickerChart>,
    pub message: Option<String>,
}

// =============================================================================
// Run
// =============================================================================

/// Evaluate already-fetched series and keep those with a golden cross, in
/// input order.
pub fn select_golden_crosses(
    fetched: Vec<(String, OhlcSeries)>,
    short_window: usize,
    long_window: usize,
) -> Vec<EnrichedSeries> {
    fetched
        .into_iter()
        .map(|(ticker, series)| enrich(ticker, series, short_window, long_window))
        .filter(EnrichedSeries::golden_cross)
        .collect()
}

/// Run one full scan over `config.tickers`.
pub async fn run_scan<P: MarketDataProvider>(
    provider: Arc<P>,
    config: &RuntimeConfig,
    request: &ScanRequest,
) -> ScanReport {
    let run_id = Uuid::new_v4();
    let started = Instant::now();
    let period = request.period.trim();

    info!(
        %run_id,
        tickers = config.tickers.len(),
        period,
        interval = %request.interval,
        short_window = request.short_window,
        long_window = request.long_window,
        "scan started"
    );

    let outcomes = fetch_all(
        provider,
        config.tickers.clone(),
        period,
        request.interval,
        config.fetch_concurrency,
    )
    .await;

    let failed = outcomes.iter().filter(|o| o.is_absent()).count();
    let fetched: Vec<(String, OhlcSeries)> = outcomes
        .into_iter()
        .filter_map(|o| o.series.map(|s| (o.ticker, s)))
        .collect();
    let fetched_count = fetched.len();

    let flagged = select_golden_crosses(fetched, request.short_window, request.long_window);

    let tickers: Vec<String> = flagged.iter().map(|e| e.ticker.clone()).collect();
    let charts: Vec<TickerChart> = flagged
        .iter()
        .map(|e| TickerChart {
            ticker: e.ticker.clone(),
            figure: build_chart(e),
            macd: e.macd.clone(),
        })
        .collect();
    let message = tickers.is_empty().then(|| NO_SIGNAL_MESSAGE.to_string());

    info!(
        %run_id,
        fetched = fetched_count,
        failed,
        qualifying = tickers.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan finished"
    );

    ScanReport {
        run_id,
        tickers,
        charts,
        message,
    }
}

// =============================================================================
// Fetcher — bounded, fail-soft fan-out over the ticker universe
// =============================================================================
//
// Every ticker is fetched independently. A failure of any kind (network,
// unknown symbol, undecodable body, no bars) is logged and turned into an
// absent series for that ticker; it never aborts the batch. At most
// `concurrency` requests are in flight and results come back in submission
// order once every fetch has resolved.
// =============================================================================

use std::sync::Arc;

use futures_util::{stream, StreamExt};
use tracing::{debug, warn};

use super::{MarketDataProvider, OhlcSeries};
use crate::types::Interval;

/// Default size of the fetch pool.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Result of fetching one ticker: the series, or `None` when the fetch failed.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub ticker: String,
    pub series: Option<OhlcSeries>,
}

impl FetchOutcome {
    pub fn is_absent(&self) -> bool {
        self.series.is_none()
    }
}

/// Fetch one ticker, converting every failure into an absent result.
pub async fn fetch<P: MarketDataProvider>(
    provider: &P,
    ticker: &str,
    period: &str,
    interval: Interval,
) -> FetchOutcome {
    let series = match provider.history(ticker, period, interval).await {
        Ok(series) if series.is_empty() => {
            warn!(ticker, period, interval = %interval, "no price data returned — ticker skipped");
            None
        }
        Ok(series) => {
            debug!(ticker, rows = series.len(), "price history fetched");
            Some(series)
        }
        Err(e) => {
            warn!(ticker, error = %format!("{e:#}"), "failed to fetch price history — ticker skipped");
            None
        }
    };

    FetchOutcome {
        ticker: ticker.to_string(),
        series,
    }
}

/// Fetch every ticker with at most `concurrency` requests in flight.
///
/// Blocks until all fetches have resolved and returns one outcome per ticker,
/// in the same order as `tickers`.
pub async fn fetch_all<P: MarketDataProvider>(
    provider: Arc<P>,
    tickers: Vec<String>,
    period: &str,
    interval: Interval,
    concurrency: usize,
) -> Vec<FetchOutcome> {
    let period: Arc<str> = Arc::from(period);

    stream::iter(tickers)
        .map(|ticker| {
            let provider = Arc::clone(&provider);
            let period = Arc::clone(&period);
            async move { fetch(provider.as_ref(), &ticker, &period, interval).await }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

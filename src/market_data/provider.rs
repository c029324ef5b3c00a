// =============================================================================
// Market-Data Provider seam
// =============================================================================
//
// The scanner only needs one thing from a data source: the bar history of a
// symbol for a lookback period at a given bar size. The Yahoo client is the
// production implementation; tests drive the scanner with an in-memory one.
// =============================================================================

use std::future::Future;

use anyhow::Result;

use super::OhlcSeries;
use crate::types::Interval;

/// Source of OHLC history.
pub trait MarketDataProvider: Send + Sync + 'static {
    /// Fetch the bars of `symbol` covering `period` (provider-defined syntax,
    /// e.g. `1d`, `5d`, `2mo`) at `interval` bar size.
    fn history(
        &self,
        symbol: &str,
        period: &str,
        interval: Interval,
    ) -> impl Future<Output = Result<OhlcSeries>> + Send;
}

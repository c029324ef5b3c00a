// =============================================================================
// Yahoo Finance chart API client
// =============================================================================
//
// GET {base}/v8/finance/chart/{symbol}?range={period}&interval={interval}
//
// The response is column-oriented: one `timestamp` array plus parallel
// open/high/low/close/volume arrays under `indicators.quote[0]`. Bars the
// exchange did not print come back as nulls and are skipped. Errors (unknown
// symbol, invalid range/interval combination) are reported in `chart.error`.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{Candle, MarketDataProvider, OhlcSeries};
use crate::types::Interval;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// The chart endpoint rejects requests without a browser-like agent.
const CLIENT_USER_AGENT: &str = "Mozilla/5.0 (compatible; bovespa-scanner/1.0)";

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// Decode a chart response body into a series.
///
/// A provider-reported error or a missing `result` is an error. A result with
/// no usable bars decodes to an empty series.
pub fn parse_chart(body: &str) -> Result<OhlcSeries> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).context("failed to decode chart response")?;

    if let Some(err) = envelope.chart.error {
        anyhow::bail!("provider error {}: {}", err.code, err.description);
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .context("chart response has no result")?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let mut candles = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            column(&quote.open, i),
            column(&quote.high, i),
            column(&quote.low, i),
            column(&quote.close, i),
        ) else {
            continue;
        };
        let Some(timestamp) = DateTime::from_timestamp(ts, 0) else {
            continue;
        };
        let volume = column(&quote.volume, i).unwrap_or(0.0);
        candles.push(Candle::new(timestamp, open, high, low, close, volume));
    }

    Ok(OhlcSeries::new(candles))
}

/// Combine the HTTP status with the decoded body. Error bodies still carry
/// `chart.error`, which is the useful message; a non-2xx status fails even
/// when the body decodes.
fn decode_response(status: StatusCode, body: &str) -> Result<OhlcSeries> {
    let series = parse_chart(body)
        .with_context(|| format!("Yahoo GET /v8/finance/chart returned {status}"))?;

    if !status.is_success() {
        anyhow::bail!("Yahoo GET /v8/finance/chart returned {}", status);
    }
    Ok(series)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Yahoo Finance chart endpoint.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a client against `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// GET /v8/finance/chart/{symbol}.
    #[instrument(skip(self), name = "yahoo::get_chart")]
    pub async fn get_chart(
        &self,
        symbol: &str,
        period: &str,
        interval: Interval,
    ) -> Result<OhlcSeries> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", period), ("interval", interval.as_str())])
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read chart response body")?;

        let series = decode_response(status, &body)?;

        debug!(symbol, interval = %interval, count = series.len(), "chart fetched");
        Ok(series)
    }
}

impl MarketDataProvider for YahooClient {
    async fn history(&self, symbol: &str, period: &str, interval: Interval) -> Result<OhlcSeries> {
        self.get_chart(symbol, period, interval).await
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

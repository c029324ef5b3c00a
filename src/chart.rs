// =============================================================================
// Chart Builder — Plotly figure for one flagged ticker
// =============================================================================
//
// Produces a figure description that plotly.js renders as-is in the browser:
//   - candlestick of the raw bars on the price axis (`y`);
//   - short and long SMA lines on the price axis;
//   - MACD and Signal lines on a secondary axis (`y2`) overlaid on the right;
//   - a paper-anchored annotation with the latest MACD label.
//
// Pure rendering: the enriched series is assumed to carry every column.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::indicators::macd::{FAST_SPAN, SIGNAL_SPAN, SLOW_SPAN};
use crate::scanner::EnrichedSeries;

const SHORT_SMA_COLOR: &str = "blue";
const LONG_SMA_COLOR: &str = "red";
const MACD_COLOR: &str = "green";
const SIGNAL_COLOR: &str = "orange";

// =============================================================================
// Figure model (serialises to plotly.js JSON)
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick {
        name: String,
        x: Vec<DateTime<Utc>>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Scatter {
        name: String,
        mode: &'static str,
        x: Vec<DateTime<Utc>>,
        /// Missing values serialise as `null`, which plotly draws as a gap.
        y: Vec<Option<f64>>,
        line: Line,
        yaxis: &'static str,
    },
}

#[cfg(test)]
impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick { name, .. } | Trace::Scatter { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct XAxis {
    pub rangeslider: RangeSlider,
}

#[derive(Debug, Clone, Serialize)]
pub struct YAxis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub text: String,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x: f64,
    pub y: f64,
    pub showarrow: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: XAxis,
    pub yaxis: YAxis,
    pub yaxis2: YAxis,
    pub annotations: Vec<Annotation>,
}

// =============================================================================
// Builder
// =============================================================================

fn present(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Build the candlestick + SMA + MACD figure for `enriched`.
pub fn build_chart(enriched: &EnrichedSeries) -> Figure {
    let candles = enriched.series.candles();
    let x: Vec<DateTime<Utc>> = candles.iter().map(|c| c.timestamp).collect();

    let line = |name: String, y: Vec<Option<f64>>, color, yaxis| Trace::Scatter {
        name,
        mode: "lines",
        x: x.clone(),
        y,
        line: Line { color },
        yaxis,
    };

    let data = vec![
        Trace::Candlestick {
            name: "Preço".to_string(),
            x: x.clone(),
            open: candles.iter().map(|c| c.open).collect(),
            high: candles.iter().map(|c| c.high).collect(),
            low: candles.iter().map(|c| c.low).collect(),
            close: candles.iter().map(|c| c.close).collect(),
        },
        line(
            format!("SMA {}", enriched.short_window),
            enriched.sma_short.clone(),
            SHORT_SMA_COLOR,
            "y",
        ),
        line(
            format!("SMA {}", enriched.long_window),
            enriched.sma_long.clone(),
            LONG_SMA_COLOR,
            "y",
        ),
        line("MACD".to_string(), present(&enriched.macd.macd), MACD_COLOR, "y2"),
        line(
            "Signal Line".to_string(),
            present(&enriched.macd.signal),
            SIGNAL_COLOR,
            "y2",
        ),
    ];

    let label = enriched
        .macd
        .latest_label()
        .map(|l| l.to_string())
        .unwrap_or_default();

    let layout = Layout {
        title: Title::new(format!("{} - Análise e MACD", enriched.ticker)),
        xaxis: XAxis {
            rangeslider: RangeSlider { visible: false },
        },
        yaxis: YAxis {
            title: Title::new("Preço"),
            overlaying: None,
            side: None,
        },
        yaxis2: YAxis {
            title: Title::new("MACD"),
            overlaying: Some("y"),
            side: Some("right"),
        },
        annotations: vec![Annotation {
            text: format!("MACD ({FAST_SPAN}, {SLOW_SPAN}, {SIGNAL_SPAN}): Sinal é '{label}'"),
            xref: "paper",
            yref: "paper",
            x: 0.0,
            y: 1.1,
            showarrow: false,
        }],
    };

    Figure { data, layout }
}

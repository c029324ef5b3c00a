// =============================================================================
// Bovespa Scanner — Main Entry Point
// =============================================================================
//
// Serves a single-page UI that scans a fixed list of Bovespa tickers for a
// fresh SMA golden cross and charts the matches with MACD. Every scan runs
// on demand inside the "Analisar" request; nothing is kept between runs.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod chart;
mod indicators;
mod market_data;
mod runtime_config;
mod scanner;
mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::YahooClient;
use crate::runtime_config::RuntimeConfig;

const CONFIG_PATH: &str = "scanner_config.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8501";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Bovespa Scanner — starting up");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Override the universe from env if available.
    if let Ok(list) = std::env::var("SCANNER_TICKERS") {
        config.set_tickers_from_csv(&list);
    }

    info!(
        tickers = config.tickers.len(),
        fetch_concurrency = config.fetch_concurrency,
        provider = %config.provider_base_url,
        "Configured ticker universe"
    );

    // ── 2. Market-data provider & shared state ──────────────────────────
    let provider = Arc::new(YahooClient::new(
        config.provider_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?);
    let state = Arc::new(AppState::new(config, provider));

    // ── 3. HTTP server ───────────────────────────────────────────────────
    let bind_addr =
        std::env::var("SCANNER_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "UI listening");

    axum::serve(listener, api::rest::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Bovespa Scanner shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}

// =============================================================================
// Application State — shared by every HTTP handler
// =============================================================================
//
// Holds the loaded configuration, the market-data provider and the run state
// machine (Idle <-> Running). Runs are serialised: a request that arrives
// while another scan is in flight waits for it to finish.
//
// Thread safety:
//   - tokio::sync::Mutex gates scans (held across awaits).
//   - parking_lot::RwLock for the observable phase (never held across awaits).
//   - Atomic counter for completed runs.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::market_data::MarketDataProvider;
use crate::runtime_config::RuntimeConfig;
use crate::scanner::{self, ScanReport, ScanRequest};
use crate::types::ScanPhase;

/// Central application state shared across handlers via `Arc<AppState<P>>`.
pub struct AppState<P> {
    pub config: RuntimeConfig,
    pub provider: Arc<P>,

    scan_gate: tokio::sync::Mutex<()>,
    phase: RwLock<ScanPhase>,

    /// Number of scans that ran to completion since start-up.
    pub runs_completed: AtomicU64,

    /// Instant when the service was started. Used for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Marks the state as running for its lifetime, including when the request
/// future is dropped mid-scan.
struct RunningGuard<'a>(&'a RwLock<ScanPhase>);

impl<'a> RunningGuard<'a> {
    fn enter(phase: &'a RwLock<ScanPhase>) -> Self {
        *phase.write() = ScanPhase::Running;
        Self(phase)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *self.0.write() = ScanPhase::Idle;
    }
}

impl<P: MarketDataProvider> AppState<P> {
    pub fn new(config: RuntimeConfig, provider: Arc<P>) -> Self {
        Self {
            config,
            provider,
            scan_gate: tokio::sync::Mutex::new(()),
            phase: RwLock::new(ScanPhase::Idle),
            runs_completed: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn phase(&self) -> ScanPhase {
        *self.phase.read()
    }

    pub fn runs_completed(&self) -> u64 {
        self.runs_completed.load(Ordering::Relaxed)
    }

    /// Run one scan, waiting for any scan already in flight.
    pub async fn run_scan(&self, request: &ScanRequest) -> ScanReport {
        let _gate = self.scan_gate.lock().await;
        let _running = RunningGuard::enter(&self.phase);

        let report = scanner::run_scan(self.provider.clone(), &self.config, request).await;

        let runs = self.runs_completed.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(run_id = %report.run_id, runs_completed = runs, "scan released");
        report
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;
    use crate::market_data::provider::testing::StaticProvider;
    use crate::types::Interval;

    fn request() -> ScanRequest {
        ScanRequest {
            period: "1d".to_string(),
            interval: Interval::ThirtyMinutes,
            short_window: 5,
            long_window: 20,
        }
    }

    fn state(provider: StaticProvider, tickers: &[&str]) -> Arc<AppState<StaticProvider>> {
        let config = RuntimeConfig {
            tickers: tickers.iter().map(|s| s.to_string()).collect(),
            ..RuntimeConfig::default()
        };
        Arc::new(AppState::new(config, Arc::new(provider)))
    }

    #[tokio::test]
    async fn phase_returns_to_idle_after_run() {
        let state = state(StaticProvider::new(), &["PETR4.SA"]);
        assert_eq!(state.phase(), ScanPhase::Idle);

        state.run_scan(&request()).await;

        assert_eq!(state.phase(), ScanPhase::Idle);
        assert_eq!(state.runs_completed(), 1);
    }

    #[tokio::test]
    async fn phase_is_running_while_scan_in_flight() {
        let gate = Arc::new(Notify::new());
        let provider = StaticProvider::new()
            .with_closes("PETR4.SA", &[1.0; 30])
            .with_gate(gate.clone());
        let state = state(provider, &["PETR4.SA"]);

        let bg = state.clone();
        let handle = tokio::spawn(async move { bg.run_scan(&request()).await });

        // The fetch is parked on the gate, so the scan cannot finish yet.
        state.provider.entered.notified().await;
        assert_eq!(state.phase(), ScanPhase::Running);
        assert_eq!(state.runs_completed(), 0);

        gate.notify_one();
        handle.await.unwrap();
        assert_eq!(state.phase(), ScanPhase::Idle);
        assert_eq!(state.runs_completed(), 1);
    }

    #[tokio::test]
    async fn overlapping_runs_are_serialised() {
        let provider = StaticProvider::new()
            .with_closes("PETR4.SA", &[1.0; 30])
            .with_delay(Duration::from_millis(30));
        let state = state(provider, &["PETR4.SA"]);

        let a = state.clone();
        let b = state.clone();
        let req = request();
        let (ra, rb) = tokio::join!(a.run_scan(&req), b.run_scan(&req));

        assert_ne!(ra.run_id, rb.run_id);
        assert_eq!(state.runs_completed(), 2);
        // Never more than one provider request in flight: one ticker per run
        // and the runs did not overlap.
        assert_eq!(state.provider.max_in_flight.load(Ordering::SeqCst), 1);
    }
}

// =============================================================================
// Central Application State — Momentum Screener
// =============================================================================
//
// Shared across axum handlers via `Arc<AppState>`.
//
// Thread safety:
//   - The scanner is immutable; concurrent scans share it freely.
//   - The universe sits behind a parking_lot::RwLock so it can be replaced
//     at runtime.  Handlers clone it out before awaiting anything.
//   - A lock-free counter tracks completed scans.  No scan results are kept.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::scanner::{ScanOutcome, Scanner};
use crate::types::ScreenResult;

pub struct AppState {
    pub universe: RwLock<Vec<String>>,
    pub scanner: Scanner,
    scans_completed: AtomicU64,
    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(universe: Vec<String>, scanner: Scanner) -> Self {
        Self {
            universe: RwLock::new(universe),
            scanner,
            scans_completed: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    /// Snapshot of the current universe.
    pub fn universe(&self) -> Vec<String> {
        self.universe.read().clone()
    }

    pub fn replace_universe(&self, symbols: Vec<String>) {
        *self.universe.write() = symbols;
    }

    /// Scan the current universe.
    pub async fn run_scan(&self) -> ScanOutcome {
        let universe = self.universe();
        let outcome = self.scanner.scan(&universe).await;
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        outcome
    }

    /// Analyse one symbol outside of a scan.
    pub async fn analyze_symbol(&self, symbol: &str) -> Option<ScreenResult> {
        self.scanner.analyzer().analyze(symbol).await
    }

    pub fn scans_completed(&self) -> u64 {
        self.scans_completed.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

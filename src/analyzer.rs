// =============================================================================
// Instrument Analyzer — one symbol, fetch to verdict
// =============================================================================
//
// Pipeline:
//   1. Fetch daily history from the `HistorySource` (bounded by a timeout)
//   2. Reject histories shorter than 200 bars (SMA200 cannot be formed)
//   3. Derive indicators
//   4. Evaluate the four-gate screen
//
// Every failure stays inside this boundary: the caller only ever sees an
// `Analysis` value, never an error.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::indicators::derive;
use crate::market_data::HistorySource;
use crate::signal;
use crate::types::ScreenResult;

/// Minimum number of daily bars needed to evaluate the screen.
pub const MIN_HISTORY_BARS: usize = 200;

/// Outcome of analysing one instrument.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// Every gate passed.
    Signal(ScreenResult),
    /// Enough data, but at least one gate failed.
    NoSignal,
    /// Empty history or fewer than [`MIN_HISTORY_BARS`] bars.
    InsufficientData { bars: usize },
    /// The data source returned an error.
    Failed(String),
    /// The data source did not answer within the per-instrument timeout.
    TimedOut,
}

impl Analysis {
    pub fn into_signal(self) -> Option<ScreenResult> {
        match self {
            Self::Signal(result) => Some(result),
            _ => None,
        }
    }
}

/// Runs the per-instrument pipeline against a shared history source.
#[derive(Clone)]
pub struct Analyzer {
    source: Arc<dyn HistorySource>,
    range: String,
    timeout: Duration,
}

impl Analyzer {
    pub fn new(source: Arc<dyn HistorySource>, range: impl Into<String>, timeout: Duration) -> Self {
        Self {
            source,
            range: range.into(),
            timeout,
        }
    }

    /// Analyse `symbol`, returning the screen result only when it passes.
    pub async fn analyze(&self, symbol: &str) -> Option<ScreenResult> {
        self.analyze_detailed(symbol).await.into_signal()
    }

    /// Analyse `symbol` and report exactly why it did or did not pass.
    pub async fn analyze_detailed(&self, symbol: &str) -> Analysis {
        let fetched = tokio::time::timeout(
            self.timeout,
            self.source.fetch_daily_bars(symbol, &self.range),
        )
        .await;

        let history = match fetched {
            Ok(Ok(history)) => history,
            Ok(Err(e)) => {
                let reason = format!("{e:#}");
                warn!(symbol, error = %reason, "history fetch failed, skipping symbol");
                return Analysis::Failed(reason);
            }
            Err(_) => {
                warn!(
                    symbol,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "history fetch timed out, skipping symbol"
                );
                return Analysis::TimedOut;
            }
        };

        if history.is_empty() {
            debug!(symbol, "data source returned no bars");
            return Analysis::InsufficientData { bars: 0 };
        }
        if history.len() < MIN_HISTORY_BARS {
            debug!(
                symbol,
                bars = history.len(),
                required = MIN_HISTORY_BARS,
                "insufficient history"
            );
            return Analysis::InsufficientData {
                bars: history.len(),
            };
        }

        let aug = derive(&history);
        match signal::evaluate(symbol, &aug) {
            Some(result) => {
                info!(
                    symbol,
                    price = result.price,
                    rsi = result.rsi,
                    vol_ratio = result.vol_ratio,
                    score = result.score,
                    "bullish setup detected"
                );
                Analysis::Signal(result)
            }
            None => {
                if let Some(report) = signal::gate_report(&aug) {
                    debug!(symbol, failed = ?report.failed_gates(), "screen rejected");
                } else {
                    debug!(symbol, "screen rejected: indicators undefined on latest bars");
                }
                Analysis::NoSignal
            }
        }
    }
}

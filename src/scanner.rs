// =============================================================================
// Scan Coordinator — bounded fan-out over the instrument universe
// =============================================================================
//
// One task per instrument is spawned into a `JoinSet`, but only after a
// semaphore permit is acquired, so at most `max_workers` analyses (and data
// source connections) are in flight at any moment.  The coordinator waits for
// every task, then ranks the passing results:
//
//   score descending, ties broken by position in the universe.
//
// Completion order never influences the output.
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::analyzer::{Analysis, Analyzer};
use crate::types::ScreenResult;

/// Per-scan counters, logged when the scan completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanStats {
    pub scan_id: String,
    pub universe: usize,
    pub signals: usize,
    pub no_signal: usize,
    pub insufficient: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub panicked: usize,
    pub elapsed_ms: u64,
}

impl ScanStats {
    fn record(&mut self, outcome: &Analysis) {
        match outcome {
            Analysis::Signal(_) => self.signals += 1,
            Analysis::NoSignal => self.no_signal += 1,
            Analysis::InsufficientData { .. } => self.insufficient += 1,
            Analysis::Failed(_) => self.failed += 1,
            Analysis::TimedOut => self.timed_out += 1,
        }
    }
}

/// Ranked results of one scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub results: Vec<ScreenResult>,
    pub stats: ScanStats,
}

/// Runs the analyzer across a universe with a fixed worker budget.
pub struct Scanner {
    analyzer: Analyzer,
    max_workers: usize,
}

impl Scanner {
    pub fn new(analyzer: Analyzer, max_workers: usize) -> Self {
        Self {
            analyzer,
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Scan every symbol of `universe` and return the ranked passes.
    ///
    /// Never fails: per-symbol errors, timeouts and panics are counted in the
    /// stats and otherwise ignored.  An empty universe yields an empty outcome.
    pub async fn scan(&self, universe: &[String]) -> ScanOutcome {
        let started = Instant::now();
        let mut stats = ScanStats {
            scan_id: uuid::Uuid::new_v4().to_string(),
            universe: universe.len(),
            ..ScanStats::default()
        };

        info!(
            scan_id = %stats.scan_id,
            universe = universe.len(),
            workers = self.max_workers,
            "scan started"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks: JoinSet<(usize, Analysis)> = JoinSet::new();

        for (index, symbol) in universe.iter().enumerate() {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                // The semaphore is never closed.
                break;
            };
            let analyzer = self.analyzer.clone();
            let symbol = symbol.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let outcome = analyzer.analyze_detailed(&symbol).await;
                (index, outcome)
            });
        }

        let mut passed: Vec<(usize, ScreenResult)> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    stats.record(&outcome);
                    if let Some(result) = outcome.into_signal() {
                        passed.push((index, result));
                    }
                }
                Err(e) => {
                    stats.panicked += 1;
                    error!(scan_id = %stats.scan_id, error = %e, "analysis task aborted");
                }
            }
        }

        let results = rank(passed);
        stats.elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            scan_id = %stats.scan_id,
            universe = stats.universe,
            signals = stats.signals,
            no_signal = stats.no_signal,
            insufficient = stats.insufficient,
            failed = stats.failed,
            timed_out = stats.timed_out,
            panicked = stats.panicked,
            elapsed_ms = stats.elapsed_ms,
            "scan complete"
        );

        ScanOutcome { results, stats }
    }
}

/// Order results by score descending; equal scores keep universe order.
pub fn rank(mut passed: Vec<(usize, ScreenResult)>) -> Vec<ScreenResult> {
    passed.sort_by(|(ia, a), (ib, b)| b.score.total_cmp(&a.score).then(ia.cmp(ib)));
    passed.into_iter().map(|(_, result)| result).collect()
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use crate::market_data::HistorySource;
    use crate::test_support::{bullish_history, flat_history, Script, StaticSource};

    fn scanner(source: StaticSource, workers: usize) -> Scanner {
        let analyzer = Analyzer::new(Arc::new(source), "1y", Duration::from_secs(5));
        Scanner::new(analyzer, workers)
    }

    fn universe(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn symbols(outcome: &ScanOutcome) -> Vec<&str> {
        outcome.results.iter().map(|r| r.symbol.as_str()).collect()
    }

    fn result(symbol: &str, score: f64) -> ScreenResult {
        ScreenResult {
            symbol: symbol.into(),
            price: 1.0,
            change_pct: 0.0,
            vol_ratio: 1.5,
            rsi: 60.0,
            score,
        }
    }

    #[test]
    fn rank_sorts_descending_and_keeps_ties_stable() {
        let ranked = rank(vec![
            (3, result("D", 90.0)),
            (0, result("A", 80.0)),
            (2, result("C", 95.0)),
            (1, result("B", 90.0)),
        ]);
        let order: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "D", "A"]);
    }

    #[tokio::test]
    async fn empty_universe_yields_empty_outcome() {
        let outcome = scanner(StaticSource::new(), 4).scan(&[]).await;
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.stats.universe, 0);
    }

    #[tokio::test]
    async fn nothing_passes_yields_empty_outcome() {
        let source = StaticSource::new()
            .with("FLAT", Script::Bars(flat_history(220)))
            .with("NEW", Script::Bars(bullish_history(150, 1_900_000)));
        let outcome = scanner(source, 4).scan(&universe(&["FLAT", "NEW", "GHOST"])).await;
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.stats.no_signal, 1);
        assert_eq!(outcome.stats.insufficient, 2);
    }

    #[tokio::test]
    async fn results_ranked_by_score_with_stable_ties() {
        // HIGH scores 107, both TIE symbols score 97.
        let source = StaticSource::new()
            .with("TIE_A", Script::Bars(bullish_history(220, 1_900_000)))
            .with("HIGH", Script::Bars(bullish_history(220, 3_000_000)))
            .with("TIE_B", Script::Bars(bullish_history(220, 1_900_000)))
            .with("FLAT", Script::Bars(flat_history(220)));
        let s = scanner(source, 2);

        let outcome = s.scan(&universe(&["TIE_A", "FLAT", "HIGH", "TIE_B"])).await;
        assert_eq!(symbols(&outcome), vec!["HIGH", "TIE_A", "TIE_B"]);
        assert_eq!(outcome.results[0].score, 107.0);
        assert_eq!(outcome.results[1].score, outcome.results[2].score);

        let outcome = s.scan(&universe(&["TIE_B", "HIGH", "TIE_A"])).await;
        assert_eq!(symbols(&outcome), vec!["HIGH", "TIE_B", "TIE_A"]);
    }

    #[tokio::test]
    async fn completion_order_does_not_affect_ranking() {
        let source = StaticSource::new()
            .with(
                "FIRST",
                Script::Slow(bullish_history(220, 1_900_000), Duration::from_millis(150)),
            )
            .with("SECOND", Script::Bars(bullish_history(220, 1_900_000)));
        let outcome = scanner(source, 2).scan(&universe(&["FIRST", "SECOND"])).await;
        assert_eq!(symbols(&outcome), vec!["FIRST", "SECOND"]);
    }

    #[tokio::test]
    async fn one_failing_source_does_not_affect_the_rest() {
        let source = StaticSource::new()
            .with("AAA", Script::Bars(bullish_history(220, 1_900_000)))
            .with("BAD", Script::Fail("simulated data-source fault"))
            .with("CCC", Script::Bars(bullish_history(220, 3_000_000)));
        let outcome = scanner(source, 3).scan(&universe(&["AAA", "BAD", "CCC"])).await;

        assert_eq!(symbols(&outcome), vec!["CCC", "AAA"]);
        assert_eq!(outcome.stats.signals, 2);
        assert_eq!(outcome.stats.failed, 1);
    }

    #[tokio::test]
    async fn panicking_task_is_isolated() {
        let source = StaticSource::new()
            .with("AAA", Script::Bars(bullish_history(220, 1_900_000)))
            .with("BOOM", Script::Panic)
            .with("CCC", Script::Bars(bullish_history(220, 1_900_000)));
        let outcome = scanner(source, 2).scan(&universe(&["AAA", "BOOM", "CCC"])).await;

        assert_eq!(symbols(&outcome), vec!["AAA", "CCC"]);
        assert_eq!(outcome.stats.panicked, 1);
    }

    #[tokio::test]
    async fn timed_out_symbol_is_skipped() {
        let source = StaticSource::new()
            .with("AAA", Script::Bars(bullish_history(220, 1_900_000)))
            .with("SLOW", Script::Stall(Duration::from_secs(10)));
        let analyzer = Analyzer::new(Arc::new(source), "1y", Duration::from_millis(100));
        let outcome = Scanner::new(analyzer, 2)
            .scan(&universe(&["SLOW", "AAA"]))
            .await;

        assert_eq!(symbols(&outcome), vec!["AAA"]);
        assert_eq!(outcome.stats.timed_out, 1);
    }

    #[tokio::test]
    async fn parallelism_is_bounded_by_worker_budget() {
        let source = Arc::new(StaticSource::new().with_delay(Duration::from_millis(20)));
        let dyn_source: Arc<dyn HistorySource> = source.clone();
        let analyzer = Analyzer::new(dyn_source, "1y", Duration::from_secs(5));
        let s = Scanner::new(analyzer, 3);

        let names: Vec<String> = (0..12).map(|i| format!("SYM{i}")).collect();
        let outcome = s.scan(&names).await;

        assert_eq!(outcome.stats.insufficient, 12);
        assert_eq!(source.calls.load(Ordering::SeqCst), 12);
        let peak = source.max_in_flight.load(Ordering::SeqCst);
        assert!(peak >= 1 && peak <= 3, "peak in-flight fetches was {peak}");
    }

    #[test]
    fn zero_workers_is_clamped() {
        assert_eq!(scanner(StaticSource::new(), 0).max_workers(), 1);
    }
}

// =============================================================================
// Runtime Configuration — screener settings loaded from JSON + environment
// =============================================================================
//
// Everything operational lives here: the instrument universe, the worker
// budget, the data-source endpoint and the HTTP bind address.  The screen's
// rule thresholds are deliberately absent; they are constants of the rule set.
//
// All fields carry `#[serde(default)]` so that a partial (or empty) config
// file still loads.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    [
        "NVDA", "AMD", "TSLA", "MSFT", "AAPL", "META", "AMZN", "GOOGL", "NFLX", "PLTR", "COIN",
        "MARA", "MSTR", "SMCI", "ARM", "AVGO", "TSM", "ORCL", "PANW", "CRWD", "UBER", "ABNB",
        "SHOP", "SQ", "DKNG", "HOOD", "AFRM", "UPST", "CVNA", "RIVN", "LCID", "SOFI", "AI",
        "PATH", "U", "NET",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_workers() -> usize {
    10
}

fn default_history_range() -> String {
    "1y".to_string()
}

fn default_symbol_timeout_secs() -> u64 {
    20
}

fn default_data_source_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8888".to_string()
}

// =============================================================================
// ScreenerConfig
// =============================================================================

/// Top-level configuration for the screener service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Instrument universe, scanned in this order.  Ties in the ranked output
    /// keep this order.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Maximum number of instruments analysed concurrently.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Lookback requested from the data source (Yahoo range syntax).
    #[serde(default = "default_history_range")]
    pub history_range: String,

    /// Upper bound on one instrument's data-source call.
    #[serde(default = "default_symbol_timeout_secs")]
    pub symbol_timeout_secs: u64,

    /// Base URL of the chart API.
    #[serde(default = "default_data_source_url")]
    pub data_source_url: String,

    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            max_workers: default_max_workers(),
            history_range: default_history_range(),
            symbol_timeout_secs: default_symbol_timeout_secs(),
            data_source_url: default_data_source_url(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl ScreenerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or unparsable file is an error so the caller can fall back to
    /// defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read screener config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse screener config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = config.symbols.len(),
            max_workers = config.max_workers,
            "screener config loaded"
        );

        Ok(config)
    }

    /// Apply environment overrides through `lookup` (normally
    /// `std::env::var(..).ok()`).
    ///
    /// - `SCREENER_SYMBOLS`:     comma-separated tickers, trimmed and upper-cased
    /// - `SCREENER_BIND_ADDR`:   listen address
    /// - `SCREENER_MAX_WORKERS`: worker budget
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(syms) = lookup("SCREENER_SYMBOLS") {
            let symbols: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if symbols.is_empty() {
                warn!("SCREENER_SYMBOLS is set but empty, keeping configured universe");
            } else {
                self.symbols = symbols;
            }
        }

        if let Some(addr) = lookup("SCREENER_BIND_ADDR") {
            self.bind_addr = addr;
        }

        if let Some(raw) = lookup("SCREENER_MAX_WORKERS") {
            match raw.trim().parse::<usize>() {
                Ok(n) => self.max_workers = n,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid SCREENER_MAX_WORKERS"),
            }
        }
    }

    /// Worker budget, never below one.
    pub fn worker_budget(&self) -> usize {
        self.max_workers.max(1)
    }

    pub fn symbol_timeout(&self) -> Duration {
        Duration::from_secs(self.symbol_timeout_secs)
    }
}

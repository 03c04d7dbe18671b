// =============================================================================
// Market Data Module
// =============================================================================
//
// The screener never talks to a vendor directly: every component that needs
// daily bars goes through the `HistorySource` trait, so the Yahoo client and
// the in-memory test source are interchangeable at runtime.

pub mod history;

use anyhow::Result;
use async_trait::async_trait;

pub use history::History;

/// Supplier of daily OHLCV history for a single instrument.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch daily bars for `symbol` covering `range` (e.g. `"1y"`).
    ///
    /// An unknown or delisted symbol may come back as an empty history; any
    /// transport or decoding problem is an `Err`.
    async fn fetch_daily_bars(&self, symbol: &str, range: &str) -> Result<History>;
}

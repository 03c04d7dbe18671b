// =============================================================================
// Shared types used across the momentum screener
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data for a single instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// A single instrument that passed every gate of the screen.
///
/// Field names are serialised in camelCase (`changePct`, `volRatio`) because
/// that is the shape the scan endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenResult {
    pub symbol: String,
    /// Latest close, rounded to 2 decimals.
    pub price: f64,
    /// Day-over-day close change in percent, rounded to 2 decimals.
    pub change_pct: f64,
    /// Today's volume divided by the 20-day average volume.
    pub vol_ratio: f64,
    pub rsi: f64,
    /// `rsi + vol_ratio * 10`, rounded to the nearest integer.
    pub score: f64,
}

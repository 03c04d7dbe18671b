// =============================================================================
// Signal Evaluator — four-gate bullish screen
// =============================================================================
//
// Looks only at the two most recent augmented bars (`prev`, `curr`).
//
// Gates (all must pass):
//   - Trend:     close > SMA50 > SMA150 > SMA200
//   - Momentum:  MACD line > 0, and the histogram either just crossed above
//                zero or is positive and still expanding
//   - Strength:  50 < RSI < 85
//   - Volume:    volume / SMA20(volume) > 1.2
//
// Score = RSI + vol_ratio * 10.  Thresholds are fixed constants.
// =============================================================================

use serde::Serialize;

use crate::indicators::{AugmentedBar, AugmentedHistory};
use crate::types::ScreenResult;

pub const RSI_FLOOR: f64 = 50.0;
pub const RSI_CEILING: f64 = 85.0;
pub const VOLUME_SURGE_RATIO: f64 = 1.2;
pub const VOLUME_SCORE_WEIGHT: f64 = 10.0;

/// Per-gate verdicts for the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateReport {
    pub trend: bool,
    pub momentum: bool,
    pub strength: bool,
    pub volume: bool,
    pub vol_ratio: f64,
}

impl GateReport {
    pub fn all_passed(&self) -> bool {
        self.trend && self.momentum && self.strength && self.volume
    }

    /// Names of the gates that did not pass, in evaluation order.
    pub fn failed_gates(&self) -> Vec<&'static str> {
        [
            ("trend", self.trend),
            ("momentum", self.momentum),
            ("strength", self.strength),
            ("volume", self.volume),
        ]
        .into_iter()
        .filter(|(_, passed)| !passed)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Every value the gates read, resolved from the last two bars.
struct Inputs {
    price: f64,
    prev_close: f64,
    volume: f64,
    sma50: f64,
    sma150: f64,
    sma200: f64,
    vol_sma20: f64,
    macd_line: f64,
    macd_hist: f64,
    prev_macd_hist: f64,
    rsi: f64,
}

impl Inputs {
    fn resolve(prev: &AugmentedBar, curr: &AugmentedBar) -> Option<Self> {
        Some(Self {
            price: curr.bar.close,
            prev_close: prev.bar.close,
            volume: curr.bar.volume as f64,
            sma50: curr.sma50?,
            sma150: curr.sma150?,
            sma200: curr.sma200?,
            vol_sma20: curr.vol_sma20?,
            macd_line: curr.macd_line?,
            macd_hist: curr.macd_hist?,
            prev_macd_hist: prev.macd_hist?,
            rsi: curr.rsi?,
        })
    }

    fn vol_ratio(&self) -> f64 {
        if self.vol_sma20 > 0.0 {
            self.volume / self.vol_sma20
        } else {
            0.0
        }
    }

    fn change_pct(&self) -> f64 {
        if self.prev_close > 0.0 {
            (self.price - self.prev_close) / self.prev_close * 100.0
        } else {
            0.0
        }
    }

    fn report(&self) -> GateReport {
        let trend = self.price > self.sma50 && self.sma50 > self.sma150 && self.sma150 > self.sma200;

        let fresh_cross = self.prev_macd_hist < 0.0 && self.macd_hist > 0.0;
        let accelerating = self.macd_hist > 0.0 && self.macd_hist > self.prev_macd_hist;
        let momentum = self.macd_line > 0.0 && (fresh_cross || accelerating);

        let strength = self.rsi > RSI_FLOOR && self.rsi < RSI_CEILING;

        let vol_ratio = self.vol_ratio();
        let volume = vol_ratio > VOLUME_SURGE_RATIO;

        GateReport {
            trend,
            momentum,
            strength,
            volume,
            vol_ratio,
        }
    }
}

/// Gate verdicts for the latest bar, or `None` when fewer than two bars exist
/// or a required indicator value is still undefined.
pub fn gate_report(aug: &AugmentedHistory) -> Option<GateReport> {
    let (prev, curr) = aug.last_two()?;
    Some(Inputs::resolve(prev, curr)?.report())
}

/// Evaluate the screen for `symbol`.
///
/// Returns `Some` only when every gate passes.  Missing indicator values and
/// non-finite outputs are treated as "no signal".
pub fn evaluate(symbol: &str, aug: &AugmentedHistory) -> Option<ScreenResult> {
    let (prev, curr) = aug.last_two()?;
    let inputs = Inputs::resolve(prev, curr)?;
    let report = inputs.report();
    if !report.all_passed() {
        return None;
    }

    let raw_score = inputs.rsi + report.vol_ratio * VOLUME_SCORE_WEIGHT;
    let result = ScreenResult {
        symbol: symbol.to_string(),
        price: round_to(inputs.price, 2),
        change_pct: round_to(inputs.change_pct(), 2),
        vol_ratio: round_to(report.vol_ratio, 2),
        rsi: round_to(inputs.rsi, 2),
        score: round_to(raw_score, 0),
    };

    let values = [result.price, result.change_pct, result.vol_ratio, result.rsi, result.score];
    if values.iter().all(|v| v.is_finite()) {
        Some(result)
    } else {
        None
    }
}

/// Round at `decimals` places from the exact binary value, ties to even.
///
/// Scaling by a power of ten first would add its own rounding error and can
/// turn 2.67499999... (the double nearest 2.675) into an exact tie.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   macd_line   = EMA(close, fast) - EMA(close, slow)
//   signal_line = EMA(macd_line, signal)
//   histogram   = macd_line - signal_line
//
// The screener uses the classic 12 / 26 / 9 parameters.  All three series are
// seeded by the first value, so they are defined from the first bar onward.
// =============================================================================

use super::ema::calculate_ema;

pub const FAST_SPAN: usize = 12;
pub const SLOW_SPAN: usize = 26;
pub const SIGNAL_SPAN: usize = 9;

/// The three aligned MACD series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD with explicit spans.
///
/// Each output series has `min(len(ema_fast), len(ema_slow))` elements, which
/// equals `closes.len()` for finite input.  Returns empty series when either
/// span is zero.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = calculate_ema(&line, signal);
    let histogram = line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdSeries {
        line,
        signal: signal_line,
        histogram,
    }
}

/// MACD(12, 26, 9).
pub fn calculate_standard_macd(closes: &[f64]) -> MacdSeries {
    calculate_macd(closes, FAST_SPAN, SLOW_SPAN, SIGNAL_SPAN)
}

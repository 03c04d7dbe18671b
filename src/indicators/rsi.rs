// =============================================================================
// Relative Strength Index (RSI) — simple-average variant
// =============================================================================
//
// Step 1 — Price change per bar: delta_t = close_t - close_{t-1}.  The first
//          bar has no predecessor and counts as an unchanged day.
// Step 2 — gain_t = max(delta_t, 0), loss_t = max(-delta_t, 0).
// Step 3 — avg_gain / avg_loss = SMA of gains / losses over `period` bars.
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Unlike Wilder's smoothing, the averages here are plain trailing means, so a
// value depends only on the last `period` bars.
// =============================================================================

use super::sma::calculate_sma;

/// Compute the RSI series for `closes` over `period` bars.
///
/// The output is aligned with the input and has `closes.len()` elements.
/// Position `t` is `None` while the gain/loss windows are not yet full
/// (t < period - 1).
///
/// # Edge cases
/// - `period == 0` => every position is `None`
/// - If average loss is zero (no down moves in the window, including a
///   perfectly flat window), RSI is 100.0.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    for (i, &close) in closes.iter().enumerate() {
        let delta = if i == 0 { 0.0 } else { close - closes[i - 1] };
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let avg_gains = calculate_sma(&gains, period);
    let avg_losses = calculate_sma(&losses, period);

    avg_gains
        .into_iter()
        .zip(avg_losses)
        .map(|(g, l)| rsi_from_averages(g?, l?))
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If average loss is zero, RSI is 100.0 and no division is performed.
/// - Returns `None` when the result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi.clamp(0.0, 100.0))
    } else {
        None
    }
}

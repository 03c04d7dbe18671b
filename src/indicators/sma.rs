// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Arithmetic mean of the trailing `period` values ending at each position:
//   SMA_t = (v_{t-period+1} + ... + v_t) / period
//
// The output is aligned with the input: position `t` holds `None` until the
// window is fully populated (t < period - 1).
// =============================================================================

/// Compute the SMA series for `values` over a trailing `period`.
///
/// The returned vector always has `values.len()` elements.
///
/// # Edge cases
/// - `period == 0` => every position is `None`
/// - `values.len() < period` => every position is `None`
/// - A non-finite mean leaves that position `None`.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let divisor = period as f64;
    for (offset, window) in values.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / divisor;
        if mean.is_finite() {
            result[offset + period - 1] = Some(mean);
        }
    }

    result
}

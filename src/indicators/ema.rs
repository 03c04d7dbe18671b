// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (span + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The recurrence is seeded with the first value itself (EMA_0 = value_0), so
// the series is defined from the very first position and has the same length
// as its input.
// =============================================================================

/// Compute the EMA series for `values` with smoothing `span`.
///
/// Returns an empty `Vec` when the input is empty or the span is zero.
/// Otherwise the output has exactly `values.len()` elements.
///
/// # Edge cases
/// - `span == 0` => empty vec
/// - Non-finite intermediate values stop the series; downstream consumers
///   only see the trusted prefix.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let multiplier = 2.0 / (span + 1) as f64;

    let mut result = Vec::with_capacity(values.len());
    let mut prev_ema = values[0];
    if !prev_ema.is_finite() {
        return Vec::new();
    }
    result.push(prev_ema);

    for &value in &values[1..] {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}

//! Trailing moving average.

/// Trailing mean over the last `window` values, same length as the input.
///
/// The window shrinks at the start of the series instead of padding with
/// zeros, so the first output is always the first input. A window of `0`
/// or `1` returns the values unchanged.
///
/// Each output is computed from its own window slice, so rounding error
/// does not carry across the series and a constant input maps to itself.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return values.to_vec();
    }

    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            values[start..=i]
                .iter()
                .enumerate()
                .fold(0.0, |mean, (k, value)| mean + (value - mean) / (k + 1) as f64)
        })
        .collect()
}

//! Period-over-period changes

/// Fractional change from `previous` to `current`.
///
/// A zero `previous` yields 0 instead of an infinite ratio.
pub fn fractional_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous
    }
}

/// Fractional change of each value against its predecessor.
///
/// The first position has no predecessor and is 0.
pub fn pct_change(data: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(data.len());
    if data.is_empty() {
        return out;
    }

    out.push(0.0);
    out.extend(data.windows(2).map(|w| fractional_change(w[0], w[1])));
    out
}

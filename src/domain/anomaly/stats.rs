//! Robust statistics for the anomaly baseline.

use std::cmp::Ordering;

/// Standard median: middle element for an odd count, average of the two
/// middle elements for an even count. `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Median absolute deviation from `med`. `None` when the deviation is zero
/// or undefined (all-equal or empty history): such a history carries no
/// usable spread estimate and callers substitute a stand-in instead of
/// dividing by zero.
pub fn mad(values: &[f64], med: f64) -> Option<f64> {
    let devs: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
    match median(&devs) {
        Some(m) if m > 0.0 => Some(m),
        _ => None,
    }
}

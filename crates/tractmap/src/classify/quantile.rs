//! Quantile breakpoints from order statistics.

/// Breakpoint `i` is the sorted value at position `floor(i * n / k)`.
///
/// `sorted` must be non-empty and ascending. Repeated values produce
/// repeated breakpoints.
pub(super) fn quantile_breaks(sorted: &[f64], class_count: usize) -> Vec<f64> {
    let n = sorted.len();
    (1..class_count)
        .map(|i| sorted[(i * n / class_count).min(n - 1)])
        .collect()
}

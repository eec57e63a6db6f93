//! Natural breaks via optimal one-dimensional k-means.
//!
//! Clusters are fitted over the distinct sorted values weighted by how
//! often each occurs, so equal values always share a cluster and every
//! cluster minimum is a distinct value.

use crate::error::{Result, TractMapError};

/// Prefix sums over weighted values for O(1) within-cluster cost.
struct PrefixSums {
    weight: Vec<f64>,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl PrefixSums {
    fn new(values: &[f64], weights: &[f64]) -> Self {
        // Shift by the middle value to keep the sums small
        let shift = values[values.len() / 2];
        let mut weight = vec![0.0; values.len() + 1];
        let mut sum = vec![0.0; values.len() + 1];
        let mut sum_sq = vec![0.0; values.len() + 1];

        for (i, (&v, &w)) in values.iter().zip(weights).enumerate() {
            let x = v - shift;
            weight[i + 1] = weight[i] + w;
            sum[i + 1] = sum[i] + w * x;
            sum_sq[i + 1] = sum_sq[i] + w * x * x;
        }

        Self { weight, sum, sum_sq }
    }

    /// Sum of squared deviations from the mean over `from..=to`.
    fn cost(&self, from: usize, to: usize) -> f64 {
        let w = self.weight[to + 1] - self.weight[from];
        let s = self.sum[to + 1] - self.sum[from];
        let q = self.sum_sq[to + 1] - self.sum_sq[from];
        (q - s * s / w).max(0.0)
    }
}

/// Minima of clusters 2..=k for `sorted` split into `class_count` clusters.
///
/// `sorted` must be non-empty and ascending.
pub(super) fn natural_breaks(sorted: &[f64], class_count: usize) -> Result<Vec<f64>> {
    let (values, weights) = distinct_with_weights(sorted);
    let m = values.len();
    if m < class_count {
        return Err(TractMapError::InsufficientData {
            required: class_count,
            found: m,
        });
    }

    let sums = PrefixSums::new(&values, &weights);

    // cost[c][i]: best total cost of values[0..=i] in c + 1 clusters
    // start[c][i]: index where the last of those clusters begins
    let mut cost = vec![vec![0.0; m]; class_count];
    let mut start = vec![vec![0usize; m]; class_count];

    for i in 0..m {
        cost[0][i] = sums.cost(0, i);
    }

    for c in 1..class_count {
        let (done, rest) = cost.split_at_mut(c);
        let mut row = Row {
            sums: &sums,
            prev: &done[c - 1],
            cost: &mut rest[0],
            start: &mut start[c],
        };
        row.fill(c, m - 1, c, m - 1);
    }

    let mut breaks = Vec::with_capacity(class_count - 1);
    let mut end = m - 1;
    for c in (1..class_count).rev() {
        let j = start[c][end];
        breaks.push(values[j]);
        end = j - 1;
    }
    breaks.reverse();

    Ok(breaks)
}

/// One row of the dynamic program. The best start index is monotone in
/// `i`, so each row fills by divide and conquer in O(m log m).
struct Row<'a> {
    sums: &'a PrefixSums,
    prev: &'a [f64],
    cost: &'a mut [f64],
    start: &'a mut [usize],
}

impl Row<'_> {
    /// Fill `lo..=hi`, searching starts only within `first..=last`.
    fn fill(&mut self, lo: usize, hi: usize, first: usize, last: usize) {
        if lo > hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;

        let mut best = f64::INFINITY;
        let mut best_start = first;
        for j in first..=last.min(mid) {
            let candidate = self.prev[j - 1] + self.sums.cost(j, mid);
            if candidate < best {
                best = candidate;
                best_start = j;
            }
        }
        self.cost[mid] = best;
        self.start[mid] = best_start;

        if mid > lo {
            self.fill(lo, mid - 1, first, best_start);
        }
        self.fill(mid + 1, hi, best_start, last);
    }
}

fn distinct_with_weights(sorted: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut values: Vec<f64> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();

    for &v in sorted {
        if values.last() == Some(&v) {
            if let Some(w) = weights.last_mut() {
                *w += 1.0;
            }
        } else {
            values.push(v);
            weights.push(1.0);
        }
    }

    (values, weights)
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Correlation Engine

use crate::matrix::MatrixStore;
use crate::types::{CorrelationMatrix, ThresholdState};

/// Preset thresholds offered by the threshold selector.
pub const CORRELATION_THRESHOLD_PRESETS: [f64; 4] = [0.1, 0.5, 0.7, 0.9];

/// Pearson correlation matrix over the matrix columns.
///
/// `None` with fewer than two rows or two columns. The diagonal is fixed at
/// 1.0; off-diagonal pairs whose present values differ in length, or whose
/// variance is zero, are 0.0.
pub fn compute_correlation_matrix(matrix: &MatrixStore) -> Option<CorrelationMatrix> {
    let n = matrix.column_count();
    if matrix.row_count() < 2 || n < 2 {
        return None;
    }
    let columns: Vec<Vec<f64>> = (0..n).map(|c| matrix.column(c).collect()).collect();

    let mut out = vec![vec![0.0; n]; n];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = if i == j {
                1.0
            } else {
                pearson(&columns[i], &columns[j])
            };
        }
    }
    Some(CorrelationMatrix(out))
}

/// Pearson product-moment coefficient of two equal-length sequences.
///
/// Mismatched or empty inputs and a zero denominator yield 0.0.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_x2, sum_y2) = x.iter().zip(y).fold(
        (0.0, 0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sx2, sy2), (&a, &b)| (sx + a, sy + b, sxy + a * b, sx2 + a * a, sy2 + b * b),
    );
    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

/// `Met` when any off-diagonal `|r| >= threshold`. No matrix is `Below`.
pub fn threshold_state(matrix: Option<&CorrelationMatrix>, threshold: f64) -> ThresholdState {
    let met = matrix.is_some_and(|m| m.off_diagonal().any(|(_, _, r)| r.abs() >= threshold));
    if met {
        ThresholdState::Met
    } else {
        ThresholdState::Below
    }
}

/// Mean absolute off-diagonal correlation, in `[0, 1]`.
pub fn average_strength(matrix: &CorrelationMatrix) -> Option<f64> {
    let n = matrix.size();
    if n < 2 {
        return None;
    }
    let total: f64 = matrix.off_diagonal().map(|(_, _, r)| r.abs()).sum();
    let pairs = n * (n - 1) / 2;
    Some(total / pairs as f64)
}

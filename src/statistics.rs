// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Descriptive Statistics

use crate::matrix::MatrixStore;
use crate::types::{BasicStats, ColumnStats};

/// Aggregate statistics over `values`.
///
/// Returns `None` for an empty sequence; callers treat that as
/// "insufficient data". Variance is the population variance.
pub fn compute_basic<I>(values: I) -> Option<BasicStats>
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let values = values.into_iter();
    let (count, sum, min, max) = values.clone().fold(
        (0usize, 0.0_f64, f64::INFINITY, f64::NEG_INFINITY),
        |(n, sum, min, max), v| (n + 1, sum + v, min.min(v), max.max(v)),
    );
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;
    let variance = population_variance(values, mean, count);
    Some(BasicStats {
        mean,
        variance,
        std_dev: variance.sqrt(),
        min,
        max,
        count,
    })
}

/// Per-column statistics, skipping columns with no present values.
pub fn compute_column_stats(matrix: &MatrixStore) -> Vec<ColumnStats> {
    (0..matrix.column_count())
        .filter_map(|col| {
            let values = matrix.column(col);
            let count = values.clone().count();
            if count == 0 {
                return None;
            }
            let mean = values.clone().sum::<f64>() / count as f64;
            let variance = population_variance(values, mean, count);
            Some(ColumnStats {
                column_index: col,
                mean,
                variance,
                std_dev: variance.sqrt(),
            })
        })
        .collect()
}

fn population_variance<I: Iterator<Item = f64>>(values: I, mean: f64, count: usize) -> f64 {
    values.map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64
}

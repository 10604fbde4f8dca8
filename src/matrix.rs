// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Matrix Store

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkbenchError};
use crate::input::{coerce_finite, DEFAULT_CELL_VALUE};

pub const MIN_ROWS: usize = 2;
pub const MAX_ROWS: usize = 10;
pub const MIN_COLS: usize = 2;
pub const MAX_COLS: usize = 8;

/// Reject dimensions outside `[2,10] x [2,8]`.
pub fn validate_dimensions(rows: usize, cols: usize) -> Result<()> {
    if (MIN_ROWS..=MAX_ROWS).contains(&rows) && (MIN_COLS..=MAX_COLS).contains(&cols) {
        Ok(())
    } else {
        Err(WorkbenchError::InvalidDimensions { rows, cols })
    }
}

// ─── MatrixStore ─────────────────────────────────────────────────────────────

/// Row-major numeric grid that tolerates ragged intermediate states.
///
/// A cell that was never written is `None` and is excluded from every
/// aggregate. `rows`/`cols` are the declared size from the last resize;
/// single-cell edits may grow the backing rows without changing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixStore {
    cells: Vec<Vec<Option<f64>>>,
    rows: usize,
    cols: usize,
}

impl MatrixStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the grid with `rows x cols` values drawn from `fill(row, col)`.
    ///
    /// Validation happens before any mutation: on error the store is untouched.
    pub fn resize<F>(&mut self, rows: usize, cols: usize, mut fill: F) -> Result<()>
    where
        F: FnMut(usize, usize) -> f64,
    {
        validate_dimensions(rows, cols)?;
        self.cells = (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| Some(coerce_finite(fill(r, c), DEFAULT_CELL_VALUE)))
                    .collect()
            })
            .collect();
        self.rows = rows;
        self.cols = cols;
        Ok(())
    }

    /// Replace the grid with a fully specified dataset.
    ///
    /// The declared width is taken from the first row; shorter rows stay ragged.
    pub fn load(&mut self, data: &[Vec<f64>]) -> Result<()> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        validate_dimensions(rows, cols)?;
        self.cells = data
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| Some(coerce_finite(v, DEFAULT_CELL_VALUE)))
                    .collect()
            })
            .collect();
        self.rows = rows;
        self.cols = cols;
        Ok(())
    }

    /// Write one cell, returning its previous value (or `None` if absent).
    ///
    /// Non-finite values are stored as 0. Rows and columns past the current
    /// backing storage are created as absent cells; the declared size is not
    /// changed.
    pub fn set_cell(&mut self, row: usize, col: usize, value: f64) -> Result<Option<f64>> {
        if row >= MAX_ROWS || col >= MAX_COLS {
            return Err(WorkbenchError::CellOutOfRange { row, col });
        }
        if self.cells.len() <= row {
            self.cells.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.cells[row];
        if cells.len() <= col {
            cells.resize(col + 1, None);
        }
        let previous = cells[col];
        cells[col] = Some(coerce_finite(value, DEFAULT_CELL_VALUE));
        Ok(previous)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Declared row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Declared column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of backing rows, including rows grown by edits.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Width used for column aggregates: the declared width or the widest
    /// backing row, whichever is larger.
    pub fn column_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0).max(self.cols)
    }

    /// Lazy row-major walk over present cells only. Clone to restart.
    pub fn snapshot_flat(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        self.cells.iter().flat_map(|row| row.iter().filter_map(|c| *c))
    }

    /// Present values of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + Clone + '_ {
        self.cells
            .iter()
            .filter_map(move |row| row.get(col).copied().flatten())
    }

    pub fn present_count(&self) -> usize {
        self.snapshot_flat().count()
    }

    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }

    /// Backing cells, absent entries as `None`.
    pub fn cells(&self) -> &[Vec<Option<f64>>] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_bounds() {
        let mut m = MatrixStore::new();
        assert_eq!(
            m.resize(1, 4, |_, _| 1.0),
            Err(WorkbenchError::InvalidDimensions { rows: 1, cols: 4 })
        );
        assert!(m.resize(11, 4, |_, _| 1.0).is_err());
        assert!(m.resize(4, 9, |_, _| 1.0).is_err());
        assert!(m.resize(10, 8, |_, _| 1.0).is_ok());
        assert_eq!((m.rows(), m.cols()), (10, 8));
        assert_eq!(m.present_count(), 80);
    }

    #[test]
    fn test_rejected_resize_keeps_prior_state() {
        let mut m = MatrixStore::new();
        m.resize(2, 2, |r, c| (r * 2 + c) as f64).unwrap();
        let before = m.clone();
        assert!(m.resize(0, 0, |_, _| 9.0).is_err());
        assert_eq!(m, before);
    }

    #[test]
    fn test_set_cell_returns_previous() {
        let mut m = MatrixStore::new();
        m.resize(2, 2, |_, _| 5.0).unwrap();
        assert_eq!(m.set_cell(0, 1, 7.0).unwrap(), Some(5.0));
        assert_eq!(m.get(0, 1), Some(7.0));
    }

    #[test]
    fn test_set_cell_repairs_raggedness() {
        let mut m = MatrixStore::new();
        m.resize(2, 2, |_, _| 1.0).unwrap();
        assert_eq!(m.set_cell(4, 3, 2.0).unwrap(), None);
        assert_eq!(m.row_count(), 5);
        assert_eq!((m.rows(), m.cols()), (2, 2));
        // Grown rows are absent, not zero.
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.get(4, 2), None);
        assert_eq!(m.present_count(), 5);
        assert_eq!(m.column_count(), 4);
    }

    #[test]
    fn test_set_cell_coerces_non_finite() {
        let mut m = MatrixStore::new();
        m.resize(2, 2, |_, _| 1.0).unwrap();
        m.set_cell(1, 1, f64::NAN).unwrap();
        assert_eq!(m.get(1, 1), Some(0.0));
    }

    #[test]
    fn test_set_cell_out_of_grid() {
        let mut m = MatrixStore::new();
        assert_eq!(
            m.set_cell(10, 0, 1.0),
            Err(WorkbenchError::CellOutOfRange { row: 10, col: 0 })
        );
    }

    #[test]
    fn test_snapshot_flat_row_major_and_restartable() {
        let mut m = MatrixStore::new();
        m.resize(2, 2, |r, c| (r * 10 + c) as f64).unwrap();
        m.set_cell(3, 1, 99.0).unwrap();
        let flat = m.snapshot_flat();
        let first: Vec<f64> = flat.clone().collect();
        let second: Vec<f64> = flat.collect();
        assert_eq!(first, vec![0.0, 1.0, 10.0, 11.0, 99.0]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_column_skips_absent() {
        let mut m = MatrixStore::new();
        m.set_cell(0, 0, 1.0).unwrap();
        m.set_cell(2, 0, 3.0).unwrap();
        m.set_cell(1, 1, 4.0).unwrap();
        assert_eq!(m.column(0).collect::<Vec<_>>(), vec![1.0, 3.0]);
        assert_eq!(m.column(1).collect::<Vec<_>>(), vec![4.0]);
    }

    #[test]
    fn test_load_validates() {
        let mut m = MatrixStore::new();
        assert!(m.load(&[vec![1.0, 2.0]]).is_err());
        assert!(m.load(&[vec![1.0, 2.0], vec![3.0, 4.0]]).is_ok());
        assert_eq!(m.present_count(), 4);
    }
}

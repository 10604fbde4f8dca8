// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Error Types

/// Errors surfaced to the caller as validation failures.
///
/// Numeric degeneracies (empty data, zero variance, zero present value) are
/// resolved by policy inside the engines and never appear here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkbenchError {
    #[error("matrix dimensions must be between 2-10 rows and 2-8 columns (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("cell R{}C{} is outside the 10x8 editable grid", .row + 1, .col + 1)]
    CellOutOfRange { row: usize, col: usize },

    #[error("invalid workbench config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WorkbenchError>;

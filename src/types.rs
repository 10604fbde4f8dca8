// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Type Definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── Basic Statistics ────────────────────────────────────────────────────────

/// Aggregate descriptive statistics over every present cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub mean: f64,
    /// Population variance (divisor `n`).
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

// ─── Column Statistics ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    /// Zero-based column index.
    pub column_index: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
}

// ─── Correlation Matrix ──────────────────────────────────────────────────────

/// Square, symmetric Pearson correlation matrix (row-major).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMatrix(pub Vec<Vec<f64>>);

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.0.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Iterate the strict upper triangle as `(i, j, value)`.
    pub fn off_diagonal(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.0.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .skip(i + 1)
                .map(move |(j, &value)| (i, j, value))
        })
    }
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Risk-adjusted future-value projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub present_value: f64,
    pub future_value: f64,
    pub adjusted_rate: f64,
    /// Percentage growth; `None` when the present value is zero.
    pub compound_growth: Option<f64>,
    pub periods: u32,
}

// ─── StatsSnapshot ───────────────────────────────────────────────────────────

/// Immutable result of one full recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub basic: BasicStats,
    pub columns: Vec<ColumnStats>,
    pub correlation: Option<CorrelationMatrix>,
    pub future_value: Option<Projection>,
    /// Milliseconds since the Unix epoch.
    pub last_updated: u64,
}

impl StatsSnapshot {
    /// Compare every numeric field, ignoring `last_updated`.
    pub fn same_values(&self, other: &StatsSnapshot) -> bool {
        self.basic == other.basic
            && self.columns == other.columns
            && self.correlation == other.correlation
            && self.future_value == other.future_value
    }
}

// ─── Change Events ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeAction {
    #[serde(rename = "Matrix Generated")]
    MatrixGenerated,
    #[serde(rename = "Sample Data Loaded")]
    SampleLoaded,
    #[serde(rename = "Cell Updated")]
    CellUpdated,
    #[serde(rename = "Time Analysis Started")]
    AnalysisStarted,
    #[serde(rename = "Time Analysis Stopped")]
    AnalysisStopped,
}

impl ChangeAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MatrixGenerated => "Matrix Generated",
            Self::SampleLoaded => "Sample Data Loaded",
            Self::CellUpdated => "Cell Updated",
            Self::AnalysisStarted => "Time Analysis Started",
            Self::AnalysisStopped => "Time Analysis Stopped",
        }
    }
}

/// One audited mutation or session event. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub id: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub action: ChangeAction,
    pub details: serde_json::Value,
}

// ─── Threshold State ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdState {
    Met,
    Below,
}

// ─── Matrix Status ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixStatus {
    Empty,
    Generated,
    SampleLoaded,
    Modified,
}

impl MatrixStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Generated => "Generated",
            Self::SampleLoaded => "Sample Loaded",
            Self::Modified => "Modified",
        }
    }
}

// ─── Recompute Outcome ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeOutcome {
    /// A new snapshot replaced the previous one.
    Published,
    /// No present cells; the previous snapshot is untouched.
    InsufficientData,
}

// ─── Unified Summary ─────────────────────────────────────────────────────────

/// Headline figures for the results panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSummary {
    pub rows: usize,
    pub cols: usize,
    pub total_changes: usize,
    pub last_updated: Option<u64>,
    /// Mean absolute off-diagonal correlation, in percent (1 dp).
    pub correlation_strength_pct: Option<Decimal>,
    /// Future value rounded to cents.
    pub future_value_projection: Option<Decimal>,
}

// ─── Export Document ─────────────────────────────────────────────────────────

/// Everything the export collaborator serializes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub matrix: Vec<Vec<Option<f64>>>,
    pub current_stats: Option<StatsSnapshot>,
    pub change_history: Vec<ChangeEvent>,
    pub timestamp: u64,
}

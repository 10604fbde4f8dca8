// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Analysis Session

use std::rc::Rc;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::WorkbenchConfig;
use crate::correlation::{self, compute_correlation_matrix};
use crate::dataset::{self, CellGenerator};
use crate::error::Result;
use crate::history::ChangeLog;
use crate::input::{
    coerce_finite, parse_optional, parse_or_default, DEFAULT_BASE_RATE, DEFAULT_CELL_VALUE,
    DEFAULT_CORRELATION_THRESHOLD,
};
use crate::matrix::{validate_dimensions, MatrixStore};
use crate::observer::SessionObserver;
use crate::projection::FinancialParams;
use crate::statistics::{compute_basic, compute_column_stats};
use crate::ticker::{CancelHandle, ElapsedTime, Tick, Ticker};
use crate::types::*;

/// Whether the periodic time analysis is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Idle,
    Analyzing,
}

// ─── AnalysisSession struct ──────────────────────────────────────────────────

/// Single-document workbench: owns the matrix, the audit trail and the
/// current snapshot, and is the only writer of all three.
///
/// Every mutation runs to completion synchronously: mutate, log, recompute,
/// notify. Observers see a snapshot only after it is fully built.
pub struct AnalysisSession {
    matrix: MatrixStore,
    history: ChangeLog,
    current: Option<Rc<StatsSnapshot>>,
    last_calculation_ms: Option<u64>,
    status: MatrixStatus,

    financial: FinancialParams,
    threshold: f64,
    last_threshold: Option<ThresholdState>,

    ticker: Option<Ticker>,
    generator: CellGenerator,
    config: WorkbenchConfig,

    clock: Box<dyn Clock>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(WorkbenchConfig::default())
    }
}

impl AnalysisSession {
    pub fn new(config: WorkbenchConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock<C: Clock + 'static>(config: WorkbenchConfig, clock: C) -> Self {
        Self {
            matrix: MatrixStore::new(),
            history: ChangeLog::new(config.history_capacity),
            current: None,
            last_calculation_ms: None,
            status: MatrixStatus::Empty,
            financial: config.financial.clone(),
            threshold: config.correlation_threshold,
            last_threshold: None,
            ticker: None,
            generator: CellGenerator::new(config.seed),
            config,
            clock: Box::new(clock),
            observers: Vec::new(),
        }
    }

    /// Register a view collaborator. Observers are notified in registration order.
    pub fn subscribe<O: SessionObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    // ─── Matrix mutations ────────────────────────────────────────────────

    /// Replace the matrix with a `rows x cols` grid of random integers.
    pub fn generate(&mut self, rows: usize, cols: usize) -> Result<()> {
        if let Err(e) = validate_dimensions(rows, cols) {
            warn!(rows, cols, "rejected matrix dimensions");
            return Err(e);
        }
        let generator = &mut self.generator;
        self.matrix.resize(rows, cols, |_, _| generator.next_value())?;
        self.status = MatrixStatus::Generated;
        info!(rows, cols, "matrix generated");
        self.log_change(ChangeAction::MatrixGenerated, json!({ "rows": rows, "cols": cols }));
        self.recompute();
        Ok(())
    }

    /// Replace the matrix with the built-in 8x4 sample dataset.
    pub fn load_sample(&mut self) -> Result<()> {
        self.matrix.load(&dataset::sample_data())?;
        self.status = MatrixStatus::SampleLoaded;
        let (rows, cols) = (self.matrix.rows(), self.matrix.cols());
        info!(rows, cols, "sample data loaded");
        self.log_change(ChangeAction::SampleLoaded, json!({ "rows": rows, "cols": cols }));
        self.recompute();
        Ok(())
    }

    /// Write a numeric cell value and recompute. Returns the previous value.
    pub fn set_cell(&mut self, row: usize, col: usize, value: f64) -> Result<Option<f64>> {
        let value = coerce_finite(value, DEFAULT_CELL_VALUE);
        let previous = self.matrix.set_cell(row, col, value)?;
        self.status = MatrixStatus::Modified;
        self.log_change(
            ChangeAction::CellUpdated,
            json!({
                "position": format!("R{}C{}", row + 1, col + 1),
                "oldValue": previous,
                "newValue": value,
            }),
        );
        self.recompute();
        Ok(previous)
    }

    /// Write a cell from raw text as typed; malformed text stores 0.
    pub fn edit_cell(&mut self, row: usize, col: usize, raw: &str) -> Result<Option<f64>> {
        if parse_optional(raw).is_none() {
            warn!(row, col, raw, "malformed cell input coerced to 0");
        }
        self.set_cell(row, col, parse_or_default(raw, DEFAULT_CELL_VALUE))
    }

    // ─── Parameters ──────────────────────────────────────────────────────

    pub fn set_base_rate(&mut self, rate: f64) {
        self.financial.base_rate = coerce_finite(rate, DEFAULT_BASE_RATE);
        self.recompute();
    }

    pub fn set_periods(&mut self, periods: u32) {
        self.financial.periods = periods;
        self.recompute();
    }

    /// `None` projects from the dataset mean.
    pub fn set_present_value(&mut self, present_value: Option<f64>) {
        self.financial.present_value = present_value.filter(|v| v.is_finite());
        self.recompute();
    }

    pub fn set_financial(&mut self, params: FinancialParams) {
        self.financial = FinancialParams {
            present_value: params.present_value.filter(|v| v.is_finite()),
            base_rate: coerce_finite(params.base_rate, DEFAULT_BASE_RATE),
            periods: params.periods,
        };
        self.recompute();
    }

    /// Change the correlation threshold and re-evaluate it immediately.
    pub fn set_correlation_threshold(&mut self, threshold: f64) -> ThresholdState {
        self.threshold = coerce_finite(threshold, DEFAULT_CORRELATION_THRESHOLD);
        self.check_threshold(self.threshold)
    }

    // ─── Pipeline ────────────────────────────────────────────────────────

    /// Rebuild the snapshot from the current matrix and parameters.
    ///
    /// With no present cells this leaves the previous snapshot in place.
    pub fn recompute(&mut self) -> RecomputeOutcome {
        let Some(basic) = compute_basic(self.matrix.snapshot_flat()) else {
            debug!("recompute skipped: no present cells");
            return RecomputeOutcome::InsufficientData;
        };
        let columns = compute_column_stats(&self.matrix);
        let correlation = compute_correlation_matrix(&self.matrix);
        let future_value = Some(self.financial.project(basic.mean, basic.variance));
        let now = self.clock.now_ms();

        debug!(count = basic.count, mean = basic.mean, "snapshot recomputed");
        let snapshot = Rc::new(StatsSnapshot {
            basic,
            columns,
            correlation,
            future_value,
            last_updated: now,
        });
        self.current = Some(Rc::clone(&snapshot));
        self.last_calculation_ms = Some(now);
        for observer in self.observers.iter_mut() {
            observer.on_matrix_changed(&snapshot);
        }
        RecomputeOutcome::Published
    }

    /// Scan the current correlation matrix against `threshold`.
    pub fn check_threshold(&mut self, threshold: f64) -> ThresholdState {
        let correlation = self.current.as_ref().and_then(|s| s.correlation.as_ref());
        let state = correlation::threshold_state(correlation, threshold);
        self.last_threshold = Some(state);
        for observer in self.observers.iter_mut() {
            observer.on_threshold_evaluated(state);
        }
        state
    }

    // ─── Time analysis ───────────────────────────────────────────────────

    /// Start the periodic ticker. Returns `false` if already analyzing.
    pub fn start_analysis(&mut self) -> bool {
        self.retire_cancelled_ticker();
        if self.ticker.is_some() {
            return false;
        }
        let now = self.clock.now_ms();
        self.ticker = Some(Ticker::new(
            now,
            self.config.tick_period_ms,
            self.config.recompute_every_ticks,
        ));
        info!(start_time = now, "time analysis started");
        self.log_change(ChangeAction::AnalysisStarted, json!({ "startTime": now }));
        true
    }

    /// Stop the periodic ticker. Returns `false` if already idle.
    pub fn stop_analysis(&mut self) -> bool {
        match self.ticker.take() {
            Some(ticker) => {
                ticker.handle().cancel();
                self.finish_analysis(&ticker);
                true
            }
            None => false,
        }
    }

    /// Handle for cancelling the running ticker from outside the session.
    pub fn analysis_handle(&self) -> Option<CancelHandle> {
        self.ticker.as_ref().map(Ticker::handle)
    }

    /// Fire every tick due at the current clock reading, one after another.
    ///
    /// A long stall releases at most `MAX_CATCH_UP_TICKS` of the overdue
    /// ticks. Returns the number of ticks processed.
    pub fn pump(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut fired = 0;
        while let Some(tick) = self.ticker.as_mut().and_then(|t| t.poll(now)) {
            fired += 1;
            self.handle_tick(tick);
        }
        self.retire_cancelled_ticker();
        fired
    }

    /// Milliseconds until the next tick is due, if analyzing.
    pub fn next_tick_in_ms(&self) -> Option<u64> {
        let now = self.clock.now_ms();
        self.ticker
            .as_ref()
            .filter(|t| !t.is_cancelled())
            .map(|t| t.next_due_ms().saturating_sub(now))
    }

    pub fn analysis_state(&self) -> AnalysisState {
        match &self.ticker {
            Some(t) if !t.is_cancelled() => AnalysisState::Analyzing,
            _ => AnalysisState::Idle,
        }
    }

    /// Elapsed analysis time as of the last fired tick.
    pub fn elapsed(&self) -> Option<ElapsedTime> {
        self.ticker
            .as_ref()
            .map(|t| ElapsedTime::from_ms(t.elapsed_ms()))
    }

    fn handle_tick(&mut self, tick: Tick) {
        for observer in self.observers.iter_mut() {
            observer.on_tick(&tick);
        }
        if tick.recompute_due {
            debug!(tick = tick.index, "periodic recompute");
            self.recompute();
            self.check_threshold(self.threshold);
        }
    }

    fn retire_cancelled_ticker(&mut self) {
        if self.ticker.as_ref().is_some_and(Ticker::is_cancelled) {
            if let Some(ticker) = self.ticker.take() {
                self.finish_analysis(&ticker);
            }
        }
    }

    fn finish_analysis(&mut self, ticker: &Ticker) {
        let duration = self.clock.now_ms().saturating_sub(ticker.origin_ms());
        info!(duration_ms = duration, ticks = ticker.fired(), "time analysis stopped");
        self.log_change(ChangeAction::AnalysisStopped, json!({ "duration": duration }));
    }

    // ─── Change log ──────────────────────────────────────────────────────

    fn log_change(&mut self, action: ChangeAction, details: serde_json::Value) {
        let now = self.clock.now_ms();
        let event = self.history.append(action, details, now);
        for observer in self.observers.iter_mut() {
            observer.on_change_logged(event);
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn current_matrix(&self) -> &MatrixStore {
        &self.matrix
    }

    pub fn current_snapshot(&self) -> Option<Rc<StatsSnapshot>> {
        self.current.clone()
    }

    pub fn history(&self) -> &ChangeLog {
        &self.history
    }

    pub fn recent(&self, n: usize) -> Vec<&ChangeEvent> {
        self.history.recent(n).collect()
    }

    pub fn change_count(&self) -> usize {
        self.history.len()
    }

    pub fn status(&self) -> MatrixStatus {
        self.status
    }

    pub fn financial(&self) -> &FinancialParams {
        &self.financial
    }

    pub fn correlation_threshold(&self) -> f64 {
        self.threshold
    }

    pub fn last_threshold(&self) -> Option<ThresholdState> {
        self.last_threshold
    }

    pub fn last_calculation_ms(&self) -> Option<u64> {
        self.last_calculation_ms
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    /// Headline figures for the unified results panel.
    pub fn summary(&self) -> UnifiedSummary {
        let snapshot = self.current.as_deref();
        let correlation_strength_pct = snapshot
            .and_then(|s| s.correlation.as_ref())
            .and_then(correlation::average_strength)
            .and_then(Decimal::from_f64)
            .map(|d| (d * dec!(100)).round_dp(1));
        let future_value_projection = snapshot
            .and_then(|s| s.future_value.as_ref())
            .and_then(|p| Decimal::from_f64(p.future_value))
            .map(|d| d.round_dp(2));
        UnifiedSummary {
            rows: self.matrix.rows(),
            cols: self.matrix.cols(),
            total_changes: self.history.len(),
            last_updated: snapshot.map(|s| s.last_updated),
            correlation_strength_pct,
            future_value_projection,
        }
    }

    /// Everything an exporter needs, stamped with the current time.
    pub fn export_document(&self) -> ExportDocument {
        ExportDocument {
            matrix: self.matrix.cells().to_vec(),
            current_stats: self.current.as_deref().cloned(),
            change_history: self.history.iter().cloned().collect(),
            timestamp: self.clock.now_ms(),
        }
    }
}

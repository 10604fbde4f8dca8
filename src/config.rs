// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkbenchError};
use crate::history::HISTORY_CAPACITY;
use crate::input::DEFAULT_CORRELATION_THRESHOLD;
use crate::projection::FinancialParams;
use crate::ticker::{MAX_TICK_PERIOD_MS, RECOMPUTE_EVERY_TICKS, TICK_PERIOD_MS};

/// Session tunables. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkbenchConfig {
    pub history_capacity: usize,
    pub tick_period_ms: u64,
    pub recompute_every_ticks: u64,
    pub correlation_threshold: f64,
    pub financial: FinancialParams,
    /// Seed for generated matrices.
    pub seed: u64,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            history_capacity: HISTORY_CAPACITY,
            tick_period_ms: TICK_PERIOD_MS,
            recompute_every_ticks: RECOMPUTE_EVERY_TICKS,
            correlation_threshold: DEFAULT_CORRELATION_THRESHOLD,
            financial: FinancialParams::default(),
            seed: 0,
        }
    }
}

impl WorkbenchConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| WorkbenchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(WorkbenchError::Config("historyCapacity must be at least 1".into()));
        }
        if self.tick_period_ms == 0 || self.recompute_every_ticks == 0 {
            return Err(WorkbenchError::Config(
                "tickPeriodMs and recomputeEveryTicks must be positive".into(),
            ));
        }
        if self.tick_period_ms > MAX_TICK_PERIOD_MS {
            return Err(WorkbenchError::Config(format!(
                "tickPeriodMs must not exceed {MAX_TICK_PERIOD_MS}"
            )));
        }
        if !self.correlation_threshold.is_finite() || !self.financial.base_rate.is_finite() {
            return Err(WorkbenchError::Config("thresholds and rates must be finite".into()));
        }
        Ok(())
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Future Value Projection

use serde::{Deserialize, Serialize};

use crate::input::{DEFAULT_BASE_RATE, DEFAULT_PERIODS};
use crate::types::Projection;

/// Variance divisor for the risk premium added to the base rate.
///
/// Fixed policy knob: a dataset variance of 100 adds one percentage point.
pub const RISK_SCALING: f64 = 10_000.0;

/// Caller-supplied financial inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialParams {
    /// `None` projects from the dataset mean.
    pub present_value: Option<f64>,
    pub base_rate: f64,
    pub periods: u32,
}

impl Default for FinancialParams {
    fn default() -> Self {
        Self {
            present_value: None,
            base_rate: DEFAULT_BASE_RATE,
            periods: DEFAULT_PERIODS,
        }
    }
}

impl FinancialParams {
    /// Project using these params, filling the present value from `mean`.
    pub fn project(&self, mean: f64, variance: f64) -> Projection {
        compute_future_value(
            self.present_value.unwrap_or(mean),
            self.base_rate,
            self.periods,
            variance,
        )
    }
}

/// Compound `present_value` over `periods` at a variance-adjusted rate.
///
/// `compound_growth` is `None` when `present_value` is zero.
pub fn compute_future_value(
    present_value: f64,
    base_rate: f64,
    periods: u32,
    variance: f64,
) -> Projection {
    let adjusted_rate = base_rate + variance / RISK_SCALING;
    let future_value = present_value * (1.0 + adjusted_rate).powf(periods as f64);
    let compound_growth = if present_value == 0.0 {
        None
    } else {
        Some((future_value - present_value) / present_value * 100.0)
    };
    Projection {
        present_value,
        future_value,
        adjusted_rate,
        compound_growth,
        periods,
    }
}

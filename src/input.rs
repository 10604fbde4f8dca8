// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Input Coercion

//! Total coercion of raw external input.
//!
//! Live-typing UIs send half-finished text ("", "-", "1e") on every
//! keystroke. None of these may fail an operation, so every field maps
//! malformed input to a documented default instead.

/// Default for a malformed cell value.
pub const DEFAULT_CELL_VALUE: f64 = 0.0;
/// Default base interest rate.
pub const DEFAULT_BASE_RATE: f64 = 0.07;
/// Default number of compounding periods.
pub const DEFAULT_PERIODS: u32 = 10;
/// Default correlation threshold.
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.7;

/// Parse `raw` as a finite number, falling back to `default`.
pub fn parse_or_default(raw: &str, default: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Parse `raw` as an optional finite number: blank or malformed is `None`.
pub fn parse_optional(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse `raw` as a non-negative whole count, falling back to `default`.
///
/// Fractional input truncates toward zero (`"7.9"` is 7). Negative counts
/// are rejected rather than discounting, so `"-3"` yields `default`.
pub fn parse_count_or_default(raw: &str, default: u32) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 => v.trunc() as u32,
        _ => default,
    }
}

/// Replace NaN and infinities with `default`.
pub fn coerce_finite(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

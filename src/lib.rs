// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - live statistics, correlation and projection engine

pub mod types;
pub mod error;
pub mod input;
pub mod matrix;
pub mod history;
pub mod statistics;
pub mod correlation;
pub mod projection;
pub mod dataset;
pub mod clock;
pub mod ticker;
pub mod observer;
pub mod config;
pub mod session;

pub use types::*;
pub use error::{Result, WorkbenchError};
pub use config::WorkbenchConfig;
pub use observer::{EventQueue, SessionEvent, SessionObserver};
pub use session::{AnalysisSession, AnalysisState};

use wasm_bindgen::prelude::*;

use crate::input::{
    parse_count_or_default, parse_optional, parse_or_default, DEFAULT_BASE_RATE,
    DEFAULT_CORRELATION_THRESHOLD, DEFAULT_PERIODS,
};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// User-facing notice: the browser console on wasm, tracing natively.
fn notice(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    log(msg);
    #[cfg(not(target_arch = "wasm32"))]
    tracing::info!("{}", msg);
}

fn to_js_error(e: WorkbenchError) -> JsValue {
    notice(&e.to_string());
    JsValue::from_str(&e.to_string())
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser façade over [`AnalysisSession`].
///
/// Observer notifications are buffered; the page drains them with
/// `take_events()` after each call and re-renders.
#[wasm_bindgen]
pub struct Workbench {
    session: AnalysisSession,
    events: EventQueue,
}

impl Workbench {
    pub fn from_config(config: WorkbenchConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let events = EventQueue::new();
        let mut session = AnalysisSession::new(config);
        session.subscribe(events.clone());
        Self { session, events }
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }
}

#[wasm_bindgen]
impl Workbench {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> Self {
        let config = WorkbenchConfig {
            seed: seed.max(0.0) as u64,
            ..WorkbenchConfig::default()
        };
        Self::from_config(config)
    }

    /// Build from a JSON config document (missing fields take defaults).
    pub fn with_config(config_json: &str) -> std::result::Result<Workbench, JsValue> {
        WorkbenchConfig::from_json(config_json)
            .map(Self::from_config)
            .map_err(to_js_error)
    }

    pub fn generate(&mut self, rows: u32, cols: u32) -> std::result::Result<(), JsValue> {
        self.session
            .generate(rows as usize, cols as usize)
            .map_err(to_js_error)
    }

    pub fn load_sample(&mut self) -> std::result::Result<(), JsValue> {
        self.session.load_sample().map_err(to_js_error)
    }

    /// Apply a raw cell edit. Returns the previous value, or `null` if absent.
    pub fn edit_cell(
        &mut self,
        row: u32,
        col: u32,
        raw: &str,
    ) -> std::result::Result<Option<f64>, JsValue> {
        self.session
            .edit_cell(row as usize, col as usize, raw)
            .map_err(to_js_error)
    }

    pub fn set_interest_rate(&mut self, raw: &str) {
        self.session
            .set_base_rate(parse_or_default(raw, DEFAULT_BASE_RATE));
    }

    pub fn set_periods(&mut self, raw: &str) {
        self.session
            .set_periods(parse_count_or_default(raw, DEFAULT_PERIODS));
    }

    /// Blank input projects from the dataset mean.
    pub fn set_present_value(&mut self, raw: &str) {
        self.session.set_present_value(parse_optional(raw));
    }

    /// Returns `"met"` or `"below"`.
    pub fn set_correlation_threshold(&mut self, raw: &str) -> String {
        let threshold = parse_or_default(raw, DEFAULT_CORRELATION_THRESHOLD);
        threshold_label(self.session.set_correlation_threshold(threshold)).to_string()
    }

    pub fn check_threshold(&mut self) -> String {
        let threshold = self.session.correlation_threshold();
        threshold_label(self.session.check_threshold(threshold)).to_string()
    }

    pub fn start_analysis(&mut self) -> bool {
        self.session.start_analysis()
    }

    pub fn stop_analysis(&mut self) -> bool {
        self.session.stop_analysis()
    }

    /// Drive the analysis ticker; call from `setInterval`. Returns ticks fired.
    pub fn tick(&mut self) -> u32 {
        self.session.pump() as u32
    }

    pub fn is_analyzing(&self) -> bool {
        self.session.analysis_state() == AnalysisState::Analyzing
    }

    /// Elapsed analysis time as `HH:MM:SS`.
    pub fn elapsed(&self) -> String {
        self.session
            .elapsed()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "00:00:00".to_string())
    }

    pub fn status(&self) -> String {
        self.session.status().label().to_string()
    }

    pub fn change_count(&self) -> u32 {
        self.session.change_count() as u32
    }

    pub fn get_matrix(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.session.current_matrix().cells())
            .unwrap_or(JsValue::NULL)
    }

    pub fn get_snapshot(&self) -> JsValue {
        match self.session.current_snapshot() {
            Some(s) => serde_wasm_bindgen::to_value(&*s).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    pub fn get_history(&self) -> JsValue {
        let history: Vec<&ChangeEvent> = self.session.history().iter().collect();
        serde_wasm_bindgen::to_value(&history).unwrap_or(JsValue::NULL)
    }

    /// Newest-first slice of the change log.
    pub fn get_recent(&self, n: u32) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.recent(n as usize)).unwrap_or(JsValue::NULL)
    }

    pub fn get_summary(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.summary()).unwrap_or(JsValue::NULL)
    }

    /// Drain buffered observer notifications.
    pub fn take_events(&mut self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.events.drain()).unwrap_or(JsValue::NULL)
    }

    /// Pretty JSON export of matrix, stats and history.
    pub fn export_json(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string_pretty(&self.session.export_document())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn threshold_presets() -> Vec<f64> {
        correlation::CORRELATION_THRESHOLD_PRESETS.to_vec()
    }
}

fn threshold_label(state: ThresholdState) -> &'static str {
    match state {
        ThresholdState::Met => "met",
        ThresholdState::Below => "below",
    }
}

//! Browser-side checks for the wasm façade. Run with `wasm-pack test --headless`.
#![cfg(target_arch = "wasm32")]

use matrix_workbench::Workbench;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn generate_rejects_bad_dimensions() {
    let mut wb = Workbench::new(7.0);
    let err = wb.generate(1, 4).unwrap_err();
    assert!(err.as_string().unwrap().contains("2-10 rows"));
    assert_eq!(wb.change_count(), 0);
}

#[wasm_bindgen_test]
fn snapshot_and_events_cross_the_boundary() {
    let mut wb = Workbench::new(7.0);
    assert!(wb.get_snapshot().is_null());
    wb.load_sample().unwrap();
    assert!(wb.get_snapshot().is_object());
    assert!(!wb.get_summary().is_null());
    let events = wb.take_events();
    assert!(js_array_len(&events) >= 2);
    assert_eq!(js_array_len(&wb.take_events()), 0);
}

fn js_array_len(v: &JsValue) -> u32 {
    let items: Vec<serde_json::Value> = serde_wasm_bindgen::from_value(v.clone()).unwrap_or_default();
    items.len() as u32
}

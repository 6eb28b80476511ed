#![cfg(target_arch = "wasm32")]

use reserve_engine::ReserveSimulation;
use wasm_bindgen::{JsError, JsValue};
use wasm_bindgen_test::*;

fn field(value: &JsValue, key: &str) -> JsValue {
    js_sys::Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

fn ok(result: Result<JsValue, JsError>) -> JsValue {
    result.map_err(JsValue::from).unwrap()
}

#[wasm_bindgen_test]
fn tick_returns_result_object() {
    let mut sim = ReserveSimulation::new();
    let result = ok(sim.tick());
    assert_eq!(field(&result, "sequence_index").as_f64(), Some(2_880.0));
    assert_eq!(field(&result, "clock_label").as_string().as_deref(), Some("08:00"));
    assert_eq!(field(&result, "reserve_percent").as_f64(), Some(100.0));
}

#[wasm_bindgen_test]
fn toggle_reports_tagged_outcome() {
    let mut sim = ReserveSimulation::new();
    let on = ok(sim.toggle("coffee", true, 0.0));
    assert_eq!(field(&on, "outcome").as_string().as_deref(), Some("activated"));
    assert_eq!(field(&on, "expires_at_ms").as_f64(), Some(120_000.0));

    let again = ok(sim.toggle("coffee", true, 1_000.0));
    assert_eq!(field(&again, "outcome").as_string().as_deref(), Some("already_active"));

    assert!(sim.toggle("jogging", true, 1_000.0).is_err());
}

#[wasm_bindgen_test]
fn advance_clock_fires_auto_off() {
    let mut sim = ReserveSimulation::new();
    ok(sim.toggle("nicotine", true, 0.0));
    let fired = sim.advance_clock(30_000.0);
    let fired = js_sys::Array::from(&fired);
    assert_eq!(fired.length(), 1);
    assert_eq!(field(&fired.get(0), "activity").as_string().as_deref(), Some("nicotine"));
}

#[wasm_bindgen_test]
fn chart_view_has_two_axes_and_full_history() {
    let sim = ReserveSimulation::new();
    let chart = sim.get_chart();
    let points = js_sys::Array::from(&field(&chart, "points"));
    assert_eq!(points.length(), 2_880);
    let axis = field(&chart, "consumption_axis");
    assert_eq!(field(&axis, "max").as_f64(), Some(1.0));
    assert_eq!(js_sys::Array::from(&sim.get_catalog()).length(), 7);
}

#[wasm_bindgen_test]
fn disposed_simulation_rejects_ticks() {
    let mut sim = ReserveSimulation::new();
    sim.dispose();
    assert!(sim.tick().is_err());
    assert!(!sim.is_running());
}

#[wasm_bindgen_test]
fn unknown_toggle_leaves_clock_and_activations_alone() {
    let mut sim = ReserveSimulation::new();
    ok(sim.toggle("coffee", true, 0.0));
    assert!(sim.toggle("jogging", true, 200_000.0).is_err());
    assert_eq!(sim.clock(), 0);
    assert!(sim.active().contains("coffee"));
    assert_eq!(sim.pending_deactivations().len(), 1);
}

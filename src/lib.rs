// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator

pub mod config;
pub mod types;
pub mod catalog;
pub mod consumption;
pub mod reserve;
pub mod activity;
pub mod timers;
pub mod clock;
pub mod buffer;
pub mod simulation;
pub mod chart;
pub mod adapter;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod driver;

pub use types::*;
pub use config::SimParams;
pub use simulation::{ReserveSimulation, SimulationError};

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

pub(crate) fn console_log(s: &str) {
    #[cfg(target_arch = "wasm32")]
    log(s);
    #[cfg(not(target_arch = "wasm32"))]
    tracing::info!("{}", s);
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl ReserveSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let sim = ReserveSimulation::with_params(SimParams::default());
        console_log(&format!(
            "reserve simulation started: {} samples, reserve {}",
            sim.buffer.len(),
            sim.reserve
        ));
        sim
    }

    pub fn tick(&mut self) -> Result<JsValue, JsError> {
        let result = self.tick_core()?;
        Ok(serde_wasm_bindgen::to_value(&result)?)
    }

    /// Fire due auto-offs at `now_ms`, then apply the toggle. An unknown id
    /// is rejected before the clock moves.
    pub fn toggle(&mut self, activity_id: &str, turn_on: bool, now_ms: f64) -> Result<JsValue, JsError> {
        catalog::definition(activity_id)?;
        self.advance_clock_core(adapter::millis_from_js(now_ms));
        let outcome = self.toggle_core(activity_id, turn_on)?;
        Ok(serde_wasm_bindgen::to_value(&outcome)?)
    }

    pub fn advance_clock(&mut self, now_ms: f64) -> JsValue {
        let fired = self.advance_clock_core(adapter::millis_from_js(now_ms));
        serde_wasm_bindgen::to_value(&fired).unwrap_or(JsValue::NULL)
    }

    pub fn get_samples(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.buffer.to_vec()).unwrap_or(JsValue::NULL)
    }

    /// The newest `n` samples, oldest first.
    pub fn get_recent_samples(&self, n: u32) -> JsValue {
        serde_wasm_bindgen::to_value(&self.buffer.tail(n as usize)).unwrap_or(JsValue::NULL)
    }

    pub fn get_chart(&self) -> JsValue {
        let chart = chart::ChartModel::from_buffer(&self.buffer);
        serde_wasm_bindgen::to_value(&chart).unwrap_or(JsValue::NULL)
    }

    pub fn get_gauge(&self) -> JsValue {
        let gauge = chart::ReserveGauge::from_simulation(self);
        serde_wasm_bindgen::to_value(&gauge).unwrap_or(JsValue::NULL)
    }

    pub fn get_controls(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&chart::controls(self)).unwrap_or(JsValue::NULL)
    }

    pub fn get_catalog(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&catalog::all().to_vec()).unwrap_or(JsValue::NULL)
    }

    pub fn get_stats(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.stats).unwrap_or(JsValue::NULL)
    }

    pub fn reserve(&self) -> f64 {
        adapter::from_decimal(self.reserve.value())
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn tick_period_ms(&self) -> u32 {
        self.params.tick_period_ms
    }

    /// Run N clock-advancing ticks without returning results (fast batch mode)
    pub fn run_batch(&mut self, ticks: u32) {
        for _ in 0..ticks {
            if self.step().is_err() {
                break;
            }
        }
    }

    /// Stop the loop and drop every pending auto-off. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        self.timers.clear();
        console_log("reserve simulation disposed");
    }

    /// Reset simulation to initial state
    pub fn reset(&mut self) {
        *self = ReserveSimulation::with_params(self.params.clone());
    }
}

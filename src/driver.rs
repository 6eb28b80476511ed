// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Browser Driver

//! Owns the page-side timers: one `setInterval` for the simulation loop and
//! one `setTimeout` per activation for its auto-off. Everything runs on the
//! browser's single thread, so the simulation is shared through `Rc<RefCell>`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::canvas;
use crate::catalog;
use crate::chart::{self, ChartModel, ReserveGauge, UpdateView};
use crate::console_log;
use crate::simulation::ReserveSimulation;
use crate::types::ToggleOutcome;

#[derive(Clone)]
struct Surfaces {
    chart: HtmlCanvasElement,
    gauge: Option<HtmlCanvasElement>,
    on_update: Rc<RefCell<Option<js_sys::Function>>>,
}

impl Surfaces {
    /// Repaint from the current state, then hand the host an [`UpdateView`].
    /// The simulation borrow is released before the host callback runs.
    fn render(&self, sim: &RefCell<ReserveSimulation>) {
        let view = {
            let sim = sim.borrow();
            let model = ChartModel::from_buffer(sim.buffer());
            if let Err(e) = canvas::draw_chart(&self.chart, &model) {
                console_log(&format!("chart draw failed: {}", e));
            }
            UpdateView::from_simulation(&sim)
        };
        if let Some(gauge_canvas) = &self.gauge {
            if let Err(e) = canvas::draw_reserve_bar(gauge_canvas, &view.gauge) {
                console_log(&format!("gauge draw failed: {}", e));
            }
        }
        let callback = self.on_update.borrow().clone();
        if let Some(callback) = callback {
            let payload = serde_wasm_bindgen::to_value(&view).unwrap_or(JsValue::NULL);
            if let Err(e) = callback.call1(&JsValue::NULL, &payload) {
                console_log(&format!("update callback threw: {:?}", e));
            }
        }
    }
}

fn now_ms() -> u64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| crate::adapter::millis_from_js(p.now()))
        .unwrap_or(0)
}

fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, JsError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .ok_or_else(|| JsError::new(&format!("no element with id {}", id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsError::new(&format!("element {} is not a canvas", id)))
}

// ─── SimulationDriver ────────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct SimulationDriver {
    sim: Rc<RefCell<ReserveSimulation>>,
    surfaces: Surfaces,
    interval: Option<(i32, Closure<dyn FnMut()>)>,
}

#[wasm_bindgen]
impl SimulationDriver {
    /// Bind to the chart canvas and, optionally, a canvas for the reserve bar.
    #[wasm_bindgen(constructor)]
    pub fn new(chart_canvas_id: &str, gauge_canvas_id: Option<String>) -> Result<SimulationDriver, JsError> {
        let chart = canvas_by_id(chart_canvas_id)?;
        let gauge = match gauge_canvas_id {
            Some(id) => Some(canvas_by_id(&id)?),
            None => None,
        };
        let driver = Self {
            sim: Rc::new(RefCell::new(ReserveSimulation::new())),
            surfaces: Surfaces { chart, gauge, on_update: Rc::new(RefCell::new(None)) },
            interval: None,
        };
        driver.surfaces.render(&driver.sim);
        Ok(driver)
    }

    /// Called with `{ gauge, controls }` after every repaint.
    pub fn set_on_update(&self, callback: js_sys::Function) {
        *self.surfaces.on_update.borrow_mut() = Some(callback);
    }

    /// Start the periodic loop. Starting twice is a no-op.
    pub fn start(&mut self) -> Result<(), JsError> {
        if self.interval.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let period = self.sim.borrow().tick_period_ms() as i32;

        let sim = self.sim.clone();
        let surfaces = self.surfaces.clone();
        let cb = Closure::<dyn FnMut()>::new(move || {
            let ticked = {
                let mut sim = sim.borrow_mut();
                sim.advance_clock_core(now_ms());
                sim.tick_core().is_ok()
            };
            if ticked {
                surfaces.render(&sim);
            }
        });

        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), period)
            .map_err(|_| JsError::new("failed to start interval"))?;
        self.interval = Some((id, cb));
        console_log(&format!("simulation loop running every {} ms", period));
        Ok(())
    }

    /// Cancel the periodic loop; the simulation keeps its state.
    pub fn stop(&mut self) {
        if let Some((id, _cb)) = self.interval.take() {
            if let Some(w) = web_sys::window() {
                w.clear_interval_with_handle(id);
            }
            console_log("simulation loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Toggle an activity and, on a new activation, arm its auto-off timeout.
    /// Takes `&self` so the update callback may call back into the driver.
    pub fn toggle(&self, activity_id: &str, turn_on: bool) -> Result<JsValue, JsError> {
        catalog::definition(activity_id)?;
        let outcome = {
            let mut sim = self.sim.borrow_mut();
            sim.advance_clock_core(now_ms());
            sim.toggle_core(activity_id, turn_on)?
        };

        if let ToggleOutcome::Activated { expires_at_ms, .. } = outcome {
            let delay = expires_at_ms.saturating_sub(self.sim.borrow().clock()) as i32;
            let sim = self.sim.clone();
            let surfaces = self.surfaces.clone();
            let cb = Closure::once_into_js(move || {
                let fired = sim.borrow_mut().advance_clock_core(now_ms());
                if !fired.is_empty() {
                    surfaces.render(&sim);
                }
            });
            if let Some(w) = web_sys::window() {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay)
                    .map_err(|_| JsError::new("failed to arm auto-off"))?;
            }
        }

        if outcome.changed() {
            self.surfaces.render(&self.sim);
        }
        Ok(serde_wasm_bindgen::to_value(&outcome)?)
    }

    pub fn get_controls(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&chart::controls(&self.sim.borrow())).unwrap_or(JsValue::NULL)
    }

    pub fn get_gauge(&self) -> JsValue {
        let gauge = ReserveGauge::from_simulation(&self.sim.borrow());
        serde_wasm_bindgen::to_value(&gauge).unwrap_or(JsValue::NULL)
    }

    /// Tear down: cancel the loop and dispose the simulation. Auto-off
    /// timeouts still armed in the browser become no-ops.
    pub fn dispose(&mut self) {
        self.stop();
        self.sim.borrow_mut().dispose();
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

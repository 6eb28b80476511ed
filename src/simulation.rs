// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Simulation Core

use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;

use crate::activity::ActiveActivitySet;
use crate::adapter::from_decimal;
use crate::buffer::{Reading, RollingBuffer};
use crate::catalog::{self, CatalogError};
use crate::config::SimParams;
use crate::consumption;
use crate::reserve::ReserveLevel;
use crate::timers::DeactivationQueue;
use crate::types::*;

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("simulation has been disposed")]
    Disposed,
}

// ─── ReserveSimulation struct ────────────────────────────────────────────────

/// The whole simulation state for one page session.
///
/// Created with [`with_params`](Self::with_params) (or the wasm constructor)
/// and torn down with `dispose`. After disposal every mutating call fails
/// with [`SimulationError::Disposed`] and pending auto-offs are gone.
#[wasm_bindgen]
pub struct ReserveSimulation {
    pub(crate) params: SimParams,
    pub(crate) reserve: ReserveLevel,
    pub(crate) active: ActiveActivitySet,
    pub(crate) timers: DeactivationQueue,
    pub(crate) buffer: RollingBuffer,
    pub(crate) clock_ms: u64,
    pub(crate) state: LoopState,
    pub(crate) stats: SimStats,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl ReserveSimulation {
    pub fn with_params(params: SimParams) -> Self {
        let reserve = ReserveLevel::new(params.initial_reserve);
        let baseline = Reading {
            consumption: from_decimal(params.baseline_consumption),
            reserve_percent: from_decimal(reserve.value()),
            active_activities: Vec::new(),
        };
        let buffer =
            RollingBuffer::seeded(params.buffer_capacity, params.clock_origin_minute, &baseline);
        info!(
            reserve = %reserve,
            capacity = buffer.capacity(),
            "reserve simulation created"
        );
        Self {
            params,
            reserve,
            active: ActiveActivitySet::new(),
            timers: DeactivationQueue::new(),
            buffer,
            clock_ms: 0,
            state: LoopState::Running,
            stats: SimStats::default(),
        }
    }

    /// One simulation step: consume, refill, clamp, record.
    pub fn tick_core(&mut self) -> Result<TickResult, SimulationError> {
        self.ensure_running()?;

        let consumption = consumption::instantaneous_consumption(
            self.active.definitions(),
            self.params.baseline_consumption,
        );
        let delta = consumption::tick_delta(self.params.refill_rate_per_minute, consumption);
        self.reserve = self.reserve.apply(delta);

        let exhausted = self.is_exhausted();
        self.stats.ticks += 1;
        if exhausted {
            self.stats.ticks_exhausted += 1;
        }

        let active_activities = self.active.ids();
        self.buffer.append(Reading {
            consumption: from_decimal(consumption),
            reserve_percent: from_decimal(self.reserve.value()),
            active_activities: active_activities.clone(),
        });
        let (sequence_index, clock_label) = match self.buffer.latest() {
            Some(s) => (s.sequence_index, s.clock_label.clone()),
            None => (0, String::new()),
        };

        debug!(
            sequence_index,
            consumption = %consumption,
            delta = %delta,
            reserve = %self.reserve,
            active = active_activities.len(),
            "tick"
        );

        Ok(TickResult {
            sequence_index,
            clock_label,
            consumption: from_decimal(consumption),
            delta: from_decimal(delta),
            reserve_percent: from_decimal(self.reserve.value()),
            exhausted,
            active_activities,
            buffer_len: self.buffer.len(),
        })
    }

    /// Switch an activity on or off at the current simulation clock.
    ///
    /// Switching on is refused while the reserve is below the activation
    /// threshold. Switching off cancels the pending auto-off.
    pub fn toggle_core(
        &mut self,
        activity_id: &str,
        turn_on: bool,
    ) -> Result<ToggleOutcome, SimulationError> {
        self.ensure_running()?;
        let def = catalog::definition(activity_id)?;

        if !turn_on {
            return Ok(match self.active.deactivate(def.id) {
                Some(_) => {
                    self.timers.cancel(def.id);
                    self.stats.manual_deactivations += 1;
                    info!(activity = def.id, "activity switched off");
                    ToggleOutcome::Deactivated
                }
                None => ToggleOutcome::AlreadyInactive,
            });
        }

        if self.active.contains(def.id) {
            return Ok(ToggleOutcome::AlreadyActive);
        }
        if self.is_exhausted() {
            self.stats.refusals += 1;
            warn!(activity = def.id, reserve = %self.reserve, "activation refused: reserve exhausted");
            return Ok(ToggleOutcome::Refused);
        }

        match self.active.activate(def, self.clock_ms) {
            Some(activation) => {
                self.timers
                    .schedule(def.id, activation.generation, activation.expires_at_ms);
                self.stats.activations += 1;
                info!(
                    activity = def.id,
                    generation = activation.generation,
                    expires_at_ms = activation.expires_at_ms,
                    "activity switched on"
                );
                Ok(ToggleOutcome::Activated {
                    generation: activation.generation,
                    expires_at_ms: activation.expires_at_ms,
                })
            }
            None => Ok(ToggleOutcome::AlreadyActive),
        }
    }

    /// Move the clock forward and fire every auto-off that is due.
    ///
    /// The clock never moves backwards. An auto-off only removes the
    /// activation generation that scheduled it.
    pub fn advance_clock_core(&mut self, now_ms: u64) -> Vec<Expiry> {
        if self.state == LoopState::Stopped {
            return Vec::new();
        }
        self.clock_ms = self.clock_ms.max(now_ms);

        let mut fired = Vec::new();
        for pending in self.timers.drain_due(self.clock_ms) {
            if self.active.expire(pending.activity, pending.generation) {
                self.stats.expiries += 1;
                info!(activity = pending.activity, generation = pending.generation, "activity expired");
                fired.push(Expiry {
                    activity: pending.activity,
                    generation: pending.generation,
                    due_ms: pending.due_ms,
                });
            } else {
                self.stats.stale_expiries += 1;
                debug!(activity = pending.activity, generation = pending.generation, "stale auto-off ignored");
            }
        }
        fired
    }

    /// Advance the clock by one tick period, fire due auto-offs, then tick.
    pub fn step(&mut self) -> Result<(TickResult, Vec<Expiry>), SimulationError> {
        self.ensure_running()?;
        let next = self.clock_ms + self.params.tick_period_ms as u64;
        let expired = self.advance_clock_core(next);
        let result = self.tick_core()?;
        Ok((result, expired))
    }

    pub(crate) fn ensure_running(&self) -> Result<(), SimulationError> {
        match self.state {
            LoopState::Running => Ok(()),
            LoopState::Stopped => Err(SimulationError::Disposed),
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.reserve.is_exhausted(self.params.min_reserve_for_activation)
    }

    pub fn reserve_level(&self) -> ReserveLevel {
        self.reserve
    }

    pub fn buffer(&self) -> &RollingBuffer {
        &self.buffer
    }

    pub fn active(&self) -> &ActiveActivitySet {
        &self.active
    }

    pub fn pending_deactivations(&self) -> &DeactivationQueue {
        &self.timers
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn loop_state(&self) -> LoopState {
        self.state
    }

    pub fn clock(&self) -> u64 {
        self.clock_ms
    }
}

impl Default for ReserveSimulation {
    fn default() -> Self {
        Self::with_params(SimParams::default())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sim_at(reserve: rust_decimal::Decimal) -> ReserveSimulation {
        ReserveSimulation::with_params(SimParams::with_initial_reserve(reserve))
    }

    #[test]
    fn test_idle_tick_refills() {
        let mut sim = sim_at(dec!(50));
        let result = sim.tick_core().unwrap();
        assert_eq!(sim.reserve_level().value(), dec!(50.05));
        assert!((result.consumption - 0.05).abs() < 1e-12);
        assert!((result.delta - 0.05).abs() < 1e-12);
        assert!(result.active_activities.is_empty());
    }

    #[test]
    fn test_first_live_sample_follows_seed() {
        let mut sim = ReserveSimulation::default();
        assert_eq!(sim.buffer().len(), 2_880);
        let result = sim.tick_core().unwrap();
        assert_eq!(result.sequence_index, 2_880);
        assert_eq!(result.buffer_len, 2_880);
        assert_eq!(sim.buffer().oldest().unwrap().sequence_index, 1);
    }

    #[test]
    fn test_refusal_at_low_reserve() {
        let mut sim = sim_at(dec!(0.5));
        let outcome = sim.toggle_core("coffee", true).unwrap();
        assert_eq!(outcome, ToggleOutcome::Refused);
        assert!(sim.active().is_empty());
        assert!(sim.pending_deactivations().is_empty());
        assert_eq!(sim.stats().refusals, 1);
    }

    #[test]
    fn test_toggle_off_allowed_when_exhausted() {
        let mut sim = sim_at(dec!(2));
        sim.toggle_core("amphetamine", true).unwrap();
        for _ in 0..10 {
            sim.tick_core().unwrap();
        }
        assert!(sim.is_exhausted());
        assert_eq!(sim.toggle_core("amphetamine", false).unwrap(), ToggleOutcome::Deactivated);
    }

    #[test]
    fn test_unknown_activity_is_error() {
        let mut sim = ReserveSimulation::default();
        let err = sim.toggle_core("meditation", true).unwrap_err();
        assert_eq!(
            err,
            SimulationError::Catalog(CatalogError::UnknownActivity("meditation".into()))
        );
    }

    #[test]
    fn test_auto_off_fires_after_duration() {
        let mut sim = ReserveSimulation::default();
        sim.toggle_core("nicotine", true).unwrap();
        assert!(sim.advance_clock_core(29_999).is_empty());
        let fired = sim.advance_clock_core(30_000);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].activity, "nicotine");
        assert!(sim.active().is_empty());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut sim = ReserveSimulation::default();
        sim.advance_clock_core(5_000);
        sim.advance_clock_core(1_000);
        assert_eq!(sim.clock(), 5_000);
    }

    #[test]
    fn test_step_advances_one_period() {
        let mut sim = ReserveSimulation::default();
        sim.toggle_core("nicotine", true).unwrap();
        for _ in 0..29 {
            let (_, expired) = sim.step().unwrap();
            assert!(expired.is_empty());
        }
        let (result, expired) = sim.step().unwrap();
        assert_eq!(expired.len(), 1);
        assert!(result.active_activities.is_empty());
        assert_eq!(sim.clock(), 30_000);
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Presentation Model

//! Pure projections of simulation state into what the page draws: the
//! dual-axis chart, the reserve gauge and one toggle control per activity.
//!
//! Nothing here holds state. Every function reads the buffer or the
//! simulation and returns a fresh, serializable view.

use serde::Serialize;

use crate::adapter::from_decimal;
use crate::buffer::RollingBuffer;
use crate::catalog;
use crate::clock;
use crate::simulation::ReserveSimulation;

pub const RESERVE_AXIS: Axis = Axis { label: "Reserve (%)", min: 0.0, max: 100.0 };
pub const CONSUMPTION_AXIS: Axis = Axis { label: "Turnover", min: 0.0, max: 1.0 };

/// Gauge tone switches to `Low` below this percentage.
const LOW_RESERVE_PCT: f64 = 20.0;

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axis {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

impl Axis {
    /// Fraction of the axis span covered by `value`, clamped to [0, 1].
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: u64,
    pub label: String,
    pub reserve_percent: f64,
    pub consumption: f64,
}

/// Vertical reference line at simulated local midnight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidnightMarker {
    pub x: u64,
    pub day: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    pub reserve_axis: Axis,
    pub consumption_axis: Axis,
    pub points: Vec<ChartPoint>,
    pub midnights: Vec<MidnightMarker>,
}

impl ChartModel {
    pub fn from_buffer(buffer: &RollingBuffer) -> Self {
        let origin = buffer.clock_origin_minute();
        let points = buffer
            .iter()
            .map(|s| ChartPoint {
                x: s.sequence_index,
                label: s.clock_label.clone(),
                reserve_percent: s.reserve_percent,
                consumption: s.consumption,
            })
            .collect();
        let midnights = buffer
            .iter()
            .filter(|s| clock::is_midnight(s.sequence_index, origin))
            .map(|s| {
                let day = clock::day_of(s.sequence_index, origin);
                MidnightMarker { x: s.sequence_index, day, label: format!("Day {}", day) }
            })
            .collect();
        Self {
            reserve_axis: RESERVE_AXIS,
            consumption_axis: CONSUMPTION_AXIS,
            points,
            midnights,
        }
    }

    /// Inclusive x range covered by the points.
    pub fn x_range(&self) -> Option<(u64, u64)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.x, last.x)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Gauge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeTone {
    Healthy,
    Low,
    Exhausted,
}

/// Progress-bar view of the current reserve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReserveGauge {
    pub percent: f64,
    pub text: String,
    pub exhausted: bool,
    pub tone: GaugeTone,
}

impl ReserveGauge {
    pub fn from_simulation(sim: &ReserveSimulation) -> Self {
        let level = sim.reserve_level();
        let exhausted = level.is_exhausted(sim.params().min_reserve_for_activation);
        let percent = from_decimal(level.value());
        let tone = if exhausted {
            GaugeTone::Exhausted
        } else if percent < LOW_RESERVE_PCT {
            GaugeTone::Low
        } else {
            GaugeTone::Healthy
        };
        Self { percent, text: level.to_string(), exhausted, tone }
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlView {
    pub id: &'static str,
    pub label: &'static str,
    pub active: bool,
    /// Off controls are disabled while the reserve is exhausted; on controls
    /// can always be switched off.
    pub enabled: bool,
    pub remaining_secs: u32,
    pub default_duration_secs: u32,
    pub consumption_factor: f64,
}

pub fn controls(sim: &ReserveSimulation) -> Vec<ControlView> {
    let exhausted = sim.reserve_level().is_exhausted(sim.params().min_reserve_for_activation);
    let now = sim.clock();
    catalog::all()
        .iter()
        .map(|def| {
            let activation = sim.active().get(def.id);
            let active = activation.is_some();
            let remaining_ms = activation.map(|a| a.remaining_ms(now)).unwrap_or(0);
            ControlView {
                id: def.id,
                label: def.label,
                active,
                enabled: active || !exhausted,
                remaining_secs: remaining_ms.div_ceil(1_000) as u32,
                default_duration_secs: def.default_duration_secs,
                consumption_factor: from_decimal(def.consumption_factor),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Update payload
// ---------------------------------------------------------------------------

/// Everything the page needs to refresh after a repaint, so the host never
/// has to call back into the driver from its update handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateView {
    pub gauge: ReserveGauge,
    pub controls: Vec<ControlView>,
}

impl UpdateView {
    pub fn from_simulation(sim: &ReserveSimulation) -> Self {
        Self { gauge: ReserveGauge::from_simulation(sim), controls: controls(sim) }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

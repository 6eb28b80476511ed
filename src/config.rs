// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Configuration Constants

//! Fixed simulation constants and the [`SimParams`] bundle that carries them.
//!
//! The browser widget always runs with [`SimParams::default`]. Tests and the
//! native session runner may build variants (for example a different starting
//! reserve) without touching the constants themselves.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Wall-clock period between two simulation ticks. One tick is one simulated minute.
pub const TICK_PERIOD_MS: u32 = 1_000;

/// Two days of one-per-simulated-minute samples.
pub const BUFFER_CAPACITY: usize = 2_880;

pub const MINUTES_PER_DAY: u64 = 1_440;

/// Consumption with no activity running.
pub const BASELINE_CONSUMPTION: Decimal = dec!(0.05);

/// Reserve regained per simulated minute.
pub const REFILL_RATE_PER_MINUTE: Decimal = dec!(0.1);

pub const INITIAL_RESERVE: Decimal = dec!(100);

/// Below this reserve no new activity may be switched on.
pub const MIN_RESERVE_FOR_ACTIVATION: Decimal = dec!(1);

/// Minute of day assigned to sequence index 0 (08:00).
pub const CLOCK_ORIGIN_MINUTE: u64 = 480;

pub const RESERVE_MIN: Decimal = dec!(0);
pub const RESERVE_MAX: Decimal = dec!(100);

/// Upper bounds accepted from a parameter file.
pub const MAX_TICK_PERIOD_MS: u32 = 60_000;
pub const MAX_BUFFER_CAPACITY: usize = 100_000;
pub const MAX_RATE: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid params json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },
}

fn check_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), ConfigError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// SimParams
// ---------------------------------------------------------------------------

/// Tunables consumed by [`ReserveSimulation`](crate::ReserveSimulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    pub tick_period_ms: u32,
    pub buffer_capacity: usize,
    pub baseline_consumption: Decimal,
    pub refill_rate_per_minute: Decimal,
    pub initial_reserve: Decimal,
    pub min_reserve_for_activation: Decimal,
    pub clock_origin_minute: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            tick_period_ms: TICK_PERIOD_MS,
            buffer_capacity: BUFFER_CAPACITY,
            baseline_consumption: BASELINE_CONSUMPTION,
            refill_rate_per_minute: REFILL_RATE_PER_MINUTE,
            initial_reserve: INITIAL_RESERVE,
            min_reserve_for_activation: MIN_RESERVE_FOR_ACTIVATION,
            clock_origin_minute: CLOCK_ORIGIN_MINUTE,
        }
    }
}

impl SimParams {
    /// Default parameters with a different starting reserve.
    pub fn with_initial_reserve(initial_reserve: Decimal) -> Self {
        Self {
            initial_reserve,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON override. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed JSON, `OutOfRange` when a value fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reject values the simulation cannot run with. The starting reserve is
    /// exempt: it is clamped into range on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("tick_period_ms", self.tick_period_ms, 1, MAX_TICK_PERIOD_MS)?;
        check_range("buffer_capacity", self.buffer_capacity, 1, MAX_BUFFER_CAPACITY)?;
        check_range("baseline_consumption", self.baseline_consumption, Decimal::ZERO, MAX_RATE)?;
        check_range("refill_rate_per_minute", self.refill_rate_per_minute, Decimal::ZERO, MAX_RATE)?;
        check_range(
            "min_reserve_for_activation",
            self.min_reserve_for_activation,
            RESERVE_MIN,
            RESERVE_MAX,
        )?;
        check_range("clock_origin_minute", self.clock_origin_minute, 0, MINUTES_PER_DAY - 1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

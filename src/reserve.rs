// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Reserve Level

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

use crate::config::{RESERVE_MAX, RESERVE_MIN};

/// Available reserve as a percentage. Always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ReserveLevel(Decimal);

impl ReserveLevel {
    /// Out-of-range inputs are clamped, never rejected.
    pub fn new(value: Decimal) -> Self {
        Self(value.clamp(RESERVE_MIN, RESERVE_MAX))
    }

    pub fn full() -> Self {
        Self(RESERVE_MAX)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Apply one tick's delta and clamp.
    pub fn apply(self, delta: Decimal) -> Self {
        Self::new(self.0.saturating_add(delta))
    }

    /// True when the reserve is too low to start anything new.
    pub fn is_exhausted(&self, threshold: Decimal) -> bool {
        self.0 < threshold
    }
}

impl Default for ReserveLevel {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for ReserveLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{:.1}%", rounded)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

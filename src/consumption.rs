// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Consumption Model

use rust_decimal::Decimal;

use crate::catalog::ActivityDefinition;

/// Instantaneous consumption for a set of active activities.
///
/// `baseline + Σ baseline × factor` over the active definitions. Pure and
/// order-independent. Effects do not decay with time spent active; an
/// activity contributes its full factor from the first tick to the last.
/// Saturates at `Decimal::MAX` instead of overflowing.
pub fn instantaneous_consumption<'a, I>(active: I, baseline: Decimal) -> Decimal
where
    I: IntoIterator<Item = &'a ActivityDefinition>,
{
    active
        .into_iter()
        .fold(baseline, |total, def| {
            total.saturating_add(baseline.saturating_mul(def.consumption_factor))
        })
}

/// Net reserve change for one tick.
pub fn tick_delta(refill_rate: Decimal, consumption: Decimal) -> Decimal {
    refill_rate.saturating_sub(consumption)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

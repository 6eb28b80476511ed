// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Activity Catalog

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown activity: {0}")]
    UnknownActivity(String),
}

// ---------------------------------------------------------------------------
// ActivityDefinition
// ---------------------------------------------------------------------------

/// One entry of the closed activity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub default_duration_secs: u32,
    /// Multiplier applied to the baseline consumption while active.
    #[serde(with = "rust_decimal::serde::float")]
    pub consumption_factor: Decimal,
}

impl ActivityDefinition {
    pub fn duration_ms(&self) -> u64 {
        self.default_duration_secs as u64 * 1_000
    }
}

const fn activity(
    id: &'static str,
    label: &'static str,
    default_duration_secs: u32,
    consumption_factor: Decimal,
) -> ActivityDefinition {
    ActivityDefinition { id, label, default_duration_secs, consumption_factor }
}

/// Display order is table order.
static CATALOG: [ActivityDefinition; 7] = [
    activity("coffee", "Coffee", 120, dec!(1.5)),
    activity("social_media", "Social media", 60, dec!(2.0)),
    activity("sugar", "Sugar", 45, dec!(2.5)),
    activity("video_games", "Video games", 180, dec!(3.0)),
    activity("nicotine", "Nicotine", 30, dec!(4.0)),
    activity("alcohol", "Alcohol", 240, dec!(5.0)),
    activity("amphetamine", "Amphetamine", 600, dec!(10.0)),
];

/// Look up an activity by id.
///
/// # Errors
///
/// `UnknownActivity` when the id is not in the table. Callers only ever pass
/// catalog ids, so this indicates a programming error.
pub fn definition(activity_id: &str) -> Result<&'static ActivityDefinition, CatalogError> {
    CATALOG
        .iter()
        .find(|def| def.id == activity_id)
        .ok_or_else(|| CatalogError::UnknownActivity(activity_id.to_string()))
}

pub fn all() -> &'static [ActivityDefinition] {
    &CATALOG
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

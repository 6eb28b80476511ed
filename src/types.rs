// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Type Definitions

use serde::Serialize;

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum LoopState {
    Running = 0,
    Stopped = 1,
}

// ─── ToggleOutcome ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// A new activation started; its auto-off is due at `expires_at_ms`.
    Activated { generation: u64, expires_at_ms: u64 },
    AlreadyActive,
    Deactivated,
    AlreadyInactive,
    /// Reserve below the activation threshold; nothing changed.
    Refused,
}

impl ToggleOutcome {
    /// True when the active set was modified.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Activated { .. } | Self::Deactivated)
    }
}

// ─── Expiry ──────────────────────────────────────────────────────────────────

/// An auto-off that fired and removed its activation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Expiry {
    pub activity: &'static str,
    pub generation: u64,
    pub due_ms: u64,
}

// ─── TickResult ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    pub sequence_index: u64,
    pub clock_label: String,
    pub consumption: f64,
    pub delta: f64,
    pub reserve_percent: f64,
    pub exhausted: bool,
    pub active_activities: Vec<&'static str>,
    pub buffer_len: usize,
}

// ─── SimStats ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct SimStats {
    pub ticks: u64,
    pub activations: u32,
    pub manual_deactivations: u32,
    pub expiries: u32,
    pub stale_expiries: u32,
    pub refusals: u32,
    pub ticks_exhausted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_changed() {
        assert!(ToggleOutcome::Activated { generation: 1, expires_at_ms: 5 }.changed());
        assert!(ToggleOutcome::Deactivated.changed());
        assert!(!ToggleOutcome::AlreadyActive.changed());
        assert!(!ToggleOutcome::AlreadyInactive.changed());
        assert!(!ToggleOutcome::Refused.changed());
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_string(&ToggleOutcome::Refused).unwrap();
        assert_eq!(json, r#"{"outcome":"refused"}"#);
        let json = serde_json::to_string(&ToggleOutcome::Activated { generation: 3, expires_at_ms: 9 }).unwrap();
        assert_eq!(json, r#"{"outcome":"activated","generation":3,"expires_at_ms":9}"#);
    }
}

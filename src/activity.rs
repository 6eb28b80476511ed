// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Active Activity Set

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::ActivityDefinition;

/// One activation instance of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub generation: u64,
    pub expires_at_ms: u64,
    #[serde(skip)]
    pub definition: &'static ActivityDefinition,
}

impl Activation {
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }
}

/// The activities currently switched on.
///
/// Every activation gets a fresh generation from a counter that is never
/// reused, so a deferred auto-off can tell whether the activation it was
/// scheduled for is still the one in the set.
#[derive(Debug, Default)]
pub struct ActiveActivitySet {
    active: BTreeMap<&'static str, Activation>,
    next_generation: u64,
}

impl ActiveActivitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch `def` on at `now_ms`. Returns `None` if it was already on; the
    /// existing activation is left untouched.
    pub fn activate(&mut self, def: &'static ActivityDefinition, now_ms: u64) -> Option<Activation> {
        if self.active.contains_key(def.id) {
            return None;
        }
        self.next_generation += 1;
        let activation = Activation {
            generation: self.next_generation,
            expires_at_ms: now_ms + def.duration_ms(),
            definition: def,
        };
        self.active.insert(def.id, activation);
        Some(activation)
    }

    /// Switch `activity_id` off. Returns the removed activation, if any.
    pub fn deactivate(&mut self, activity_id: &str) -> Option<Activation> {
        self.active.remove(activity_id)
    }

    /// Remove `activity_id` only if its live activation carries `generation`.
    pub fn expire(&mut self, activity_id: &str, generation: u64) -> bool {
        match self.active.get(activity_id) {
            Some(a) if a.generation == generation => {
                self.active.remove(activity_id);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, activity_id: &str) -> Option<&Activation> {
        self.active.get(activity_id)
    }

    pub fn contains(&self, activity_id: &str) -> bool {
        self.active.contains_key(activity_id)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &'static ActivityDefinition> + '_ {
        self.active.values().map(|a| a.definition)
    }

    /// Snapshot of the active ids, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        self.active.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

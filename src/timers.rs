// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Deferred Deactivations

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A scheduled auto-off for one activation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PendingDeactivation {
    pub due_ms: u64,
    pub generation: u64,
    pub activity: &'static str,
}

/// One-shot deactivation timers keyed on the simulation clock.
///
/// Entries fire in `(due_ms, generation)` order. The queue never decides
/// whether an entry is still current; the owner compares the generation
/// against the live activation before acting.
#[derive(Debug, Default)]
pub struct DeactivationQueue {
    pending: BinaryHeap<Reverse<PendingDeactivation>>,
}

impl DeactivationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, activity: &'static str, generation: u64, due_ms: u64) {
        self.pending.push(Reverse(PendingDeactivation { due_ms, generation, activity }));
    }

    /// Drop every pending entry for `activity`. Returns how many were removed.
    pub fn cancel(&mut self, activity: &str) -> usize {
        let before = self.pending.len();
        self.pending.retain(|Reverse(p)| p.activity != activity);
        before - self.pending.len()
    }

    /// Pop every entry due at or before `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<PendingDeactivation> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.pending.peek() {
            if next.due_ms > now_ms {
                break;
            }
            if let Some(Reverse(entry)) = self.pending.pop() {
                due.push(entry);
            }
        }
        due
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

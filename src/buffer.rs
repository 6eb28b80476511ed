// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Rolling Sample Buffer

use serde::Serialize;
use std::collections::VecDeque;

use crate::clock;

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

/// One chart point. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub sequence_index: u64,
    pub clock_label: String,
    pub consumption: f64,
    pub reserve_percent: f64,
    pub active_activities: Vec<&'static str>,
}

/// Values measured by a tick, before the buffer assigns an index.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub consumption: f64,
    pub reserve_percent: f64,
    pub active_activities: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// RollingBuffer
// ---------------------------------------------------------------------------

/// Fixed-capacity FIFO of samples.
///
/// The buffer owns the sequence counter: indices are assigned on append,
/// strictly increase, and survive eviction.
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
    next_index: u64,
    clock_origin_minute: u64,
}

impl RollingBuffer {
    pub fn new(capacity: usize, clock_origin_minute: u64) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_index: 0,
            clock_origin_minute,
        }
    }

    /// A full buffer of identical baseline readings.
    pub fn seeded(capacity: usize, clock_origin_minute: u64, baseline: &Reading) -> Self {
        let mut buffer = Self::new(capacity, clock_origin_minute);
        for _ in 0..buffer.capacity {
            buffer.append(baseline.clone());
        }
        buffer
    }

    /// Append a reading as the newest sample. Returns the evicted sample when
    /// the buffer was already full.
    pub fn append(&mut self, reading: Reading) -> Option<Sample> {
        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        let index = self.next_index;
        self.next_index += 1;
        self.samples.push_back(Sample {
            sequence_index: index,
            clock_label: clock::clock_label(index, self.clock_origin_minute),
            consumption: reading.consumption,
            reserve_percent: reading.reserve_percent,
            active_activities: reading.active_activities,
        });
        evicted
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator + '_ {
        self.samples.iter()
    }

    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// The newest `n` samples, oldest first.
    pub fn tail(&self, n: usize) -> Vec<Sample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).cloned().collect()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clock_origin_minute(&self) -> u64 {
        self.clock_origin_minute
    }

    /// Index the next append will receive.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dopamine Reserve Simulator - Simulated Day Clock

use crate::config::MINUTES_PER_DAY;

/// Minute of the simulated day for a sample, given the minute assigned to index 0.
pub fn minute_of_day(sequence_index: u64, origin_minute: u64) -> u64 {
    (sequence_index + origin_minute % MINUTES_PER_DAY) % MINUTES_PER_DAY
}

/// Simulated day number (0-based) for a sample.
pub fn day_of(sequence_index: u64, origin_minute: u64) -> u64 {
    (sequence_index + origin_minute % MINUTES_PER_DAY) / MINUTES_PER_DAY
}

/// `HH:MM` label for a sample.
pub fn clock_label(sequence_index: u64, origin_minute: u64) -> String {
    let minute = minute_of_day(sequence_index, origin_minute);
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

pub fn is_midnight(sequence_index: u64, origin_minute: u64) -> bool {
    minute_of_day(sequence_index, origin_minute) == 0
}

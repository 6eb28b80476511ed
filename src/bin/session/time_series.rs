// Per-Tick JSONL Time Series Recorder
// Outputs one JSON line per tick for independent analysis

use reserve_engine::{Expiry, TickResult};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub sequence_index: u64,
    pub clock_label: String,
    pub reserve_percent: f64,
    pub consumption: f64,
    pub delta: f64,
    pub exhausted: bool,
    pub active: Vec<&'static str>,
    pub expired: Vec<&'static str>,
}

impl TickSnapshot {
    pub fn from_result(result: &TickResult, expired: &[Expiry]) -> Self {
        Self {
            sequence_index: result.sequence_index,
            clock_label: result.clock_label.clone(),
            reserve_percent: result.reserve_percent,
            consumption: result.consumption,
            delta: result.delta,
            exhausted: result.exhausted,
            active: result.active_activities.clone(),
            expired: expired.iter().map(|e| e.activity).collect(),
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, result: &TickResult, expired: &[Expiry]) {
        self.snapshots.push(TickSnapshot::from_result(result, expired));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        file.flush()
    }
}

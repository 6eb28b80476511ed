// Session Report Types
// Structured output for offline analysis of replayed sessions

use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct InvariantViolations {
    pub reserve_out_of_bounds: u32,
    pub buffer_over_capacity: u32,
    pub non_increasing_index: u32,
    pub consumption_mismatch: u32,
    pub stale_expiries: u32,
}

impl InvariantViolations {
    pub fn total(&self) -> u32 {
        self.reserve_out_of_bounds
            + self.buffer_over_capacity
            + self.non_increasing_index
            + self.consumption_mismatch
            + self.stale_expiries
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub profile: String,
    pub seed: u64,
    pub pass: bool,
    pub ticks: u64,
    pub min_reserve: f64,
    pub mean_reserve: f64,
    pub final_reserve: f64,
    pub peak_consumption: f64,
    pub ticks_exhausted: u64,
    pub attempts: u32,
    pub early_offs: u32,
    pub activations: u32,
    pub refusals: u32,
    pub expiries: u32,
    pub manual_deactivations: u32,
    pub violations: InvariantViolations,
    pub elapsed_ms: u128,
}

// ─── Monte Carlo Report (per-profile aggregation) ───────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub profile_name: String,
    pub label: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub min_reserve: Stats,
    pub mean_reserve: Stats,
    pub final_reserve: Stats,
    pub ticks_exhausted: Stats,
    pub activations: Stats,
    pub refusals: Stats,
    pub elapsed_ms: Stats,
    pub individual_runs: Vec<RunResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_profile: usize,
    pub summary: Summary,
    pub profiles: Vec<ProfileReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

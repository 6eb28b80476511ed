// Monte Carlo Infrastructure: N runs per profile with statistical aggregation
// Each profile runs N times with seeds base..base+N, computing mean ± 95% CI

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use reserve_engine::adapter::{from_decimal, to_decimal};
use reserve_engine::{catalog, clock, consumption, ReserveSimulation, SimParams};

use crate::behaviour::BehaviourGenerator;
use crate::profiles::Profile;
use crate::report::*;
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

const CONSUMPTION_TOLERANCE: f64 = 1e-9;

/// Run a single profile iteration with a specific seed.
pub fn run_single(
    profile: &Profile,
    seed: u64,
    base_params: &SimParams,
    time_series_dir: Option<&std::path::Path>,
) -> RunResult {
    let start = Instant::now();
    let mut params = base_params.clone();
    if let Some(initial) = profile.initial_reserve {
        params.initial_reserve = to_decimal(initial);
    }
    let origin = params.clock_origin_minute;
    let capacity = params.buffer_capacity.max(1);
    let mut sim = ReserveSimulation::with_params(params);

    let mut behaviour = BehaviourGenerator::new(ChaCha8Rng::seed_from_u64(seed));
    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new());
    let mut violations = InvariantViolations::default();

    let mut min_reserve = from_decimal(sim.reserve_level().value());
    let mut reserve_sum = 0.0_f64;
    let mut peak_consumption = 0.0_f64;
    let mut depleted = false;
    let mut last_index: Option<u64> = sim.buffer().latest().map(|s| s.sequence_index);
    let mut ticks_run: u64 = 0;

    for _ in 0..profile.ticks {
        // Toggles land in the minute the next sample will be labelled with.
        let minute = clock::minute_of_day(sim.buffer().next_index(), origin);
        let toggles = behaviour.generate_tick(profile, minute, |id| sim.active().contains(id));
        for toggle in toggles {
            if let Err(e) = sim.toggle_core(toggle.activity, toggle.turn_on) {
                tracing::warn!(profile = profile.name, seed, error = %e, "toggle failed");
            }
        }

        let (result, expired) = match sim.step() {
            Ok(stepped) => stepped,
            Err(e) => {
                tracing::error!(profile = profile.name, seed, error = %e, "step failed");
                break;
            }
        };
        ticks_run += 1;

        if !(0.0..=100.0).contains(&result.reserve_percent) {
            violations.reserve_out_of_bounds += 1;
        }
        if result.buffer_len > capacity {
            violations.buffer_over_capacity += 1;
        }
        if let Some(prev) = last_index {
            if result.sequence_index <= prev {
                violations.non_increasing_index += 1;
            }
        }
        last_index = Some(result.sequence_index);

        let expected = consumption::instantaneous_consumption(
            result
                .active_activities
                .iter()
                .filter_map(|id| catalog::definition(id).ok()),
            sim.params().baseline_consumption,
        );
        if (from_decimal(expected) - result.consumption).abs() > CONSUMPTION_TOLERANCE {
            violations.consumption_mismatch += 1;
        }

        min_reserve = min_reserve.min(result.reserve_percent);
        reserve_sum += result.reserve_percent;
        peak_consumption = peak_consumption.max(result.consumption);
        if result.reserve_percent <= 0.0 {
            depleted = true;
        }

        if let Some(ref mut ts) = time_series {
            ts.record(&result, &expired);
        }
    }

    if let (Some(ts), Some(dir)) = (&time_series, time_series_dir) {
        let path = dir.join(format!("seed-{}.jsonl", seed));
        if let Err(e) = ts.write_jsonl(&path) {
            eprintln!("  Warning: failed to write time series: {}", e);
        }
    }

    let stats = sim.stats().clone();
    violations.stale_expiries = stats.stale_expiries;
    let final_reserve = from_decimal(sim.reserve_level().value());
    let mean_reserve = if ticks_run > 0 { reserve_sum / ticks_run as f64 } else { final_reserve };

    // Evaluate pass/fail
    let mut pass = violations.total() == 0 && ticks_run == profile.ticks;
    if let Some(min_final) = profile.criteria.min_final_reserve {
        if final_reserve < min_final {
            pass = false;
        }
    }
    if profile.criteria.require_depletion && !depleted {
        pass = false;
    }
    if profile.criteria.require_refusal && stats.refusals == 0 {
        pass = false;
    }

    sim.dispose();

    RunResult {
        profile: profile.name.to_string(),
        seed,
        pass,
        ticks: ticks_run,
        min_reserve,
        mean_reserve,
        final_reserve,
        peak_consumption,
        ticks_exhausted: stats.ticks_exhausted,
        attempts: behaviour.attempts,
        early_offs: behaviour.early_offs,
        activations: stats.activations,
        refusals: stats.refusals,
        expiries: stats.expiries,
        manual_deactivations: stats.manual_deactivations,
        violations,
        elapsed_ms: start.elapsed().as_millis(),
    }
}

/// Run Monte Carlo: N runs of a profile, aggregate stats.
pub fn run_monte_carlo(
    profile: &Profile,
    n_runs: usize,
    base_seed: u64,
    params: &SimParams,
    time_series_base: Option<&std::path::Path>,
) -> ProfileReport {
    let ts_dir = time_series_base.map(|base| base.join(profile.name.to_lowercase()));

    let results = (0..n_runs)
        .map(|i| run_single(profile, base_seed + i as u64, params, ts_dir.as_deref()))
        .collect();

    aggregate(profile, results)
}

fn stats_of(results: &[RunResult], metric: impl Fn(&RunResult) -> f64) -> Stats {
    Stats::from_samples(&results.iter().map(metric).collect::<Vec<_>>())
}

/// Aggregate individual runs into a ProfileReport.
fn aggregate(profile: &Profile, results: Vec<RunResult>) -> ProfileReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = if n > 0 { passed as f64 / n as f64 } else { 0.0 };

    ProfileReport {
        profile_name: profile.name.to_string(),
        label: profile.label.to_string(),
        n_runs: n,
        pass_rate,
        min_reserve: stats_of(&results, |r| r.min_reserve),
        mean_reserve: stats_of(&results, |r| r.mean_reserve),
        final_reserve: stats_of(&results, |r| r.final_reserve),
        ticks_exhausted: stats_of(&results, |r| r.ticks_exhausted as f64),
        activations: stats_of(&results, |r| r.activations as f64),
        refusals: stats_of(&results, |r| r.refusals as f64),
        elapsed_ms: stats_of(&results, |r| r.elapsed_ms as f64),
        individual_runs: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::profiles;

    fn profile(name: &str) -> Profile {
        profiles().into_iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn test_idle_day_refills_completely() {
        let result = run_single(&profile("IDLE_DAY"), 0, &SimParams::default(), None);
        assert!(result.pass, "{:?}", result);
        assert_eq!(result.ticks, 1_440);
        assert_eq!(result.activations, 0);
        // 40% + 0.05/min needs 1200 ticks to fill
        assert_eq!(result.final_reserve, 100.0);
        assert_eq!(result.violations.total(), 0);
    }

    #[test]
    fn test_stimulant_crash_depletes_and_refuses() {
        let result = run_single(&profile("STIMULANT_CRASH"), 3, &SimParams::default(), None);
        assert_eq!(result.violations.total(), 0);
        assert_eq!(result.min_reserve, 0.0);
        assert!(result.refusals > 0);
        assert!(result.pass, "{:?}", result);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let doom = profile("DOOM_SCROLLING");
        let a = run_single(&doom, 11, &SimParams::default(), None);
        let b = run_single(&doom, 11, &SimParams::default(), None);
        assert_eq!(a.final_reserve, b.final_reserve);
        assert_eq!(a.activations, b.activations);
        assert_eq!(a.refusals, b.refusals);
    }

    #[test]
    fn test_aggregate_counts_runs() {
        let report = run_monte_carlo(&profile("MORNING_COFFEE"), 3, 0, &SimParams::default(), None);
        assert_eq!(report.n_runs, 3);
        assert_eq!(report.individual_runs.len(), 3);
        assert_eq!(report.final_reserve.n, 3);
    }
}

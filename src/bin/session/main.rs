// Session Runner v0.1.0: headless replay of behaviour profiles
// Monte Carlo (N=30), Poisson toggles, seedable PRNG, per-tick JSONL trail
//
// Usage:
//   cargo run --release --bin session                        # Run all profiles (30 runs each)
//   cargo run --release --bin session -- --runs 5            # Quick mode (5 runs each)
//   cargo run --release --bin session -- STIMULANT           # Filter by name
//   cargo run --release --bin session -- --time-series       # Enable JSONL output
//   cargo run --release --bin session -- --seed 42           # Custom base seed
//   cargo run --release --bin session -- --params tune.json  # Override SimParams

mod behaviour;
mod monte_carlo;
mod profiles;
mod report;
mod time_series;

use profiles::*;
use report::*;
use reserve_engine::SimParams;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const RESULTS_DIR: &str = "session-results";

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    time_series: bool,
    params: Option<PathBuf>,
    filter: Option<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        time_series: false,
        params: None,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                let value = args.get(i).ok_or("--runs needs a value")?;
                cli.runs = match value.parse() {
                    Ok(0) | Err(_) => {
                        return Err(format!("--runs must be a positive integer, got {}", value))
                    }
                    Ok(n) => n,
                };
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--params" => {
                i += 1;
                if i < args.len() {
                    cli.params = Some(PathBuf::from(&args[i]));
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    Ok(cli)
}

fn load_params(path: Option<&Path>) -> Result<SimParams, String> {
    let Some(path) = path else {
        return Ok(SimParams::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    SimParams::from_json(&json).map_err(|e| format!("invalid params in {}: {}", path.display(), e))
}

fn write_report(report: &SessionReport) -> Result<PathBuf, String> {
    let dir = Path::new(RESULTS_DIR);
    std::fs::create_dir_all(dir).map_err(|e| format!("cannot create {}/: {}", RESULTS_DIR, e))?;
    let path = dir.join(format!("session-{}.json", report.timestamp));
    let json = serde_json::to_string_pretty(report).map_err(|e| format!("serialize failed: {}", e))?;
    std::fs::write(&path, json).map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
    Ok(path)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let params = match load_params(cli.params.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let all_profiles = profiles();

    let to_run: Vec<&Profile> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_profiles.iter()
                .filter(|p| p.name.to_lowercase().contains(&f_lower)
                          || p.label.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_profiles.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No profiles match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let ts_dir = cli.time_series.then(|| Path::new(RESULTS_DIR).join("time-series"));

    println!("\n  Session Runner v0.1.0");
    println!("  PRNG: ChaCha8Rng | Runs/profile: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} profile(s)...\n", to_run.len());
    println!("  {:<32} {:>5} {:>12} {:>8} {:>8} {:>8} {:>7}",
        "Profile", "Pass%", "Final%", "Min%", "Exhaust", "Refused", "Time");
    println!("  {}", "-".repeat(88));

    let suite_start = Instant::now();
    let mut reports = Vec::new();

    for profile in &to_run {
        let report = monte_carlo::run_monte_carlo(
            profile,
            cli.runs,
            cli.seed,
            &params,
            ts_dir.as_deref(),
        );

        let pass_pct = report.pass_rate * 100.0;
        let final_ci = (report.final_reserve.ci_upper - report.final_reserve.ci_lower) / 2.0;
        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

        println!("  {:<32} {:>4}% {:>6.1}±{:<4.1} {:>7.1}% {:>8.0} {:>8.1} {:>5.0}ms  {}",
            report.label,
            pass_pct as u32,
            report.final_reserve.mean, final_ci,
            report.min_reserve.mean,
            report.ticks_exhausted.mean,
            report.refusals.mean,
            report.elapsed_ms.mean,
            status,
        );

        reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = reports.len();
    let passed = reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(88));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ───────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let report = SessionReport {
        timestamp: format!("{}", ts),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_profile: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        profiles: reports,
    };

    match write_report(&report) {
        Ok(path) => println!("  Results saved to: {}\n", path.display()),
        Err(e) => eprintln!("  Warning: {}", e),
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// Behaviour Profiles: named user sessions replayed headlessly
// Each profile is data only: activation intensities plus an optional daily rhythm

use reserve_engine::config::MINUTES_PER_DAY;

// ─── Profile Configuration ──────────────────────────────────────────────────

pub struct Profile {
    pub name: &'static str,
    pub label: &'static str,
    pub ticks: u64,
    /// Starting reserve override (percent). `None` keeps the configured value.
    pub initial_reserve: Option<f64>,
    /// Expected activation attempts per simulated hour, per activity.
    pub intensities: &'static [(&'static str, f64)],
    /// Multiplier on all intensities by minute of day.
    pub rhythm: Option<fn(u64) -> f64>,
    /// Per-tick chance that an active activity is switched off by hand.
    pub early_off_prob: f64,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    /// Final reserve must be at least this.
    pub min_final_reserve: Option<f64>,
    /// The reserve must hit zero at some point.
    pub require_depletion: bool,
    /// At least one activation attempt must have been refused.
    pub require_refusal: bool,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            min_final_reserve: None,
            require_depletion: false,
            require_refusal: false,
        }
    }
}

impl Profile {
    /// Expected attempts per tick at `minute_of_day` for one hourly intensity.
    pub fn lambda(&self, intensity_per_hour: f64, minute_of_day: u64) -> f64 {
        let rhythm = self.rhythm.map(|f| f(minute_of_day)).unwrap_or(1.0);
        (intensity_per_hour / 60.0) * rhythm.max(0.0)
    }
}

// ─── Rhythm Functions ───────────────────────────────────────────────────────

/// Asleep 23:00–07:00, active otherwise.
fn awake_hours(minute: u64) -> f64 {
    let hour = (minute % MINUTES_PER_DAY) / 60;
    if (7..23).contains(&hour) { 1.0 } else { 0.0 }
}

/// Mornings only.
fn morning(minute: u64) -> f64 {
    let hour = (minute % MINUTES_PER_DAY) / 60;
    if (6..11).contains(&hour) { 1.0 } else { 0.05 }
}

/// Quiet days, heavy evenings and nights.
fn evenings(minute: u64) -> f64 {
    let hour = (minute % MINUTES_PER_DAY) / 60;
    if hour >= 19 || hour < 3 { 1.5 } else { 0.2 }
}

// ─── Profile Table ──────────────────────────────────────────────────────────

pub fn profiles() -> Vec<Profile> {
    vec![
        Profile {
            name: "IDLE_DAY",
            label: "Idle day (no activities)",
            ticks: MINUTES_PER_DAY,
            initial_reserve: Some(40.0),
            intensities: &[],
            rhythm: None,
            early_off_prob: 0.0,
            criteria: PassCriteria {
                min_final_reserve: Some(100.0),
                ..Default::default()
            },
        },
        Profile {
            name: "MORNING_COFFEE",
            label: "Morning coffee routine",
            ticks: MINUTES_PER_DAY,
            initial_reserve: None,
            intensities: &[("coffee", 0.6), ("sugar", 0.2)],
            rhythm: Some(morning),
            early_off_prob: 0.0,
            criteria: PassCriteria {
                min_final_reserve: Some(80.0),
                ..Default::default()
            },
        },
        Profile {
            name: "DOOM_SCROLLING",
            label: "Doom scrolling while awake",
            ticks: 2 * MINUTES_PER_DAY,
            initial_reserve: None,
            intensities: &[("social_media", 3.0), ("sugar", 0.5), ("coffee", 0.3)],
            rhythm: Some(awake_hours),
            early_off_prob: 0.02,
            criteria: PassCriteria::default(),
        },
        Profile {
            name: "WEEKEND_BINGE",
            label: "Weekend evening binge",
            ticks: 2 * MINUTES_PER_DAY,
            initial_reserve: None,
            intensities: &[
                ("alcohol", 1.0),
                ("nicotine", 2.0),
                ("video_games", 0.8),
                ("social_media", 1.0),
            ],
            rhythm: Some(evenings),
            early_off_prob: 0.01,
            criteria: PassCriteria::default(),
        },
        Profile {
            name: "STIMULANT_CRASH",
            label: "Stimulant crash",
            ticks: MINUTES_PER_DAY,
            initial_reserve: Some(60.0),
            intensities: &[("amphetamine", 6.0), ("nicotine", 2.0)],
            rhythm: None,
            early_off_prob: 0.0,
            criteria: PassCriteria {
                require_depletion: true,
                require_refusal: true,
                ..Default::default()
            },
        },
    ]
}

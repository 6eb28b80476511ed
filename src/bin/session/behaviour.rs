// Behaviour Generator: seedable Poisson toggle attempts
// Turns a profile's hourly intensities into concrete toggle calls per tick

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::profiles::Profile;

/// One toggle the simulated user performs this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub activity: &'static str,
    pub turn_on: bool,
}

pub struct BehaviourGenerator {
    rng: ChaCha8Rng,
    pub attempts: u32,
    pub early_offs: u32,
}

impl BehaviourGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng, attempts: 0, early_offs: 0 }
    }

    /// Toggles for one tick.
    ///
    /// Inactive activities receive Poisson-distributed switch-on attempts
    /// (at most one toggle per activity per tick). Active ones may be switched
    /// off early with the profile's per-tick probability.
    pub fn generate_tick(
        &mut self,
        profile: &Profile,
        minute_of_day: u64,
        is_active: impl Fn(&str) -> bool,
    ) -> Vec<Toggle> {
        let mut toggles = Vec::new();
        for &(activity, intensity) in profile.intensities {
            if is_active(activity) {
                if profile.early_off_prob > 0.0 && self.rng.gen::<f64>() < profile.early_off_prob {
                    self.early_offs += 1;
                    toggles.push(Toggle { activity, turn_on: false });
                }
                continue;
            }
            let lambda = profile.lambda(intensity, minute_of_day);
            if lambda > 0.0 && poisson_sample(&mut self.rng, lambda) > 0 {
                self.attempts += 1;
                toggles.push(Toggle { activity, turn_on: true });
            }
        }
        toggles
    }
}

/// Poisson sampling via Knuth algorithm.
/// For λ < 30, uses direct method. For larger λ, uses normal approximation.
fn poisson_sample(rng: &mut ChaCha8Rng, lambda: f64) -> u32 {
    if lambda < 30.0 {
        let l = (-lambda).exp();
        let mut k: u32 = 0;
        let mut p: f64 = 1.0;
        loop {
            k += 1;
            p *= rng.gen::<f64>();
            if p <= l {
                return k - 1;
            }
        }
    } else {
        let u1: f64 = rng.gen();
        let u2: f64 = rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        let result = lambda + lambda.sqrt() * z;
        result.round().max(0.0) as u32
    }
}

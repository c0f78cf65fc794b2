//! Injectable random sources.
//!
//! The engine never calls a global RNG. Every probabilistic operation receives a
//! `&mut dyn RandomSource`, so tests can script exact outcomes and replays can
//! reuse a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Returns a uniform roll in `[0, 1)`. `reason` names what the roll decides.
    fn next_roll(&mut self, reason: &str) -> f64;

    /// True with probability `probability`.
    fn chance(&mut self, probability: f64, reason: &str) -> bool {
        self.next_roll(reason) < probability
    }

    /// Uniform value in `[low, high)`.
    fn range_f64(&mut self, low: f64, high: f64, reason: &str) -> f64 {
        low + (high - low) * self.next_roll(reason)
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn index(&mut self, len: usize, reason: &str) -> usize {
        let picked = (self.next_roll(reason) * len as f64).floor() as usize;
        picked.min(len.saturating_sub(1))
    }

    /// Uniform integer in `[low, high]`.
    fn range_u32(&mut self, low: u32, high: u32, reason: &str) -> u32 {
        if high <= low {
            return low;
        }
        let span = (high - low) as usize + 1;
        low + self.index(span, reason) as u32
    }
}

/// Fisher-Yates shuffle driven by any random source.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1, "shuffle");
        items.swap(i, j);
    }
}

/// Production random source backed by `StdRng`.
pub struct BattleRng {
    inner: StdRng,
}

impl BattleRng {
    pub fn new_random() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// A reproducible source: the same seed replays the same battle.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for BattleRng {
    fn next_roll(&mut self, _reason: &str) -> f64 {
        self.inner.random::<f64>()
    }
}

/// Deterministic source that replays a fixed list of rolls.
pub struct ScriptedRng {
    rolls: Vec<f64>,
    index: usize,
}

impl ScriptedRng {
    pub fn new_for_test(rolls: Vec<f64>) -> Self {
        Self { rolls, index: 0 }
    }

    /// Number of rolls consumed so far.
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl RandomSource for ScriptedRng {
    fn next_roll(&mut self, reason: &str) -> f64 {
        if self.index >= self.rolls.len() {
            // Add the reason to the panic message for better debugging!
            panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more scripted rolls.",
                reason
            );
        }
        let roll = self.rolls[self.index];

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", roll, reason);

        self.index += 1;
        roll
    }
}

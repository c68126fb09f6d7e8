//! Spawn-decision randomness
//!
//! The pipeline only ever asks for uniform rolls in `[0, 1)`, so anything that
//! can produce those can drive spawning. Tests plug in scripted sequences.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

pub trait SpawnRoll {
    /// Uniform sample in `[0, 1)`
    fn roll(&mut self) -> f32;

    /// Uniform sample in `[-0.5, 0.5)`
    fn centered(&mut self) -> f32 {
        self.roll() - 0.5
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.roll() < probability
    }
}

impl<R: Rng> SpawnRoll for R {
    fn roll(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// The game's RNG, seeded per run
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

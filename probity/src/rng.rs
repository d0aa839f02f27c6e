//! RNG construction for checks.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Create an RNG seeded from system entropy
pub fn create_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Create an RNG with a specific seed, for replaying a run while debugging
pub fn create_seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Seeded when `seed` is set, from entropy otherwise.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_seeded_rng(seed),
        None => create_rng(),
    }
}

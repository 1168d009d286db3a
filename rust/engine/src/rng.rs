//! Seeded randomness for rounds and simulations.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::door::{DoorId, DOOR_COUNT};

/// Generator used by [`crate::engine::Engine`] and the command line tools.
pub type RoundRng = ChaCha20Rng;

/// Build a reproducible generator. Equal seeds yield equal rounds.
pub fn rng_from_seed(seed: u64) -> RoundRng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Use `seed` when given, otherwise draw one from the thread generator.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Uniform door draw.
pub fn draw_door<R: Rng + ?Sized>(rng: &mut R) -> DoorId {
    DoorId::ALL[rng.random_range(0..DOOR_COUNT)]
}

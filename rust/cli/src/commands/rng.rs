//! Random number generator inspection command.
//!
//! Prints the first door draws and raw words of the seeded generator so two
//! runs can be compared for determinism.

use crate::error::CliError;
use crate::formatters::door_label;
use montyhall_engine::rng::{draw_door, resolve_seed, rng_from_seed};
use rand::RngCore;
use std::io::Write;

const SAMPLE_SIZE: usize = 10;

pub fn handle_rng_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let s = resolve_seed(seed);
    let mut rng = rng_from_seed(s);
    let doors: Vec<usize> = (0..SAMPLE_SIZE)
        .map(|_| door_label(draw_door(&mut rng)))
        .collect();
    let words: Vec<u64> = (0..3).map(|_| rng.next_u64()).collect();
    writeln!(out, "seed: {}", s)?;
    writeln!(out, "RNG door sample: {:?}", doors)?;
    writeln!(out, "RNG word sample: {:?}", words)?;
    Ok(())
}

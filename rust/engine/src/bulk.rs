use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::errors::GameError;
use crate::game::GameState;
use crate::rng::draw_door;
use crate::stats::Statistics;

/// Long-run stay win rate, in percent, drawn on convergence charts.
pub const THEORETICAL_STAY: f64 = 33.33;
/// Long-run switch win rate, in percent.
pub const THEORETICAL_SWITCH: f64 = 66.67;

/// Cumulative win rates after `game_number` rounds of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvergencePoint {
    pub game_number: u64,
    pub stay_percentage: f64,
    pub switch_percentage: f64,
    pub theoretical_stay: f64,
    pub theoretical_switch: f64,
}

impl ConvergencePoint {
    fn sample(game_number: u64, stats: &Statistics) -> Self {
        Self {
            game_number,
            stay_percentage: raw_percentage(stats.stay_wins, stats.stay_total),
            switch_percentage: raw_percentage(stats.switch_wins, stats.switch_total),
            theoretical_stay: THEORETICAL_STAY,
            theoretical_switch: THEORETICAL_SWITCH,
        }
    }
}

/// Unrounded percentage, zero when `total` is zero.
pub fn raw_percentage(wins: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * wins as f64 / total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    pub stats: Statistics,
    /// Wall-clock time spent in the loop
    pub duration_ms: f64,
    pub convergence: Vec<ConvergencePoint>,
}

/// Rounds between convergence samples for a run of `count` rounds.
pub fn sample_interval(count: u64) -> u64 {
    (count / 100).max(1)
}

/// Play `count` rounds, scoring both strategies against each one.
///
/// Every round draws a prize door and a first pick, lets the host reveal, then
/// settles the same revealed state once by staying and once by switching. The
/// returned stats therefore hold `2 * count` games.
///
/// # Panics
///
/// Panics if a revealed round has no door to switch to, which would mean the
/// host opened the player's own door.
pub fn simulate_bulk<R: Rng + ?Sized>(count: u64, rng: &mut R) -> Result<BulkReport, GameError> {
    if count == 0 {
        return Err(GameError::InvalidGameCount(count));
    }

    let started = Instant::now();
    let interval = sample_interval(count);
    let mut stats = Statistics::new();
    let mut convergence = Vec::with_capacity((count / interval + 1) as usize);

    for i in 0..count {
        let round = GameState::create_round(rng);
        let first = draw_door(rng);
        let revealed = round.choose_initial(first, rng)?;

        let stayed = revealed.choose_final(first)?;
        stats.record_round(&stayed);

        let Some(other) = revealed.switch_target() else {
            panic!("no switch door after host reveal (first pick {first})");
        };
        let switched = revealed.choose_final(other)?;
        stats.record_round(&switched);

        if i % interval == 0 || i + 1 == count {
            convergence.push(ConvergencePoint::sample(i + 1, &stats));
        }
    }

    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    tracing::debug!(
        rounds = count,
        samples = convergence.len(),
        duration_ms,
        "bulk simulation finished"
    );

    Ok(BulkReport {
        stats,
        duration_ms,
        convergence,
    })
}

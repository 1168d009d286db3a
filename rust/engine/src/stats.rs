use serde::{Deserialize, Serialize};

use crate::game::{GameState, Strategy};
use crate::result::GameResult;

/// Running win/loss counters per strategy.
///
/// `total_games == stay_total + switch_total` always holds, and wins never
/// exceed their strategy's total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_games: u64,
    pub stay_wins: u64,
    pub switch_wins: u64,
    pub stay_total: u64,
    pub switch_total: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a list of persisted results into fresh counters.
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a GameResult>,
    {
        let mut stats = Self::new();
        for r in results {
            stats.record(r.strategy, r.won);
        }
        stats
    }

    pub fn record(&mut self, strategy: Strategy, won: bool) {
        self.total_games += 1;
        match strategy {
            Strategy::Stay => {
                self.stay_total += 1;
                if won {
                    self.stay_wins += 1;
                }
            }
            Strategy::Switch => {
                self.switch_total += 1;
                if won {
                    self.switch_wins += 1;
                }
            }
        }
    }

    /// Record a finished round. Returns `false` and changes nothing if the
    /// round has not reached game-over.
    pub fn record_round(&mut self, state: &GameState) -> bool {
        match (state.strategy(), state.player_won()) {
            (Some(strategy), Some(won)) if state.is_complete() => {
                self.record(strategy, won);
                true
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_games == 0
    }

    pub fn stay_win_percentage(&self) -> u64 {
        win_percentage(self.stay_wins, self.stay_total)
    }

    pub fn switch_win_percentage(&self) -> u64 {
        win_percentage(self.switch_wins, self.switch_total)
    }
}

/// Whole-number percentage, rounded half up. Zero when `total` is zero.
///
/// ```
/// use montyhall_engine::stats::win_percentage;
///
/// assert_eq!(win_percentage(1, 3), 33);
/// assert_eq!(win_percentage(2, 3), 67);
/// assert_eq!(win_percentage(1, 2), 50);
/// assert_eq!(win_percentage(5, 0), 0);
/// ```
pub fn win_percentage(wins: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    // floor(100 * w / t + 1/2) without going through floats
    (200 * wins + total) / (2 * total)
}

use thiserror::Error;

use crate::game::Phase;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot {operation} in {actual} phase (expected {expected})")]
    InvalidPhase {
        operation: &'static str,
        expected: Phase,
        actual: Phase,
    },
    #[error("Invalid door id: {0} (expected 0..=2)")]
    InvalidDoor(u64),
    #[error("Game is not complete (phase: {0})")]
    IncompleteRound(Phase),
    #[error("Invalid game count: {0}, must be >= 1")]
    InvalidGameCount(u64),
}

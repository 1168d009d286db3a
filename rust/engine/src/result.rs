use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::GameError;
use crate::game::{GameState, Strategy};

/// Outcome of one finished round, as persisted and sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Unique identifier assigned when the result is built
    pub id: String,
    pub strategy: Strategy,
    pub won: bool,
    pub timestamp: DateTime<Utc>,
    /// Opaque label grouping results from one player session
    pub session_id: String,
}

/// Source of result identifiers.
pub trait IdGenerator: fmt::Debug + Send {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `<prefix>-NNNNNN` counters, for reproducible logs and tests.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    seq: u32,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            seq: 0,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.seq += 1;
        format!("{}-{:06}", self.prefix, self.seq)
    }
}

/// Produce the result record of a finished round.
///
/// Fails with [`GameError::IncompleteRound`] unless the round is at game-over.
pub fn build_result(
    state: &GameState,
    session_id: &str,
    ids: &mut dyn IdGenerator,
) -> Result<GameResult, GameError> {
    match (state.strategy(), state.player_won()) {
        (Some(strategy), Some(won)) if state.is_complete() => Ok(GameResult {
            id: ids.next_id(),
            strategy,
            won,
            timestamp: Utc::now(),
            session_id: session_id.to_string(),
        }),
        _ => Err(GameError::IncompleteRound(state.phase())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::door::DoorId;
    use crate::game::Phase;
    use crate::rng::rng_from_seed;

    #[test]
    fn sequential_ids_are_zero_padded() {
        let mut ids = SequentialIds::new("20250101");
        assert_eq!(ids.next_id(), "20250101-000001");
        assert_eq!(ids.next_id(), "20250101-000002");
    }

    #[test]
    fn uuid_ids_are_distinct() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn incomplete_round_has_no_result() {
        let round = GameState::with_prize(DoorId::ALL[1]);
        let err = build_result(&round, "s", &mut UuidIds).unwrap_err();
        assert_eq!(err, GameError::IncompleteRound(Phase::Initial));
    }

    #[test]
    fn result_carries_session_and_outcome() {
        let mut rng = rng_from_seed(21);
        let first = DoorId::ALL[0];
        let done = GameState::with_prize(DoorId::ALL[2])
            .choose_initial(first, &mut rng)
            .unwrap()
            .choose_final(DoorId::ALL[2])
            .unwrap();
        let mut ids = SequentialIds::new("t");
        let result = build_result(&done, "session-a", &mut ids).unwrap();
        assert_eq!(result.id, "t-000001");
        assert_eq!(result.strategy, Strategy::Switch);
        assert!(result.won);
        assert_eq!(result.session_id, "session-a");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["strategy"], "switch");
        assert_eq!(json["sessionId"], "session-a");
    }
}

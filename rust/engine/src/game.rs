use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::door::{Door, DoorId, DOOR_COUNT};
use crate::errors::GameError;
use crate::rng::draw_door;

/// Stage of a round.
///
/// Transitions only ever produce `Initial -> HostReveal -> GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Waiting for the player's first pick
    Initial,
    /// Host has opened a door, waiting for the final pick
    HostReveal,
    /// Reserved; no transition reaches it
    FinalChoice,
    /// Terminal
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Initial => "initial",
            Phase::HostReveal => "host-reveal",
            Phase::FinalChoice => "final-choice",
            Phase::GameOver => "game-over",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the final pick kept or changed the first pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Stay,
    Switch,
}

impl Strategy {
    pub fn between(initial: DoorId, final_choice: DoorId) -> Self {
        if initial == final_choice {
            Strategy::Stay
        } else {
            Strategy::Switch
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Stay => "stay",
            Strategy::Switch => "switch",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One round of the puzzle.
///
/// A `GameState` is never mutated once handed out: each transition borrows the
/// current state and returns a new one.
///
/// # Examples
///
/// ```
/// use montyhall_engine::door::DoorId;
/// use montyhall_engine::game::{GameState, Phase, Strategy};
/// use montyhall_engine::rng::rng_from_seed;
///
/// let mut rng = rng_from_seed(7);
/// let round = GameState::create_round(&mut rng);
/// let first = DoorId::new(0).unwrap();
///
/// let revealed = round.choose_initial(first, &mut rng).unwrap();
/// assert_eq!(revealed.phase(), Phase::HostReveal);
/// assert_ne!(revealed.host_revealed_door(), Some(first));
///
/// let done = revealed.choose_final(first).unwrap();
/// assert_eq!(done.strategy(), Some(Strategy::Stay));
/// assert_eq!(done.player_won(), Some(done.prize_door() == first));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    doors: [Door; DOOR_COUNT],
    phase: Phase,
    initial_choice: Option<DoorId>,
    final_choice: Option<DoorId>,
    host_revealed_door: Option<DoorId>,
    strategy: Option<Strategy>,
    player_won: Option<bool>,
}

impl GameState {
    /// Start a round with the prize behind a uniformly random door.
    pub fn create_round<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_prize(draw_door(rng))
    }

    /// Start a round with the prize behind `prize`.
    pub fn with_prize(prize: DoorId) -> Self {
        Self {
            doors: DoorId::ALL.map(|id| Door::closed(id, id == prize)),
            phase: Phase::Initial,
            initial_choice: None,
            final_choice: None,
            host_revealed_door: None,
            strategy: None,
            player_won: None,
        }
    }

    /// Apply the player's first pick and let the host open a door.
    pub fn choose_initial<R: Rng + ?Sized>(
        &self,
        door: DoorId,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        self.expect_phase(Phase::Initial, "make initial choice")?;

        let mut doors = self.doors;
        for d in &mut doors {
            d.is_selected = d.id == door;
        }

        let revealed = reveal_host_door(&doors, door, rng);
        for d in &mut doors {
            d.is_open = d.id == revealed;
        }

        Ok(Self {
            doors,
            phase: Phase::HostReveal,
            initial_choice: Some(door),
            host_revealed_door: Some(revealed),
            ..self.clone()
        })
    }

    /// Apply the player's final pick and settle the round.
    ///
    /// Any door is accepted, including the one the host opened.
    ///
    /// # Panics
    ///
    /// Panics if a host-reveal state carries no first pick, which only a
    /// broken transition could produce.
    pub fn choose_final(&self, door: DoorId) -> Result<Self, GameError> {
        self.expect_phase(Phase::HostReveal, "make final choice")?;

        let Some(initial) = self.initial_choice else {
            panic!("host-reveal round without a first pick");
        };
        let strategy = Strategy::between(initial, door);
        let player_won = self.doors[door.index()].has_prize;

        let mut doors = self.doors;
        for d in &mut doors {
            d.is_selected = d.id == door;
            d.is_open = true;
        }

        Ok(Self {
            doors,
            phase: Phase::GameOver,
            final_choice: Some(door),
            strategy: Some(strategy),
            player_won: Some(player_won),
            ..self.clone()
        })
    }

    pub fn doors(&self) -> &[Door; DOOR_COUNT] {
        &self.doors
    }

    pub fn door(&self, id: DoorId) -> &Door {
        &self.doors[id.index()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn initial_choice(&self) -> Option<DoorId> {
        self.initial_choice
    }

    pub fn final_choice(&self) -> Option<DoorId> {
        self.final_choice
    }

    pub fn host_revealed_door(&self) -> Option<DoorId> {
        self.host_revealed_door
    }

    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub fn player_won(&self) -> Option<bool> {
        self.player_won
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// # Panics
    ///
    /// Panics if no door holds the prize; every round is created with one.
    pub fn prize_door(&self) -> DoorId {
        let Some(prize) = self.doors.iter().find(|d| d.has_prize) else {
            panic!("round has no prize door");
        };
        prize.id
    }

    /// The door a switching player would move to: neither the first pick nor
    /// the host's door. `None` until the host has revealed.
    pub fn switch_target(&self) -> Option<DoorId> {
        let initial = self.initial_choice?;
        let revealed = self.host_revealed_door?;
        initial.others().into_iter().find(|&id| id != revealed)
    }

    fn expect_phase(&self, expected: Phase, operation: &'static str) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                operation,
                expected,
                actual: self.phase,
            })
        }
    }
}

/// Pick the door the host opens: never the player's, never the prize.
fn reveal_host_door<R: Rng + ?Sized>(
    doors: &[Door; DOOR_COUNT],
    player_choice: DoorId,
    rng: &mut R,
) -> DoorId {
    let others = player_choice.others();
    let candidates: Vec<DoorId> = others
        .iter()
        .copied()
        .filter(|id| !doors[id.index()].has_prize)
        .collect();

    if let Some(&door) = candidates.choose(rng) {
        return door;
    }

    // Only reachable when the one-prize layout has been broken.
    tracing::warn!(
        player_choice = %player_choice,
        "no empty door available to the host, revealing any other door"
    );
    others[rng.random_range(0..others.len())]
}

use crate::bulk::{simulate_bulk, BulkReport};
use crate::door::DoorId;
use crate::errors::GameError;
use crate::game::GameState;
use crate::result::{build_result, GameResult, IdGenerator, UuidIds};
use crate::rng::{resolve_seed, rng_from_seed, RoundRng};

/// Owns the generator and id source so callers can drive rounds without
/// threading them through every call.
///
/// # Examples
///
/// ```
/// use montyhall_engine::door::DoorId;
/// use montyhall_engine::engine::Engine;
///
/// let mut engine = Engine::new(Some(12345));
/// let round = engine.new_round();
/// let revealed = engine.choose_initial(&round, DoorId::new(1).unwrap()).unwrap();
/// let target = revealed.switch_target().unwrap();
/// let done = engine.choose_final(&revealed, target).unwrap();
///
/// let result = engine.result(&done, "demo").unwrap();
/// assert_eq!(result.won, done.prize_door() == target);
/// ```
#[derive(Debug)]
pub struct Engine {
    rng: RoundRng,
    seed: u64,
    ids: Box<dyn IdGenerator>,
}

impl Engine {
    /// Without a seed, one is drawn and can be read back with [`Engine::seed`].
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_ids(seed, Box::new(UuidIds))
    }

    pub fn with_ids(seed: Option<u64>, ids: Box<dyn IdGenerator>) -> Self {
        let seed = resolve_seed(seed);
        Self {
            rng: rng_from_seed(seed),
            seed,
            ids,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn new_round(&mut self) -> GameState {
        GameState::create_round(&mut self.rng)
    }

    pub fn choose_initial(
        &mut self,
        state: &GameState,
        door: DoorId,
    ) -> Result<GameState, GameError> {
        state.choose_initial(door, &mut self.rng)
    }

    pub fn choose_final(&self, state: &GameState, door: DoorId) -> Result<GameState, GameError> {
        state.choose_final(door)
    }

    pub fn result(&mut self, state: &GameState, session_id: &str) -> Result<GameResult, GameError> {
        build_result(state, session_id, self.ids.as_mut())
    }

    pub fn simulate(&mut self, count: u64) -> Result<BulkReport, GameError> {
        simulate_bulk(count, &mut self.rng)
    }
}

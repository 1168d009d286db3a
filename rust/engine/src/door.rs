use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::GameError;

/// Number of doors in every round.
pub const DOOR_COUNT: usize = 3;

/// Identity of one of the three doors.
///
/// Only `0`, `1` and `2` can be represented; any other integer is rejected at
/// construction time, so transitions never see an out-of-range door.
///
/// ```
/// use montyhall_engine::door::DoorId;
///
/// assert_eq!(DoorId::new(2).unwrap().index(), 2);
/// assert!(DoorId::new(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DoorId(u8);

impl DoorId {
    pub const ALL: [DoorId; DOOR_COUNT] = [DoorId(0), DoorId(1), DoorId(2)];

    pub fn new(id: u8) -> Result<Self, GameError> {
        if (id as usize) < DOOR_COUNT {
            Ok(Self(id))
        } else {
            Err(GameError::InvalidDoor(id as u64))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The two doors other than `self`, in ascending order.
    pub fn others(self) -> [DoorId; DOOR_COUNT - 1] {
        let a = (self.0 + 1) % DOOR_COUNT as u8;
        let b = (self.0 + 2) % DOOR_COUNT as u8;
        [DoorId(a.min(b)), DoorId(a.max(b))]
    }
}

impl TryFrom<u8> for DoorId {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DoorId::new(value)
    }
}

impl TryFrom<usize> for DoorId {
    type Error = GameError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| GameError::InvalidDoor(value as u64))
            .and_then(DoorId::new)
    }
}

impl From<DoorId> for u8 {
    fn from(id: DoorId) -> Self {
        id.0
    }
}

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the three slots of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    pub id: DoorId,
    /// True for exactly one door per round
    pub has_prize: bool,
    /// Opened by the host, or revealed when the round ends
    pub is_open: bool,
    /// The player's current pick
    pub is_selected: bool,
}

impl Door {
    pub fn closed(id: DoorId, has_prize: bool) -> Self {
        Self {
            id,
            has_prize,
            is_open: false,
            is_selected: false,
        }
    }
}

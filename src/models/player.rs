//! Player record.

use serde::{Deserialize, Serialize};

/// Database id of a player (unique within one variant only).
pub type PlayerId = i64;

/// Longest name the players tables accept.
pub const MAX_NAME_LEN: usize = 100;

/// A registered player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

//! League operation errors.

use crate::models::player::MAX_NAME_LEN;

/// Errors that can occur while registering players, recording matches or building tables.
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    /// Player name is empty after trimming.
    #[error("Player name must not be empty")]
    EmptyName,
    #[error("Player name must be at most {} characters", MAX_NAME_LEN)]
    NameTooLong,
    /// Both sides of a match are the same player.
    #[error("A player cannot play against themselves")]
    SamePlayer,
    /// A match referenced a player id that does not exist in this variant.
    #[error("Unknown player")]
    UnknownPlayer,
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LeagueError {
    /// True when the caller sent bad input (as opposed to a server-side failure).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LeagueError::EmptyName
                | LeagueError::NameTooLong
                | LeagueError::SamePlayer
                | LeagueError::UnknownPlayer
        )
    }
}

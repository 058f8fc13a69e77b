//! Match input and match history rows.

use crate::models::player::PlayerId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Database id of a match.
pub type MatchId = i64;

/// A finished 1v1 match about to be recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub score1: u32,
    pub score2: u32,
}

impl NewMatch {
    pub fn new(player1_id: PlayerId, player2_id: PlayerId, score1: u32, score2: u32) -> Self {
        Self {
            player1_id,
            player2_id,
            score1,
            score2,
        }
    }
}

/// One line of match history: both participants with their scores.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub match_id: MatchId,
    pub player1: String,
    pub player2: String,
    pub player1_score: u32,
    pub player2_score: u32,
    /// UTC, second precision (SQLite `CURRENT_TIMESTAMP`).
    pub match_date: NaiveDateTime,
}

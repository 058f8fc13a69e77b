//! Leaderboard row.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Aggregated standing of one player. Players without matches have every counter at zero.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub player_id: PlayerId,
    pub name: String,
    pub matches_played: i64,
    /// 3 per match where the player holds the top score, 1 otherwise.
    pub total_points: i64,
    /// Sum of the player's own scores.
    pub sets_won: i64,
    /// Sum of the opponents' scores.
    pub sets_lost: i64,
}

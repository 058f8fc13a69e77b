//! League business logic: player registry, match recording and history, leaderboard.

mod leaderboard;
mod matches;
mod players;

pub use leaderboard::{compute_leaderboard, leaderboard_csv};
pub use matches::{list_matches, record_match};
pub use players::{add_player, list_players};

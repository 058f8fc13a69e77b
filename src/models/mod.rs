//! Data structures for the dart league: variants, players, matches, leaderboard rows.

mod error;
mod game;
mod leaderboard;
mod player;
mod variant;

pub use error::LeagueError;
pub use game::{MatchId, MatchRow, NewMatch};
pub use leaderboard::LeaderboardRow;
pub use player::{Player, PlayerId, MAX_NAME_LEN};
pub use variant::{Tables, UnknownVariant, Variant};

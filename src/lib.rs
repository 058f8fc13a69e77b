//! Dart league web app: library with models, persistence and business logic.

pub mod config;
pub mod db;
pub mod logic;
pub mod models;

pub use config::{Config, ConfigError};
pub use db::{ensure_schema, wipe_all, Database};
pub use logic::{
    add_player, compute_leaderboard, leaderboard_csv, list_matches, list_players, record_match,
};
pub use models::{
    LeaderboardRow, LeagueError, MatchId, MatchRow, NewMatch, Player, PlayerId, Variant,
};

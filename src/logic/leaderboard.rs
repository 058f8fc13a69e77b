//! Leaderboard: points and sets per player, recomputed from the score rows on every call.
//!
//! Per match, the player holding the top score gets 3 points and the other gets 1. An exact
//! tie gives both players 3. `sets_lost` is the opponent's score, derived from the match's
//! min/max since every match has exactly two score rows.

use crate::models::{LeaderboardRow, LeagueError, Variant};
use rusqlite::Connection;

/// Ranked standings for `variant`: total points descending, then name ascending.
/// Players without matches are included with zero counters.
pub fn compute_leaderboard(
    conn: &Connection,
    variant: Variant,
) -> Result<Vec<LeaderboardRow>, LeagueError> {
    let t = variant.tables();
    let sql = format!(
        "WITH match_scores AS (
            SELECT s.match_id, s.player_id, s.score,
                   MAX(s.score) OVER (PARTITION BY s.match_id) AS max_score,
                   MIN(s.score) OVER (PARTITION BY s.match_id) AS min_score
            FROM {scores} s
         )
         SELECT p.id, p.name,
                COUNT(DISTINCT s.match_id) AS matches_played,
                COALESCE(SUM(CASE WHEN s.match_id IS NULL THEN 0
                                  WHEN s.score = s.max_score THEN 3
                                  ELSE 1 END), 0) AS total_points,
                COALESCE(SUM(s.score), 0) AS sets_won,
                COALESCE(SUM(CASE WHEN s.score = s.min_score THEN s.max_score
                                  ELSE s.min_score END), 0) AS sets_lost
         FROM {players} p
         LEFT JOIN match_scores s ON p.id = s.player_id
         GROUP BY p.id, p.name
         ORDER BY total_points DESC, p.name ASC, p.id ASC",
        scores = t.scores,
        players = t.players,
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(LeaderboardRow {
                player_id: row.get(0)?,
                name: row.get(1)?,
                matches_played: row.get(2)?,
                total_points: row.get(3)?,
                sets_won: row.get(4)?,
                sets_lost: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Render a leaderboard as CSV with a header row and a 1-based rank column.
pub fn leaderboard_csv(rows: &[LeaderboardRow]) -> Result<Vec<u8>, LeagueError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "rank",
        "name",
        "matches_played",
        "total_points",
        "sets_won",
        "sets_lost",
    ])?;
    for (i, row) in rows.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            row.name.clone(),
            row.matches_played.to_string(),
            row.total_points.to_string(),
            row.sets_won.to_string(),
            row.sets_lost.to_string(),
        ])?;
    }
    wtr.into_inner().map_err(|e| LeagueError::Io(e.into_error()))
}

//! Match recording (one transaction per match) and match history.

use crate::models::{LeagueError, MatchId, MatchRow, NewMatch, PlayerId, Variant};
use rusqlite::{params, Connection};

/// Map a foreign key violation (stale or unknown player id) to `UnknownPlayer`.
fn constraint_error(e: rusqlite::Error) -> LeagueError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            LeagueError::UnknownPlayer
        }
        _ => LeagueError::Database(e),
    }
}

/// Record a finished match: the match row and both score rows are committed together or not at all.
///
/// Both players must exist in `variant` and must differ.
pub fn record_match(
    conn: &mut Connection,
    variant: Variant,
    new_match: &NewMatch,
) -> Result<MatchId, LeagueError> {
    if new_match.player1_id == new_match.player2_id {
        return Err(LeagueError::SamePlayer);
    }
    let t = variant.tables();
    let tx = conn.transaction()?;

    tx.execute(
        &format!(
            "INSERT INTO {} (player1_id, player2_id) VALUES (?1, ?2)",
            t.matches
        ),
        params![new_match.player1_id, new_match.player2_id],
    )
    .map_err(constraint_error)?;
    let match_id = tx.last_insert_rowid();

    let insert_score = format!(
        "INSERT INTO {} (match_id, player_id, score) VALUES (?1, ?2, ?3)",
        t.scores
    );
    for (player_id, score) in [
        (new_match.player1_id, new_match.score1),
        (new_match.player2_id, new_match.score2),
    ] {
        tx.execute(&insert_score, params![match_id, player_id, score])
            .map_err(constraint_error)?;
    }

    tx.commit()?;
    log::info!(
        "Recorded {} match {}: player {} {} - {} player {}",
        variant,
        match_id,
        new_match.player1_id,
        new_match.score1,
        new_match.score2,
        new_match.player2_id
    );
    Ok(match_id)
}

/// Match history for `variant`, oldest first. With `player_filter`, only matches that player took part in.
pub fn list_matches(
    conn: &Connection,
    variant: Variant,
    player_filter: Option<PlayerId>,
) -> Result<Vec<MatchRow>, LeagueError> {
    let t = variant.tables();
    let sql = format!(
        "SELECT m.id, p1.name, p2.name, s1.score, s2.score, m.match_date
         FROM {matches} m
         JOIN {players} p1 ON m.player1_id = p1.id
         JOIN {players} p2 ON m.player2_id = p2.id
         JOIN {scores} s1 ON m.id = s1.match_id AND s1.player_id = p1.id
         JOIN {scores} s2 ON m.id = s2.match_id AND s2.player_id = p2.id
         WHERE ?1 IS NULL OR m.player1_id = ?1 OR m.player2_id = ?1
         ORDER BY m.match_date ASC, m.id ASC",
        matches = t.matches,
        players = t.players,
        scores = t.scores,
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([player_filter], |row| {
            Ok(MatchRow {
                match_id: row.get(0)?,
                player1: row.get(1)?,
                player2: row.get(2)?,
                player1_score: row.get(3)?,
                player2_score: row.get(4)?,
                match_date: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

//! Player registry: insert-if-absent by name, list per variant.

use crate::models::{LeagueError, Player, Variant, MAX_NAME_LEN};
use rusqlite::Connection;

/// Register `name` in `variant`. The name is trimmed first.
///
/// Returns `true` if a row was inserted; registering an existing name is a no-op and returns `false`.
pub fn add_player(conn: &Connection, variant: Variant, name: &str) -> Result<bool, LeagueError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeagueError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(LeagueError::NameTooLong);
    }
    let sql = format!(
        "INSERT INTO {} (name) VALUES (?1) ON CONFLICT (name) DO NOTHING",
        variant.tables().players
    );
    let inserted = conn.execute(&sql, [name])? > 0;
    if inserted {
        log::info!("Registered player {:?} for {}", name, variant);
    } else {
        log::debug!("Player {:?} already registered for {}", name, variant);
    }
    Ok(inserted)
}

/// All players of `variant`, in registration order. Empty when none are registered.
pub fn list_players(conn: &Connection, variant: Variant) -> Result<Vec<Player>, LeagueError> {
    let sql = format!("SELECT id, name FROM {} ORDER BY id", variant.tables().players);
    let mut stmt = conn.prepare(&sql)?;
    let players = stmt
        .query_map([], |row| Ok(Player::new(row.get(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(players)
}

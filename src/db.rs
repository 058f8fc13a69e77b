//! Database handle and schema management.

use crate::models::Variant;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide handle to the league database. Created once at startup; every
/// operation takes its own connection via [`Database::connect`] and drops it when done.
#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection with foreign key enforcement switched on.
    pub fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }
}

fn create_variant_tables(variant: Variant) -> String {
    let t = variant.tables();
    format!(
        "CREATE TABLE IF NOT EXISTS {players} (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(100) NOT NULL UNIQUE
        );
        CREATE TABLE IF NOT EXISTS {matches} (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            player1_id INTEGER REFERENCES {players} (id),
            player2_id INTEGER REFERENCES {players} (id),
            match_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        CREATE TABLE IF NOT EXISTS {scores} (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            match_id  INTEGER REFERENCES {matches} (id),
            player_id INTEGER REFERENCES {players} (id),
            score     INTEGER NOT NULL
        );",
        players = t.players,
        matches = t.matches,
        scores = t.scores,
    )
}

/// Create the players/matches/scores tables of both variants if they are missing.
/// Idempotent; safe to call on every start.
pub fn ensure_schema(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    for variant in Variant::ALL {
        tx.execute_batch(&create_variant_tables(variant))?;
        log::debug!("Schema ready for {}", variant);
    }
    tx.commit()
}

/// Drop every league table (scores first, then matches, then players). Destroys all data.
pub fn wipe_all(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    for variant in Variant::ALL {
        let t = variant.tables();
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {};
             DROP TABLE IF EXISTS {};
             DROP TABLE IF EXISTS {};",
            t.scores, t.matches, t.players
        ))?;
    }
    tx.commit()?;
    log::warn!("Dropped all league tables");
    Ok(())
}

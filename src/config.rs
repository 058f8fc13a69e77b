//! Process configuration from the environment.
//!
//! `DB_URL` is required (`sqlite://league.db`, `sqlite:league.db` or a bare path).
//! `HOST` / `PORT` default to 0.0.0.0:8080 so the app is reachable on a VPS.
//! `WIPE_ON_START=1` drops every table before the schema is recreated.

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration errors are fatal at startup.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("DB_URL is not set")]
    MissingDatabaseUrl,
    /// Only SQLite URLs and plain file paths are understood.
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabaseUrl(String),
    #[error("Invalid PORT: {0}")]
    InvalidPort(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// SQLite database file.
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub wipe_on_start: bool,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (key -> value), e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DB_URL")
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;
        let database_path = parse_database_url(url.trim())?;

        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::InvalidPort(p))?,
            None => DEFAULT_PORT,
        };
        let wipe_on_start = lookup("WIPE_ON_START")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_path,
            host,
            port,
            wipe_on_start,
        })
    }
}

/// Strip an optional `sqlite:` / `sqlite://` prefix; reject any other scheme.
pub fn parse_database_url(url: &str) -> Result<PathBuf, ConfigError> {
    let path = if let Some(rest) = url.strip_prefix("sqlite://") {
        rest
    } else if let Some(rest) = url.strip_prefix("sqlite:") {
        rest
    } else if url.contains("://") {
        return Err(ConfigError::UnsupportedDatabaseUrl(url.to_string()));
    } else {
        url
    };
    if path.is_empty() || path == ":memory:" {
        // Every operation opens its own connection, so an in-memory database would vanish between calls.
        return Err(ConfigError::UnsupportedDatabaseUrl(url.to_string()));
    }
    Ok(PathBuf::from(path))
}

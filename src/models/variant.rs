//! Game variant (501 / Cricket) and the tables each one owns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which game a player, match or leaderboard belongs to. The two variants never share rows.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    /// Classic 501.
    #[default]
    #[serde(rename = "501")]
    Standard,
    #[serde(rename = "cricket", alias = "Cricket")]
    Cricket,
}

/// Physical table names for one variant.
///
/// These are the only identifiers ever formatted into SQL; every value is bound as a parameter.
#[derive(Debug, Eq, PartialEq)]
pub struct Tables {
    pub players: &'static str,
    pub matches: &'static str,
    pub scores: &'static str,
}

const STANDARD_TABLES: Tables = Tables {
    players: "players_501",
    matches: "matches_501",
    scores: "scores_501",
};

const CRICKET_TABLES: Tables = Tables {
    players: "players_cricket",
    matches: "matches_cricket",
    scores: "scores_cricket",
};

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Standard, Variant::Cricket];

    pub fn tables(self) -> &'static Tables {
        match self {
            Variant::Standard => &STANDARD_TABLES,
            Variant::Cricket => &CRICKET_TABLES,
        }
    }

    /// Short label used in URLs and file names.
    pub fn slug(self) -> &'static str {
        match self {
            Variant::Standard => "501",
            Variant::Cricket => "cricket",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Standard => write!(f, "501"),
            Variant::Cricket => write!(f, "Cricket"),
        }
    }
}

/// Unrecognised variant name.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown game variant: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "501" => Ok(Variant::Standard),
            v if v.eq_ignore_ascii_case("cricket") => Ok(Variant::Cricket),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

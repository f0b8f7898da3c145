// Roster loading and hitter/pitcher classification.
//
// Reads the fantasy roster export (Name, Team, Eligible_Positions) and splits
// it into hitters and pitchers. Hitters always carry the synthetic UTIL tag.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::warn;

pub const UTIL: &str = "UTIL";
const PITCHING_POSITIONS: [&str; 2] = ["SP", "RP"];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One raw roster row as exported by the fantasy platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Team")]
    pub team: String,
    /// Comma-delimited eligibility, e.g. `"1B,OF"`.
    #[serde(rename = "Eligible_Positions", alias = "Positions")]
    pub positions: String,
}

impl RosterRow {
    pub fn new(name: &str, team: &str, positions: &str) -> Self {
        Self {
            name: name.to_string(),
            team: team.to_string(),
            positions: positions.to_string(),
        }
    }
}

/// A classified roster player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    /// Short team code as used by the roster (e.g. "NYY").
    pub team: String,
    /// Normalized position codes in roster order, without duplicates.
    pub eligible_positions: Vec<String>,
}

impl PlayerRecord {
    /// Whether any eligible position is a pitching slot.
    pub fn is_pitcher(&self) -> bool {
        is_pitcher_positions(&self.eligible_positions)
    }

    /// Eligibility joined for display, e.g. `"1B, OF, UTIL"`.
    pub fn positions_display(&self) -> String {
        self.eligible_positions.join(", ")
    }
}

/// Roster split into hitters and pitchers, each in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedRoster {
    pub hitters: Vec<PlayerRecord>,
    pub pitchers: Vec<PlayerRecord>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Split a comma-delimited position string into normalized codes.
///
/// Tokens are trimmed and upper-cased; empty tokens and repeats are dropped.
/// A blank string yields an empty list.
pub fn parse_positions(raw: &str) -> Vec<String> {
    let mut positions: Vec<String> = Vec::new();
    for token in raw.split(',') {
        let code = token.trim().to_uppercase();
        if code.is_empty() || positions.contains(&code) {
            continue;
        }
        positions.push(code);
    }
    positions
}

fn is_pitcher_positions(positions: &[String]) -> bool {
    positions
        .iter()
        .any(|p| PITCHING_POSITIONS.contains(&p.as_str()))
}

/// Append UTIL to a hitter's eligibility if it is not already present.
/// Pitcher eligibility is returned unchanged. Idempotent.
pub fn ensure_util(positions: &mut Vec<String>) {
    if is_pitcher_positions(positions) {
        return;
    }
    if !positions.iter().any(|p| p == UTIL) {
        positions.push(UTIL.to_string());
    }
}

/// Build a player record from a raw row, applying the UTIL rule.
pub fn player_from_row(row: &RosterRow) -> PlayerRecord {
    let mut eligible_positions = parse_positions(&row.positions);
    if eligible_positions.is_empty() {
        warn!("roster player '{}' has no eligible positions", row.name.trim());
    }
    ensure_util(&mut eligible_positions);
    PlayerRecord {
        name: row.name.trim().to_string(),
        team: row.team.trim().to_uppercase(),
        eligible_positions,
    }
}

/// Partition roster rows into hitters and pitchers, preserving input order
/// within each class.
pub fn classify(rows: &[RosterRow]) -> ClassifiedRoster {
    let mut roster = ClassifiedRoster::default();
    for row in rows {
        let player = player_from_row(row);
        if player.is_pitcher() {
            roster.pitchers.push(player);
        } else {
            roster.hitters.push(player);
        }
    }
    roster
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

fn load_rows_from_reader<R: Read>(rdr: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RosterRow>() {
        match result {
            Ok(row) => {
                if row.name.trim().is_empty() {
                    warn!("skipping roster row with empty name");
                    continue;
                }
                rows.push(row);
            }
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
            }
        }
    }
    Ok(rows)
}

/// Load raw roster rows from a CSV file. A file with no usable rows is
/// rejected.
pub fn load_roster(path: &Path) -> Result<Vec<RosterRow>, RosterError> {
    let file = std::fs::File::open(path).map_err(|e| RosterError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let rows = load_rows_from_reader(file).map_err(|e| RosterError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if rows.is_empty() {
        return Err(RosterError::Validation(format!(
            "roster {} produced zero valid rows",
            path.display()
        )));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Fantasy points-per-game from season batting totals.
//
// points = TB + BB + R + RBI + SB - K, divided by games played.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::lookup::Lookup;
use crate::source::NamedBattingTotals;

/// Season batting aggregate. Any field may be missing from the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonBattingTotals {
    #[serde(default)]
    pub total_bases: Option<u32>,
    #[serde(default)]
    pub walks: Option<u32>,
    #[serde(default)]
    pub runs: Option<u32>,
    #[serde(default)]
    pub runs_batted_in: Option<u32>,
    #[serde(default)]
    pub stolen_bases: Option<u32>,
    #[serde(default)]
    pub strikeouts: Option<u32>,
    #[serde(default)]
    pub games_played: Option<u32>,
}

/// Raw fantasy points. Missing stats count as zero.
pub fn points(totals: &SeasonBattingTotals) -> i64 {
    let stat = |v: Option<u32>| i64::from(v.unwrap_or(0));
    stat(totals.total_bases)
        + stat(totals.walks)
        + stat(totals.runs)
        + stat(totals.runs_batted_in)
        + stat(totals.stolen_bases)
        - stat(totals.strikeouts)
}

/// Fantasy points per game, rounded to two decimals.
///
/// Missing `games_played` counts as 1 and zero is clamped to 1.
pub fn rate(totals: &SeasonBattingTotals) -> f64 {
    let games = totals.games_played.unwrap_or(1).max(1);
    round2(points(totals) as f64 / f64::from(games))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn name_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Season totals keyed by player name for one report run.
#[derive(Debug, Clone, Default)]
pub struct BattingIndex {
    by_name: HashMap<String, SeasonBattingTotals>,
}

impl BattingIndex {
    pub fn build(entries: Vec<NamedBattingTotals>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        for entry in entries {
            let key = name_key(&entry.name);
            if key.is_empty() {
                continue;
            }
            if by_name.contains_key(&key) {
                warn!("duplicate batting totals for '{}', using latest", entry.name.trim());
            }
            by_name.insert(key, entry.totals);
        }
        Self { by_name }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn totals_for(&self, name: &str) -> Lookup<&SeasonBattingTotals> {
        self.by_name.get(&name_key(name)).into()
    }

    /// Points per game for a hitter, or `Unresolved` when no totals match.
    pub fn rate_for(&self, name: &str) -> Lookup<f64> {
        self.totals_for(name).map(rate)
    }
}

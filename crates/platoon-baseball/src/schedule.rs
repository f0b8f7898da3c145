// Per-date schedule index: opponents and probable pitchers by club.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::lookup::Lookup;

/// Reference to an announced probable pitcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitcherRef {
    pub id: u64,
    pub name: String,
}

impl PitcherRef {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// One scheduled game, as reported by the schedule feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_probable: Option<PitcherRef>,
    #[serde(default)]
    pub away_probable: Option<PitcherRef>,
    /// 1 for a single game, 2 for the second half of a double header.
    #[serde(default = "default_game_number")]
    pub game_number: u8,
}

fn default_game_number() -> u8 {
    1
}

impl ScheduleEntry {
    pub fn new(home_team: &str, away_team: &str) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_probable: None,
            away_probable: None,
            game_number: 1,
        }
    }

    pub fn with_probables(mut self, home: Option<PitcherRef>, away: Option<PitcherRef>) -> Self {
        self.home_probable = home;
        self.away_probable = away;
        self
    }

    pub fn with_game_number(mut self, game_number: u8) -> Self {
        self.game_number = game_number;
        self
    }
}

/// Opponent and probable-pitcher lookups for one date's slate, keyed by full
/// club name.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    opponents: HashMap<String, String>,
    probables: HashMap<String, PitcherRef>,
    games: HashMap<(String, u8), String>,
}

impl ScheduleIndex {
    /// Build the index in one pass over the slate.
    ///
    /// A club appearing in several games (double header) keeps the opponent
    /// from the last game seen and the last announced probable pitcher; every
    /// game stays reachable through `opponent_in_game`.
    pub fn build(date: NaiveDate, games: &[ScheduleEntry]) -> Self {
        let mut index = ScheduleIndex::default();

        for game in games {
            let home = game.home_team.trim().to_string();
            let away = game.away_team.trim().to_string();

            index.opponents.insert(home.clone(), away.clone());
            index.opponents.insert(away.clone(), home.clone());

            index
                .games
                .insert((home.clone(), game.game_number), away.clone());
            index
                .games
                .insert((away.clone(), game.game_number), home.clone());

            // Only an announced pitcher overwrites; a later game without one
            // keeps the pitcher from an earlier game.
            if let Some(p) = &game.home_probable {
                index.probables.insert(home, p.clone());
            }
            if let Some(p) = &game.away_probable {
                index.probables.insert(away, p.clone());
            }
        }

        debug!(
            date = %date,
            games = games.len(),
            probables = index.probables.len(),
            "schedule index built"
        );
        index
    }

    /// Number of clubs on the slate.
    pub fn team_count(&self) -> usize {
        self.opponents.len()
    }

    pub fn opponent_of(&self, team: &str) -> Lookup<&str> {
        self.opponents.get(team.trim()).map(String::as_str).into()
    }

    pub fn probable_pitcher_of(&self, team: &str) -> Lookup<&PitcherRef> {
        self.probables.get(team.trim()).into()
    }

    /// Every club with an announced probable pitcher, ordered by club name.
    pub fn probable_pitchers(&self) -> Vec<(&str, &PitcherRef)> {
        let mut slate: Vec<(&str, &PitcherRef)> = self
            .probables
            .iter()
            .map(|(team, pitcher)| (team.as_str(), pitcher))
            .collect();
        slate.sort_by(|a, b| a.0.cmp(b.0));
        slate
    }

    /// Opponent in a specific game of the day (1 or 2 for double headers).
    pub fn opponent_in_game(&self, team: &str, game_number: u8) -> Lookup<&str> {
        self.games
            .get(&(team.trim().to_string(), game_number))
            .map(String::as_str)
            .into()
    }
}

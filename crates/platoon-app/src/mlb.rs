// MLB Stats API client.
//
// Fetches the day's schedule (with probable pitchers), pitcher detail with
// season pitching splits, and league-wide season batting totals, then maps
// the wire JSON into the pipeline's domain types.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use platoon_baseball::schedule::{PitcherRef, ScheduleEntry};
use platoon_baseball::scoring::SeasonBattingTotals;
use platoon_baseball::source::{
    MatchupSource, NamedBattingTotals, PitcherDetail, SourceError, StatSplit,
};

use crate::config::StatsApiConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const SPORT_ID_MLB: u8 = 1;
const HITTING_POOL_LIMIT: u32 = 2000;

// ---------------------------------------------------------------------------
// Wire types: schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDate {
    #[serde(default)]
    games: Vec<RawGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGame {
    #[serde(default)]
    game_number: Option<u8>,
    teams: RawGameTeams,
}

#[derive(Debug, Deserialize)]
struct RawGameTeams {
    home: RawGameSide,
    away: RawGameSide,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGameSide {
    team: RawTeam,
    #[serde(default)]
    probable_pitcher: Option<RawPerson>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerson {
    id: u64,
    #[serde(default)]
    full_name: String,
}

// ---------------------------------------------------------------------------
// Wire types: people
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct PeopleResponse {
    #[serde(default)]
    people: Vec<RawPitcher>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPitcher {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    pitch_hand: Option<RawHand>,
    #[serde(default)]
    stats: Vec<RawStatGroup>,
}

#[derive(Debug, Deserialize)]
struct RawHand {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStatGroup {
    #[serde(rename = "type", default)]
    stat_type: Option<RawDisplayName>,
    #[serde(default)]
    group: Option<RawDisplayName>,
    #[serde(default)]
    splits: Vec<RawPitchingSplit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDisplayName {
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct RawPitchingSplit {
    #[serde(default)]
    stat: RawPitchingStat,
}

#[derive(Debug, Default, Deserialize)]
struct RawPitchingStat {
    /// ERA arrives as a string ("4.50", "-.--") but tolerate numbers too.
    #[serde(default)]
    era: Option<Value>,
}

// ---------------------------------------------------------------------------
// Wire types: season hitting stats
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    stats: Vec<RawHittingGroup>,
}

#[derive(Debug, Deserialize)]
struct RawHittingGroup {
    #[serde(default)]
    splits: Vec<RawHittingSplit>,
}

#[derive(Debug, Deserialize)]
struct RawHittingSplit {
    player: RawPlayerName,
    #[serde(default)]
    stat: RawHittingStat,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlayerName {
    #[serde(default)]
    full_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHittingStat {
    #[serde(default)]
    total_bases: Option<u32>,
    #[serde(default)]
    base_on_balls: Option<u32>,
    #[serde(default)]
    runs: Option<u32>,
    #[serde(default)]
    rbi: Option<u32>,
    #[serde(default)]
    stolen_bases: Option<u32>,
    #[serde(default)]
    strike_outs: Option<u32>,
    #[serde(default)]
    games_played: Option<u32>,
}

// ---------------------------------------------------------------------------
// Mapping: wire types -> domain types
// ---------------------------------------------------------------------------

fn person_ref(person: RawPerson) -> PitcherRef {
    PitcherRef {
        id: person.id,
        name: person.full_name.trim().to_string(),
    }
}

fn map_schedule(raw: ScheduleResponse) -> Vec<ScheduleEntry> {
    raw.dates
        .into_iter()
        .flat_map(|d| d.games)
        .map(|game| ScheduleEntry {
            home_team: game.teams.home.team.name,
            away_team: game.teams.away.team.name,
            home_probable: game.teams.home.probable_pitcher.map(person_ref),
            away_probable: game.teams.away.probable_pitcher.map(person_ref),
            game_number: game.game_number.unwrap_or(1),
        })
        .collect()
}

fn era_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_pitching_group(group: &RawStatGroup) -> bool {
    group
        .group
        .as_ref()
        .map_or(true, |g| g.display_name.eq_ignore_ascii_case("pitching"))
}

fn map_pitcher(raw: PeopleResponse, pitcher_id: u64) -> Result<PitcherDetail, SourceError> {
    let person = raw
        .people
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::NotFound(format!("person {pitcher_id}")))?;

    let season_splits = person
        .stats
        .iter()
        .filter(|group| is_pitching_group(group))
        .map(|group| StatSplit {
            stat_type: group
                .stat_type
                .as_ref()
                .map(|t| t.display_name.clone())
                .unwrap_or_default(),
            era: group
                .splits
                .first()
                .and_then(|s| s.stat.era.as_ref())
                .and_then(era_text),
        })
        .collect();

    Ok(PitcherDetail {
        name: person.full_name.trim().to_string(),
        hand_code: person.pitch_hand.and_then(|h| h.code),
        season_splits,
    })
}

fn map_batting(raw: StatsResponse) -> Vec<NamedBattingTotals> {
    raw.stats
        .into_iter()
        .flat_map(|g| g.splits)
        .map(|split| NamedBattingTotals {
            name: split.player.full_name.trim().to_string(),
            totals: SeasonBattingTotals {
                total_bases: split.stat.total_bases,
                walks: split.stat.base_on_balls,
                runs: split.stat.runs,
                runs_batted_in: split.stat.rbi,
                stolen_bases: split.stat.stolen_bases,
                strikeouts: split.stat.strike_outs,
                games_played: split.stat.games_played,
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// StatsApiClient
// ---------------------------------------------------------------------------

/// `MatchupSource` backed by the public MLB Stats API.
#[derive(Debug, Clone)]
pub struct StatsApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    /// Season for pitcher ERA splits; the feed's current season when `None`.
    pitching_season: Option<i32>,
}

impl StatsApiClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            pitching_season: None,
        })
    }

    pub fn with_pitching_season(mut self, season: Option<i32>) -> Self {
        self.pitching_season = season;
        self
    }

    pub fn from_config(config: &StatsApiConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.base_url, &config.user_agent, config.timeout())
    }

    fn schedule_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/schedule?sportId={SPORT_ID_MLB}&date={}&hydrate=probablePitcher",
            self.base_url,
            date.format("%Y-%m-%d")
        )
    }

    fn person_url(&self, pitcher_id: u64) -> String {
        match self.pitching_season {
            Some(season) => format!(
                "{}/people/{pitcher_id}?hydrate=stats(group=[pitching],type=[season],season={season})",
                self.base_url
            ),
            None => format!(
                "{}/people/{pitcher_id}?hydrate=stats(group=[pitching],type=[season])",
                self.base_url
            ),
        }
    }

    fn hitting_url(&self, season: i32) -> String {
        format!(
            "{}/stats?stats=season&group=hitting&season={season}&sportId={SPORT_ID_MLB}\
             &playerPool=all&limit={HITTING_POOL_LIMIT}",
            self.base_url
        )
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SourceError::Transport {
                url: url.to_owned(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SourceError::Transport {
            url: url.to_owned(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| SourceError::Decode {
            url: url.to_owned(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl MatchupSource for StatsApiClient {
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<Vec<ScheduleEntry>, SourceError> {
        let raw: ScheduleResponse = self.get(&self.schedule_url(date)).await?;
        Ok(map_schedule(raw))
    }

    async fn fetch_pitcher_detail(&self, pitcher_id: u64) -> Result<PitcherDetail, SourceError> {
        let raw: PeopleResponse = self.get(&self.person_url(pitcher_id)).await?;
        map_pitcher(raw, pitcher_id)
    }

    async fn fetch_season_batting_totals(
        &self,
        season: i32,
    ) -> Result<Vec<NamedBattingTotals>, SourceError> {
        let raw: StatsResponse = self.get(&self.hitting_url(season)).await?;
        Ok(map_batting(raw))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

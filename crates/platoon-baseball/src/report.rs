// Matchup report orchestration: roster + schedule + pitcher detail + batting
// totals -> one recommendation per hitter.
//
// Run sequence:
// 1. Classify the roster into hitters and pitchers
// 2. Fetch and index the date's schedule
// 3. Fetch season batting totals for the date's year
// 4. Prefetch every distinct probable pitcher on the slate concurrently
// 5. Build one MatchupRecord per hitter, in roster order
// 6. List the slate's probable pitchers by club

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::lookup::Lookup;
use crate::matchup::{tier, Tier};
use crate::pitcher::{PitcherProfile, PitcherProfileResolver};
use crate::roster::{classify, PlayerRecord, RosterRow};
use crate::schedule::{PitcherRef, ScheduleIndex};
use crate::scoring::BattingIndex;
use crate::source::{MatchupSource, SourceError};
use crate::teams;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Recommendation for one rostered hitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub hitter_name: String,
    pub team: String,
    /// Opponent's roster code (or feed name when the club is not in the
    /// code table).
    pub opponent: Lookup<String>,
    pub pitcher_name: String,
    pub throwing_hand: String,
    pub era: Lookup<f64>,
    pub tier: Tier,
    pub fantasy_points_per_game: Lookup<f64>,
}

/// A club on the slate and its announced starter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlatePitcher {
    /// Full club name as the schedule feed reports it.
    pub team: String,
    pub profile: PitcherProfile,
}

/// Result of one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupReport {
    pub date: NaiveDate,
    pub records: Vec<MatchupRecord>,
    pub hitters: Vec<PlayerRecord>,
    pub pitchers: Vec<PlayerRecord>,
    /// Every announced probable pitcher for the date, ordered by club name.
    pub probable_pitchers: Vec<SlatePitcher>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to fetch schedule for {date}: {source}")]
    Schedule {
        date: NaiveDate,
        source: SourceError,
    },
}

/// Builds matchup reports from a data source. Holds no per-run state; every
/// call to `build` gets its own schedule index and pitcher cache.
pub struct MatchupReportBuilder<'a, S: MatchupSource + ?Sized> {
    source: &'a S,
    fetch_timeout: Duration,
    season: Option<i32>,
}

impl<'a, S: MatchupSource + ?Sized> MatchupReportBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            season: None,
        }
    }

    /// Upper bound for each individual external fetch.
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Season for batting totals; defaults to the report date's year.
    pub fn with_season(mut self, season: Option<i32>) -> Self {
        self.season = season;
        self
    }

    /// Run the full pipeline for `date`.
    ///
    /// Only a schedule transport failure aborts the run. A schedule timeout
    /// is treated as an empty slate; pitcher and batting-totals failures
    /// degrade the affected fields to `Unresolved`.
    pub async fn build(
        &self,
        roster: &[RosterRow],
        date: NaiveDate,
    ) -> Result<MatchupReport, ReportError> {
        let classified = classify(roster);
        info!(
            "Classified roster: {} hitters, {} pitchers",
            classified.hitters.len(),
            classified.pitchers.len()
        );

        let schedule = self.load_schedule(date).await?;
        let season = self.season.unwrap_or_else(|| date.year());
        let batting = self.load_batting(season).await;

        let mut resolver = PitcherProfileResolver::new(self.source, self.fetch_timeout);
        let slate: Vec<PitcherRef> = schedule
            .probable_pitchers()
            .into_iter()
            .map(|(_, pitcher)| pitcher.clone())
            .collect();
        resolver.prefetch(&slate).await;

        let mut records = Vec::with_capacity(classified.hitters.len());
        for hitter in &classified.hitters {
            let record = build_record(hitter, &schedule, &batting, &mut resolver).await;
            debug!(
                hitter = %record.hitter_name,
                tier = %record.tier,
                "matchup record built"
            );
            records.push(record);
        }

        let mut probable_pitchers = Vec::with_capacity(slate.len());
        for (team, pitcher) in schedule.probable_pitchers() {
            probable_pitchers.push(SlatePitcher {
                team: team.to_string(),
                profile: resolver.resolve(Lookup::Resolved(pitcher)).await,
            });
        }

        let with_opponent = records.iter().filter(|r| r.opponent.is_resolved()).count();
        info!(
            "Built {} matchup records for {} ({} with a game, {} pitcher lookups)",
            records.len(),
            date,
            with_opponent,
            resolver.cache().len()
        );

        Ok(MatchupReport {
            date,
            records,
            hitters: classified.hitters,
            pitchers: classified.pitchers,
            probable_pitchers,
        })
    }

    async fn load_schedule(&self, date: NaiveDate) -> Result<ScheduleIndex, ReportError> {
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch_schedule(date)).await {
            Ok(Ok(games)) => {
                let index = ScheduleIndex::build(date, &games);
                info!(
                    "Fetched {} games for {} ({} clubs on the slate)",
                    games.len(),
                    date,
                    index.team_count()
                );
                Ok(index)
            }
            Ok(Err(source)) => Err(ReportError::Schedule { date, source }),
            Err(_) => {
                warn!(
                    "schedule fetch for {} timed out after {:?}; treating slate as empty",
                    date, self.fetch_timeout
                );
                Ok(ScheduleIndex::build(date, &[]))
            }
        }
    }

    async fn load_batting(&self, season: i32) -> BattingIndex {
        let fetch = self.source.fetch_season_batting_totals(season);
        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(entries)) => {
                let index = BattingIndex::build(entries);
                info!("Loaded {} season batting totals for {}", index.len(), season);
                index
            }
            Ok(Err(e)) => {
                warn!("season batting totals for {} unavailable: {}", season, e);
                BattingIndex::default()
            }
            Err(_) => {
                warn!(
                    "season batting totals for {} timed out after {:?}",
                    season, self.fetch_timeout
                );
                BattingIndex::default()
            }
        }
    }
}

/// Opponent's full club name for a roster team code. Unmapped codes fail
/// closed.
fn opponent_full_name<'s>(schedule: &'s ScheduleIndex, team_code: &str) -> Lookup<&'s str> {
    Lookup::from(teams::full_name(team_code)).and_then(|full| schedule.opponent_of(full))
}

fn opposing_pitcher<'s>(schedule: &'s ScheduleIndex, team_code: &str) -> Lookup<&'s PitcherRef> {
    opponent_full_name(schedule, team_code).and_then(|opp| schedule.probable_pitcher_of(opp))
}

async fn build_record<S: MatchupSource + ?Sized>(
    hitter: &PlayerRecord,
    schedule: &ScheduleIndex,
    batting: &BattingIndex,
    resolver: &mut PitcherProfileResolver<'_, S>,
) -> MatchupRecord {
    if teams::full_name(&hitter.team).is_none() {
        warn!("unknown team code '{}' for {}", hitter.team, hitter.name);
    }

    let opponent = opponent_full_name(schedule, &hitter.team)
        .map(|name| teams::code_for(name).unwrap_or(name).to_string());
    let profile: PitcherProfile = resolver.resolve(opposing_pitcher(schedule, &hitter.team)).await;

    MatchupRecord {
        hitter_name: hitter.name.clone(),
        team: hitter.team.clone(),
        opponent,
        tier: tier(profile.era.clone()),
        pitcher_name: profile.name,
        throwing_hand: profile.throwing_hand,
        era: profile.era,
        fantasy_points_per_game: batting.rate_for(&hitter.name),
    }
}

// Integration tests for the matchup report pipeline.
//
// Drive `MatchupReportBuilder` end to end against an in-memory
// `MatchupSource` that records how often each dataset is requested.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use platoon_baseball::pitcher::UNKNOWN_PITCHER;
use platoon_baseball::roster::RosterRow;
use platoon_baseball::schedule::{PitcherRef, ScheduleEntry};
use platoon_baseball::scoring::SeasonBattingTotals;
use platoon_baseball::source::{
    MatchupSource, NamedBattingTotals, PitcherDetail, SourceError, StatSplit,
};
use platoon_baseball::{Lookup, MatchupReportBuilder, ReportError, SlatePitcher, Tier};

// ===========================================================================
// Test helpers
// ===========================================================================

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 9).unwrap()
}

#[derive(Default)]
struct FakeSource {
    games: Vec<ScheduleEntry>,
    details: HashMap<u64, PitcherDetail>,
    batting: Vec<NamedBattingTotals>,
    schedule_fails: bool,
    schedule_stalls: bool,
    batting_fails: bool,
    batting_stalls: bool,
    detail_calls: AtomicUsize,
    batting_seasons: std::sync::Mutex<Vec<i32>>,
}

#[async_trait]
impl MatchupSource for FakeSource {
    async fn fetch_schedule(&self, _date: NaiveDate) -> Result<Vec<ScheduleEntry>, SourceError> {
        if self.schedule_stalls {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.schedule_fails {
            return Err(SourceError::Status {
                url: "schedule".into(),
                status: 503,
            });
        }
        Ok(self.games.clone())
    }

    async fn fetch_pitcher_detail(&self, pitcher_id: u64) -> Result<PitcherDetail, SourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .get(&pitcher_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("person {pitcher_id}")))
    }

    async fn fetch_season_batting_totals(
        &self,
        season: i32,
    ) -> Result<Vec<NamedBattingTotals>, SourceError> {
        self.batting_seasons.lock().unwrap().push(season);
        if self.batting_stalls {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.batting_fails {
            return Err(SourceError::Transport {
                url: "stats".into(),
                message: "connection reset".into(),
            });
        }
        Ok(self.batting.clone())
    }
}

fn season_detail(name: &str, hand: &str, era: &str) -> PitcherDetail {
    PitcherDetail {
        name: name.into(),
        hand_code: Some(hand.into()),
        season_splits: vec![StatSplit {
            stat_type: "season".into(),
            era: Some(era.into()),
        }],
    }
}

fn jane_totals() -> NamedBattingTotals {
    NamedBattingTotals {
        name: "Jane Doe".into(),
        totals: SeasonBattingTotals {
            total_bases: Some(150),
            walks: Some(40),
            runs: Some(50),
            runs_batted_in: Some(55),
            stolen_bases: Some(5),
            strikeouts: Some(80),
            games_played: Some(90),
        },
    }
}

/// NYY host BOS; BOS starts Tom Roe (id 555, R, 4.50).
fn yankees_red_sox() -> FakeSource {
    let mut details = HashMap::new();
    details.insert(555, season_detail("Tom Roe", "R", "4.50"));
    FakeSource {
        games: vec![ScheduleEntry::new("New York Yankees", "Boston Red Sox")
            .with_probables(None, Some(PitcherRef::new(555, "Tom Roe")))],
        details,
        batting: vec![jane_totals()],
        ..Default::default()
    }
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[tokio::test]
async fn hitter_facing_announced_pitcher_gets_full_record() {
    let source = yankees_red_sox();
    let roster = vec![RosterRow::new("Jane Doe", "NYY", "1B,OF")];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    assert_eq!(report.hitters[0].eligible_positions, vec!["1B", "OF", "UTIL"]);
    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.hitter_name, "Jane Doe");
    assert_eq!(record.team, "NYY");
    assert_eq!(record.opponent, Lookup::Resolved("BOS".to_string()));
    assert_eq!(record.pitcher_name, "Tom Roe");
    assert_eq!(record.throwing_hand, "R");
    assert_eq!(record.era, Lookup::Resolved(4.5));
    assert_eq!(record.tier, Tier::Start);
    // (150 + 40 + 50 + 55 + 5 - 80) / 90 = 2.444...
    assert_eq!(record.fantasy_points_per_game, Lookup::Resolved(2.44));
}

#[tokio::test]
async fn team_without_game_is_unknown() {
    let source = FakeSource::default();
    let roster = vec![RosterRow::new("Jane Doe", "NYY", "1B")];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    let record = &report.records[0];
    assert_eq!(record.opponent, Lookup::Unresolved);
    assert_eq!(record.pitcher_name, UNKNOWN_PITCHER);
    assert_eq!(record.throwing_hand, "?");
    assert_eq!(record.era, Lookup::Unresolved);
    assert_eq!(record.tier, Tier::Unknown);
    assert_eq!(record.fantasy_points_per_game, Lookup::Unresolved);
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn opponent_without_probable_pitcher_keeps_opponent() {
    let source = yankees_red_sox();
    // BOS hitter faces NYY, which has no announced starter.
    let roster = vec![RosterRow::new("Road Bat", "BOS", "SS")];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    let record = &report.records[0];
    assert_eq!(record.opponent, Lookup::Resolved("NYY".to_string()));
    assert_eq!(record.pitcher_name, UNKNOWN_PITCHER);
    assert_eq!(record.tier, Tier::Unknown);
}

#[tokio::test]
async fn unmapped_team_code_fails_closed() {
    let source = yankees_red_sox();
    let roster = vec![RosterRow::new("Mystery", "XYZ", "C")];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    assert_eq!(report.records[0].opponent, Lookup::Unresolved);
    assert_eq!(report.records[0].pitcher_name, UNKNOWN_PITCHER);
}

#[tokio::test]
async fn era_boundaries_flow_through_to_tier() {
    let mut details = HashMap::new();
    details.insert(1, season_detail("Five Flat", "L", "5.00"));
    details.insert(2, season_detail("Just Under", "R", "4.999"));
    let source = FakeSource {
        games: vec![
            ScheduleEntry::new("Seattle Mariners", "Houston Astros")
                .with_probables(None, Some(PitcherRef::new(1, "Five Flat"))),
            ScheduleEntry::new("Texas Rangers", "Toronto Blue Jays")
                .with_probables(None, Some(PitcherRef::new(2, "Just Under"))),
        ],
        details,
        ..Default::default()
    };
    let roster = vec![
        RosterRow::new("Mariner", "SEA", "CF"),
        RosterRow::new("Ranger", "TEX", "3B"),
    ];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    assert_eq!(report.records[0].tier, Tier::StrongStart);
    assert_eq!(report.records[1].tier, Tier::Start);
}

#[tokio::test]
async fn shared_opposing_pitcher_is_fetched_once() {
    let source = yankees_red_sox();
    let roster = vec![
        RosterRow::new("Jane Doe", "NYY", "1B"),
        RosterRow::new("Second Yankee", "NYY", "2B"),
        RosterRow::new("Third Yankee", "nyy", "3B"),
    ];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    assert_eq!(report.records.len(), 3);
    assert!(report.records.iter().all(|r| r.pitcher_name == "Tom Roe"));
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn records_follow_roster_order_and_skip_pitchers() {
    let source = yankees_red_sox();
    let roster = vec![
        RosterRow::new("Zed", "NYY", "OF"),
        RosterRow::new("Ace", "NYY", "SP"),
        RosterRow::new("Amy", "BOS", "C"),
        RosterRow::new("Mid", "CHC", "1B"),
    ];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    let names: Vec<_> = report.records.iter().map(|r| r.hitter_name.as_str()).collect();
    assert_eq!(names, vec!["Zed", "Amy", "Mid"]);
    assert_eq!(report.pitchers.len(), 1);
    assert_eq!(report.pitchers[0].name, "Ace");
}

#[tokio::test]
async fn missing_pitcher_detail_degrades_per_hitter() {
    let mut source = yankees_red_sox();
    source.details.clear();
    let roster = vec![RosterRow::new("Jane Doe", "NYY", "1B")];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    let record = &report.records[0];
    assert_eq!(record.pitcher_name, "Tom Roe");
    assert_eq!(record.throwing_hand, "?");
    assert_eq!(record.era, Lookup::Unresolved);
    assert_eq!(record.tier, Tier::Unknown);
    assert_eq!(record.fantasy_points_per_game, Lookup::Resolved(2.44));
}

#[tokio::test]
async fn batting_totals_failure_leaves_rate_unavailable() {
    let source = FakeSource {
        batting_fails: true,
        ..yankees_red_sox()
    };
    let roster = vec![RosterRow::new("Jane Doe", "NYY", "1B")];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    assert_eq!(report.records[0].fantasy_points_per_game, Lookup::Unresolved);
    assert_eq!(report.records[0].tier, Tier::Start);
}

#[tokio::test(start_paused = true)]
async fn stalled_batting_totals_time_out() {
    let source = FakeSource {
        batting_stalls: true,
        ..yankees_red_sox()
    };
    let roster = vec![RosterRow::new("Jane Doe", "NYY", "1B")];

    let report = MatchupReportBuilder::new(&source)
        .with_fetch_timeout(Duration::from_secs(1))
        .build(&roster, date())
        .await
        .unwrap();

    assert_eq!(report.records[0].fantasy_points_per_game, Lookup::Unresolved);
    assert_eq!(report.records[0].pitcher_name, "Tom Roe");
}

#[tokio::test]
async fn schedule_failure_aborts_the_run() {
    let source = FakeSource {
        schedule_fails: true,
        ..Default::default()
    };
    let roster = vec![RosterRow::new("Jane Doe", "NYY", "1B")];

    let err = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap_err();

    match err {
        ReportError::Schedule { date: d, .. } => assert_eq!(d, date()),
    }
}

#[tokio::test]
async fn season_defaults_to_report_year_and_can_be_overridden() {
    let source = yankees_red_sox();
    let roster = vec![RosterRow::new("Jane Doe", "NYY", "1B")];

    MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();
    MatchupReportBuilder::new(&source)
        .with_season(Some(2023))
        .build(&roster, date())
        .await
        .unwrap();

    assert_eq!(*source.batting_seasons.lock().unwrap(), vec![2024, 2023]);
}

#[tokio::test]
async fn each_run_starts_with_an_empty_cache() {
    let source = yankees_red_sox();
    let roster = vec![RosterRow::new("Jane Doe", "NYY", "1B")];
    let builder = MatchupReportBuilder::new(&source);

    builder.build(&roster, date()).await.unwrap();
    builder.build(&roster, date()).await.unwrap();

    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn stalled_schedule_runs_with_an_empty_slate() {
    let source = FakeSource {
        schedule_stalls: true,
        ..yankees_red_sox()
    };
    let roster = vec![
        RosterRow::new("Jane Doe", "NYY", "1B"),
        RosterRow::new("Road Bat", "BOS", "SS"),
    ];

    let report = MatchupReportBuilder::new(&source)
        .with_fetch_timeout(Duration::from_secs(1))
        .build(&roster, date())
        .await
        .unwrap();

    assert_eq!(report.records.len(), 2);
    for record in &report.records {
        assert_eq!(record.opponent, Lookup::Unresolved);
        assert_eq!(record.pitcher_name, UNKNOWN_PITCHER);
        assert_eq!(record.tier, Tier::Unknown);
    }
    assert!(report.probable_pitchers.is_empty());
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 0);
    // Batting totals still load once the schedule gives up.
    assert_eq!(
        report.records[0].fantasy_points_per_game,
        Lookup::Resolved(2.44)
    );
}

#[tokio::test]
async fn slate_lists_every_announced_pitcher_by_club() {
    let mut details = HashMap::new();
    details.insert(555, season_detail("Tom Roe", "R", "4.50"));
    details.insert(101, season_detail("Home Arm", "L", "2.10"));
    let source = FakeSource {
        games: vec![
            ScheduleEntry::new("New York Yankees", "Boston Red Sox")
                .with_probables(None, Some(PitcherRef::new(555, "Tom Roe"))),
            ScheduleEntry::new("Seattle Mariners", "Houston Astros").with_probables(
                Some(PitcherRef::new(101, "Home Arm")),
                Some(PitcherRef::new(202, "Road Arm")),
            ),
        ],
        details,
        ..Default::default()
    };
    // Nobody on the roster faces Seattle or Houston.
    let roster = vec![RosterRow::new("Jane Doe", "NYY", "1B")];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    let teams: Vec<_> = report
        .probable_pitchers
        .iter()
        .map(|p| p.team.as_str())
        .collect();
    assert_eq!(teams, vec!["Boston Red Sox", "Houston Astros", "Seattle Mariners"]);

    assert_eq!(report.probable_pitchers[0].profile.era, Lookup::Resolved(4.5));
    // 202 has no detail: listed with the schedule's name and nothing else.
    let houston: &SlatePitcher = &report.probable_pitchers[1];
    assert_eq!(houston.profile.name, "Road Arm");
    assert_eq!(houston.profile.throwing_hand, "?");
    assert_eq!(houston.profile.era, Lookup::Unresolved);
    assert_eq!(report.probable_pitchers[2].profile.throwing_hand, "L");

    // One fetch per distinct pitcher, shared with the matchup records.
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 3);
    assert_eq!(report.records[0].pitcher_name, "Tom Roe");
}

#[tokio::test]
async fn double_header_keeps_earlier_announced_pitcher() {
    let mut details = HashMap::new();
    details.insert(9, season_detail("Early Arm", "R", "3.20"));
    let source = FakeSource {
        games: vec![
            ScheduleEntry::new("Chicago Cubs", "St. Louis Cardinals")
                .with_probables(Some(PitcherRef::new(9, "Early Arm")), None),
            ScheduleEntry::new("Chicago Cubs", "St. Louis Cardinals").with_game_number(2),
        ],
        details,
        ..Default::default()
    };
    let roster = vec![RosterRow::new("Redbird", "STL", "OF")];

    let report = MatchupReportBuilder::new(&source)
        .build(&roster, date())
        .await
        .unwrap();

    let record = &report.records[0];
    assert_eq!(record.opponent, Lookup::Resolved("CHC".to_string()));
    assert_eq!(record.pitcher_name, "Early Arm");
    assert_eq!(record.tier, Tier::Risky);
}

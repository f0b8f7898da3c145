// Data-source seam between the matchup pipeline and the outside world.
//
// The report builder only sees parsed records through `MatchupSource`; the
// HTTP client in the app crate and the fakes in tests both implement it.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleEntry;
use crate::scoring::SeasonBattingTotals;

/// One statistics split from a pitcher's detail payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSplit {
    /// Split type as the feed names it, e.g. `"season"` or `"statsSingleSeason"`.
    pub stat_type: String,
    /// ERA exactly as reported; may be absent or a placeholder like `"-.--"`.
    pub era: Option<String>,
}

/// Player-detail payload for a pitcher.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PitcherDetail {
    pub name: String,
    /// Throwing-hand code (`"R"`, `"L"`, `"S"`), if reported.
    pub hand_code: Option<String>,
    pub season_splits: Vec<StatSplit>,
}

/// Season batting totals for one player, keyed by display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedBattingTotals {
    pub name: String,
    pub totals: SeasonBattingTotals,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),
}

/// Provider of the three external datasets a report joins together.
#[async_trait]
pub trait MatchupSource: Send + Sync {
    /// All games scheduled on `date`.
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<Vec<ScheduleEntry>, SourceError>;

    /// Detail and season pitching splits for one pitcher.
    async fn fetch_pitcher_detail(&self, pitcher_id: u64) -> Result<PitcherDetail, SourceError>;

    /// Season batting totals for every player with a plate appearance in `season`.
    async fn fetch_season_batting_totals(
        &self,
        season: i32,
    ) -> Result<Vec<NamedBattingTotals>, SourceError>;
}

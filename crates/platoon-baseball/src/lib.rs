// Matchup pipeline: roster classification, schedule indexing, pitcher
// profiles, fantasy scoring and per-hitter recommendations.

pub mod lookup;
pub mod matchup;
pub mod pitcher;
pub mod report;
pub mod roster;
pub mod schedule;
pub mod scoring;
pub mod source;
pub mod teams;

pub use lookup::Lookup;
pub use matchup::Tier;
pub use report::{MatchupRecord, MatchupReport, MatchupReportBuilder, ReportError, SlatePitcher};

// Plain-text report output.

use std::io::{self, Write};

use platoon_baseball::roster::PlayerRecord;
use platoon_baseball::{Lookup, MatchupRecord, MatchupReport, SlatePitcher};

const UNKNOWN_OPPONENT: &str = "Unknown";
const NOT_AVAILABLE: &str = "not available";

fn opponent_label(opponent: &Lookup<String>) -> &str {
    match opponent {
        Lookup::Resolved(code) => code,
        Lookup::Unresolved => UNKNOWN_OPPONENT,
    }
}

fn era_label(era: &Lookup<f64>) -> String {
    match era {
        Lookup::Resolved(era) => format!("{era:.2}"),
        Lookup::Unresolved => "N/A".to_string(),
    }
}

fn rate_label(rate: &Lookup<f64>) -> String {
    match rate {
        Lookup::Resolved(rate) => format!("{rate:.2}"),
        Lookup::Unresolved => NOT_AVAILABLE.to_string(),
    }
}

fn player_line(player: &PlayerRecord) -> String {
    format!("  {} - {} ({})", player.name, player.positions_display(), player.team)
}

fn slate_line(entry: &SlatePitcher) -> String {
    format!(
        "  {}: {} ({}-handed, ERA {})",
        entry.team,
        entry.profile.name,
        entry.profile.throwing_hand,
        era_label(&entry.profile.era),
    )
}

/// One display line for a matchup record.
pub fn matchup_line(record: &MatchupRecord) -> String {
    format!(
        "  {} ({}) vs {}: {} ({}-handed, ERA {}) -> {} | FPPG {}",
        record.hitter_name,
        record.team,
        opponent_label(&record.opponent),
        record.pitcher_name,
        record.throwing_hand,
        era_label(&record.era),
        record.tier,
        rate_label(&record.fantasy_points_per_game),
    )
}

/// Write the roster listing, the slate's probable pitchers, then one line
/// per hitter matchup.
pub fn render_report<W: Write>(out: &mut W, report: &MatchupReport) -> io::Result<()> {
    writeln!(out, "Your Hitters:")?;
    for hitter in &report.hitters {
        writeln!(out, "{}", player_line(hitter))?;
    }

    writeln!(out)?;
    writeln!(out, "Your Pitchers:")?;
    for pitcher in &report.pitchers {
        writeln!(out, "{}", player_line(pitcher))?;
    }

    writeln!(out)?;
    writeln!(out, "Probable Pitchers:")?;
    if report.probable_pitchers.is_empty() {
        writeln!(out, "  (none announced)")?;
    }
    for entry in &report.probable_pitchers {
        writeln!(out, "{}", slate_line(entry))?;
    }

    writeln!(out)?;
    writeln!(out, "Matchups for {}:", report.date.format("%Y-%m-%d"))?;
    if report.records.is_empty() {
        writeln!(out, "  (no hitters on roster)")?;
    }
    for record in &report.records {
        writeln!(out, "{}", matchup_line(record))?;
    }
    Ok(())
}

// Platoon entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file; stdout carries the report)
// 2. Load config
// 3. Resolve the report date (CLI argument > config > today)
// 4. Load the roster CSV
// 5. Build the Stats API client
// 6. Run the matchup report and render it to stdout

use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use tracing::{error, info};

use platoon::config;
use platoon::mlb::StatsApiClient;
use platoon::render;
use platoon_baseball::roster;
use platoon_baseball::MatchupReportBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Platoon starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: roster={}, stats_api={}",
        config.roster.path, config.stats_api.base_url
    );

    // 3. Resolve the report date
    let date = report_date(&config)?;
    let season = config.report.season.unwrap_or_else(|| date.year());
    info!("Report date {} (season {})", date, season);

    // 4. Load the roster
    let rows = roster::load_roster(Path::new(&config.roster.path))
        .context("failed to load roster")?;
    info!("Loaded {} roster rows", rows.len());

    // 5. Build the Stats API client
    let client = StatsApiClient::from_config(&config.stats_api)
        .context("failed to build HTTP client")?
        .with_pitching_season(Some(season));

    // 6. Run the report
    let report = match MatchupReportBuilder::new(&client)
        .with_fetch_timeout(config.stats_api.timeout())
        .with_season(Some(season))
        .build(&rows, date)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            error!("Report generation failed: {}", e);
            return Err(e).context("failed to build matchup report");
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::render_report(&mut out, &report).context("failed to write report")?;

    info!("Platoon finished: {} matchups", report.records.len());
    Ok(())
}

/// Date from the first CLI argument, then config, then today.
fn report_date(config: &config::Config) -> anyhow::Result<NaiveDate> {
    if let Some(arg) = std::env::args().nth(1) {
        return config::parse_date(&arg).context("invalid date argument");
    }
    Ok(config
        .report_date()?
        .unwrap_or_else(|| chrono::Local::now().date_naive()))
}

/// Initialize tracing to log to a file (stdout is reserved for the report).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("platoon.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("platoon=info,platoon_baseball=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

// Configuration loading and parsing (config/platoon.toml).

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE: &str = "platoon.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// platoon.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub roster: RosterConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub stats_api: StatsApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// `YYYY-MM-DD`; today when absent.
    #[serde(default)]
    pub date: Option<String>,
    /// Batting-totals season; the report date's year when absent.
    #[serde(default)]
    pub season: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("platoon/{}", env!("CARGO_PKG_VERSION"))
}

impl StatsApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Report date from config, if one is set.
    pub fn report_date(&self) -> Result<Option<NaiveDate>, ConfigError> {
        match self.report.date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_date(raw).map(Some),
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| ConfigError::ValidationError {
        field: "report.date".into(),
        message: format!("expected YYYY-MM-DD, got '{raw}': {e}"),
    })
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/platoon.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Seed `config/platoon.toml` from `defaults/` when it does not exist yet.
/// Returns whether a copy was made; an existing config is never touched.
pub fn ensure_config_file(base_dir: &Path) -> Result<bool, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(false);
    }

    let defaults = base_dir.join("defaults").join(CONFIG_FILE);
    if !defaults.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in config/ or defaults/ under {}",
                base_dir.display()
            ),
        });
    }

    let copy_failed = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", defaults.display(), target.display()),
    };
    std::fs::create_dir_all(base_dir.join("config")).map_err(&copy_failed)?;
    std::fs::copy(&defaults, &target).map_err(&copy_failed)?;
    Ok(true)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.roster.path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "roster.path".into(),
            message: "must not be empty".into(),
        });
    }

    let base_url = config.stats_api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "stats_api.base_url".into(),
            message: format!("must start with http:// or https://, got '{base_url}'"),
        });
    }

    if config.stats_api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "stats_api.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    config.report_date()?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

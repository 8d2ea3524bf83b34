use std::env;
use std::path::PathBuf;

use crate::metrics::DEFAULT_MINUTES_THRESHOLD;

pub const CSV_PATH_ENV: &str = "PLAYER_CSV_PATH";
pub const THRESHOLD_ENV: &str = "MINUTES_THRESHOLD";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no dataset path: pass a CSV path argument or set {CSV_PATH_ENV}")]
    MissingCsvPath,

    #[error("dataset path {0} is not a readable file")]
    CsvPathNotFound(PathBuf),

    #[error("invalid {THRESHOLD_ENV} value {raw:?}: {reason}")]
    InvalidThreshold { raw: String, reason: &'static str },
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,
    pub minutes_threshold: u32,
}

impl DashboardConfig {
    /// Resolve configuration from a positional CSV path argument (first
    /// non-flag arg wins) falling back to env vars. Call after dotenvy has
    /// loaded `.env` files.
    pub fn from_env(mut args: impl Iterator<Item = String>) -> Result<Self, ConfigError> {
        let csv_path = args
            .find(|arg| !arg.starts_with('-'))
            .map(PathBuf::from)
            .or_else(|| env::var(CSV_PATH_ENV).ok().map(PathBuf::from))
            .ok_or(ConfigError::MissingCsvPath)?;
        if !csv_path.is_file() {
            return Err(ConfigError::CsvPathNotFound(csv_path));
        }

        let minutes_threshold = match env::var(THRESHOLD_ENV) {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_MINUTES_THRESHOLD,
        };

        Ok(Self {
            csv_path,
            minutes_threshold,
        })
    }
}

fn parse_threshold(raw: &str) -> Result<u32, ConfigError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidThreshold {
            raw: raw.to_string(),
            reason: "not an integer",
        })?;
    if value < 0 {
        return Err(ConfigError::InvalidThreshold {
            raw: raw.to_string(),
            reason: "must be non-negative",
        });
    }
    u32::try_from(value).map_err(|_| ConfigError::InvalidThreshold {
        raw: raw.to_string(),
        reason: "out of range",
    })
}

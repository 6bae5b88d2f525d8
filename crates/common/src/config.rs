use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::error::ConfigError;

pub const SIGNALS_PATH: &str = "/api/whale-signals";

const DEFAULT_BASE_URL: &str = "http://localhost:5001";
const DEFAULT_LIMIT: u32 = 20;
const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_FILE: &str = "signal_board.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub base_url: String,
    pub limit: u32,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
}

impl BoardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("SIGNAL_BOARD_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let limit: u32 = parse_or(&lookup, "SIGNAL_LIMIT", DEFAULT_LIMIT)?;
        let poll_interval_ms: u64 =
            parse_or(&lookup, "POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        let timeout_secs: u64 =
            parse_or(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        if limit == 0 {
            return Err(ConfigError::Invalid {
                key: "SIGNAL_LIMIT",
                value: limit.to_string(),
            });
        }
        if poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_MS",
                value: poll_interval_ms.to_string(),
            });
        }

        let log_file = lookup("SIGNAL_BOARD_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(Self {
            base_url,
            limit,
            poll_interval: Duration::from_millis(poll_interval_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            log_file,
        })
    }

    pub fn signals_url(&self) -> String {
        format!("{}{}", self.base_url, SIGNALS_PATH)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: DEFAULT_LIMIT,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

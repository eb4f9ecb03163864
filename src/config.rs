use std::str::FromStr;

use crate::error::StatsError;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(StatsError::Config(format!("unknown log format: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, StatsError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` so tests never touch the process
    /// environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, StatsError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let max_connections = match get("PETCARE_STATS_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    StatsError::Config(format!("PETCARE_STATS_MAX_CONNECTIONS invalid: {raw}"))
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let log_format = match get("PETCARE_STATS_LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            database_url,
            max_connections,
            log_format,
        })
    }

    pub fn require_database_url(&self) -> Result<&str, StatsError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| StatsError::Config("DATABASE_URL missing".into()))
    }
}

//! Quiz timing configuration, optionally loaded from TOML.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides:
//!
//! ```toml
//! question_time_limit_secs = 45
//! reveal_delay_ms = 1500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_QUESTION_TIME_LIMIT_SECS: u32 = 30;
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 2000;
pub const DEFAULT_LOW_TIME_THRESHOLD_SECS: u32 = 10;

/// Tick period of the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuizConfig {
    /// Seconds on the clock for every question.
    pub question_time_limit_secs: u32,
    /// How long correctness feedback stays up before advancing.
    pub reveal_delay_ms: u64,
    /// The countdown is highlighted at or below this many seconds.
    pub low_time_threshold_secs: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_time_limit_secs: DEFAULT_QUESTION_TIME_LIMIT_SECS,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            low_time_threshold_secs: DEFAULT_LOW_TIME_THRESHOLD_SECS,
        }
    }
}

impl QuizConfig {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: QuizConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&source)?;
        info!(path = %path.display(), ?config, "loaded quiz config");
        Ok(config)
    }

    pub fn with_time_limit(mut self, secs: u32) -> Result<Self, ConfigError> {
        self.question_time_limit_secs = secs;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.problem() {
            Some(reason) => Err(ConfigError::Invalid(reason)),
            None => Ok(()),
        }
    }

    /// The first rule this config breaks, if any.
    pub fn problem(&self) -> Option<&'static str> {
        if self.question_time_limit_secs == 0 {
            return Some("question_time_limit_secs must be greater than zero");
        }
        None
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuizConfig::default();
        assert_eq!(config.question_time_limit_secs, 30);
        assert_eq!(config.reveal_delay(), Duration::from_secs(2));
        assert_eq!(config.low_time_threshold_secs, 10);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = QuizConfig::from_toml("question_time_limit_secs = 45").unwrap();
        assert_eq!(config.question_time_limit_secs, 45);
        assert_eq!(config.reveal_delay_ms, DEFAULT_REVEAL_DELAY_MS);
    }

    #[test]
    fn test_rejects_zero_time_limit() {
        assert!(matches!(
            QuizConfig::from_toml("question_time_limit_secs = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(QuizConfig::default().with_time_limit(0).is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            QuizConfig::from_toml("time_limit = 5"),
            Err(ConfigError::Parse(_))
        ));
    }
}

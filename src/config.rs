//! Service configuration read from the environment

use crate::locale::Locale;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DELAY_MIN_MS: u64 = 1500;
const DEFAULT_DELAY_MAX_MS: u64 = 2500;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var,
            message: message.into(),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub port: u16,
    pub locale: Locale,
    /// Lower bound of the simulated response latency
    pub response_delay_min: Duration,
    /// Upper bound of the simulated response latency
    pub response_delay_max: Duration,
    /// Probability in `[0, 1]` that a simulated response fails
    pub failure_rate: f64,
    /// `None` waits for the responder indefinitely
    pub response_timeout: Option<Duration>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            locale: Locale::default(),
            response_delay_min: Duration::from_millis(DEFAULT_DELAY_MIN_MS),
            response_delay_max: Duration::from_millis(DEFAULT_DELAY_MAX_MS),
            failure_rate: 0.0,
            response_timeout: None,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Unset variables fall back to defaults; set but unparsable ones are
    /// reported instead of silently ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("CHAT_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("CHAT_PORT", e.to_string()))?,
            None => defaults.port,
        };

        let locale = match lookup("CHAT_LOCALE") {
            Some(raw) => raw
                .parse::<Locale>()
                .map_err(|e| ConfigError::invalid("CHAT_LOCALE", e))?,
            None => defaults.locale,
        };

        let response_delay_min = parse_millis(&lookup, "CHAT_RESPONSE_DELAY_MS_MIN")?
            .unwrap_or(defaults.response_delay_min);
        let response_delay_max = parse_millis(&lookup, "CHAT_RESPONSE_DELAY_MS_MAX")?
            .unwrap_or(defaults.response_delay_max);
        if response_delay_min > response_delay_max {
            return Err(ConfigError::invalid(
                "CHAT_RESPONSE_DELAY_MS_MIN",
                "must not exceed CHAT_RESPONSE_DELAY_MS_MAX",
            ));
        }

        let failure_rate = match lookup("CHAT_FAILURE_RATE") {
            Some(raw) => {
                let rate = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| ConfigError::invalid("CHAT_FAILURE_RATE", e.to_string()))?;
                if !(0.0..=1.0).contains(&rate) {
                    return Err(ConfigError::invalid(
                        "CHAT_FAILURE_RATE",
                        "must be between 0 and 1",
                    ));
                }
                rate
            }
            None => defaults.failure_rate,
        };

        let response_timeout = parse_millis(&lookup, "CHAT_RESPONSE_TIMEOUT_MS")?;
        if response_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::invalid(
                "CHAT_RESPONSE_TIMEOUT_MS",
                "must be greater than zero",
            ));
        }

        Ok(Self {
            port,
            locale,
            response_delay_min,
            response_delay_max,
            failure_rate,
            response_timeout,
        })
    }
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    lookup(var)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::invalid(var, e.to_string()))
        })
        .transpose()
}

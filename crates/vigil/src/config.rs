use std::env;
use std::fmt;

use crate::pipeline::ScoringConfig;

/// Runtime configuration loaded from the environment with sensible
/// defaults; scheduling cadence and retry policy live with the caller.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Fraction of the 0-100 scale at which alerts trigger.
    pub alert_threshold: f64,
    /// Trailing observation window consulted for risk scoring, in days.
    pub risk_window_days: i64,
    /// Default lookback for period aggregation, in days.
    pub aggregation_lookback_days: i64,
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let alert_threshold = read_f64("VIGIL_ALERT_THRESHOLD", 0.8)?;
        if !(0.0..=1.0).contains(&alert_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(alert_threshold));
        }

        Ok(Self {
            alert_threshold,
            risk_window_days: read_i64("VIGIL_RISK_WINDOW_DAYS", 30)?,
            aggregation_lookback_days: read_i64("VIGIL_AGGREGATION_LOOKBACK_DAYS", 7)?,
            log_level: env::var("VIGIL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            alert_threshold: self.alert_threshold,
            window_days: self.risk_window_days,
        }
    }
}

fn read_f64(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn read_i64(key: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    ThresholdOutOfRange(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{} must be numeric, got '{}'", key, value)
            }
            ConfigError::ThresholdOutOfRange(value) => {
                write!(f, "VIGIL_ALERT_THRESHOLD must be within [0, 1], got {}", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

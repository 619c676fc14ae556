//! Estimator configuration
//!
//! Display and input choices that vary between front ends. None of these
//! change the computation itself.

use crate::error::ConfigError;
use crate::types::{ClockFormat, CoffeeRange};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default wake-up hour
pub const DEFAULT_WAKE_HOUR: u32 = 7;

/// Default wake-up minute
pub const DEFAULT_WAKE_MINUTE: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    pub clock_format: ClockFormat,
    pub coffee_range: CoffeeRange,
    pub default_wake_hour: u32,
    pub default_wake_minute: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            clock_format: ClockFormat::default(),
            coffee_range: CoffeeRange::default(),
            default_wake_hour: DEFAULT_WAKE_HOUR,
            default_wake_minute: DEFAULT_WAKE_MINUTE,
        }
    }
}

impl EstimatorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EstimatorConfig = serde_json::from_str(json)?;
        config.default_wake_time_of_day()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn default_wake_time_of_day(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::from_hms_opt(self.default_wake_hour, self.default_wake_minute, 0).ok_or(
            ConfigError::InvalidWakeTime {
                hour: self.default_wake_hour,
                minute: self.default_wake_minute,
            },
        )
    }

    /// The configured default wake-up on `today`
    pub fn default_wake_time(&self, today: NaiveDate) -> Result<NaiveDateTime, ConfigError> {
        Ok(today.and_time(self.default_wake_time_of_day()?))
    }
}

/// Today at 07:00
pub fn default_wake_time(today: NaiveDate) -> NaiveDateTime {
    today
        .and_hms_opt(DEFAULT_WAKE_HOUR, DEFAULT_WAKE_MINUTE, 0)
        .unwrap_or_else(|| today.and_time(NaiveTime::default()))
}

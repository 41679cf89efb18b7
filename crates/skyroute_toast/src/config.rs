//! Scheduler timing configuration (TOML)
//!
//! ```toml
//! interval_min_ms = 20000
//! interval_max_ms = 45000
//! display_ms = 4500
//! cooldown_ms = 900000
//! quiet_hours = [1, 2, 3, 4, 5, 6]
//! reduced_motion = false
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ToastError;
use crate::storage::DISMISSED_AT_KEY;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToastConfig {
    /// Shortest gap between recurring show attempts
    #[serde(default = "default_interval_min")]
    pub interval_min_ms: u64,
    #[serde(default = "default_interval_max")]
    pub interval_max_ms: u64,
    /// Delay range for the first attempt after start
    #[serde(default = "default_initial_delay_min")]
    pub initial_delay_min_ms: u64,
    #[serde(default = "default_initial_delay_max")]
    pub initial_delay_max_ms: u64,
    /// How long a toast stays up
    #[serde(default = "default_display")]
    pub display_ms: u64,
    /// Suppression after a manual dismiss
    #[serde(default = "default_cooldown")]
    pub cooldown_ms: u64,
    /// Local hours (0-23) in which nothing is shown
    #[serde(default = "default_quiet_hours")]
    pub quiet_hours: Vec<u32>,
    /// Host prefers reduced motion; the scheduler stays inert
    #[serde(default)]
    pub reduced_motion: bool,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_interval_min() -> u64 {
    20_000
}

fn default_interval_max() -> u64 {
    45_000
}

fn default_initial_delay_min() -> u64 {
    5_000
}

fn default_initial_delay_max() -> u64 {
    15_000
}

fn default_display() -> u64 {
    4_500
}

fn default_cooldown() -> u64 {
    15 * 60 * 1_000
}

fn default_quiet_hours() -> Vec<u32> {
    (1..=6).collect()
}

fn default_storage_key() -> String {
    DISMISSED_AT_KEY.to_string()
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            interval_min_ms: default_interval_min(),
            interval_max_ms: default_interval_max(),
            initial_delay_min_ms: default_initial_delay_min(),
            initial_delay_max_ms: default_initial_delay_max(),
            display_ms: default_display(),
            cooldown_ms: default_cooldown(),
            quiet_hours: default_quiet_hours(),
            reduced_motion: false,
            storage_key: default_storage_key(),
        }
    }
}

impl ToastConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ToastError> {
        let config: ToastConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ToastError> {
        if self.interval_min_ms == 0 {
            return Err(ToastError::ZeroDuration("interval_min_ms"));
        }
        if self.interval_min_ms > self.interval_max_ms {
            return Err(ToastError::InvertedRange {
                name: "interval",
                min: self.interval_min_ms,
                max: self.interval_max_ms,
            });
        }
        if self.initial_delay_min_ms > self.initial_delay_max_ms {
            return Err(ToastError::InvertedRange {
                name: "initial_delay",
                min: self.initial_delay_min_ms,
                max: self.initial_delay_max_ms,
            });
        }
        if self.display_ms == 0 {
            return Err(ToastError::ZeroDuration("display_ms"));
        }
        if self.cooldown_ms == 0 {
            return Err(ToastError::ZeroDuration("cooldown_ms"));
        }
        if let Some(&hour) = self.quiet_hours.iter().find(|h| **h > 23) {
            return Err(ToastError::InvalidQuietHour(hour));
        }
        Ok(())
    }

    pub fn is_quiet_hour(&self, hour: u32) -> bool {
        self.quiet_hours.contains(&hour)
    }

    pub fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

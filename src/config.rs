//! Configuration management for Formgate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration for the Formgate core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormgateConfig {
    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitConfig,

    /// Background sweep configuration
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl Default for FormgateConfig {
    fn default() -> Self {
        Self {
            rate_limiting: RateLimitConfig::default(),
            sweep: SweepConfig::default(),
        }
    }
}

/// Rate limiting configuration.
///
/// Constructed once and immutable for the life of the limiter. The deployed
/// defaults allow a single submission per window, then a 24-hour block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Attempts allowed per window before blocking
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Sliding window duration in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Block duration in milliseconds once the limit is exceeded
    #[serde(default = "default_block_duration_ms")]
    pub block_duration_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_ms: default_window_ms(),
            block_duration_ms: default_block_duration_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_window_ms() -> u64 {
    // 15 minutes
    15 * 60 * 1000
}

fn default_block_duration_ms() -> u64 {
    // 24 hours
    24 * 60 * 60 * 1000
}

impl RateLimitConfig {
    /// The sliding window duration.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// The block duration.
    pub fn block_duration(&self) -> Duration {
        Duration::from_millis(self.block_duration_ms)
    }

    /// Maximum age of a record before it is eligible for eviction.
    pub fn max_record_age(&self) -> Duration {
        Duration::from_millis(2 * self.window_ms.max(self.block_duration_ms))
    }

    /// Validate field constraints.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.max_attempts == 0 {
            return Err(crate::error::FormgateError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.window_ms == 0 {
            return Err(crate::error::FormgateError::Config(
                "window_ms must be greater than 0".to_string(),
            ));
        }
        if self.block_duration_ms == 0 {
            return Err(crate::error::FormgateError::Config(
                "block_duration_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Background sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Sweep period in seconds
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sweep_interval(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    // 5 minutes
    300
}

impl SweepConfig {
    /// The sweep period.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl FormgateConfig {
    /// Load configuration from a YAML file path.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: FormgateConfig = serde_yaml::from_str(&contents)
            .map_err(|e| crate::error::FormgateError::Config(e.to_string()))?;
        config.rate_limiting.validate()?;
        Ok(config)
    }
}

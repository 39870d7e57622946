//! Simulator configuration.
//!
//! Controls buffer size, tick period, the service set logs are attributed to,
//! and how the stream behaves at startup.

use crate::simulator::DEFAULT_SERVICES;
use crate::storage::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default tick period in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 3000;

/// Shortest tick period accepted.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

/// Largest buffer capacity accepted.
pub const MAX_CAPACITY: usize = 100_000;

/// Longest tick period accepted (one hour).
pub const MAX_TICK_INTERVAL_MS: u64 = 60 * 60 * 1000;

/// Errors reported by [`SimulatorConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The buffer must hold at least one entry.
    #[error("Buffer capacity must be greater than zero")]
    ZeroCapacity,

    /// The buffer capacity exceeds [`MAX_CAPACITY`].
    #[error("Buffer capacity must be at most 100000, got {0}")]
    CapacityTooLarge(usize),

    /// The tick period is outside the accepted range.
    #[error("Tick interval must be between 100 ms and 1 hour, got {0} ms")]
    TickIntervalOutOfRange(u64),

    /// No services were configured.
    #[error("At least one service name is required")]
    NoServices,

    /// A configured service name is blank.
    #[error("Service names cannot be blank")]
    BlankService,
}

/// Settings for a [`LogStreamSimulator`](crate::simulator::LogStreamSimulator).
///
/// # Examples
///
/// ```
/// use shared::config::SimulatorConfig;
///
/// let config = SimulatorConfig::default();
/// assert_eq!(config.capacity, 100);
/// assert_eq!(config.tick_interval_ms, 3000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Maximum number of buffered entries.
    pub capacity: usize,
    /// Period between generated entries, in milliseconds.
    pub tick_interval_ms: u64,
    /// Services generated entries are attributed to.
    pub services: Vec<String>,
    /// Seed for reproducible output. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Fill the buffer with the fixed sample entries on startup.
    pub preload_samples: bool,
    /// Start generating as soon as the host is up.
    pub autostart: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            services: DEFAULT_SERVICES.iter().map(ToString::to_string).collect(),
            seed: None,
            preload_samples: true,
            autostart: true,
        }
    }
}

impl SimulatorConfig {
    /// Returns the tick period as a `Duration`.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Parses a comma-separated service list, dropping blank items.
    ///
    /// ```
    /// use shared::config::SimulatorConfig;
    ///
    /// let services = SimulatorConfig::parse_services(" auth-api, ,cache ");
    /// assert_eq!(services, vec!["auth-api", "cache"]);
    /// ```
    #[must_use]
    pub fn parse_services(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - capacity is zero or above [`MAX_CAPACITY`]
    /// - the tick interval is outside 100 ms ..= 1 hour
    /// - the service set is empty or contains a blank name
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge(self.capacity));
        }
        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            return Err(ConfigError::TickIntervalOutOfRange(self.tick_interval_ms));
        }
        if self.services.is_empty() {
            return Err(ConfigError::NoServices);
        }
        if self.services.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::BlankService);
        }
        Ok(())
    }
}

//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use shared::config::SimulatorConfig;
use std::net::SocketAddr;
use std::str::FromStr;

/// Server configuration.
///
/// Configuration values can be set via environment variables (an optional
/// `.env` file is loaded first):
/// - `LOGPULSE_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `LOGPULSE_PORT`: The port to listen on (default: 8080)
/// - `LOGPULSE_BUFFER_CAPACITY`: Maximum buffered log entries (default: 100)
/// - `LOGPULSE_TICK_INTERVAL_MS`: Milliseconds between generated entries (default: 3000)
/// - `LOGPULSE_SERVICES`: Comma-separated service names
/// - `LOGPULSE_SEED`: Seed for reproducible output (default: OS entropy)
/// - `LOGPULSE_PRELOAD_SAMPLES`: Fill the buffer with sample entries (default: true)
/// - `LOGPULSE_AUTOSTART`: Start streaming on boot (default: true)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Log stream simulator settings.
    pub simulator: SimulatorConfig,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A numeric or boolean variable is set but cannot be parsed
    /// - The resulting simulator settings are invalid
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        let defaults = SimulatorConfig::default();
        let host = std::env::var("LOGPULSE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_parse("LOGPULSE_PORT")?.unwrap_or(8080);

        let simulator = SimulatorConfig {
            capacity: env_parse("LOGPULSE_BUFFER_CAPACITY")?.unwrap_or(defaults.capacity),
            tick_interval_ms: env_parse("LOGPULSE_TICK_INTERVAL_MS")?
                .unwrap_or(defaults.tick_interval_ms),
            services: std::env::var("LOGPULSE_SERVICES")
                .map(|raw| SimulatorConfig::parse_services(&raw))
                .unwrap_or(defaults.services),
            seed: env_parse("LOGPULSE_SEED")?,
            preload_samples: env_parse("LOGPULSE_PRELOAD_SAMPLES")?
                .unwrap_or(defaults.preload_samples),
            autostart: env_parse("LOGPULSE_AUTOSTART")?.unwrap_or(defaults.autostart),
        };
        simulator.validate()?;

        Ok(Self {
            host,
            port,
            simulator,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            simulator: SimulatorConfig::default(),
        }
    }
}

/// Reads and parses an optional environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    std::env::var(key)
        .ok()
        .map(|raw| raw.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("Invalid value for {key}"))
}

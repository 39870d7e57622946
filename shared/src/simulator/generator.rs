//! Synthetic log entry generator.
//!
//! Every draw (level, service, message, trace id) goes through the injected
//! random source, so a seeded generator paired with a fixed clock produces a
//! reproducible stream.

use super::clock::{Clock, SystemClock};
use crate::models::{LogEntry, LogLevel};
use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Services the simulator emits logs for by default.
pub const DEFAULT_SERVICES: [&str; 4] = ["auth-api", "data-api", "web-app", "cache"];

/// Catalog of sample messages drawn from on every tick.
pub const MESSAGE_CATALOG: [&str; 8] = [
    "Failed to authenticate user: invalid token signature",
    "Query execution exceeded 500ms threshold: SELECT * FROM users WHERE...",
    "User session started for user_id: a7b3c9d2",
    "Token refresh successful for user_id: a7b3c9d2",
    "Cache miss for key: user_profile_a7b3c9d2",
    "Database connection pool: 47/100 active connections",
    "HTTP GET /api/users/profile completed in 45ms",
    "JWT token validated successfully",
];

const TRACE_ID_PREFIX: &str = "trace-";
const TRACE_ID_LEN: usize = 8;

/// Fixed snapshot shown before streaming starts: (age in ms, level, service,
/// message index), newest first.
const SAMPLES: [(i64, LogLevel, &str, usize); 8] = [
    (0, LogLevel::Error, "auth-api", 0),
    (453, LogLevel::Warn, "data-api", 1),
    (2111, LogLevel::Info, "web-app", 2),
    (3222, LogLevel::Info, "auth-api", 3),
    (3778, LogLevel::Warn, "cache", 4),
    (4455, LogLevel::Info, "data-api", 5),
    (5889, LogLevel::Info, "web-app", 6),
    (6556, LogLevel::Info, "auth-api", 7),
];

/// Builds the sample snapshot relative to `now`, oldest first so that
/// inserting in order leaves the newest at the front of the buffer.
#[must_use]
pub fn sample_entries(now: DateTime<Utc>) -> Vec<LogEntry> {
    SAMPLES
        .iter()
        .enumerate()
        .rev()
        .map(|(index, &(age_ms, level, service, message))| {
            let n = index + 1;
            LogEntry::new(format!("sample-{n}"), level, service, MESSAGE_CATALOG[message])
                .with_timestamp(now - Duration::milliseconds(age_ms))
                .with_trace_id(format!("{TRACE_ID_PREFIX}{n:03}"))
        })
        .collect()
}

/// Produces one random `LogEntry` per call to [`LogGenerator::generate`].
///
/// # Example
///
/// ```
/// use shared::simulator::LogGenerator;
///
/// let mut a = LogGenerator::seeded(7);
/// let mut b = LogGenerator::seeded(7);
///
/// let (x, y) = (a.generate(), b.generate());
/// assert_eq!(x.level, y.level);
/// assert_eq!(x.message, y.message);
/// assert_eq!(x.trace_id, y.trace_id);
/// ```
pub struct LogGenerator<R = StdRng> {
    rng: R,
    clock: Arc<dyn Clock>,
    services: Vec<String>,
    sequence: u64,
}

impl LogGenerator<StdRng> {
    /// Creates a deterministic generator seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> LogGenerator<R> {
    /// Creates a generator over `rng` using the system clock and the default
    /// service set.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            clock: Arc::new(SystemClock),
            services: DEFAULT_SERVICES.iter().map(ToString::to_string).collect(),
            sequence: 0,
        }
    }

    /// Replaces the clock used to stamp entries.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the service set. An empty set keeps the current one.
    #[must_use]
    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let services: Vec<String> = services.into_iter().map(Into::into).collect();
        if services.is_empty() {
            tracing::warn!("Ignoring empty service set for log generator");
        } else {
            self.services = services;
        }
        self
    }

    /// Returns the configured service names.
    #[must_use]
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Returns the current wall-clock time from the generator's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Synthesizes the next entry.
    pub fn generate(&mut self) -> LogEntry {
        self.sequence += 1;
        let timestamp = self.clock.now();

        let level = *LogLevel::ALL
            .choose(&mut self.rng)
            .unwrap_or(&LogLevel::Info);
        let service = self
            .services
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_SERVICES[0].to_string());
        let message = MESSAGE_CATALOG
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(MESSAGE_CATALOG[0]);
        let trace_id = self.trace_id();

        LogEntry::new(
            format!("{}-{}", timestamp.timestamp_millis(), self.sequence),
            level,
            service,
            message,
        )
        .with_timestamp(timestamp)
        .with_trace_id(trace_id)
    }

    fn trace_id(&mut self) -> String {
        let suffix: String = (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(TRACE_ID_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("{TRACE_ID_PREFIX}{suffix}")
    }
}

//! Plain-text export of the log view.
//!
//! Each entry renders as
//! `[{timestamp}] [{level}] [{service}] {message} {trace_id}` where a missing
//! trace id leaves the final field empty. Lines are joined by `\n` with no
//! trailing newline.

use crate::models::LogEntry;
use chrono::{DateTime, Utc};

/// MIME type of the export body.
pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Renders one entry as an export line.
///
/// # Example
///
/// ```
/// use shared::export::format_line;
/// use shared::models::{LogEntry, LogLevel};
/// use chrono::{TimeZone, Utc};
///
/// let entry = LogEntry::new("1", LogLevel::Warn, "cache", "Cache miss")
///     .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 15, 14, 32, 14).unwrap())
///     .with_trace_id("trace-005");
///
/// assert_eq!(format_line(&entry), "[14:32:14.000] [WARN] [cache] Cache miss trace-005");
/// ```
#[must_use]
pub fn format_line(entry: &LogEntry) -> String {
    format!(
        "[{}] [{}] [{}] {} {}",
        entry.display_time(),
        entry.level,
        entry.service,
        entry.message,
        entry.trace_id.as_deref().unwrap_or_default()
    )
}

/// Renders entries in the given order, one line each.
#[must_use]
pub fn render<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    entries
        .into_iter()
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name offered for a download created at `now`.
#[must_use]
pub fn suggested_filename(now: DateTime<Utc>) -> String {
    format!("logs-{}.txt", now.format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogLevel;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32, ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn test_format_line_without_trace_keeps_trailing_space() {
        let entry = LogEntry::new("1", LogLevel::Debug, "web-app", "render done")
            .with_timestamp(at(9, 5, 3, 7));

        assert_eq!(format_line(&entry), "[09:05:03.007] [DEBUG] [web-app] render done ");
    }

    #[test]
    fn test_render_two_entries_newest_first() {
        let newest = LogEntry::new("2", LogLevel::Error, "auth-api", "invalid token signature")
            .with_timestamp(at(14, 32, 18, 345))
            .with_trace_id("trace-001");
        let older = LogEntry::new("1", LogLevel::Warn, "data-api", "slow query")
            .with_timestamp(at(14, 32, 17, 892))
            .with_trace_id("trace-002");

        let text = render([&newest, &older]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "[14:32:18.345] [ERROR] [auth-api] invalid token signature trace-001"
        );
        assert_eq!(lines[1], "[14:32:17.892] [WARN] [data-api] slow query trace-002");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_render_empty_view() {
        assert_eq!(render(std::iter::empty()), "");
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(suggested_filename(at(14, 32, 18, 0)), "logs-20240115-143218.txt");
    }
}

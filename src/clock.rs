//! Wall-clock source for record timestamps and upload keys.

use chrono::{DateTime, SecondsFormat, Utc};

/// Supplies the current time. Injected so tests can pin or step it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Render `at` the way records store it: RFC 3339, UTC, milliseconds, `Z`
/// suffix (`2026-10-16T09:30:00.123Z`). Strings in this form sort
/// chronologically.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

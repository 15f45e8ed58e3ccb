//! Wall-clock abstraction and display-time formatting
//!
//! Messages are stamped with a short, pre-formatted time label at send time.
//! The [`Clock`] trait lets the session read "now" from the system in
//! production and from a [`FixedClock`] in tests, so labels are deterministic.

use std::fmt::{Debug, Write};
use std::sync::Mutex;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, FixedOffset, Local};

/// Default display pattern: two-digit hour and minute ("14:32")
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// A source of local wall-clock time.
pub trait Clock: Send + Sync + Debug {
    /// Current local time, carrying the local UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Clock backed by the operating system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Parse an RFC 3339 instant, e.g. `"2024-05-02T14:32:00-03:00"`.
    pub fn at(rfc3339: &str) -> anyhow::Result<Self> {
        Ok(Self::new(DateTime::parse_from_rfc3339(rfc3339)?))
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Check that a strftime pattern only contains specifiers chrono understands.
pub fn is_valid_time_format(pattern: &str) -> bool {
    !pattern.trim().is_empty() && StrftimeItems::new(pattern).all(|item| item != Item::Error)
}

/// Render `at` with `pattern`, falling back to [`DEFAULT_TIME_FORMAT`] when
/// the pattern cannot be rendered.
pub fn format_display_time(at: &DateTime<FixedOffset>, pattern: &str) -> String {
    let mut out = String::new();
    if is_valid_time_format(pattern) && write!(out, "{}", at.format(pattern)).is_ok() {
        return out;
    }
    at.format(DEFAULT_TIME_FORMAT).to_string()
}

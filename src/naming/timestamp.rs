//! Local wall-clock timestamps for record names.

use chrono::{DateTime, Local, TimeZone};

use crate::config::TimestampPrecision;

/// Renders `YYYY-MM-DD_HH-MM-SS-<fraction>` with a fixed fraction width.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampFormatter {
    precision: TimestampPrecision,
}

impl TimestampFormatter {
    pub fn new(precision: TimestampPrecision) -> Self {
        Self { precision }
    }

    /// Format the current local time. Successive calls are not guaranteed to
    /// increase.
    pub fn now(&self) -> String {
        self.format(&Local::now())
    }

    pub fn format<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let pattern = match self.precision {
            TimestampPrecision::Millis => "%Y-%m-%d_%H-%M-%S-%3f",
            TimestampPrecision::Micros => "%Y-%m-%d_%H-%M-%S-%6f",
            TimestampPrecision::Nanos => "%Y-%m-%d_%H-%M-%S-%9f",
        };
        instant.format(pattern).to_string()
    }
}

/// The `YYYY-MM-DD` prefix of a formatted timestamp.
pub fn date_part(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

/// Check `value` against the layout for `precision`.
pub fn matches_layout(value: &str, precision: TimestampPrecision) -> bool {
    const PREFIX: &str = "dddd-dd-dd_dd-dd-dd-";
    let bytes = value.as_bytes();
    if bytes.len() != PREFIX.len() + precision.digits() {
        return false;
    }
    PREFIX
        .bytes()
        .chain(std::iter::repeat(b'd').take(precision.digits()))
        .zip(bytes)
        .all(|(expected, &actual)| match expected {
            b'd' => actual.is_ascii_digit(),
            literal => actual == literal,
        })
}

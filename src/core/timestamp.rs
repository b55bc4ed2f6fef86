//! Timestamp formatting utilities
//!
//! The default [`TimestampFormat::Sortable`] renders fixed-width,
//! zero-padded fields with microsecond precision and a numeric offset.
//! Timestamps are captured in UTC, so byte-wise comparison of two rendered
//! timestamps agrees with chronological order for years 0000 to 9999.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// strftime pattern of [`TimestampFormat::Sortable`]
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f%z";

/// Timestamp format options for codecs
///
/// # Examples
///
/// ```
/// use ordered_logger::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(
///     TimestampFormat::Sortable.format(&at).unwrap(),
///     "2025-01-08 10:30:45.000000+0000"
/// );
///
/// // unknown strftime specifiers are an error, not a panic
/// assert!(TimestampFormat::Custom("%Q".to_string()).format(&at).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45.123456+0000`
    ///
    /// Lexicographically sortable; the default.
    #[default]
    Sortable,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Render `datetime`. Fails only for a `Custom` pattern chrono cannot
    /// interpret.
    pub fn format(&self, datetime: &DateTime<Utc>) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.write_to(&mut out, datetime)?;
        Ok(out)
    }

    pub fn write_to<W: Write>(&self, out: &mut W, datetime: &DateTime<Utc>) -> fmt::Result {
        match self {
            TimestampFormat::Sortable => write!(out, "{}", datetime.format(TIME_FORMAT)),
            TimestampFormat::Iso8601Micros => {
                write!(out, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ"))
            }
            TimestampFormat::Rfc3339 => {
                out.write_str(&datetime.to_rfc3339_opts(chrono::SecondsFormat::Micros, false))
            }
            TimestampFormat::UnixMicros => write!(out, "{}", datetime.timestamp_micros()),
            TimestampFormat::Custom(format_str) => write!(out, "{}", datetime.format(format_str)),
        }
    }

    /// Whether rendered timestamps compare lexicographically in time order
    #[must_use]
    pub fn is_sortable(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Sortable | TimestampFormat::Iso8601Micros | TimestampFormat::Rfc3339
        )
    }
}

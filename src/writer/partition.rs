//! Partition path generation for time-based organization
//!
//! Generates Hive-style partition paths:
//! `year={year}/month={month}/day={day}/hour={hour}[/minute={minute}]`

use chrono::{Datelike, Timelike};

/// Finest time unit used for partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Granularity {
    #[default]
    Hour,
    Minute,
}

impl Granularity {
    /// Parse a configured granularity.
    ///
    /// Exactly `"minute"` selects per-minute partitions. Every other value,
    /// including `"Minute"`, padded text and the empty string, selects the
    /// hourly default; this never fails.
    pub fn from_setting(setting: &str) -> Self {
        if setting == "minute" {
            Granularity::Minute
        } else {
            Granularity::Hour
        }
    }

    /// Whether `setting` names a granularity rather than falling back to the default.
    pub fn is_recognized(setting: &str) -> bool {
        setting == "hour" || setting == "minute"
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Minute => "minute",
        }
    }
}

/// Build the partition path for a timestamp.
///
/// Fields are read from `t` as-is. No timezone conversion happens here, so
/// callers pass UTC (`chrono::Utc::now()` or a UTC batch timestamp).
///
/// Format: `year=YYYY/month=MM/day=DD/hour=HH`, plus `/minute=MM` for
/// [`Granularity::Minute`].
pub fn partition_key<T>(t: &T, granularity: Granularity) -> String
where
    T: Datelike + Timelike,
{
    let hourly = format!(
        "year={:04}/month={:02}/day={:02}/hour={:02}",
        t.year(),
        t.month(),
        t.day(),
        t.hour()
    );

    match granularity {
        Granularity::Hour => hourly,
        Granularity::Minute => format!("{}/minute={:02}", hourly, t.minute()),
    }
}

//! Timestamp derivation for the activity stream.
//!
//! Activity records carry `ts` as epoch milliseconds (UTC). Every temporal
//! field in the star schema derives from the canonical `start_time` string
//! produced here, with second precision.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

use crate::rows::TimeRow;

/// A derived event timestamp.
///
/// Wraps the parsed instant and exposes the temporal fields the `time`
/// dimension and the fact partitioning need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTime {
    datetime: DateTime<Utc>,
}

impl StartTime {
    /// Parses epoch milliseconds into a start time. Returns `None` for
    /// values outside chrono's representable range; callers skip and count
    /// those records.
    pub fn from_epoch_ms(ts: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(ts)
            .single()
            .map(|datetime| Self { datetime })
    }

    /// Canonical `YYYY-MM-DD HH:MM:SS` representation.
    pub fn formatted(&self) -> String {
        self.datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn hour(&self) -> u32 {
        self.datetime.hour()
    }

    /// Day of month, 1-31.
    pub fn day(&self) -> u32 {
        self.datetime.day()
    }

    /// ISO week of year, 1-53.
    pub fn week(&self) -> u32 {
        self.datetime.iso_week().week()
    }

    pub fn month(&self) -> u32 {
        self.datetime.month()
    }

    pub fn year(&self) -> i32 {
        self.datetime.year()
    }

    /// Day of week, Sunday=1 .. Saturday=7 (the convention of the source
    /// dataset's tooling).
    pub fn weekday(&self) -> u32 {
        self.datetime.weekday().num_days_from_sunday() + 1
    }

    /// Expands this timestamp into a `time` dimension row.
    pub fn to_time_row(&self) -> TimeRow {
        TimeRow {
            start_time: self.formatted(),
            hour: self.hour(),
            day: self.day(),
            week: self.week(),
            month: self.month(),
            year: self.year(),
            weekday: self.weekday(),
        }
    }
}

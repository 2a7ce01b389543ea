//! Output row types for the five star-schema relations.
//!
//! Partitioned tables compute their own hive-style partition path from row
//! fields; null partition values use the `__HIVE_DEFAULT_PARTITION__`
//! literal, matching what Spark writes for the same data.

use serde::{Deserialize, Serialize};

/// Directory-name stand-in for a null partition value.
pub const HIVE_NULL_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// `songs` dimension row, partitioned by (year, artist_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRow {
    pub song_id: String,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<f64>,
}

impl SongRow {
    pub fn partition_path(&self) -> String {
        format!(
            "year={}/artist_id={}",
            self.year
                .map_or_else(|| HIVE_NULL_PARTITION.to_string(), |y| y.to_string()),
            self.artist_id.as_deref().unwrap_or(HIVE_NULL_PARTITION),
        )
    }
}

/// `artists` dimension row, unpartitioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// `users` dimension row, unpartitioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// `time` dimension row, partitioned by (year, month).
///
/// One row per playback event, not per distinct timestamp. `weekday` uses
/// the Sunday=1 .. Saturday=7 convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRow {
    /// Canonical `YYYY-MM-DD HH:MM:SS` timestamp string.
    pub start_time: String,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

impl TimeRow {
    pub fn partition_path(&self) -> String {
        format!("year={}/month={}", self.year, self.month)
    }
}

/// `songplay` fact row, partitioned by (year, month) of the event time.
///
/// `songplay_id` is a surrogate: unique and monotonic within one run, with
/// no stability or contiguity guarantee across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongplayRow {
    pub songplay_id: i64,
    pub start_time: String,
    pub user_id: Option<String>,
    pub level: Option<String>,
    pub song_id: String,
    pub artist_id: Option<String>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub year: i32,
    pub month: u32,
}

impl SongplayRow {
    pub fn partition_path(&self) -> String {
        format!("year={}/month={}", self.year, self.month)
    }
}

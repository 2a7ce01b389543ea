//! Raw input record definitions.
//!
//! Both sources are schema-loose JSON: any field may be absent or null, and
//! unknown fields are ignored. The activity log uses the camelCase field
//! names of the original dataset (`userId`, `firstName`, ...), mapped here
//! via serde renames.

use serde::{Deserialize, Serialize};

/// One song/artist catalog record (one JSON object per file).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogRecord {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<f64>,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

/// One user-activity log record (one JSON object per line).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityRecord {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub page: Option<String>,
    /// Event timestamp, epoch milliseconds UTC.
    pub ts: Option<i64>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
}

impl ActivityRecord {
    /// Whether this record is an actual playback event. Every dimension and
    /// fact derivation downstream operates on playback events only.
    pub fn is_playback(&self) -> bool {
        self.page.as_deref() == Some("NextSong")
    }
}

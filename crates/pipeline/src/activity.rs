//! Activity extractor: playback filter, users and time dimensions.
//!
//! The `page == "NextSong"` filter runs before any other derivation; users,
//! time, and the fact stage all operate on the filtered stream only.

use etl_core::{ActivityRecord, DedupPolicy, StartTime, TimeRow, UserRow};
use tracing::warn;

use crate::dedup::dedup_by_key;
use crate::Extraction;

/// One playback event: the filtered record plus its derived start time.
#[derive(Debug, Clone)]
pub struct PlaybackEvent {
    pub record: ActivityRecord,
    pub start_time: StartTime,
}

/// The filtered activity stream, with the count of playback records whose
/// timestamp could not be derived.
#[derive(Debug)]
pub struct PlaybackStream {
    pub events: Vec<PlaybackEvent>,
    pub bad_timestamps: u64,
}

/// Filters to playback events and derives `start_time` for each. Records
/// with a missing or unrepresentable `ts` are skipped and counted.
pub fn playback_events(records: Vec<ActivityRecord>) -> PlaybackStream {
    let mut events = Vec::with_capacity(records.len());
    let mut bad_timestamps = 0;
    for record in records {
        if !record.is_playback() {
            continue;
        }
        match record.ts.and_then(StartTime::from_epoch_ms) {
            Some(start_time) => events.push(PlaybackEvent { record, start_time }),
            None => {
                warn!(ts = ?record.ts, "skipping playback record with unusable timestamp");
                bad_timestamps += 1;
            }
        }
    }
    PlaybackStream {
        events,
        bad_timestamps,
    }
}

/// Projects the user dimension and dedups by `user_id` under the configured
/// policy. The default (first occurrence) mirrors the source system and is a
/// known limitation: a user's `level` changes over time and first-seen is
/// not necessarily current.
pub fn extract_users(events: &[PlaybackEvent], policy: DedupPolicy) -> Extraction<UserRow> {
    let mut missing_key = 0;
    let mut rows = Vec::with_capacity(events.len());
    for event in events {
        match event.record.user_id.as_deref() {
            Some(user_id) if !user_id.is_empty() => rows.push(UserRow {
                user_id: user_id.to_string(),
                first_name: event.record.first_name.clone(),
                last_name: event.record.last_name.clone(),
                gender: event.record.gender.clone(),
                level: event.record.level.clone(),
            }),
            _ => missing_key += 1,
        }
    }
    Extraction {
        rows: dedup_by_key(&rows, policy, |r| r.user_id.clone()),
        missing_key,
    }
}

/// Expands each event's start time into a time-dimension row. One row per
/// playback event, not per distinct timestamp; consumers relying on a
/// distinct calendar dimension must dedup downstream.
pub fn extract_time(events: &[PlaybackEvent]) -> Vec<TimeRow> {
    events.iter().map(|e| e.start_time.to_time_row()).collect()
}

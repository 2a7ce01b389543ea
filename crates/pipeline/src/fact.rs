//! Fact builder: the songplays table.
//!
//! Joins playback events against the songs dimension on an exact title
//! string match. This mirrors the source system and is deliberately lossy:
//! casing or whitespace differences miss, and colliding titles match more
//! than one song (one fact row per match). Unmatched events are dropped,
//! not errors.

use std::collections::HashMap;

use etl_core::{SongRow, SongplayRow};

use crate::activity::PlaybackEvent;

/// Title -> song key lookup built from the durably written songs table.
#[derive(Debug, Default)]
pub struct SongIndex {
    by_title: HashMap<String, Vec<SongKey>>,
}

#[derive(Debug, Clone)]
struct SongKey {
    song_id: String,
    artist_id: Option<String>,
}

impl SongIndex {
    pub fn build(songs: &[SongRow]) -> Self {
        let mut by_title: HashMap<String, Vec<SongKey>> = HashMap::new();
        for song in songs {
            if let Some(title) = &song.title {
                by_title.entry(title.clone()).or_default().push(SongKey {
                    song_id: song.song_id.clone(),
                    artist_id: song.artist_id.clone(),
                });
            }
        }
        Self { by_title }
    }

    fn matches(&self, title: &str) -> &[SongKey] {
        self.by_title.get(title).map_or(&[], Vec::as_slice)
    }
}

/// Songplay rows plus the count of playback events that matched no song.
#[derive(Debug)]
pub struct FactOutput {
    pub rows: Vec<SongplayRow>,
    pub unmatched: u64,
}

/// Joins events against the index and assigns surrogate ids.
///
/// `songplay_id` is `(partition_index << 32) | partition_local_counter`
/// over the (year, month) output partitions: unique and monotonic within
/// the run without any cross-partition sequencing, and explicitly unstable
/// across runs.
pub fn build_songplays(events: &[PlaybackEvent], songs: &SongIndex) -> FactOutput {
    let mut matched: Vec<SongplayRow> = Vec::new();
    let mut unmatched = 0;
    for event in events {
        let keys = match event.record.song.as_deref() {
            Some(title) => songs.matches(title),
            None => &[],
        };
        if keys.is_empty() {
            unmatched += 1;
            continue;
        }
        for key in keys {
            matched.push(SongplayRow {
                songplay_id: 0, // assigned below once partitions are known
                start_time: event.start_time.formatted(),
                user_id: event.record.user_id.clone(),
                level: event.record.level.clone(),
                song_id: key.song_id.clone(),
                artist_id: key.artist_id.clone(),
                location: event.record.location.clone(),
                user_agent: event.record.user_agent.clone(),
                year: event.start_time.year(),
                month: event.start_time.month(),
            });
        }
    }
    assign_ids(&mut matched);
    FactOutput {
        rows: matched,
        unmatched,
    }
}

fn assign_ids(rows: &mut [SongplayRow]) {
    let mut partitions: Vec<(i32, u32)> = rows.iter().map(|r| (r.year, r.month)).collect();
    partitions.sort_unstable();
    partitions.dedup();

    let mut counters: HashMap<(i32, u32), i64> = HashMap::new();
    for row in rows {
        let partition = (row.year, row.month);
        let index = partitions
            .binary_search(&partition)
            .expect("partition collected from the same rows") as i64;
        let counter = counters.entry(partition).or_insert(0);
        row.songplay_id = (index << 32) | *counter;
        *counter += 1;
    }
}

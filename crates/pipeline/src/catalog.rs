//! Catalog extractor: songs and artists dimensions.
//!
//! Projects catalog records into the two dimension tables and collapses
//! exact-key duplicates, first occurrence in input order winning. Duplicate
//! keys are a data-quality condition of the source catalog, not an error.

use etl_core::{ArtistRow, CatalogRecord, DedupPolicy, SongRow};

use crate::dedup::dedup_by_key;
use crate::Extraction;

/// Projects `{song_id, title, artist_id, year, duration}` and dedups by
/// `song_id`. Records without a `song_id` cannot be keyed and are counted.
pub fn extract_songs(records: &[CatalogRecord]) -> Extraction<SongRow> {
    let mut missing_key = 0;
    let mut rows = Vec::with_capacity(records.len());
    for rec in records {
        match &rec.song_id {
            Some(song_id) => rows.push(SongRow {
                song_id: song_id.clone(),
                title: rec.title.clone(),
                artist_id: rec.artist_id.clone(),
                year: rec.year,
                duration: rec.duration,
            }),
            None => missing_key += 1,
        }
    }
    Extraction {
        rows: dedup_by_key(&rows, DedupPolicy::First, |r| r.song_id.clone()),
        missing_key,
    }
}

/// Projects the `artist_*` fields under their dimension names and dedups by
/// `artist_id`.
pub fn extract_artists(records: &[CatalogRecord]) -> Extraction<ArtistRow> {
    let mut missing_key = 0;
    let mut rows = Vec::with_capacity(records.len());
    for rec in records {
        match &rec.artist_id {
            Some(artist_id) => rows.push(ArtistRow {
                artist_id: artist_id.clone(),
                name: rec.artist_name.clone(),
                location: rec.artist_location.clone(),
                latitude: rec.artist_latitude,
                longitude: rec.artist_longitude,
            }),
            None => missing_key += 1,
        }
    }
    Extraction {
        rows: dedup_by_key(&rows, DedupPolicy::First, |r| r.artist_id.clone()),
        missing_key,
    }
}

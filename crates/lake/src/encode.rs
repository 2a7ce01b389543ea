//! Arrow schemas and row <-> RecordBatch conversion for the five tables.
//!
//! Partition column values are written into the files as well as into the
//! hive directory names, so read-back never has to reconstruct them from
//! paths.

use std::collections::BTreeMap;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Float64Array, Int32Array, Int64Array, StringArray, UInt32Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use etl_core::{ArtistRow, Error, Result, SongRow, SongplayRow, TimeRow, UserRow};

pub fn songs_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("song_id", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("year", DataType::Int32, true),
        Field::new("duration", DataType::Float64, true),
    ]))
}

pub fn artists_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
    ]))
}

pub fn users_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("user_id", DataType::Utf8, false),
        Field::new("first_name", DataType::Utf8, true),
        Field::new("last_name", DataType::Utf8, true),
        Field::new("gender", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, true),
    ]))
}

pub fn time_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("start_time", DataType::Utf8, false),
        Field::new("hour", DataType::UInt32, false),
        Field::new("day", DataType::UInt32, false),
        Field::new("week", DataType::UInt32, false),
        Field::new("month", DataType::UInt32, false),
        Field::new("year", DataType::Int32, false),
        Field::new("weekday", DataType::UInt32, false),
    ]))
}

pub fn songplays_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("songplay_id", DataType::Int64, false),
        Field::new("start_time", DataType::Utf8, false),
        Field::new("user_id", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, true),
        Field::new("song_id", DataType::Utf8, false),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("user_agent", DataType::Utf8, true),
        Field::new("year", DataType::Int32, false),
        Field::new("month", DataType::UInt32, false),
    ]))
}

pub fn songs_batch(rows: &[SongRow]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.song_id.as_str()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.title.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.artist_id.as_deref()),
        )),
        Arc::new(Int32Array::from_iter(rows.iter().map(|r| r.year))),
        Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.duration))),
    ];
    Ok(RecordBatch::try_new(songs_schema(), columns)?)
}

pub fn artists_batch(rows: &[ArtistRow]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.artist_id.as_str()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.name.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.location.as_deref()),
        )),
        Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.latitude))),
        Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.longitude))),
    ];
    Ok(RecordBatch::try_new(artists_schema(), columns)?)
}

pub fn users_batch(rows: &[UserRow]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.user_id.as_str()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.first_name.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.last_name.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.gender.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.level.as_deref()),
        )),
    ];
    Ok(RecordBatch::try_new(users_schema(), columns)?)
}

pub fn time_batch(rows: &[TimeRow]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.start_time.as_str()),
        )),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.hour))),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.day))),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.week))),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.month))),
        Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
        Arc::new(UInt32Array::from_iter_values(
            rows.iter().map(|r| r.weekday),
        )),
    ];
    Ok(RecordBatch::try_new(time_schema(), columns)?)
}

pub fn songplays_batch(rows: &[SongplayRow]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(
            rows.iter().map(|r| r.songplay_id),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.start_time.as_str()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.user_id.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.level.as_deref()),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.song_id.as_str()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.artist_id.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.location.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.user_agent.as_deref()),
        )),
        Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.month))),
    ];
    Ok(RecordBatch::try_new(songplays_schema(), columns)?)
}

/// Decodes a `songs` batch back into rows. Used by the fact builder, which
/// reads the songs table from durable storage rather than from memory.
pub fn decode_songs(batch: &RecordBatch) -> Result<Vec<SongRow>> {
    let song_id = string_column(batch, "song_id")?;
    let title = string_column(batch, "title")?;
    let artist_id = string_column(batch, "artist_id")?;
    let year = downcast::<Int32Array>(batch, "year")?;
    let duration = downcast::<Float64Array>(batch, "duration")?;

    let mut rows = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        rows.push(SongRow {
            song_id: song_id.value(i).to_string(),
            title: opt_string(title, i),
            artist_id: opt_string(artist_id, i),
            year: (!year.is_null(i)).then(|| year.value(i)),
            duration: (!duration.is_null(i)).then(|| duration.value(i)),
        });
    }
    Ok(rows)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    downcast::<StringArray>(batch, name)
}

fn downcast<'a, A: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a A> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<A>())
        .ok_or_else(|| {
            Error::dependency("songs", format!("column '{name}' missing or mistyped"))
        })
}

fn opt_string(arr: &StringArray, i: usize) -> Option<String> {
    (!arr.is_null(i)).then(|| arr.value(i).to_string())
}

/// Groups rows by partition path, preserving input order within each group.
/// BTreeMap keeps partition order deterministic.
pub fn group_by_partition<R: Clone>(
    rows: &[R],
    partition: impl Fn(&R) -> String,
) -> BTreeMap<String, Vec<R>> {
    let mut groups: BTreeMap<String, Vec<R>> = BTreeMap::new();
    for row in rows {
        groups.entry(partition(row)).or_default().push(row.clone());
    }
    groups
}

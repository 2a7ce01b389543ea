//! Hive-partitioned Parquet writes.
//!
//! Each table is written complete into a staging directory; nothing here
//! touches the published output root (see `publish`). An empty table still
//! gets one zero-row file so downstream readers see the schema.

use std::fs::{self, File};
use std::path::Path;

use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use etl_core::{ArtistRow, Error, Result, SongRow, SongplayRow, TimeRow, UserRow};

use crate::encode;

pub fn write_songs(table_dir: &Path, rows: &[SongRow]) -> Result<()> {
    write_partitioned(table_dir, rows, SongRow::partition_path, encode::songs_batch)
}

pub fn write_artists(table_dir: &Path, rows: &[ArtistRow]) -> Result<()> {
    write_file(&table_dir.join("part-00000.parquet"), &encode::artists_batch(rows)?)
}

pub fn write_users(table_dir: &Path, rows: &[UserRow]) -> Result<()> {
    write_file(&table_dir.join("part-00000.parquet"), &encode::users_batch(rows)?)
}

pub fn write_time(table_dir: &Path, rows: &[TimeRow]) -> Result<()> {
    write_partitioned(table_dir, rows, TimeRow::partition_path, encode::time_batch)
}

pub fn write_songplays(table_dir: &Path, rows: &[SongplayRow]) -> Result<()> {
    write_partitioned(
        table_dir,
        rows,
        SongplayRow::partition_path,
        encode::songplays_batch,
    )
}

/// Writes rows grouped into `<table>/<col>=<value>/.../part-00000.parquet`.
/// Zero rows still produce a schema-bearing empty file at the table root.
fn write_partitioned<R: Clone>(
    table_dir: &Path,
    rows: &[R],
    partition: impl Fn(&R) -> String,
    batch: impl Fn(&[R]) -> Result<RecordBatch>,
) -> Result<()> {
    if rows.is_empty() {
        return write_file(&table_dir.join("part-00000.parquet"), &batch(&[])?);
    }
    for (path, group) in encode::group_by_partition(rows, partition) {
        let file = table_dir.join(path).join("part-00000.parquet");
        write_file(&file, &batch(&group)?)?;
    }
    Ok(())
}

fn write_file(path: &Path, batch: &RecordBatch) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    debug!(path = %path.display(), rows = batch.num_rows(), "wrote parquet file");
    Ok(())
}

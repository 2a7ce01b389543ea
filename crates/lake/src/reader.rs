//! Parquet read-back.
//!
//! The fact builder re-reads `songs` from durable storage instead of
//! holding rows in memory from the catalog stage; a missing or unreadable
//! table is a fatal dependency error for the run.

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use walkdir::WalkDir;

use etl_core::{Error, Result, SongRow};

use crate::encode;

/// Reads the whole `songs` table back from `table_dir`.
pub fn read_songs(table_dir: &Path) -> Result<Vec<SongRow>> {
    let mut rows = Vec::new();
    for batch in read_batches(table_dir, "songs")? {
        rows.extend(encode::decode_songs(&batch)?);
    }
    Ok(rows)
}

/// Reads every record batch of a table directory, partition dirs included.
pub fn read_batches(table_dir: &Path, table: &'static str) -> Result<Vec<RecordBatch>> {
    if !table_dir.is_dir() {
        return Err(Error::dependency(
            table,
            format!("not found at {}", table_dir.display()),
        ));
    }
    let files = parquet_files(table_dir)?;
    if files.is_empty() {
        return Err(Error::dependency(
            table,
            format!("no parquet files under {}", table_dir.display()),
        ));
    }

    let mut batches = Vec::new();
    for path in files {
        let file = File::open(&path).map_err(|e| Error::io(&path, e))?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
        for batch in reader {
            batches.push(batch?);
        }
    }
    Ok(batches)
}

fn parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::io(dir, e.into()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "parquet")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

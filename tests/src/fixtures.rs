//! Test fixtures: a throwaway lake layout plus record generators.

use std::fs;
use std::path::{Path, PathBuf};

use arrow::array::{Array, Int64Array, StringArray};
use tempfile::TempDir;

use etl_core::PipelineConfig;
use lake::reader;

/// A temporary source + output layout for one pipeline run.
pub struct TestLake {
    dir: TempDir,
}

impl TestLake {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        fs::create_dir_all(dir.path().join("data/song_data")).unwrap();
        fs::create_dir_all(dir.path().join("data/log_data")).unwrap();
        Self { dir }
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            source_root: self.dir.path().join("data"),
            output_root: self.output_root(),
            ..PipelineConfig::default()
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    pub fn table_dir(&self, table: &str) -> PathBuf {
        self.output_root().join(table)
    }

    /// Writes one catalog file (one JSON object) under a nested prefix.
    pub fn add_catalog_file(&self, name: &str, record: &serde_json::Value) {
        let path = self
            .dir
            .path()
            .join("data/song_data/A/A/A")
            .join(format!("{name}.json"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, record.to_string()).unwrap();
    }

    /// Writes one activity-log file (JSON lines).
    pub fn add_log_file(&self, name: &str, records: &[serde_json::Value]) {
        let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
        let path = self
            .dir
            .path()
            .join("data/log_data")
            .join(format!("{name}.json"));
        fs::write(path, lines.join("\n")).unwrap();
    }
}

impl Default for TestLake {
    fn default() -> Self {
        Self::new()
    }
}

/// The spec's reference catalog record.
pub fn catalog_record() -> serde_json::Value {
    serde_json::json!({
        "song_id": "S1",
        "title": "Song A",
        "artist_id": "AR1",
        "year": 2000,
        "duration": 210.5,
        "artist_name": "Band",
        "artist_location": "NYC",
        "artist_latitude": 40.7,
        "artist_longitude": -74.0
    })
}

/// The spec's reference playback record (2000-01-01 00:00:00 UTC).
pub fn playback_record() -> serde_json::Value {
    serde_json::json!({
        "userId": "7",
        "firstName": "Jo",
        "lastName": "Doe",
        "gender": "F",
        "level": "free",
        "page": "NextSong",
        "ts": 946_684_800_000_i64,
        "song": "Song A",
        "artist": "Band",
        "location": "NYC",
        "userAgent": "UA"
    })
}

/// Total row count of a published table, across all partitions.
pub fn row_count(table_dir: &Path, table: &'static str) -> usize {
    reader::read_batches(table_dir, table)
        .expect("read table")
        .iter()
        .map(|b| b.num_rows())
        .sum()
}

/// All values of a Utf8 column across partitions, nulls included.
pub fn string_values(table_dir: &Path, table: &'static str, column: &str) -> Vec<Option<String>> {
    let mut values = Vec::new();
    for batch in reader::read_batches(table_dir, table).expect("read table") {
        let col = batch
            .column_by_name(column)
            .unwrap_or_else(|| panic!("column {column} missing"))
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("utf8 column");
        for i in 0..col.len() {
            values.push((!col.is_null(i)).then(|| col.value(i).to_string()));
        }
    }
    values
}

/// All values of an Int64 column across partitions.
pub fn i64_values(table_dir: &Path, table: &'static str, column: &str) -> Vec<i64> {
    let mut values = Vec::new();
    for batch in reader::read_batches(table_dir, table).expect("read table") {
        let col = batch
            .column_by_name(column)
            .unwrap_or_else(|| panic!("column {column} missing"))
            .as_any()
            .downcast_ref::<Int64Array>()
            .expect("int64 column");
        for i in 0..col.len() {
            values.push(col.value(i));
        }
    }
    values
}

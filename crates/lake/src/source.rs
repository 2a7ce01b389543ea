//! Source scanning for the two input record families.
//!
//! Catalog records live one JSON object per file under a nested
//! date-partitioned prefix; activity records live one JSON object per line
//! in flat daily files. Scan order is sorted by file name so dedup by first
//! occurrence is deterministic across runs.
//!
//! Malformed records are a data-quality condition, not an error: they are
//! skipped, counted, and logged. Unreadable files are fatal.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use etl_core::{ActivityRecord, CatalogRecord, Error, Result};

/// Records parsed from one source prefix, plus the skip count.
#[derive(Debug)]
pub struct SourceBatch<T> {
    pub records: Vec<T>,
    pub skipped: u64,
}

/// Scans catalog files (one JSON object each) under `dir`, recursively.
pub fn scan_catalog(dir: &Path) -> Result<SourceBatch<CatalogRecord>> {
    let mut batch = SourceBatch {
        records: Vec::new(),
        skipped: 0,
    };
    for path in json_files(dir)? {
        let raw = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        match serde_json::from_str::<CatalogRecord>(&raw) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping malformed catalog record");
                batch.skipped += 1;
            }
        }
    }
    Ok(batch)
}

/// Scans activity-log files (JSON lines) under `dir`, recursively.
pub fn scan_activity(dir: &Path) -> Result<SourceBatch<ActivityRecord>> {
    let mut batch = SourceBatch {
        records: Vec::new(),
        skipped: 0,
    };
    for path in json_files(dir)? {
        let raw = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        for (lineno, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ActivityRecord>(line) {
                Ok(record) => batch.records.push(record),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        line = lineno + 1,
                        error = %e,
                        "skipping malformed activity record"
                    );
                    batch.skipped += 1;
                }
            }
        }
    }
    Ok(batch)
}

/// Lists `.json` files under `dir` in deterministic (name-sorted) order.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::io(dir, e.into()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

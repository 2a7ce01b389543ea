//! Pipeline configuration.
//!
//! Scoped to one run and passed explicitly into each component; nothing here
//! lives in process-global state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Deduplication policy for keyed dimension rows.
///
/// The source system kept the first occurrence in input order, which for
/// `users` silently discards legitimate attribute changes (a user's `level`
/// can move free -> paid). The policy is configurable so that limitation is
/// a choice rather than a hardcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Keep the first occurrence in input order (original behavior).
    #[default]
    First,
    /// Keep the last occurrence in input order.
    Last,
    /// Keep the most frequent occurrence; ties break to earliest.
    MostFrequent,
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root containing `song_data/` and `log_data/` prefixes.
    pub source_root: PathBuf,
    /// Root the five table directories are published under.
    pub output_root: PathBuf,
    /// Catalog prefix under the source root.
    #[serde(default = "default_song_prefix")]
    pub song_prefix: String,
    /// Activity-log prefix under the source root.
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    /// Dedup policy for the `users` dimension.
    #[serde(default)]
    pub user_dedup: DedupPolicy,
}

fn default_song_prefix() -> String {
    "song_data".to_string()
}

fn default_log_prefix() -> String {
    "log_data".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("data"),
            output_root: PathBuf::from("output"),
            song_prefix: default_song_prefix(),
            log_prefix: default_log_prefix(),
            user_dedup: DedupPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Directory holding catalog records.
    pub fn song_data(&self) -> PathBuf {
        self.source_root.join(&self.song_prefix)
    }

    /// Directory holding activity-log files.
    pub fn log_data(&self) -> PathBuf {
        self.source_root.join(&self.log_prefix)
    }

    /// Validates the run can start: both source prefixes must exist.
    pub fn validate(&self) -> Result<()> {
        for dir in [self.song_data(), self.log_data()] {
            if !dir.is_dir() {
                return Err(Error::config(format!(
                    "source directory not found: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

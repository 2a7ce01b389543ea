//! Transformation stages of the sparkify ETL pipeline.
//!
//! Three stages feed a small dependency graph:
//! - catalog: songs + artists dimensions, no dependencies
//! - activity: users + time dimensions from playback events, no dependencies
//! - fact: songplays, joining playback events against the durably written
//!   songs table
//!
//! The runner executes catalog and activity concurrently, then the fact
//! stage, then publishes all five tables atomically.

pub mod activity;
pub mod catalog;
pub mod dedup;
pub mod fact;
pub mod runner;

pub use runner::{Pipeline, RunSummary};

/// Rows projected for one dimension table, plus the count of records that
/// could not be keyed (missing dedup key).
#[derive(Debug)]
pub struct Extraction<R> {
    pub rows: Vec<R>,
    pub missing_key: u64,
}

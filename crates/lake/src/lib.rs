//! Durable-storage collaborator for the ETL pipeline.
//!
//! Handles the outer edges of a run:
//! - Source scanning (nested one-object-per-file catalog, flat JSONL logs)
//! - Arrow encoding of the five star-schema tables
//! - Hive-partitioned Parquet writes into a staging directory
//! - Songs read-back for the fact builder
//! - Atomic swap of staged tables into the output root

pub mod encode;
pub mod publish;
pub mod reader;
pub mod source;
pub mod table;
pub mod writer;

pub use publish::Staging;
pub use source::{scan_activity, scan_catalog, SourceBatch};
pub use table::Table;

//! Structured logging for the ETL pipeline.

pub mod tracing_setup;

pub use tracing_setup::*;

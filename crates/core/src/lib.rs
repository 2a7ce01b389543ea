//! Core types, schemas, and configuration for the sparkify ETL pipeline.

pub mod config;
pub mod error;
pub mod records;
pub mod rows;
pub mod time;

pub use config::*;
pub use error::{Error, Result};
pub use records::*;
pub use rows::*;
pub use time::StartTime;

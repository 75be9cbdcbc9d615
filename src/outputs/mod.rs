//! Output writers for a finished batch.
//!
//! # Submodules
//!
//! - [`json`]: Writes the records as a JSON array
//! - [`csv`]: Writes the records as CSV rows with a fixed column order
//!
//! Both take the ordered batch as produced by [`crate::batch::run`] and write
//! it to a single file.

pub mod csv;
pub mod json;

use crate::models::ArticleRecord;
use clap::ValueEnum;
use std::error::Error;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// Write `records` to `path` in `format`.
pub async fn write(format: OutputFormat, records: &[ArticleRecord], path: &str) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => json::write_records(records, path).await,
        OutputFormat::Csv => csv::write_records(records, path).await,
    }
}

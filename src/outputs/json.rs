//! JSON output: the whole batch as one pretty-printed array of records.
//!
//! Absent fields are written as `null`, so every record carries every key.

use crate::models::ArticleRecord;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `records` as a JSON array.
pub fn to_json(records: &[ArticleRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Write `records` to `path` as a JSON array.
#[instrument(level = "info", skip_all, fields(%path, count = records.len()))]
pub async fn write_records(records: &[ArticleRecord], path: &str) -> Result<(), Box<dyn Error>> {
    let json = to_json(records)?;
    fs::write(path, json).await?;
    info!("Wrote JSON file");
    Ok(())
}

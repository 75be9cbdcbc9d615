//! CSV output: one row per record in a fixed column order.
//!
//! Absent fields are written as empty strings. The header row is always
//! written, even for an empty batch.

use crate::models::ArticleRecord;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Column order of the CSV output.
pub const COLUMNS: [&str; 8] = [
    "url",
    "title",
    "description",
    "published",
    "content",
    "summary",
    "scraped_at",
    "error",
];

/// Serialize `records` as CSV text.
pub fn to_csv(records: &[ArticleRecord]) -> Result<String, Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(COLUMNS)?;

    for record in records {
        let opt = |field: &Option<String>| field.clone().unwrap_or_default();
        writer.write_record([
            record.url.clone(),
            opt(&record.title),
            opt(&record.description),
            opt(&record.published),
            opt(&record.content),
            opt(&record.summary),
            record.scraped_at.to_rfc3339(),
            opt(&record.error),
        ])?;
    }

    Ok(String::from_utf8(writer.into_inner()?)?)
}

/// Write `records` to `path` as CSV.
#[instrument(level = "info", skip_all, fields(%path, count = records.len()))]
pub async fn write_records(records: &[ArticleRecord], path: &str) -> Result<(), Box<dyn Error>> {
    let csv = to_csv(records)?;
    fs::write(path, csv).await?;
    info!("Wrote CSV file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_header_only_for_empty_batch() {
        let out = to_csv(&[]).unwrap();
        assert_eq!(out, "url,title,description,published,content,summary,scraped_at,error\n");
    }

    #[test]
    fn test_absent_fields_are_empty_strings() {
        let scraped_at = Local::now();
        let record = ArticleRecord::failed("https://finance.yahoo.com/news/b.html", scraped_at, "timed out");
        let out = to_csv(&[record]).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, COLUMNS);

        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "https://finance.yahoo.com/news/b.html");
        for i in 1..=5 {
            assert_eq!(&row[i], "");
        }
        assert_eq!(&row[6], scraped_at.to_rfc3339());
        assert_eq!(&row[7], "timed out");
    }

    #[test]
    fn test_multiline_content_is_quoted() {
        let record = ArticleRecord {
            content: Some("First paragraph, with a comma.\n\nSecond paragraph.".to_string()),
            ..ArticleRecord::new("https://finance.yahoo.com/news/a.html", Local::now())
        };
        let out = to_csv(&[record]).unwrap();
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[4], "First paragraph, with a comma.\n\nSecond paragraph.");
    }
}

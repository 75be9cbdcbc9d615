//! # Finance News Digest
//!
//! Crawls Yahoo Finance topic listings, extracts each article's title,
//! description, publish time and body, summarizes the body and writes the
//! batch as JSON or CSV.
//!
//! ## Usage
//!
//! ```sh
//! finance_news_digest --topics latest-news stock-market --count 5 --format csv --output news.csv
//! ```
//!
//! ## Architecture
//!
//! The application follows a sequential pipeline:
//! 1. **Indexing**: Page through each topic listing and collect article URLs
//! 2. **Fetching**: Download each article and extract its fields and body
//! 3. **Summarizing**: Condense each body (extractive, or neural with fallback)
//! 4. **Output**: Write every record, failed ones included, to one file

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod batch;
mod cli;
mod fetcher;
mod models;
mod outputs;
mod scrapers;
mod summarizer;
mod utils;

use cli::Cli;
use fetcher::HttpFetcher;
use summarizer::Summarizer;
use utils::ensure_writable_parent;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("finance_news_digest starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: the output file must be writable before any crawling
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output,
            error = %e,
            "Output location is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let summarizer = Summarizer::load(args.summarizer, args.config.as_deref(), &args.template).await;
    info!(requested = ?args.summarizer, active = ?summarizer.kind(), "Summarizer ready");

    let fetcher = HttpFetcher::new()?;
    let plan = args.plan();
    let records = batch::run(&fetcher, &summarizer, &plan).await;

    let failed = records.iter().filter(|r| r.is_failed()).count();
    let with_content = records.iter().filter(|r| r.content.is_some()).count();

    if let Err(e) = outputs::write(args.format, &records, &args.output).await {
        error!(path = %args.output, error = %e, "Failed to write output");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        path = %args.output,
        format = ?args.format,
        saved = records.len(),
        with_content,
        failed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

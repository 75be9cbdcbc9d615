//! Yahoo Finance scraping: listing pagination, body extraction and article
//! assembly.
//!
//! Scraping follows a two-phase pattern per topic:
//!
//! 1. **Indexing**: page through the topic listing and collect article URLs
//! 2. **Fetching**: download each article and assemble its record
//!
//! | Step | Module | Notes |
//! |------|--------|-------|
//! | Indexing | [`listing`] | Offset pagination, per-topic dedup, stops on an empty page |
//! | Body | [`body`] | Ordered container strategies with a document-wide fallback |
//! | Fetching | [`article`] | Metadata, body and summary; failures land on the record |
//!
//! Failed fetches are logged and never abort the batch.

pub mod article;
pub mod body;
pub mod listing;

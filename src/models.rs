//! Data models for topics and scraped article records.
//!
//! - [`Topic`]: A known news category and its listing endpoint
//! - [`ArticleRecord`]: One article's extracted state, as handed to the writers
//!
//! Records are created once by the article assembler and never mutated
//! afterwards. Every field except `url` and `scraped_at` is optional.

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Yahoo Finance news topic with a fixed listing endpoint.
///
/// The set is closed; listings are never crawled from arbitrary URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Topic {
    LatestNews,
    StockMarket,
    Earnings,
    Economies,
    Tech,
}

impl Topic {
    /// The listing page endpoint for this topic.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Topic::LatestNews => "https://finance.yahoo.com/topic/latest-news/",
            Topic::StockMarket => "https://finance.yahoo.com/topic/stock-market-news/",
            Topic::Earnings => "https://finance.yahoo.com/topic/earnings/",
            Topic::Economies => "https://finance.yahoo.com/topic/economic-news/",
            Topic::Tech => "https://finance.yahoo.com/topic/tech/",
        }
    }

    /// The CLI identifier, e.g. `latest-news`.
    pub fn id(&self) -> &'static str {
        match self {
            Topic::LatestNews => "latest-news",
            Topic::StockMarket => "stock-market",
            Topic::Earnings => "earnings",
            Topic::Economies => "economies",
            Topic::Tech => "tech",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One article's extracted state.
///
/// The terminal state of a record is exactly one of:
/// - `content` present (and `summary` with it),
/// - `error` present, with every content-derived field unset,
/// - neither present: the page was fetched but no body cleared the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// The article URL; unique within a batch.
    pub url: String,
    /// Primary heading, falling back to the `og:title` meta tag.
    pub title: Option<String>,
    /// The `description` meta tag.
    pub description: Option<String>,
    /// Raw `datetime` attribute of the page's first `time` element.
    pub published: Option<String>,
    /// Extracted body, paragraphs separated by a blank line.
    pub content: Option<String>,
    /// Summary of `content` produced by the active strategy.
    pub summary: Option<String>,
    /// When the fetch for this article was attempted.
    pub scraped_at: DateTime<Local>,
    /// Transport failure message, if the fetch failed.
    pub error: Option<String>,
}

impl ArticleRecord {
    /// A record for `url` with only the attempt timestamp set.
    pub fn new(url: impl Into<String>, scraped_at: DateTime<Local>) -> Self {
        Self {
            url: url.into(),
            title: None,
            description: None,
            published: None,
            content: None,
            summary: None,
            scraped_at,
            error: None,
        }
    }

    /// A record capturing a failed fetch. Content fields stay unset.
    pub fn failed(url: impl Into<String>, scraped_at: DateTime<Local>, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(url, scraped_at)
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

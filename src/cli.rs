//! Command-line interface definitions.
//!
//! All arguments can be provided via command-line flags; the neural backend
//! settings can also come from environment variables.

use crate::api::DEFAULT_TEMPLATE;
use crate::batch::BatchPlan;
use crate::models::Topic;
use crate::outputs::OutputFormat;
use crate::scrapers::listing::{CollectorConfig, DEFAULT_PAGE_CEILING};
use crate::summarizer::SummarizerKind;
use clap::Parser;
use std::time::Duration;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Three articles from the latest news listing
/// finance_news_digest --topics latest-news --count 3
///
/// # Several topics, CSV output, neural summaries
/// finance_news_digest -t latest-news stock-market earnings -c 5 -f csv -o news.csv --summarizer neural
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topics to crawl
    #[arg(short, long, value_enum, num_args = 1.., default_values_t = vec![Topic::LatestNews])]
    pub topics: Vec<Topic>,

    /// Maximum articles per topic (default: every discovered article)
    #[arg(short, long)]
    pub count: Option<usize>,

    /// Output file path
    #[arg(short, long, default_value = "news.json")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Delay between article fetches, in seconds
    #[arg(long, default_value_t = 0.5, value_parser = parse_seconds)]
    pub delay: f64,

    /// Delay between listing page fetches, in seconds
    #[arg(long, default_value_t = 0.5, value_parser = parse_seconds)]
    pub page_delay: f64,

    /// Summarization strategy
    #[arg(long, value_enum, default_value_t = SummarizerKind::Extractive)]
    pub summarizer: SummarizerKind,

    /// Maximum listing pages per topic (default: up to --page-ceiling)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Listing pages fetched per topic when --max-pages is not set
    #[arg(long, default_value_t = DEFAULT_PAGE_CEILING)]
    pub page_ceiling: usize,

    /// Path to the neural backend config.yaml
    #[arg(long, env = "NEWS_DIGEST_CONFIG")]
    pub config: Option<String>,

    /// Chat template used by the neural backend
    #[arg(long, env = "NEWS_DIGEST_TEMPLATE", default_value = DEFAULT_TEMPLATE)]
    pub template: String,
}

fn parse_seconds(s: &str) -> Result<f64, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if secs.is_finite() && secs >= 0.0 {
        Ok(secs)
    } else {
        Err(format!("`{s}` is not a non-negative number of seconds"))
    }
}

impl Cli {
    /// The crawl plan described by these arguments.
    pub fn plan(&self) -> BatchPlan {
        BatchPlan {
            topics: self.topics.clone(),
            count: self.count,
            article_delay: Duration::from_secs_f64(self.delay),
            collector: CollectorConfig {
                max_pages: self.max_pages,
                page_ceiling: self.page_ceiling,
                page_delay: Duration::from_secs_f64(self.page_delay),
            },
        }
    }
}

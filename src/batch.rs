//! Batch driver: topics in, ordered records out.
//!
//! Everything runs sequentially. Records come out in topic order, then in
//! discovery order within a topic.

use crate::api::AskAsync;
use crate::fetcher::Fetch;
use crate::models::{ArticleRecord, Topic};
use crate::scrapers::{article, listing};
use crate::summarizer::Summarizer;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

/// What to crawl in one run.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    /// Topics in processing order. Repeats are crawled once.
    pub topics: Vec<Topic>,
    /// Per-topic article cap. `None` fetches every discovered link.
    pub count: Option<usize>,
    /// Pause between article fetches.
    pub article_delay: Duration,
    pub collector: listing::CollectorConfig,
}

/// Crawl every topic in `plan` and assemble one record per article.
#[instrument(level = "info", skip_all, fields(topics = plan.topics.len(), count = ?plan.count))]
pub async fn run<F, A>(fetcher: &F, summarizer: &Summarizer<A>, plan: &BatchPlan) -> Vec<ArticleRecord>
where
    F: Fetch,
    A: AskAsync<Response = String>,
{
    let mut records = Vec::new();

    for topic in plan.topics.iter().unique() {
        let endpoint = topic.endpoint();
        info!(%topic, endpoint, "Collecting topic");
        let links = listing::collect_links(fetcher, endpoint, &plan.collector).await;

        let selected = match plan.count {
            Some(n) => &links[..n.min(links.len())],
            None => &links[..],
        };
        info!(%topic, fetching = selected.len(), found = links.len(), "Fetching articles");

        for (i, link) in selected.iter().enumerate() {
            if i > 0 {
                sleep(plan.article_delay).await;
            }
            info!(%topic, "[{}/{}] {}", i + 1, selected.len(), truncate_for_log(link, 80));
            records.push(article::assemble(fetcher, summarizer, link).await);
        }
    }

    let failed = records.iter().filter(|r| r.is_failed()).count();
    info!(total = records.len(), failed, "Batch complete");
    records
}

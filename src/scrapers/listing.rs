//! Topic listing pagination and article link discovery.
//!
//! # URL Pattern
//!
//! Page 0 is the bare topic endpoint. Page `n` adds
//! `?count=100&offset={n * 100}`. Article links look like
//! `https://finance.yahoo.com/news/some-slug-123456789.html` and are found
//! anywhere in the listing markup, often as relative `/news/...` references.

use crate::fetcher::Fetch;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Listing results requested per page.
pub const PAGE_SIZE: usize = 100;

/// Page limit used when no explicit cap is configured.
pub const DEFAULT_PAGE_CEILING: usize = 100;

/// Path marker identifying article links.
const ARTICLE_MARKER: &str = "/news/";

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Pagination settings for one collection run.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Explicit page cap. `None` falls back to `page_ceiling`.
    pub max_pages: Option<usize>,
    /// Upper bound on pages fetched when `max_pages` is unset.
    pub page_ceiling: usize,
    /// Pause between successive page fetches.
    pub page_delay: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            page_ceiling: DEFAULT_PAGE_CEILING,
            page_delay: Duration::from_millis(500),
        }
    }
}

impl CollectorConfig {
    fn page_limit(&self) -> usize {
        self.max_pages.unwrap_or(self.page_ceiling)
    }
}

/// URL of listing page `page` for `endpoint`.
pub fn page_url(endpoint: &Url, page: usize) -> Url {
    let mut url = endpoint.clone();
    if page > 0 {
        url.query_pairs_mut()
            .append_pair("count", &PAGE_SIZE.to_string())
            .append_pair("offset", &(page * PAGE_SIZE).to_string());
    }
    url
}

/// Collect unique article URLs for one topic endpoint.
///
/// Pages are fetched in order until a page contributes no new links, the page
/// limit is reached, or a fetch fails. Links gathered before a failure are
/// kept. The result is in discovery order.
#[instrument(level = "info", skip(fetcher, config), fields(max_pages = ?config.max_pages))]
pub async fn collect_links<F: Fetch>(
    fetcher: &F,
    topic_endpoint: &str,
    config: &CollectorConfig,
) -> Vec<String> {
    let endpoint = match Url::parse(topic_endpoint) {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "Invalid topic endpoint");
            return Vec::new();
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut links: Vec<String> = Vec::new();
    let limit = config.page_limit();

    for page in 0..limit {
        if page > 0 {
            sleep(config.page_delay).await;
        }

        let url = page_url(&endpoint, page);
        debug!(page = page + 1, %url, "Fetching listing page");
        let html = match fetcher.fetch(url.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                warn!(page = page + 1, error = %e, "Listing fetch failed; stopping pagination");
                break;
            }
        };

        let mut fresh = 0usize;
        for link in extract_article_links(&html, &endpoint) {
            if seen.insert(link.clone()) {
                links.push(link);
                fresh += 1;
            }
        }

        if fresh == 0 {
            info!(page = page + 1, "No new links on page; pagination complete");
            break;
        }
        info!(page = page + 1, found = fresh, total = links.len(), "Collected listing page");
    }

    info!(count = links.len(), "Indexed article URLs");
    debug!(urls = ?links, "Topic URLs");
    links
}

/// Extract candidate article links from one listing page, in document order.
///
/// Duplicates within the page are kept; deduplication is the caller's job.
/// Relative references resolve against the endpoint's origin, not its path.
pub fn extract_article_links(html: &str, endpoint: &Url) -> Vec<String> {
    let Ok(origin) = endpoint.join("/") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_candidate(href.trim(), &origin))
        .collect()
}

fn resolve_candidate(href: &str, origin: &Url) -> Option<String> {
    if href.is_empty()
        || href.contains('#')
        || href.to_ascii_lowercase().starts_with("javascript:")
        || href.contains("subscribe")
    {
        return None;
    }

    let resolved = origin.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    if resolved.host_str() != origin.host_str() {
        return None;
    }
    if !resolved.path().contains(ARTICLE_MARKER) {
        return None;
    }
    Some(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::StaticFetcher;

    const ENDPOINT: &str = "https://finance.yahoo.com/topic/tech/";

    fn endpoint() -> Url {
        Url::parse(ENDPOINT).unwrap()
    }

    fn page(n: usize) -> String {
        page_url(&endpoint(), n).to_string()
    }

    fn listing(hrefs: &[&str]) -> String {
        let anchors: String = hrefs
            .iter()
            .map(|h| format!(r#"<li><a href="{h}">story</a></li>"#))
            .collect();
        format!("<html><body><ul>{anchors}</ul></body></html>")
    }

    fn config() -> CollectorConfig {
        CollectorConfig {
            page_delay: Duration::ZERO,
            ..CollectorConfig::default()
        }
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page(0), ENDPOINT);
        assert_eq!(page(1), "https://finance.yahoo.com/topic/tech/?count=100&offset=100");
        assert_eq!(page(3), "https://finance.yahoo.com/topic/tech/?count=100&offset=300");
    }

    #[test]
    fn test_extract_article_links_filters_candidates() {
        let html = listing(&[
            "/news/apple-earnings-123.html",
            "https://finance.yahoo.com/news/fed-rates-456.html",
            "/news/apple-earnings-123.html#comments",
            "javascript:void(0)",
            "/news/subscribe-now.html",
            "https://www.reuters.com/news/other.html",
            "/quote/AAPL/",
            "https://finance.yahoo.com/video/clip.html",
        ]);
        let links = extract_article_links(&html, &endpoint());
        assert_eq!(
            links,
            vec![
                "https://finance.yahoo.com/news/apple-earnings-123.html",
                "https://finance.yahoo.com/news/fed-rates-456.html",
            ]
        );
    }

    #[test]
    fn test_relative_links_resolve_against_origin() {
        let html = listing(&["/news/a.html", "//finance.yahoo.com/news/b.html"]);
        let links = extract_article_links(&html, &endpoint());
        assert_eq!(
            links,
            vec![
                "https://finance.yahoo.com/news/a.html",
                "https://finance.yahoo.com/news/b.html",
            ]
        );
    }

    #[test]
    fn test_path_relative_links_resolve_against_origin() {
        let html = listing(&["news/foo.html", "../news/bar.html"]);
        let links = extract_article_links(&html, &endpoint());
        assert_eq!(
            links,
            vec![
                "https://finance.yahoo.com/news/foo.html",
                "https://finance.yahoo.com/news/bar.html",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_delay_only_between_pages() {
        let fetcher = StaticFetcher::new()
            .page(&page(0), listing(&["/news/a.html"]))
            .page(&page(1), listing(&["/news/b.html"]))
            .page(&page(2), listing(&["/news/c.html"]));

        let cfg = CollectorConfig {
            max_pages: Some(3),
            page_ceiling: DEFAULT_PAGE_CEILING,
            page_delay: Duration::from_secs(2),
        };
        let start = tokio::time::Instant::now();
        let links = collect_links(&fetcher, ENDPOINT, &cfg).await;

        assert_eq!(links.len(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_deduplicates_across_pages_keeping_first_position() {
        let fetcher = StaticFetcher::new()
            .page(&page(0), listing(&["/news/a.html", "/news/b.html"]))
            .page(&page(1), listing(&["/news/c.html", "/news/a.html", "/news/d.html"]))
            .page(&page(2), listing(&["/news/b.html"]));

        let links = collect_links(&fetcher, ENDPOINT, &config()).await;
        assert_eq!(
            links,
            vec![
                "https://finance.yahoo.com/news/a.html",
                "https://finance.yahoo.com/news/b.html",
                "https://finance.yahoo.com/news/c.html",
                "https://finance.yahoo.com/news/d.html",
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_at_first_page_without_new_links() {
        let fetcher = StaticFetcher::new()
            .page(&page(0), listing(&["/news/a.html"]))
            .page(&page(1), listing(&["/news/b.html"]))
            .page(&page(2), listing(&["/news/a.html", "/quote/MSFT/"]))
            .page(&page(3), listing(&["/news/never.html"]));

        let links = collect_links(&fetcher, ENDPOINT, &config()).await;
        assert_eq!(links.len(), 2);
        assert_eq!(fetcher.requested(), vec![page(0), page(1), page(2)]);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_links_so_far() {
        let fetcher = StaticFetcher::new()
            .page(&page(0), listing(&["/news/a.html", "/news/b.html"]))
            .timeout(&page(1))
            .page(&page(2), listing(&["/news/c.html"]));

        let links = collect_links(&fetcher, ENDPOINT, &config()).await;
        assert_eq!(links.len(), 2);
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_first_page_failure_yields_nothing() {
        let fetcher = StaticFetcher::new().status(&page(0), 503);
        let links = collect_links(&fetcher, ENDPOINT, &config()).await;
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_respects_explicit_page_cap() {
        let fetcher = StaticFetcher::new()
            .page(&page(0), listing(&["/news/a.html"]))
            .page(&page(1), listing(&["/news/b.html"]))
            .page(&page(2), listing(&["/news/c.html"]));

        let cfg = CollectorConfig {
            max_pages: Some(2),
            ..config()
        };
        let links = collect_links(&fetcher, ENDPOINT, &cfg).await;
        assert_eq!(links.len(), 2);
        assert_eq!(fetcher.requested(), vec![page(0), page(1)]);
    }

    #[tokio::test]
    async fn test_page_ceiling_bounds_unlimited_pagination() {
        let mut fetcher = StaticFetcher::new();
        for n in 0..10 {
            let href = format!("/news/story-{n}.html");
            fetcher = fetcher.page(&page(n), listing(&[href.as_str()]));
        }
        let cfg = CollectorConfig {
            page_ceiling: 4,
            ..config()
        };
        let links = collect_links(&fetcher, ENDPOINT, &cfg).await;
        assert_eq!(links.len(), 4);
        assert_eq!(fetcher.requested().len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_endpoint_returns_empty() {
        let fetcher = StaticFetcher::new();
        let links = collect_links(&fetcher, "not a url", &config()).await;
        assert!(links.is_empty());
        assert!(fetcher.requested().is_empty());
    }
}

//! Article page assembly.
//!
//! Fetches one article, pulls its metadata and body, summarizes the body and
//! produces an [`ArticleRecord`]. Failures never escape: a failed fetch is
//! recorded on the record itself.

use super::body;
use crate::api::AskAsync;
use crate::fetcher::Fetch;
use crate::models::ArticleRecord;
use crate::summarizer::Summarizer;
use chrono::Local;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static OG_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());

/// Page fields that do not depend on the body extractor.
#[derive(Debug, Default, PartialEq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
}

/// Fetch and assemble the record for one article URL.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn assemble<F, A>(fetcher: &F, summarizer: &Summarizer<A>, url: &str) -> ArticleRecord
where
    F: Fetch,
    A: AskAsync<Response = String>,
{
    let scraped_at = Local::now();
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Article fetch failed");
            return ArticleRecord::failed(url, scraped_at, e);
        }
    };

    // the parsed DOM is dropped before summarizing
    let (metadata, content) = {
        let document = Html::parse_document(&html);
        (extract_metadata(&document), body::extract_from(&document))
    };

    let summary = match &content {
        Some(text) => Some(summarizer.summarize(text).await),
        None => {
            debug!("No article body found");
            None
        }
    };

    info!(
        title = metadata.title.as_deref().unwrap_or(""),
        body_chars = content.as_ref().map(|c| c.chars().count()).unwrap_or(0),
        "Parsed article"
    );

    ArticleRecord {
        title: metadata.title,
        description: metadata.description,
        published: metadata.published,
        content,
        summary,
        ..ArticleRecord::new(url, scraped_at)
    }
}

/// Title, description and publish time of a parsed article page.
pub fn extract_metadata(document: &Html) -> PageMetadata {
    let title = document
        .select(&HEADLINE)
        .next()
        .map(body::visible_text)
        .and_then(non_empty)
        .or_else(|| meta_content(document, &OG_TITLE));

    PageMetadata {
        title,
        description: meta_content(document, &DESCRIPTION),
        published: document
            .select(&TIME)
            .next()
            .and_then(|t| t.value().attr("datetime"))
            .map(|d| d.trim().to_string())
            .and_then(non_empty),
    }
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
        .and_then(non_empty)
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::StaticFetcher;
    use crate::summarizer::Extractive;
    use std::error::Error;

    #[derive(Debug)]
    struct NoBackend;

    impl AskAsync for NoBackend {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            Err("unused".into())
        }
    }

    const URL: &str = "https://finance.yahoo.com/news/fed-holds-rates-123.html";

    fn article_page(title: &str) -> String {
        format!(
            r#"<html><head>
                 <meta property="og:title" content="OG {title}">
                 <meta name="description" content=" The Fed kept rates unchanged. ">
               </head><body>
                 <h1> {title} </h1>
                 <time datetime="2025-05-06T14:30:00.000Z">May 6, 2025</time>
                 <div class="caas-body">
                   <p>The Federal Reserve held interest rates steady on Wednesday, as expected by markets.</p>
                   <p>Policymakers said inflation had eased but remained above the central bank's target.</p>
                   <p>Chair Jerome Powell said the committee was in no hurry to adjust policy this year.</p>
                   <p>Treasury yields slipped after the announcement while stocks extended their gains.</p>
                 </div>
               </body></html>"#
        )
    }

    fn summarizer() -> Summarizer<NoBackend> {
        Summarizer::extractive()
    }

    #[tokio::test]
    async fn test_assembles_full_record() {
        let fetcher = StaticFetcher::new().page(URL, article_page("Fed holds rates"));
        let record = assemble(&fetcher, &summarizer(), URL).await;

        assert_eq!(record.url, URL);
        assert_eq!(record.title.as_deref(), Some("Fed holds rates"));
        assert_eq!(record.description.as_deref(), Some("The Fed kept rates unchanged."));
        assert_eq!(record.published.as_deref(), Some("2025-05-06T14:30:00.000Z"));
        assert!(record.error.is_none());

        let content = record.content.as_deref().unwrap();
        assert_eq!(content.split("\n\n").count(), 4);
        assert_eq!(
            record.summary.as_deref(),
            Some(Extractive::default().summarize(content).as_str())
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recorded() {
        let fetcher = StaticFetcher::new().timeout(URL);
        let record = assemble(&fetcher, &summarizer(), URL).await;

        assert_eq!(record.url, URL);
        assert!(record.error.as_deref().unwrap().contains("timed out"));
        assert!(record.title.is_none());
        assert!(record.description.is_none());
        assert!(record.published.is_none());
        assert!(record.content.is_none());
        assert!(record.summary.is_none());
    }

    #[tokio::test]
    async fn test_http_status_failure_is_recorded() {
        let fetcher = StaticFetcher::new().status(URL, 500);
        let record = assemble(&fetcher, &summarizer(), URL).await;
        assert!(record.error.as_deref().unwrap().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_page_without_body_has_no_content_or_error() {
        let html = r#"<html><body><h1>Video: Market wrap</h1><p>Watch the clip.</p></body></html>"#;
        let fetcher = StaticFetcher::new().page(URL, html);
        let record = assemble(&fetcher, &summarizer(), URL).await;

        assert_eq!(record.title.as_deref(), Some("Video: Market wrap"));
        assert!(record.content.is_none());
        assert!(record.summary.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn test_title_falls_back_to_og_title() {
        let html = r#"<html><head><meta property="og:title" content=" Stocks slide "></head>
                      <body><h1>   </h1></body></html>"#;
        let metadata = extract_metadata(&Html::parse_document(html));
        assert_eq!(metadata.title.as_deref(), Some("Stocks slide"));
    }

    #[test]
    fn test_missing_metadata_is_absent() {
        let html = r#"<html><head><meta name="description" content=""></head>
                      <body><time>yesterday</time></body></html>"#;
        let metadata = extract_metadata(&Html::parse_document(html));
        assert_eq!(metadata, PageMetadata::default());
    }

    #[test]
    fn test_empty_datetime_is_absent() {
        let html = r#"<html><body><h1>Title</h1><time datetime="">May 6</time></body></html>"#;
        let metadata = extract_metadata(&Html::parse_document(html));
        assert!(metadata.published.is_none());
    }

    #[test]
    fn test_description_has_no_fallback() {
        let html = r#"<html><head><meta property="og:description" content="OG description"></head>
                      <body><h1>Title</h1></body></html>"#;
        let metadata = extract_metadata(&Html::parse_document(html));
        assert!(metadata.description.is_none());
    }
}

//! Neural summarization through an LLM backend.
//!
//! Inputs are cut to [`MAX_INPUT_WORDS`] before the backend is called. The
//! request carries fixed output bounds; the upper bound is also enforced on
//! the returned text. Sampling settings come from the backend config. Any
//! backend failure, or an empty response, yields the extractive summary of the
//! same input instead.

use super::Extractive;
use crate::api::AskAsync;
use crate::utils::truncate_for_log;
use tracing::{debug, instrument, warn};

/// Words of input passed to the backend.
pub const MAX_INPUT_WORDS: usize = 1000;

/// Upper bound on summary length, in words.
pub const MAX_OUTPUT_WORDS: usize = 100;

/// Lower bound requested from the backend, in words.
pub const MIN_OUTPUT_WORDS: usize = 30;

#[derive(Debug)]
pub struct Neural<A> {
    backend: A,
    fallback: Extractive,
}

impl<A> Neural<A>
where
    A: AskAsync<Response = String>,
{
    pub fn new(backend: A) -> Self {
        Self {
            backend,
            fallback: Extractive::default(),
        }
    }

    #[instrument(level = "debug", skip_all, fields(chars = text.len()))]
    pub async fn summarize(&self, text: &str) -> String {
        let request = build_request(text);
        match self.backend.ask(&request).await {
            Ok(response) => {
                let summary = cap_words(response.trim(), MAX_OUTPUT_WORDS);
                if summary.is_empty() {
                    warn!("Backend returned an empty summary; using extractive summary");
                    return self.fallback.summarize(text);
                }
                debug!(summary = %truncate_for_log(&summary, 120), "Neural summary");
                summary
            }
            Err(e) => {
                warn!(error = %e, "Neural summarization failed; using extractive summary");
                self.fallback.summarize(text)
            }
        }
    }
}

/// The prompt sent to the backend: output bounds, then the truncated article.
pub fn build_request(text: &str) -> String {
    format!(
        "Summarize the following article in {MIN_OUTPUT_WORDS} to {MAX_OUTPUT_WORDS} words. \
         Use only facts stated in the article.\n\n{}",
        cap_words(text, MAX_INPUT_WORDS)
    )
}

/// The first `max` whitespace-separated words of `text`. Text within the
/// limit is returned unchanged.
fn cap_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max {
        text.to_string()
    } else {
        words[..max].join(" ")
    }
}

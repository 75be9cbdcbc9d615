//! Article summarization.
//!
//! A [`Summarizer`] wraps one of two strategies, chosen once at startup:
//!
//! | Strategy | Module | Notes |
//! |----------|--------|-------|
//! | Extractive | [`extractive`] | Frequency-scored sentence selection, always available |
//! | Neural | [`neural`] | LLM backend, falls back to extractive per call |
//!
//! Both share the trivial-input short-circuit: text shorter than
//! [`TRIVIAL_INPUT_CHARS`] is returned as is, capped at [`SAFETY_CAP_CHARS`].

pub mod extractive;
pub mod neural;

use crate::api::{self, AskAsync, Backend};
use crate::utils::truncate_chars;
use clap::ValueEnum;
use tracing::{info, warn};

pub use extractive::Extractive;
pub use neural::Neural;

/// Inputs shorter than this many characters are not summarized.
pub const TRIVIAL_INPUT_CHARS: usize = 50;

/// Cap applied to short-circuited inputs.
pub const SAFETY_CAP_CHARS: usize = 200;

/// Sentences selected by the extractive strategy.
pub const DEFAULT_TARGET_SENTENCES: usize = 3;

/// Strategy selector exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummarizerKind {
    Extractive,
    Neural,
}

/// The summarization strategy for a run.
#[derive(Debug)]
pub enum Summarizer<A> {
    Extractive(Extractive),
    Neural(Neural<A>),
}

impl<A> Summarizer<A>
where
    A: AskAsync<Response = String>,
{
    pub fn extractive() -> Self {
        Summarizer::Extractive(Extractive::default())
    }

    pub fn neural(backend: A) -> Self {
        Summarizer::Neural(Neural::new(backend))
    }

    pub fn kind(&self) -> SummarizerKind {
        match self {
            Summarizer::Extractive(_) => SummarizerKind::Extractive,
            Summarizer::Neural(_) => SummarizerKind::Neural,
        }
    }

    /// Summarize `text` with the active strategy. Never fails.
    pub async fn summarize(&self, text: &str) -> String {
        if text.chars().count() < TRIVIAL_INPUT_CHARS {
            return truncate_chars(text, SAFETY_CAP_CHARS);
        }
        match self {
            Summarizer::Extractive(e) => e.summarize(text),
            Summarizer::Neural(n) => n.summarize(text).await,
        }
    }
}

impl Summarizer<Backend> {
    /// Build the summarizer for `kind`.
    ///
    /// A neural request whose backend cannot be loaded downgrades to the
    /// extractive strategy for the whole run.
    pub async fn load(kind: SummarizerKind, config_path: Option<&str>, template: &str) -> Self {
        match kind {
            SummarizerKind::Extractive => Self::extractive(),
            SummarizerKind::Neural => match api::load_backend(config_path, template).await {
                Ok(backend) => {
                    info!(template, "Neural summarization enabled");
                    Self::neural(backend)
                }
                Err(e) => {
                    warn!(error = %e, "Neural backend unavailable; using extractive summarization for this run");
                    Self::extractive()
                }
            },
        }
    }
}

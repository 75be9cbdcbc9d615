//! Neural summarization backend with exponential backoff retry logic.
//!
//! The neural summarizer talks to an OpenAI-compatible LLM API through the
//! `awful_aj` library. The library is optional: without the `neural` cargo
//! feature, [`load_backend`] always fails and the summarizer downgrades to
//! the extractive strategy for the whole run.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining async backend interaction
//! - [`AwfulBackend`]: Owns the `awful_aj` config and template (feature `neural`)
//! - [`RetryAsk`]: Decorator that adds retry logic to any `AskAsync` implementation
//!
//! # Retry Strategy
//!
//! - Bounded retry attempts
//! - Exponential backoff from a base delay, capped at 30 seconds
//! - Random jitter (0-250ms) added to each delay

use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Retry attempts made by the backend loaded for a run.
pub const BACKEND_MAX_RETRIES: usize = 2;

/// Chat template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = "news_summarizer";

/// Trait for async backend interaction.
///
/// Implementors send text to a model and receive a response.
pub trait AskAsync {
    /// The type of response returned by the backend.
    type Response;

    /// Send text to the backend and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(feature = "neural")]
pub use awful::AwfulBackend;

/// The backend type used by the binary.
#[cfg(feature = "neural")]
pub type Backend = RetryAsk<AwfulBackend>;

/// The backend type used by the binary.
#[cfg(not(feature = "neural"))]
pub type Backend = RetryAsk<Unavailable>;

#[cfg(feature = "neural")]
mod awful {
    use super::AskAsync;
    use awful_aj::api::ask;
    use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
    use std::error::Error;
    use std::time::Instant;
    use tracing::{instrument, warn};

    /// `awful_aj` client owning its configuration and chat template.
    #[derive(Debug)]
    pub struct AwfulBackend {
        pub config: AwfulJadeConfig,
        pub template: ChatTemplate,
    }

    impl AskAsync for AwfulBackend {
        type Response = String;

        #[instrument(level = "debug", skip_all)]
        async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
            let t0 = Instant::now();
            let res = ask(&self.config, text.to_string(), &self.template, None, None, false).await;
            if let Err(e) = &res {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u128, error = %e, "API call failed");
            }
            res
        }
    }
}

/// Stand-in backend for builds without the `neural` feature. It has no
/// values, so it can never be constructed.
#[cfg(not(feature = "neural"))]
#[derive(Debug)]
pub enum Unavailable {}

#[cfg(not(feature = "neural"))]
impl AskAsync for Unavailable {
    type Response = String;

    async fn ask(&self, _text: &str) -> Result<Self::Response, Box<dyn Error>> {
        match *self {}
    }
}

/// Load the neural backend from an `awful_aj` config file and chat template.
///
/// `config_path` defaults to `config.yaml` in the `awful_aj` config
/// directory.
#[cfg(feature = "neural")]
#[instrument(level = "info")]
pub async fn load_backend(config_path: Option<&str>, template_name: &str) -> Result<Backend, Box<dyn Error>> {
    use awful_aj::{config, config_dir, template};

    let config_path = match config_path {
        Some(path) => path.to_string(),
        None => config_dir()?
            .join("config.yaml")
            .to_str()
            .ok_or("Not a valid config filename")?
            .to_string(),
    };
    let config = config::load_config(&config_path)?;
    tracing::info!(%config_path, "Loaded backend configuration");
    let template = template::load_template(template_name).await?;
    tracing::info!(template_name, "Loaded backend template");

    Ok(RetryAsk::new(
        AwfulBackend { config, template },
        BACKEND_MAX_RETRIES,
        StdDuration::from_secs(1),
    ))
}

#[cfg(not(feature = "neural"))]
pub async fn load_backend(_config_path: Option<&str>, _template_name: &str) -> Result<Backend, Box<dyn Error>> {
    Err("built without the `neural` feature".into())
}

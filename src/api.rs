//! Content-idea recommendations from an OpenAI-compatible LLM.
//!
//! The pipeline only sees the [`Recommender`] trait: ranked hashtags and
//! keywords in, free text out. Two implementations live here:
//!
//! - [`AwfulJadeRecommender`]: prompts an LLM through `awful_aj`, wrapped in
//!   [`RetryAsk`] for exponential backoff
//! - [`Unconfigured`]: always unavailable, used when no LLM config is loaded
//!
//! # Retry Strategy
//!
//! - Maximum 5 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use awful_aj::api::ask;
use awful_aj::{config, config_dir, config::AwfulJadeConfig, template, template::ChatTemplate};
use rand::{rng, Rng};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::utils::truncate_for_log;

/// Something that turns the niche's top terms into content ideas.
pub trait Recommender {
    /// Produce free-text recommendations for the given ranked terms.
    async fn recommend(
        &self,
        top_hashtags: &[String],
        top_keywords: &[String],
    ) -> Result<String, Box<dyn Error>>;
}

/// A recommender that is never available.
#[derive(Debug, Clone)]
pub struct Unconfigured {
    reason: String,
}

impl Unconfigured {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Recommender for Unconfigured {
    async fn recommend(&self, _: &[String], _: &[String]) -> Result<String, Box<dyn Error>> {
        Err(Box::new(PipelineError::RecommendationUnavailable(
            self.reason.clone(),
        )))
    }
}

/// Trait for async LLM interaction.
///
/// Implementors of this trait can send text to an LLM and receive a response.
/// This abstraction allows for different LLM backends or decorators (like retry logic).
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send text to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    /// The underlying LLM client to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Create a new retry wrapper around an existing [`AskAsync`] implementation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = AskFnWrapper { config, template };
    /// let retry_client = RetryAsk::new(client, 5, Duration::from_secs(1));
    /// ```
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

    #[instrument(level = "info", skip_all)]
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
                        elapsed_ms_total = total_dt.as_millis() as u128,
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

/// Wrapper around `awful_aj::api::ask` that implements [`AskAsync`].
#[derive(Debug)]
pub struct AskFnWrapper<'a> {
    /// Reference to the LLM configuration (API keys, endpoints, model settings).
    pub config: &'a AwfulJadeConfig,
    /// Reference to the chat template defining the conversation structure.
    pub template: &'a ChatTemplate,
}

impl<'a> AskAsync for AskFnWrapper<'a> {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(self.config, text.to_string(), self.template, None, None).await;
        let dt = t0.elapsed();

        match &res {
            Ok(_) => {}
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "API call failed"),
        }
        res
    }
}

/// Build the user prompt sent to the LLM for a niche's top terms.
pub fn build_prompt(top_hashtags: &[String], top_keywords: &[String]) -> String {
    let list = |terms: &[String], prefix: &str| {
        if terms.is_empty() {
            "(none)".to_string()
        } else {
            terms
                .iter()
                .map(|t| format!("{prefix}{t}"))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    format!(
        "These are the most frequent hashtags and caption keywords in short videos \
         recommended for a niche audience.\n\
         Top hashtags: {}\n\
         Top caption keywords: {}\n\
         Suggest five concrete video ideas that would fit this trend, each with a \
         one-line hook and the hashtags to use.",
        list(top_hashtags, "#"),
        list(top_keywords, "")
    )
}

/// Recommender backed by an OpenAI-compatible endpoint configured for `awful_aj`.
#[derive(Debug)]
pub struct AwfulJadeRecommender {
    config: AwfulJadeConfig,
    template: ChatTemplate,
    max_retries: usize,
    base_delay: StdDuration,
}

impl AwfulJadeRecommender {
    /// Load the LLM configuration and chat template.
    ///
    /// `config_path` defaults to `config.yaml` in the `awful_aj` config
    /// directory. Fails when either file is missing or invalid, which callers
    /// treat as "recommendations unavailable".
    #[instrument(level = "info")]
    pub async fn load(config_path: Option<&str>, template_name: &str) -> Result<Self, Box<dyn Error>> {
        let conf_file = match config_path {
            Some(path) => PathBuf::from(path),
            None => config_dir()?.join("config.yaml"),
        };
        let conf_path = conf_file.to_str().ok_or("Not a valid config filename")?;
        let config = config::load_config(conf_path)?;
        info!(config_path = conf_path, "Loaded LLM configuration");

        let template = template::load_template(template_name).await?;
        info!(template_name, "Loaded template");

        Ok(Self {
            config,
            template,
            max_retries: 5,
            base_delay: StdDuration::from_secs(1),
        })
    }
}

impl Recommender for AwfulJadeRecommender {
    #[instrument(level = "info", skip_all, fields(hashtags = top_hashtags.len(), keywords = top_keywords.len()))]
    async fn recommend(
        &self,
        top_hashtags: &[String],
        top_keywords: &[String],
    ) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let prompt = build_prompt(top_hashtags, top_keywords);
        let client = AskFnWrapper {
            config: &self.config,
            template: &self.template,
        };
        let api = RetryAsk::new(client, self.max_retries, self.base_delay);
        let res = api.ask(&prompt).await;
        let dt = t0.elapsed();

        match res {
            Ok(text) if text.trim().is_empty() => {
                warn!(elapsed_ms_total = dt.as_millis() as u128, "Model returned an empty response");
                Err("model returned an empty response".into())
            }
            Ok(text) => {
                info!(
                    elapsed_ms_total = dt.as_millis() as u128,
                    preview = %truncate_for_log(&text, 120),
                    "Received recommendations"
                );
                Ok(text.trim().to_string())
            }
            Err(e) => {
                error!(elapsed_ms_total = dt.as_millis() as u128, error = %e, "Recommendation request failed");
                Err(e)
            }
        }
    }
}

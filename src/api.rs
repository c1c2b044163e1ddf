//! Summarizer client for the Gemini `generateContent` API.
//!
//! # Architecture
//!
//! The module uses a trait-based design so the retry policy can be tested
//! without the network:
//! - [`GenerateContent`]: Core trait, one prompt in, raw model text out
//! - [`GeminiClient`]: `reqwest` implementation against the hosted API
//! - [`Summarizer`]: Walks the model list and applies the retry policy
//! - [`Summarize`]: What trend selection needs from a summarizer
//!
//! # Retry Policy
//!
//! Models are tried in order, at most two attempts each:
//!
//! | Failure | Action |
//! |---------|--------|
//! | Rate limited or timed out, first attempt | Back off, retry the same model |
//! | Rate limited or timed out, second attempt | Next model |
//! | Model not found | Next model |
//! | Malformed response | Next model |
//! | Anything else | Give up on this article |

use crate::models::{AiSummary, Article};
use crate::prompts;
use crate::utils::{take_chars, truncate_for_log};
use rand::{Rng, rng};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Article text shorter than this is not worth summarizing.
const MIN_TEXT_CHARS: usize = 50;
/// Article text sent to the model is capped at this many characters.
const MAX_PROMPT_TEXT_CHARS: usize = 2500;
const ATTEMPTS_PER_MODEL: usize = 2;
const MAX_TAKEAWAYS: usize = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Why a summarizer call failed.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("rate limited on model {model}")]
    RateLimited { model: String },
    #[error("request to model {model} timed out")]
    Timeout { model: String },
    #[error("model {model} not found")]
    ModelNotFound { model: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Send a prompt to a named model and get its raw text back.
pub trait GenerateContent {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, SummarizeError>;
}

/// Turn one article into slide content, or `None` when that is not possible.
pub trait Summarize {
    async fn summarize(&self, article: &Article) -> Option<AiSummary>;
}

/// Gemini REST client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContent for GeminiClient {
    #[instrument(level = "info", skip(self, prompt))]
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, SummarizeError> {
        let t0 = Instant::now();
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_failure(model, e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| request_failure(model, e))?;
        debug!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Gemini responded");

        if !status.is_success() {
            return Err(classify_failure(model, status, &text));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| SummarizeError::Malformed(e.to_string()))?;
        let out: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if out.trim().is_empty() {
            return Err(SummarizeError::Malformed("response had no candidate text".to_string()));
        }
        Ok(out)
    }
}

fn request_failure(model: &str, e: reqwest::Error) -> SummarizeError {
    if e.is_timeout() {
        SummarizeError::Timeout {
            model: model.to_string(),
        }
    } else {
        SummarizeError::Request(e)
    }
}

fn classify_failure(model: &str, status: StatusCode, body: &str) -> SummarizeError {
    let lower = body.to_lowercase();
    if status == StatusCode::TOO_MANY_REQUESTS
        || lower.contains("resource_exhausted")
        || lower.contains("quota")
    {
        SummarizeError::RateLimited {
            model: model.to_string(),
        }
    } else if status == StatusCode::NOT_FOUND {
        SummarizeError::ModelNotFound {
            model: model.to_string(),
        }
    } else {
        SummarizeError::Api {
            status: status.as_u16(),
            body: truncate_for_log(body, 300),
        }
    }
}

/// Parse the model's text into an [`AiSummary`].
///
/// Markdown code fences around the JSON are tolerated. A response without a
/// non-empty headline and insight is malformed.
pub fn parse_summary(raw: &str) -> Result<AiSummary, SummarizeError> {
    let mut text = raw.trim();
    if text.starts_with("```") {
        text = text.split_once('\n').map(|(_, rest)| rest).unwrap_or(&text[3..]);
    }
    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }

    let mut summary: AiSummary = serde_json::from_str(text.trim()).map_err(|e| {
        SummarizeError::Malformed(format!("{e}; response: {}", truncate_for_log(raw, 200)))
    })?;
    summary.headline = summary.headline.trim().to_string();
    summary.insight = summary.insight.trim().to_string();
    if summary.headline.is_empty() || summary.insight.is_empty() {
        return Err(SummarizeError::Malformed("empty headline or insight".to_string()));
    }
    summary.takeaways = summary
        .takeaways
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(MAX_TAKEAWAYS)
        .collect();
    Ok(summary)
}

/// Applies the retry policy over an ordered list of models.
#[derive(Debug)]
pub struct Summarizer<G> {
    backend: G,
    models: Vec<String>,
    backoff: Duration,
}

impl<G> Summarizer<G>
where
    G: GenerateContent,
{
    /// # Arguments
    ///
    /// * `backend` - The model client
    /// * `models` - Model identifiers, primary first
    /// * `backoff` - Wait before retrying a rate-limited or timed-out model (jitter is added)
    pub fn new(backend: G, models: Vec<String>, backoff: Duration) -> Self {
        Self {
            backend,
            models,
            backoff,
        }
    }
}

impl<G> Summarize for Summarizer<G>
where
    G: GenerateContent,
{
    #[instrument(level = "info", skip_all, fields(title = %article.title))]
    async fn summarize(&self, article: &Article) -> Option<AiSummary> {
        let text = if article.article_text.is_empty() {
            &article.description
        } else {
            &article.article_text
        };
        if text.chars().count() < MIN_TEXT_CHARS {
            debug!("Not enough text to summarize");
            return None;
        }
        let prompt = prompts::summarize_article(
            &article.title,
            &article.source,
            take_chars(text, MAX_PROMPT_TEXT_CHARS),
        );

        'models: for model in &self.models {
            for attempt in 1..=ATTEMPTS_PER_MODEL {
                let result = match self.backend.generate(model, &prompt).await {
                    Ok(raw) => parse_summary(&raw),
                    Err(e) => Err(e),
                };
                match result {
                    Ok(summary) => {
                        info!(%model, attempt, headline = %summary.headline, "Summarized article");
                        return Some(summary);
                    }
                    Err(
                        e @ (SummarizeError::RateLimited { .. } | SummarizeError::Timeout { .. }),
                    ) if attempt < ATTEMPTS_PER_MODEL => {
                        let jitter = Duration::from_millis(rng().random_range(0..=250));
                        let delay = self.backoff + jitter;
                        warn!(%model, attempt, ?delay, error = %e, "Transient failure; backing off");
                        sleep(delay).await;
                    }
                    Err(e @ SummarizeError::RateLimited { .. })
                    | Err(e @ SummarizeError::Timeout { .. })
                    | Err(e @ SummarizeError::ModelNotFound { .. })
                    | Err(e @ SummarizeError::Malformed(_)) => {
                        warn!(%model, attempt, error = %e, "Trying next model");
                        continue 'models;
                    }
                    Err(e) => {
                        warn!(%model, attempt, error = %e, "Summarizer failed; falling back to extraction");
                        return None;
                    }
                }
            }
        }
        warn!("All models exhausted; falling back to extraction");
        None
    }
}

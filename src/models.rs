//! Data models for feed articles and the trends built from them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`FeedSource`]: One configured RSS/Atom endpoint
//! - [`Article`]: A cleaned feed entry, the unit the classifier and selector work on
//! - [`AiSummary`]: Structured slide content returned by the summarizer
//! - [`Trend`]: One carousel slide worth of content for a topic
//! - [`Slides`]: Everything the external image renderer needs for one run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured feed endpoint.
///
/// # Fields
///
/// * `url` - The RSS or Atom document URL
/// * `name` - Display name, used as the article's `source`
/// * `category` - Coarse category ("AI", "DevOps") copied onto every article
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedSource {
    pub url: String,
    pub name: String,
    pub category: String,
}

/// A single feed entry after cleaning and filtering.
///
/// Articles have no explicit identity. Two articles are considered the same
/// story when their titles are similar enough (see
/// [`crate::utils::is_similar`]), and a title is what the selector uses to
/// avoid picking the same story twice.
///
/// `article_text` is empty when the article is created and is only filled in
/// for the articles chosen to represent a trend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// Cleaned entry title. Never empty.
    pub title: String,
    /// Cleaned description, at most 500 characters, cut at a sentence boundary.
    pub description: String,
    /// Link to the full article.
    pub link: String,
    /// Display name of the feed this entry came from.
    pub source: String,
    /// Category of the feed this entry came from.
    pub category: String,
    /// Publication (or last update) time.
    pub published: DateTime<Utc>,
    /// Lowercase keywords with stop words removed, in text order.
    pub keywords: Vec<String>,
    /// Category terms attached to the entry by the feed itself.
    pub entry_categories: Vec<String>,
    /// Extracted body text; empty until fetched.
    #[serde(default)]
    pub article_text: String,
}

/// Slide content produced by the summarizer.
///
/// Field names match the JSON object the model is asked to return.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AiSummary {
    pub headline: String,
    pub insight: String,
    #[serde(default)]
    pub takeaways: Vec<String>,
}

/// One trending topic and the content of its carousel slide.
///
/// A trend is built once by [`crate::trends::analyze_trends`] and never
/// mutated afterwards. `headline` and `insight` are never empty and
/// `takeaways` holds at most three entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    /// Topic label from the taxonomy, or the article's own category for backfill trends.
    pub topic: String,
    /// Icon glyph shown next to the topic.
    pub icon: String,
    /// Number of articles that matched the topic.
    pub count: usize,
    /// Every article that matched the topic.
    pub articles: Vec<Article>,
    pub headline: String,
    pub insight: String,
    /// Source name of the representative article.
    pub source: String,
    /// Number of distinct sources among `articles`.
    pub source_count: usize,
    /// Distinct source names among `articles`, sorted.
    pub all_sources: Vec<String>,
    pub takeaways: Vec<String>,
    /// Whether headline, insight and takeaways came from the summarizer.
    pub ai_generated: bool,
}

/// The renderer hand-off written to `slides.json`.
#[derive(Debug, Serialize)]
pub struct Slides<'a> {
    /// The run date in `YYYY-MM-DD` format.
    pub local_date: String,
    pub brand_name: &'a str,
    pub brand_handle: &'a str,
    pub brand_tagline: &'a str,
    pub trends: &'a [Trend],
}

//! RSS/Atom feed scraper.
//!
//! Feeds are fetched one after another with the shared client and parsed
//! with `feed-rs`, which handles RSS 0.9x/1.0/2.0, Atom and JSON Feed.

use crate::config::AppConfig;
use crate::models::{Article, FeedSource};
use crate::utils::{
    clean_html, extract_keywords, is_promo, is_similar, strip_boilerplate, truncate_description,
};
use chrono::{DateTime, Duration, Utc};
use feed_rs::model::{Content, Entry};
use futures::stream::{self, StreamExt};
use regex::Regex;
use reqwest::Client;
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{debug, info, instrument, warn};

const MAX_DESCRIPTION_CHARS: usize = 500;
const FEED_ACCEPT: &str = "application/rss+xml, application/xml, text/xml, */*";

/// Entry filters shared by every feed in a run.
#[derive(Debug)]
pub struct EntryFilter<'a> {
    /// Entries published before this are dropped.
    pub cutoff: DateTime<Utc>,
    /// Timestamp given to entries that carry none.
    pub now: DateTime<Utc>,
    pub max_entries: usize,
    pub promo_keywords: &'a [String],
    pub boilerplate: &'a [Regex],
}

impl<'a> EntryFilter<'a> {
    pub fn new(config: &'a AppConfig, boilerplate: &'a [Regex], now: DateTime<Utc>) -> Self {
        Self {
            cutoff: now - Duration::hours(config.article_age_hours),
            now,
            max_entries: config.max_articles_per_feed,
            promo_keywords: &config.promo_keywords,
            boilerplate,
        }
    }
}

/// Articles kept from one feed document.
#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub articles: Vec<Article>,
    pub promos_skipped: usize,
}

/// Scrape all configured feeds and return the working set of articles.
///
/// Feeds that fail to download or parse are logged and skipped. The result
/// is deduplicated by title similarity and sorted newest first.
#[instrument(level = "info", skip_all, fields(feeds = config.feeds.len()))]
pub async fn scrape_feeds(
    client: &Client,
    config: &AppConfig,
    filter: &EntryFilter<'_>,
) -> Vec<Article> {
    let timeout = StdDuration::from_secs(config.feed_fetch_timeout_secs);

    let per_feed: Vec<Vec<Article>> = stream::iter(config.feeds.iter())
        .then(|source| async move {
            match fetch_feed(client, source, timeout).await {
                Ok(xml) => match parse_feed(xml.as_bytes(), source, filter) {
                    Ok(parsed) => {
                        info!(
                            source = %source.name,
                            count = parsed.articles.len(),
                            promos_skipped = parsed.promos_skipped,
                            "Parsed feed"
                        );
                        parsed.articles
                    }
                    Err(e) => {
                        warn!(source = %source.name, error = %e, "Feed parse failed; skipping");
                        Vec::new()
                    }
                },
                Err(e) => {
                    warn!(source = %source.name, url = %source.url, error = %e, "Feed fetch failed; skipping");
                    Vec::new()
                }
            }
        })
        .collect()
        .await;

    let all: Vec<Article> = per_feed.into_iter().flatten().collect();
    let total = all.len();
    let mut unique = deduplicate(all, config.similarity_threshold);
    unique.sort_by(|a, b| b.published.cmp(&a.published));

    info!(total, unique = unique.len(), "Scraped feeds");
    unique
}

/// Download one feed document.
#[instrument(level = "info", skip_all, fields(source = %source.name))]
async fn fetch_feed(
    client: &Client,
    source: &FeedSource,
    timeout: StdDuration,
) -> Result<String, Box<dyn Error>> {
    let body = client
        .get(&source.url)
        .header(reqwest::header::ACCEPT, FEED_ACCEPT)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(bytes = body.len(), "Downloaded feed");
    Ok(body)
}

/// Parse a feed document into articles, applying every entry filter.
///
/// Only the first `max_entries` entries are considered. Entries without a
/// title, older than the cutoff, or matching a promo keyword are dropped.
pub fn parse_feed(
    xml: &[u8],
    source: &FeedSource,
    filter: &EntryFilter<'_>,
) -> Result<ParsedFeed, feed_rs::parser::ParseFeedError> {
    let feed = feed_rs::parser::parse(xml)?;
    let mut parsed = ParsedFeed::default();

    for entry in feed.entries.into_iter().take(filter.max_entries) {
        let title = entry
            .title
            .as_ref()
            .map(|t| clean_html(&t.content))
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let description = strip_boilerplate(
            &clean_html(&pick_description(&entry).unwrap_or_default()),
            filter.boilerplate,
        );

        let published = entry.published.or(entry.updated);
        if published.is_some_and(|p| p < filter.cutoff) {
            continue;
        }

        if is_promo(&title, &description, filter.promo_keywords) {
            debug!(%title, "Skipping promo entry");
            parsed.promos_skipped += 1;
            continue;
        }

        let entry_categories: Vec<String> = entry
            .categories
            .iter()
            .map(|c| c.term.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let keywords = extract_keywords(&format!(
            "{} {} {}",
            title,
            description,
            entry_categories.join(" ")
        ));

        parsed.articles.push(Article {
            description: truncate_description(&description, MAX_DESCRIPTION_CHARS),
            link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
            source: source.name.clone(),
            category: source.category.clone(),
            published: published.unwrap_or(filter.now),
            keywords,
            entry_categories,
            article_text: String::new(),
            title,
        });
    }

    Ok(parsed)
}

fn pick_description(entry: &Entry) -> Option<String> {
    if let Some(summary) = &entry.summary {
        return Some(summary.content.clone());
    }
    if let Some(Content { body: Some(body), .. }) = &entry.content {
        return Some(body.clone());
    }
    None
}

/// Drop every article whose title is similar to an earlier one.
///
/// The first occurrence wins, so feed order decides which copy survives.
pub fn deduplicate(articles: Vec<Article>, threshold: f64) -> Vec<Article> {
    let mut unique: Vec<Article> = Vec::with_capacity(articles.len());
    for article in articles {
        if unique
            .iter()
            .any(|kept| is_similar(&article.title, &kept.title, threshold))
        {
            debug!(title = %article.title, "Dropping duplicate article");
            continue;
        }
        unique.push(article);
    }
    unique
}

//! Full article body extraction.
//!
//! Article pages are noisy: navigation, cookie banners, related-story rails.
//! The extractor looks for the main content container, then keeps only the
//! paragraph text that is not nested inside a noise element.

use crate::utils::{collapse_whitespace, take_chars};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Elements whose text never counts as article body.
const NOISE_TAGS: [&str; 8] = [
    "script", "style", "nav", "footer", "header", "aside", "form", "iframe",
];

/// Content containers, most specific first. `body` is the last resort.
static CONTAINER_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "article",
        "div.article-content",
        "div.post-content",
        "div.entry-content",
        "div.article-body",
        "div.story-body",
        "main",
        "div[itemprop='articleBody']",
        "body",
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect()
});

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Source of article body text.
///
/// Implementations never fail: anything that goes wrong yields an empty string.
pub trait FetchText {
    async fn fetch_text(&self, url: &str) -> String;
}

/// Fetches article pages over HTTP and extracts their body text.
#[derive(Debug, Clone)]
pub struct ArticleFetcher {
    pub client: Client,
    pub max_chars: usize,
    pub timeout: Duration,
}

impl FetchText for ArticleFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_text(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(text) => {
                debug!(chars = text.chars().count(), "Extracted article text");
                text
            }
            Err(e) => {
                warn!(error = %e, "Could not fetch article text");
                String::new()
            }
        }
    }
}

impl ArticleFetcher {
    async fn try_fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("unsupported scheme {:?}", parsed.scheme()).into());
        }
        let html = self
            .client
            .get(parsed)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(extract_article_text(&html, self.max_chars))
    }
}

fn is_noise(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|e| NOISE_TAGS.contains(&e.name()))
}

fn inside_noise(element: &ElementRef) -> bool {
    NOISE_TAGS.contains(&element.value().name()) || element.ancestors().any(|a| is_noise(a.value()))
}

/// Extract up to `max_chars` characters of body text from an article page.
///
/// Paragraph text from the content container is joined with spaces; if the
/// container has no paragraphs, all of its visible text is used instead.
pub fn extract_article_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    let container = CONTAINER_SELECTORS
        .iter()
        .find_map(|sel| document.select(sel).find(|el| !inside_noise(el)))
        .unwrap_or_else(|| document.root_element());

    let paragraphs: Vec<String> = container
        .select(&PARAGRAPH_SELECTOR)
        .filter(|p| !inside_noise(p))
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect();

    let text = if paragraphs.is_empty() {
        visible_text(container)
    } else {
        paragraphs.join(" ")
    };

    take_chars(&collapse_whitespace(&text), max_chars).to_string()
}

fn visible_text(container: ElementRef) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in container.descendants() {
        if let Some(text) = node.value().as_text() {
            if !node.ancestors().any(|a| is_noise(a.value())) {
                parts.push(text);
            }
        }
    }
    parts.join(" ")
}

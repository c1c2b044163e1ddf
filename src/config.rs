//! Run configuration loaded from YAML.
//!
//! Every field has a default, so the application runs without any config
//! file at all. A file passed with `--config` only needs the fields it wants
//! to override:
//!
//! ```yaml
//! num_carousel_slides: 4
//! article_age_hours: 48
//! feeds:
//!   - url: https://devops.com/feed/
//!     name: DevOps.com
//!     category: DevOps
//! ```

use crate::error::RunError;
use crate::models::FeedSource;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

/// All tunable settings for a run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feeds: Vec<FeedSource>,
    pub max_articles_per_feed: usize,
    /// Entries published longer ago than this are dropped.
    pub article_age_hours: i64,
    pub promo_keywords: Vec<String>,
    /// Regexes removed from feed descriptions.
    pub boilerplate_patterns: Vec<String>,
    pub gemini_model: String,
    pub fallback_model: String,
    /// One cover slide plus one slide per trend.
    pub num_carousel_slides: usize,
    pub max_article_text_chars: usize,
    pub article_fetch_timeout_secs: u64,
    pub feed_fetch_timeout_secs: u64,
    /// Titles more similar than this are treated as the same story.
    pub similarity_threshold: f64,
    pub summarizer_delay_ms: u64,
    pub rate_limit_backoff_secs: u64,
    pub brand_name: String,
    pub brand_handle: String,
    pub brand_tagline: String,
}

fn feed(url: &str, name: &str, category: &str) -> FeedSource {
    FeedSource {
        url: url.to_string(),
        name: name.to_string(),
        category: category.to_string(),
    }
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feeds: vec![
                feed("https://www.wired.com/feed/tag/ai/latest/rss", "Wired AI", "AI"),
                feed(
                    "https://techcrunch.com/category/artificial-intelligence/feed/",
                    "TechCrunch AI",
                    "AI",
                ),
                feed("https://thenewstack.io/blog/feed/", "The New Stack", "DevOps"),
                feed("https://devops.com/feed/", "DevOps.com", "DevOps"),
                feed(
                    "https://news.mit.edu/topic/mitartificial-intelligence2-rss.xml",
                    "MIT AI News",
                    "AI",
                ),
                feed("https://www.artificialintelligence-news.com/feed/", "AI News", "AI"),
            ],
            max_articles_per_feed: 15,
            article_age_hours: 72,
            promo_keywords: strings(&[
                "disrupt 2026",
                "disrupt 2025",
                "save $",
                "register now",
                "subscribe",
                "early bird",
                "ticket",
                "pricing",
                "discount",
                "coupon",
                "promo code",
                "webinar",
                "sign up for",
                "join us",
                "sponsored",
            ]),
            boilerplate_patterns: strings(&[
                r"The post .+? appeared first on .+?\.",
                r"Continue reading\.{0,3}$",
                r"Read more\.{0,3}$",
                r"\[\.\.\.$",
            ]),
            gemini_model: "gemini-2.0-flash".to_string(),
            fallback_model: "gemini-2.0-flash-lite".to_string(),
            num_carousel_slides: 5,
            max_article_text_chars: 3000,
            article_fetch_timeout_secs: 10,
            feed_fetch_timeout_secs: 15,
            similarity_threshold: 0.6,
            summarizer_delay_ms: 500,
            rate_limit_backoff_secs: 3,
            brand_name: "AI & DevOps Daily".to_string(),
            brand_handle: "@your_handle".to_string(),
            brand_tagline: "Your daily dose of tech trends".to_string(),
        }
    }
}

impl AppConfig {
    /// Number of trend slides, i.e. the carousel size minus the cover.
    pub fn target_trends(&self) -> usize {
        self.num_carousel_slides.saturating_sub(1).max(1)
    }

    pub fn summarizer_delay(&self) -> Duration {
        Duration::from_millis(self.summarizer_delay_ms)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_secs(self.rate_limit_backoff_secs)
    }

    /// Compile the boilerplate patterns.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidPattern`] for the first pattern that fails to compile.
    pub fn compile_boilerplate(&self) -> Result<Vec<Regex>, RunError> {
        self.boilerplate_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| RunError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Load configuration from `path`, or the built-in defaults when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML for [`AppConfig`].
#[instrument(level = "info")]
pub fn load_config(path: Option<&str>) -> Result<AppConfig, Box<dyn Error>> {
    let Some(path) = path else {
        info!("No config file given; using built-in defaults");
        return Ok(AppConfig::default());
    };
    let raw = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&raw)?;
    info!(
        path,
        feeds = config.feeds.len(),
        slides = config.num_carousel_slides,
        "Loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.feeds.len(), 6);
        assert_eq!(config.target_trends(), 4);
        assert_eq!(config.similarity_threshold, 0.6);
        assert_eq!(config.compile_boilerplate().unwrap().len(), 4);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "num_carousel_slides: 3\narticle_age_hours: 24\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.target_trends(), 2);
        assert_eq!(config.article_age_hours, 24);
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.feeds.len(), 6);
    }

    #[test]
    fn test_feeds_override() {
        let yaml = r#"
feeds:
  - url: https://devops.com/feed/
    name: DevOps.com
    category: DevOps
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.feeds[0].name, "DevOps.com");
    }

    #[test]
    fn test_target_trends_never_zero() {
        let config = AppConfig {
            num_carousel_slides: 1,
            ..AppConfig::default()
        };
        assert_eq!(config.target_trends(), 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let config = AppConfig {
            boilerplate_patterns: vec!["(unclosed".to_string()],
            ..AppConfig::default()
        };
        assert!(matches!(
            config.compile_boilerplate(),
            Err(RunError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "gemini_model: gemini-test\n").unwrap();
        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.gemini_model, "gemini-test");
    }

    #[test]
    fn test_load_config_default() {
        let config = load_config(None).unwrap();
        assert_eq!(config.num_carousel_slides, 5);
    }
}

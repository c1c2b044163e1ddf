//! Feed and article scrapers.
//!
//! Scraping happens in two phases, separated by trend selection:
//!
//! 1. **Indexing**: [`rss::scrape_feeds`] pulls every configured feed, cleans
//!    and filters the entries and returns the deduplicated working set
//! 2. **Fetching**: [`article_text::ArticleFetcher`] downloads the body text of
//!    only the articles chosen to represent a trend
//!
//! # Failure policy
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Feed request or parse fails | Feed skipped, others continue |
//! | Entry has no title | Entry skipped |
//! | Entry older than the age cutoff | Entry skipped |
//! | Entry looks like a promo | Entry skipped and counted |
//! | Article page fails to load | Body text stays empty |

pub mod article_text;
pub mod rss;

use reqwest::Client;
use std::error::Error;

/// Browser-like user agent; several feeds reject obvious bots.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Build the shared HTTP client used for feeds and article pages.
///
/// Timeouts are set per request since feeds and pages use different ones.
pub fn build_client() -> Result<Client, Box<dyn Error>> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

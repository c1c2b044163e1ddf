//! # Awful Trend Carousel
//!
//! Turns the day's AI and DevOps RSS news into carousel slide content: the
//! handful of topics most feeds are talking about, one representative story
//! each, with a headline, a short insight and up to three takeaways, plus a
//! ready-to-post caption.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... awful_trend_carousel -o ./output
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Scraping**: Pull every configured feed, clean and deduplicate entries
//! 2. **Ranking**: Classify articles into topics and rank topics by coverage
//! 3. **Selection**: Pick one unused representative article per top topic
//! 4. **Summarizing**: Fetch each representative's body text and summarize it
//!    with Gemini, or extract takeaways locally when that is not possible
//! 5. **Output**: Write `slides.json` for the renderer and `caption.txt`

use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod prompts;
mod scrapers;
mod takeaways;
mod taxonomy;
mod trends;
mod utils;

use api::{GeminiClient, Summarizer};
use cli::Cli;
use error::RunError;
use models::Slides;
use outputs::{caption, json};
use scrapers::article_text::ArticleFetcher;
use scrapers::rss::{EntryFilter, scrape_feeds};
use utils::{clean_output_dir, ensure_writable_dir};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; the key may come from the real environment.
    let _ = dotenvy::dotenv();

    // Parse CLI
    let args = Cli::parse();

    // --- Tracing init ---
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("trend carousel starting up");
    debug!(output_dir = %args.output_dir, config = ?args.config, no_ai = args.no_ai, "Parsed CLI arguments");

    let config = config::load_config(args.config.as_deref())?;
    let boilerplate = match config.compile_boilerplate() {
        Ok(patterns) => patterns,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }
    if !args.no_clean {
        clean_output_dir(&args.output_dir).await?;
    }

    // ---- Scrape feeds ----
    let client = scrapers::build_client()?;
    let entry_filter = EntryFilter::new(&config, &boilerplate, Utc::now());
    let mut articles = scrape_feeds(&client, &config, &entry_filter).await;
    if articles.is_empty() {
        let err = RunError::NoArticles;
        error!(error = %err, "Stopping run");
        return Err(err.into());
    }
    info!(count = articles.len(), "Working set ready");

    // ---- Rank, select, summarize ----
    let fetcher = ArticleFetcher {
        client: client.clone(),
        max_chars: config.max_article_text_chars,
        timeout: Duration::from_secs(config.article_fetch_timeout_secs),
    };
    let summarizer = args.summarizer_key().map(|key| {
        Summarizer::new(
            GeminiClient::new(client.clone(), key.to_string()),
            vec![config.gemini_model.clone(), config.fallback_model.clone()],
            config.rate_limit_backoff(),
        )
    });
    if summarizer.is_none() {
        warn!("Summarizer disabled; slides will use extracted content");
    }

    let trends = trends::analyze_trends(
        &mut articles,
        config.target_trends(),
        &fetcher,
        summarizer.as_ref(),
        config.summarizer_delay(),
    )
    .await;
    if trends.is_empty() {
        let err = RunError::NoTrends;
        error!(error = %err, "Stopping run");
        return Err(err.into());
    }
    for (rank, trend) in trends.iter().enumerate() {
        info!(
            rank = rank + 1,
            icon = %trend.icon,
            topic = %trend.topic,
            articles = trend.count,
            ai_generated = trend.ai_generated,
            headline = %trend.headline,
            "Trend"
        );
    }

    // ---- Output ----
    let slides = Slides {
        local_date: Local::now().format("%Y-%m-%d").to_string(),
        brand_name: &config.brand_name,
        brand_handle: &config.brand_handle,
        brand_tagline: &config.brand_tagline,
        trends: &trends,
    };
    json::write_slides(&slides, &args.output_dir).await?;

    let post_caption = caption::compose_caption(&trends);
    caption::write_caption(&post_caption, &args.output_dir).await?;

    let elapsed = start_time.elapsed();
    info!(
        elapsed_secs = elapsed.as_secs_f64(),
        trends = trends.len(),
        output_dir = %args.output_dir,
        "Run complete"
    );

    Ok(())
}

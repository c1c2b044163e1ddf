//! Post caption composition.

use crate::models::Trend;
use itertools::Itertools;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const CAPTION_FILE: &str = "caption.txt";
const CAPTION_TITLE: &str = "Today's Top AI & DevOps Trends";
const MAX_TOPIC_HASHTAGS: usize = 8;
const TRAILING_HASHTAGS: &str = "#AI #DevOps #TechNews #MachineLearning #CloudComputing \
#DataScience #TechTrends #ArtificialIntelligence #Automation #SoftwareEngineering";

/// Build the caption text for a carousel post.
///
/// Never fails; an empty trend list gives a caption with empty summary,
/// hashtag and source sections.
pub fn compose_caption(trends: &[Trend]) -> String {
    let summary = trends
        .iter()
        .map(|t| format!("{} {}: {}", t.icon, t.topic, t.headline))
        .join("\n");

    let hashtags = trends
        .iter()
        .flat_map(|t| t.topic.split_whitespace())
        .filter(|word| word.chars().count() > 2)
        .map(|word| format!("#{word}"))
        .unique()
        .take(MAX_TOPIC_HASHTAGS)
        .join(" ");

    let sources = trends
        .iter()
        .flat_map(|t| t.articles.iter().map(|a| a.source.as_str()))
        .unique()
        .join(", ");

    format!(
        "🔥 {CAPTION_TITLE}\n\n\
         {summary}\n\n\
         Swipe ➡️ for today's top AI & DevOps trends!\n\n\
         {hashtags}\n\n\
         📡 Sources: {sources}\n\
         🤖 Auto-generated from latest tech news\n\n\
         {TRAILING_HASHTAGS}"
    )
    .trim()
    .to_string()
}

/// Write `caption` to `caption.txt` in `output_dir`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_caption(caption: &str, output_dir: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(output_dir).join(CAPTION_FILE);
    fs::write(&path, caption).await?;
    info!(path = %path.display(), chars = caption.chars().count(), "Wrote caption");
    Ok(())
}

//! Command-line interface definitions for Awful Trend Carousel.
//!
//! Every option has a default, so a bare invocation runs with the built-in
//! feed list and writes to `./output`.

use clap::Parser;

/// Command-line arguments for the Awful Trend Carousel application.
///
/// # Examples
///
/// ```sh
/// # Defaults: built-in feeds, ./output, AI summaries if GEMINI_API_KEY is set
/// awful_trend_carousel
///
/// # Custom config and output directory, extractive content only
/// awful_trend_carousel -c config.yaml -o ./carousel --no-ai
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the caption and slide data
    #[arg(short, long, default_value = "output")]
    pub output_dir: String,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Gemini API key; without one every slide uses extracted content
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Keep images left over from a previous run in the output directory
    #[arg(long)]
    pub no_clean: bool,

    /// Skip the summarizer even if an API key is available
    #[arg(long)]
    pub no_ai: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The API key to use, if AI summaries are enabled and a non-blank key was given.
    pub fn summarizer_key(&self) -> Option<&str> {
        if self.no_ai {
            return None;
        }
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

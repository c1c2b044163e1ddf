//! JSON hand-off for the image renderer.
//!
//! `slides.json` holds the run date, brand fields and the ordered trend list.
//! The renderer draws one cover slide plus one slide per trend from it.

use crate::models::Slides;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const SLIDES_FILE: &str = "slides.json";

/// Write [`Slides`] as pretty-printed JSON to `slides.json` in `output_dir`.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_slides(slides: &Slides<'_>, output_dir: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(slides)?;
    let path = Path::new(output_dir).join(SLIDES_FILE);
    fs::write(&path, json).await?;
    info!(path = %path.display(), trends = slides.trends.len(), "Wrote slides JSON");
    Ok(())
}

//! Text helpers and file system utilities.
//!
//! This module provides helper functions used throughout the application:
//! - HTML cleaning, boilerplate and promo detection for feed entries
//! - Keyword extraction and title similarity
//! - Sentence splitting and sentence-boundary truncation
//! - String truncation for logging
//! - File system validation and cleanup for the output directory

use once_cell::sync::Lazy;
use regex::Regex;
use similar::TextDiff;
use std::collections::HashSet;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "may", "might", "can", "shall", "it",
        "its", "this", "that", "these", "those", "i", "you", "he", "she", "we", "they", "my",
        "your", "his", "her", "our", "their", "what", "which", "who", "whom", "how", "when",
        "where", "why", "not", "no", "nor", "so", "if", "then", "than", "too", "very", "just",
        "about", "up", "out", "off", "over", "under", "again", "further", "once", "here", "there",
        "all", "each", "every", "both", "few", "more", "most", "other", "some", "such", "only",
        "own", "same", "as", "into", "through", "during", "before", "after", "above", "below",
        "between", "new", "says", "said", "also", "like", "get", "got", "make", "made", "us",
        "use", "used", "one", "two", "first",
    ]
    .into_iter()
    .collect()
});

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Strip tags, decode entities and collapse whitespace.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_html("<p>Hello&nbsp;<b>World</b></p>"), "Hello World");
/// ```
pub fn clean_html(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let without_tags = HTML_TAG_RE.replace_all(input, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    collapse_whitespace(&decoded)
}

/// Replace every whitespace run with a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Remove every boilerplate pattern from a feed description.
pub fn strip_boilerplate(text: &str, patterns: &[Regex]) -> String {
    patterns.iter().fold(text.to_string(), |acc, re| {
        re.replace_all(&acc, "").trim().to_string()
    })
}

/// Whether the title or description contains any promo keyword (case-insensitive).
pub fn is_promo(title: &str, description: &str, promo_keywords: &[String]) -> bool {
    let combined = format!("{title} {description}").to_lowercase();
    promo_keywords
        .iter()
        .any(|kw| combined.contains(&kw.to_lowercase()))
}

/// Lowercase alphabetic words of three or more letters, stop words removed, in text order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Case-insensitive similarity ratio of two strings in `0.0..=1.0`.
///
/// The ratio is `2 * matched / (len(a) + len(b))` over a character diff, so a
/// title that extends a shorter one still scores high.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    f64::from(TextDiff::from_chars(a.as_str(), b.as_str()).ratio())
}

/// Whether two titles describe the same story.
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) > threshold
}

/// The first `max` characters of `s`.
pub fn take_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Split text into sentences at `.`, `!` or `?` followed by whitespace.
///
/// The terminator stays with its sentence; the whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(boundary, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }
        sentences.push(&text[start..boundary]);
        start = boundary;
        while let Some(&(idx, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            start = idx + w.len_utf8();
            chars.next();
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Truncate text at the nearest sentence boundary within `max_len` characters.
///
/// A sentence boundary is only used if at least `min_len` characters precede
/// it. Otherwise the text is cut at the last word boundary past `min_len`, or
/// hard at `max_len`, and an ellipsis is appended.
///
/// # Examples
///
/// ```ignore
/// let t = truncate_at_sentence("First sentence here. Second one is longer.", 30, 10);
/// assert_eq!(t, "First sentence here.");
/// ```
pub fn truncate_at_sentence(text: &str, max_len: usize, min_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let truncated = take_chars(text, max_len);
    for sep in [". ", "! ", "? "] {
        if let Some(idx) = truncated.rfind(sep) {
            if truncated[..idx].chars().count() >= min_len {
                return truncated[..=idx].trim().to_string();
            }
        }
    }
    if let Some(idx) = truncated.rfind(' ') {
        if truncated[..idx].chars().count() >= min_len {
            return format!("{}...", truncated[..idx].trim());
        }
    }
    format!("{}...", truncated.trim())
}

/// Cap a feed description at `max_len` characters.
///
/// When cut, the description ends at the last sentence boundary found more
/// than 200 characters in, or hard at `max_len` if there is none.
pub fn truncate_description(description: &str, max_len: usize) -> String {
    if description.chars().count() <= max_len {
        return description.to_string();
    }
    let truncated = take_chars(description, max_len);
    for sep in [". ", "! ", "? "] {
        if let Some(idx) = truncated.rfind(sep) {
            if truncated[..idx].chars().count() > 200 {
                return truncated[..=idx].to_string();
            }
        }
    }
    truncated.to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = take_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = Path::new(path).join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

/// Remove image artifacts left by a previous run.
///
/// Only `.jpg`, `.jpeg` and `.png` files directly inside `path` are removed.
///
/// # Returns
///
/// The number of files removed.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn clean_output_dir(path: &str) -> Result<usize, Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Ok(0);
    }
    let mut removed = 0;
    let mut entries = fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file = entry.path();
        let is_image = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if is_image && file.is_file() {
            fs::remove_file(&file).await?;
            debug!(file = %file.display(), "Removed old image");
            removed += 1;
        }
    }
    info!(removed, "Cleaned output directory");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_html() {
        assert_eq!(clean_html("<p>Hello&nbsp;<strong>World</strong></p>"), "Hello World");
        assert_eq!(clean_html("AT&amp;T &lt;3"), "AT&T <3");
        assert_eq!(clean_html(""), "");
    }

    #[test]
    fn test_strip_boilerplate() {
        let patterns = crate::config::AppConfig::default()
            .compile_boilerplate()
            .unwrap();
        let text = "Teams ship faster. The post Why CI Matters appeared first on DevOps Weekly.";
        assert_eq!(strip_boilerplate(text, &patterns), "Teams ship faster.");
        assert_eq!(strip_boilerplate("Big news. Read more...", &patterns), "Big news.");
    }

    #[test]
    fn test_is_promo() {
        let kws = crate::config::AppConfig::default().promo_keywords;
        assert!(is_promo("Register NOW for our summit", "", &kws));
        assert!(is_promo("Title", "Join our Webinar today", &kws));
        assert!(!is_promo("Kubernetes 1.31 released", "Sidecars go GA", &kws));
    }

    #[test]
    fn test_extract_keywords() {
        let kws = extract_keywords("OpenAI releases a new GPT model for the Cloud");
        assert_eq!(kws, vec!["openai", "releases", "gpt", "model", "cloud"]);
    }

    #[test]
    fn test_extract_keywords_skips_short_and_numeric() {
        let kws = extract_keywords("AI is 10x in k8s land");
        assert_eq!(kws, vec!["land"]);
    }

    #[test]
    fn test_similar_titles() {
        assert!(is_similar("X raises $50M", "X Raises $50 Million", 0.6));
        assert!(!is_similar(
            "OpenAI Releases New Model",
            "Kubernetes adds sidecar support",
            0.6
        ));
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert_eq!(similarity("ABC", "abc"), 1.0);
    }

    #[test]
    fn test_extended_title_is_similar() {
        let a = "Anthropic raises $2B";
        let b = "Anthropic raises $2B in new funding round";
        // 20 shared characters out of 20 + 41.
        assert!((similarity(a, b) - 40.0 / 61.0).abs() < 1e-3);
        assert!(is_similar(a, b, 0.6));
    }

    #[test]
    fn test_take_chars_multibyte() {
        assert_eq!(take_chars("héllo", 2), "hé");
        assert_eq!(take_chars("hi", 5), "hi");
    }

    #[test]
    fn test_split_sentences() {
        let s = split_sentences("One. Two!  Three? Four.Five end");
        assert_eq!(s, vec!["One.", "Two!", "Three?", "Four.Five end"]);
    }

    #[test]
    fn test_split_sentences_trailing_space() {
        assert_eq!(split_sentences("Only one. "), vec!["Only one."]);
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_truncate_at_sentence_short() {
        assert_eq!(truncate_at_sentence("short", 10, 3), "short");
    }

    #[test]
    fn test_truncate_at_sentence_boundary() {
        let t = truncate_at_sentence("First sentence here. Second one is longer.", 30, 10);
        assert_eq!(t, "First sentence here.");
    }

    #[test]
    fn test_truncate_at_sentence_word_fallback() {
        let t = truncate_at_sentence("Tiny. then a long run of words without stops", 30, 10);
        assert_eq!(t, "Tiny. then a long run of...");
    }

    #[test]
    fn test_truncate_at_sentence_hard_cut() {
        let t = truncate_at_sentence(&"x".repeat(50), 20, 10);
        assert_eq!(t, format!("{}...", "x".repeat(20)));
    }

    #[test]
    fn test_truncate_description() {
        let long = format!("{}. {}", "a".repeat(300), "b".repeat(300));
        let t = truncate_description(&long, 500);
        assert_eq!(t, format!("{}.", "a".repeat(300)));

        let no_boundary = "c".repeat(600);
        assert_eq!(truncate_description(&no_boundary, 500).chars().count(), 500);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out/slides");
        ensure_writable_dir(nested.to_str().unwrap()).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_clean_output_dir_only_images() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["slide_1.png", "slide_2.JPG", "caption.txt", "slides.json"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let removed = clean_output_dir(dir.path().to_str().unwrap()).await.unwrap();
        assert_eq!(removed, 2);
        assert!(dir.path().join("caption.txt").exists());
        assert!(!dir.path().join("slide_1.png").exists());
    }

    #[tokio::test]
    async fn test_clean_output_dir_missing() {
        let removed = clean_output_dir("/nonexistent/awful/trend/dir").await.unwrap();
        assert_eq!(removed, 0);
    }
}

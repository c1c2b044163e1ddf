//! Extractive takeaways, used when no summarizer result is available.
//!
//! Sentences are pulled from the article body, filtered for boilerplate and
//! near-repeats of the description, and ranked by how "newsy" they look.

use crate::utils::{similarity, split_sentences, take_chars, truncate_at_sentence};
use itertools::Itertools;
use std::collections::HashSet;

const MAX_TAKEAWAYS: usize = 3;
const MIN_TEXT_CHARS: usize = 100;
const MIN_SENTENCE_CHARS: usize = 40;
const MAX_SENTENCE_CHARS: usize = 150;
const TAKEAWAY_MAX_CHARS: usize = 85;
const TAKEAWAY_MIN_CHARS: usize = 30;
/// Sentences whose opening matches the description this closely are restatements.
const DESCRIPTION_SIMILARITY: f64 = 0.5;

/// Sentences containing any of these are site chrome, not news.
const SKIP_PATTERNS: &[&str] = &[
    "cookie",
    "subscribe",
    "sign up",
    "newsletter",
    "click here",
    "read more",
    "advertisement",
    "sponsored",
    "terms of",
    "privacy policy",
    "copyright",
    "follow us",
    "follow equity",
    "twitter",
    "threads",
    "@equitypod",
    "@techcrunch",
    "comment",
    "related:",
    "see also",
    "table of contents",
    "photo by",
    "image credit",
    "getty",
    "shutterstock",
    "appeared first on",
    "this article",
    "we may earn",
    "disclosure",
    "affiliate",
    "podcast",
    "episode",
];

const SIGNAL_WORDS: &[&str] = &[
    "billion",
    "million",
    "percent",
    "%",
    "$",
    "first",
    "new",
    "launch",
    "announce",
    "release",
    "increase",
    "decrease",
    "grow",
    "decline",
    "according",
    "report",
    "study",
    "research",
    "key",
    "major",
    "significant",
    "critical",
    "expect",
    "predict",
    "plan",
    "partner",
];

/// Pick up to three takeaway sentences from `article_text`.
///
/// Returns an empty list when the text is too short to be worth mining.
/// Each takeaway is shortened to about 85 characters.
pub fn extract_takeaways(article_text: &str, description: &str) -> Vec<String> {
    if article_text.chars().count() < MIN_TEXT_CHARS {
        return Vec::new();
    }

    let sentences = split_sentences(article_text);
    // Leads usually restate the headline.
    let skip = if sentences.len() > 4 { 2 } else { 1 };

    let desc_start = take_chars(description, 80).to_lowercase();
    let mut seen_starts: HashSet<String> = HashSet::new();
    let mut candidates: Vec<&str> = Vec::new();

    for sentence in sentences.into_iter().skip(skip) {
        let len = sentence.chars().count();
        if !(MIN_SENTENCE_CHARS..=MAX_SENTENCE_CHARS).contains(&len) {
            continue;
        }
        let lower = sentence.to_lowercase();
        if SKIP_PATTERNS.iter().any(|p| lower.contains(p)) {
            continue;
        }
        if !seen_starts.insert(take_chars(&lower, 30).to_string()) {
            continue;
        }
        if !desc_start.is_empty()
            && similarity(take_chars(&lower, 80), &desc_start) >= DESCRIPTION_SIMILARITY
        {
            continue;
        }
        candidates.push(sentence);
    }

    candidates
        .into_iter()
        .sorted_by_key(|s| std::cmp::Reverse(signal_score(s)))
        .take(MAX_TAKEAWAYS)
        .map(|s| truncate_at_sentence(s, TAKEAWAY_MAX_CHARS, TAKEAWAY_MIN_CHARS))
        .collect()
}

/// One point per distinct signal word present, two more if the sentence has a digit.
fn signal_score(sentence: &str) -> usize {
    let lower = sentence.to_lowercase();
    let words = SIGNAL_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let digits = if sentence.chars().any(|c| c.is_ascii_digit()) {
        2
    } else {
        0
    };
    words + digits
}

//! Fatal stop conditions for a run.
//!
//! Everything else (a dead feed, an article page that will not load, a
//! summarizer outage) is contained where it happens and logged. These are
//! the cases where there is nothing useful left to produce.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("no articles found; check your internet connection or the configured feeds")]
    NoArticles,
    #[error("no trends identified; not enough data to generate a carousel")]
    NoTrends,
    #[error("invalid boilerplate pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        assert!(RunError::NoArticles.to_string().contains("no articles found"));
        assert!(RunError::NoTrends.to_string().contains("no trends identified"));
    }

    #[test]
    fn test_boxed_stop_keeps_message() {
        let boxed: Box<dyn std::error::Error> = RunError::NoArticles.into();
        assert_eq!(
            boxed.to_string(),
            "no articles found; check your internet connection or the configured feeds"
        );
        assert!(!boxed.to_string().contains("NoArticles"));
    }

    #[test]
    fn test_invalid_pattern_has_source() {
        use std::error::Error as _;
        let source = regex::Regex::new("(").unwrap_err();
        let err = RunError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().contains("\"(\""));
        assert!(err.source().is_some());
    }
}

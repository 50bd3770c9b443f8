//! Common types and utilities shared across Storyline crates.
//!
//! This crate defines the output record, the shared error type and the
//! observability helpers used throughout the Storyline workspace. It is
//! intentionally lightweight so that every crate can depend on it without
//! introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`Story`]: a validated `{title, link}` record, the only thing the
//!   extractor ever hands back
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`StorylineError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use storyline_common::Story;
//!
//! let story = Story::new("Why the Jobs Report Matters", "https://time.com/7000001/jobs-report");
//! assert_eq!(story.link, "https://time.com/7000001/jobs-report");
//! ```
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod observability;

/// A story recovered from a homepage.
///
/// `title` is fully cleaned (no markup, no entities) and `link` is unique
/// within a single extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub link: String,
}

impl Story {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Error types used across the Storyline system.
///
/// Only the fetch side ever fails at request time. Extraction degrades to
/// fewer (or zero) stories instead of erroring.
#[derive(thiserror::Error, Debug)]
pub enum StorylineError {
    /// Connection, DNS, TLS or reset failures while fetching the homepage.
    #[error("Network error: {0}")]
    Network(String),

    /// The fetch exceeded its deadline and was cancelled.
    #[error("Request timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The extractor could not be built (e.g. the site pattern did not compile).
    #[error("Extraction setup error: {0}")]
    Extraction(String),
}

impl StorylineError {
    /// True for the transport-level failures a fetch can produce.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

/// Convenient alias for results that use [`StorylineError`].
pub type Result<T> = std::result::Result<T, StorylineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_serializes_with_title_and_link_only() {
        let story = Story::new("A headline worth reading", "https://time.com/1/a");
        let json = serde_json::to_value(&story).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "A headline worth reading",
                "link": "https://time.com/1/a"
            })
        );
    }

    #[test]
    fn timeout_message_mentions_deadline() {
        let err = StorylineError::Timeout(Duration::from_secs(15));
        assert_eq!(err.to_string(), "Request timeout after 15000ms");
        assert!(err.is_fetch_failure());
        assert!(!StorylineError::Config("x".into()).is_fetch_failure());
    }
}

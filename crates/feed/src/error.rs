// ABOUTME: Error types for feed parsing and fetching.
// ABOUTME: Provides FeedError with Parse, Invalid, and Fetch variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while obtaining a feed.
///
/// Normalization itself never fails; these cover the steps before it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The data could not be parsed as RSS, Atom or JSON Feed.
    #[error("failed to parse feed: {0}")]
    Parse(String),

    /// The request itself is unusable (bad URL, unsupported scheme).
    #[error("invalid feed request: {0}")]
    Invalid(String),

    /// Any failure fetching or parsing the upstream feed, carrying the
    /// upstream message verbatim.
    #[error("{0}")]
    Fetch(String),
}

impl FeedError {
    /// Creates a Parse error from an underlying parser error.
    pub fn parse(err: impl fmt::Display) -> Self {
        FeedError::Parse(err.to_string())
    }

    /// Creates an Invalid error with a custom message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        FeedError::Invalid(msg.into())
    }

    /// Creates a Fetch error with a custom message.
    pub fn fetch(msg: impl Into<String>) -> Self {
        FeedError::Fetch(msg.into())
    }

    /// Collapses any variant into a Fetch error, keeping the message.
    pub fn into_fetch(self) -> Self {
        match self {
            FeedError::Fetch(_) => self,
            other => FeedError::Fetch(other.to_string()),
        }
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        matches!(self, FeedError::Fetch(_))
    }
}

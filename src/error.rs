//! Error types for feed detection and normalization.
//!
//! Every failure aborts the whole document: the crate never returns a
//! partially normalized feed.
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

use crate::feed::Dialect;

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors that can occur while turning a syndication document into a [`crate::Feed`].
#[derive(Debug, Error)]
pub enum FeedError {
    /// The XML is not well-formed (even after sanitization), is not UTF-8,
    /// or does not have the structure its dialect requires.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The root element matches no detection rule.
    #[error("Unknown dialect: root element {0}")]
    UnknownDialect(String),

    /// The dialect was recognized but is not enabled for this parser.
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(Dialect),

    /// A field the canonical model cannot do without is absent.
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// A text construct could not be rendered.
    #[error("Text rendering failed: {0}")]
    TextRendering(String),

    /// A date field matched none of the formats its dialect accepts.
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// The input exceeds the configured size ceiling.
    #[error("Document too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    /// Reading the input failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for FeedError {
    fn from(err: quick_xml::Error) -> Self {
        FeedError::MalformedDocument(err.to_string())
    }
}

impl From<AttrError> for FeedError {
    fn from(err: AttrError) -> Self {
        FeedError::MalformedDocument(format!("bad attribute: {}", err))
    }
}

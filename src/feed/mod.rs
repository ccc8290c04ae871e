//! Feed detection and normalization for RSS 1.0, RSS 2.0 and Atom.
//!
//! This module turns the raw bytes of one syndication document into a
//! [`Feed`]:
//!
//! - **Sanitizing**: XML-illegal control bytes are stripped before decoding
//! - **Detection**: the root element picks the dialect
//! - **Parsing**: a dialect-specific schema reads the document leniently
//! - **Normalization**: each dialect is mapped onto the canonical model
//!
//! # Architecture
//!
//! - [`detect`] - Root-element rule table and the [`Dialect`] enum
//! - [`schema`] - Typed document shapes over a namespace-aware cursor
//! - [`normalize`] - Dialect structure to [`Feed`]/[`crate::Article`]
//! - [`text`] - Atom text constructs and their renderings
//!
//! # Example
//!
//! ```
//! use feedsift::{FeedParser, ParserConfig};
//!
//! let parser = FeedParser::new(ParserConfig::default());
//! let feed = parser
//!     .parse(br#"<rss version="2.0"><channel><title>T</title></channel></rss>"#)
//!     .unwrap();
//! assert_eq!(feed.title, "T");
//! ```

pub mod detect;
pub mod normalize;
pub mod schema;
pub mod text;

use std::io::Read;

use crate::config::ParserConfig;
use crate::error::{FeedError, FeedResult};
use crate::model::Feed;
use crate::util::Sanitizer;

pub use detect::{detect, Dialect, DistinctElement};
pub use normalize::{normalize, normalize_document};
pub use schema::Document;
pub use text::{TextConstruct, TextKind};

/// Buffers, sanitizes, detects and normalizes documents according to a
/// [`ParserConfig`]. Immutable once built, so one parser can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct FeedParser {
    config: ParserConfig,
    sanitizer: Sanitizer,
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl FeedParser {
    pub fn new(config: ParserConfig) -> Self {
        let sanitizer = Sanitizer::with_bytes(&config.strip_bytes);
        Self { config, sanitizer }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one complete document.
    pub fn parse(&self, bytes: &[u8]) -> FeedResult<Feed> {
        self.check_size(bytes.len() as u64)?;
        let cleaned = self.sanitizer.clean(bytes);
        self.parse_clean(&cleaned)
    }

    /// Buffers `reader` to the end and parses it. Stops reading one byte past
    /// the size limit.
    pub fn parse_reader<R: Read>(&self, reader: R) -> FeedResult<Feed> {
        let mut buf = Vec::new();
        match self.limit() {
            Some(max) => {
                reader.take(max.saturating_add(1)).read_to_end(&mut buf)?;
            }
            None => {
                let mut reader = reader;
                reader.read_to_end(&mut buf)?;
            }
        }
        self.check_size(buf.len() as u64)?;
        self.sanitizer.clean_in_place(&mut buf);
        self.parse_clean(&buf)
    }

    fn limit(&self) -> Option<u64> {
        match self.config.max_document_bytes {
            0 => None,
            max => Some(max),
        }
    }

    fn check_size(&self, size: u64) -> FeedResult<()> {
        match self.limit() {
            Some(max) if size > max => Err(FeedError::TooLarge { size, max }),
            _ => Ok(()),
        }
    }

    fn parse_clean(&self, bytes: &[u8]) -> FeedResult<Feed> {
        let document = std::str::from_utf8(bytes).map_err(|e| {
            FeedError::MalformedDocument(format!("document is not valid UTF-8: {}", e))
        })?;

        let dialect = detect(document)?;
        if !self.config.accepts(dialect) {
            tracing::debug!(dialect = %dialect, "Dialect disabled by configuration");
            return Err(FeedError::UnsupportedDialect(dialect));
        }
        normalize(document, dialect)
    }
}

/// Parses `bytes` with the default configuration.
pub fn parse(bytes: &[u8]) -> FeedResult<Feed> {
    FeedParser::default().parse(bytes)
}

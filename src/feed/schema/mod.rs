//! Typed document shapes for each supported dialect.
//!
//! - [`rss1`] - RSS 1.0 (RDF), items coupled to the channel's `rdf:Seq`
//! - [`rss2`] - RSS 2.0, RFC 2822 dates and GUID/link identity
//! - [`atom`] - Atom 1.0 and 0.3, typed text constructs
//!
//! Each parser walks a fresh [`cursor::Cursor`] from the start of the
//! document and checks the root element itself.

pub mod atom;
pub mod cursor;
pub mod dates;
pub mod rss1;
pub mod rss2;

use crate::error::{FeedError, FeedResult};
use crate::feed::Dialect;
use cursor::Element;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// A parsed document in its dialect's own structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Rss1(rss1::Rss1Document),
    Rss2(rss2::Rss2Document),
    Atom(atom::AtomFeed),
}

impl Document {
    pub fn dialect(&self) -> Dialect {
        match self {
            Document::Rss1(_) => Dialect::Rss1,
            Document::Rss2(_) => Dialect::Rss2,
            Document::Atom(_) => Dialect::Atom,
        }
    }
}

/// Parses `document` with the schema of `dialect`.
pub fn parse(document: &str, dialect: Dialect) -> FeedResult<Document> {
    Ok(match dialect {
        Dialect::Rss1 => Document::Rss1(rss1::parse(document)?),
        Dialect::Rss2 => Document::Rss2(rss2::parse(document)?),
        Dialect::Atom => Document::Atom(atom::parse(document)?),
    })
}

/// Fails unless the root element's local name is `local`.
pub(crate) fn expect_root(root: &Element<'_>, local: &[u8]) -> FeedResult<()> {
    if root.local_name() == local {
        Ok(())
    } else {
        Err(FeedError::MalformedDocument(format!(
            "expected <{}> root element, found {}",
            String::from_utf8_lossy(local),
            root.describe()
        )))
    }
}

//! Root-element dialect detection.
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::schema::atom::{ATOM03_NS, ATOM_NS};
use super::schema::cursor::Cursor;
use super::schema::RDF_NS;
use crate::error::{FeedError, FeedResult};

/// Syndication vocabularies the crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "rss1.0")]
    Rss1,
    #[serde(rename = "rss2.0")]
    Rss2,
    #[serde(rename = "atom")]
    Atom,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Rss1, Dialect::Rss2, Dialect::Atom];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Rss1 => "rss1.0",
            Dialect::Rss2 => "rss2.0",
            Dialect::Atom => "atom",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a detection rule expects of the root element. `None` fields match
/// anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistinctElement {
    pub namespace: Option<&'static str>,
    pub local_name: &'static str,
    pub version: Option<&'static str>,
}

impl DistinctElement {
    fn matches(&self, namespace: Option<&str>, local_name: &[u8], version: Option<&str>) -> bool {
        self.local_name.as_bytes() == local_name
            && self.namespace.map_or(true, |ns| namespace == Some(ns))
            && self.version.map_or(true, |v| version == Some(v))
    }
}

/// Ordered rule table; the first matching rule wins.
pub static RULES: &[(DistinctElement, Dialect)] = &[
    (
        DistinctElement {
            namespace: Some(RDF_NS),
            local_name: "RDF",
            version: None,
        },
        Dialect::Rss1,
    ),
    (
        DistinctElement {
            namespace: None,
            local_name: "rss",
            version: Some("2.0"),
        },
        Dialect::Rss2,
    ),
    (
        DistinctElement {
            namespace: Some(ATOM_NS),
            local_name: "feed",
            version: None,
        },
        Dialect::Atom,
    ),
    (
        DistinctElement {
            namespace: Some(ATOM03_NS),
            local_name: "feed",
            version: None,
        },
        Dialect::Atom,
    ),
];

/// Classifies `document` by its root element without parsing past it.
pub fn detect(document: &str) -> FeedResult<Dialect> {
    let root = Cursor::new(document).root()?;
    let version = root.attribute(b"version")?;
    let version = version.as_deref();

    let dialect = RULES
        .iter()
        .find(|(rule, _)| rule.matches(root.namespace(), root.local_name(), version))
        .map(|(_, dialect)| *dialect);

    match dialect {
        Some(dialect) => {
            debug!(dialect = %dialect, root = %root.describe(), "Detected feed dialect");
            Ok(dialect)
        }
        None => Err(FeedError::UnknownDialect(root.describe())),
    }
}

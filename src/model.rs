//! Canonical feed model shared by every dialect.
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A normalized feed. Produced by the normalizer and never mutated by the
/// crate afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub title: String,
    /// Home page of the feed (RSS `<link>`, Atom alternate link). Empty when
    /// the document has none.
    pub url: String,
    pub summary: String,
    /// Articles in document order.
    pub articles: Vec<Article>,
}

impl Feed {
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Returns the articles published strictly after `since`, in document order.
    ///
    /// Articles without a publication date are never new arrivals.
    pub fn new_arrivals(&self, since: DateTime<Utc>) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|a| a.published.is_some_and(|p| p > since))
            .collect()
    }
}

/// A normalized article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    /// Stable identifier. Never empty: normalization fails instead.
    pub id: String,
    pub url: String,
    /// Author display names in document order.
    pub authors: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    /// Body of the article. HTML when the source was rich text.
    pub content: String,
}

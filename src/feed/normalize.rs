//! Mapping of each dialect's document shape onto the canonical model.
use tracing::debug;

use super::schema::atom::{AtomFeed, Entry, Person};
use super::schema::rss1::{Rss1Document, Rss1Item};
use super::schema::rss2::{Rss2Document, Rss2Item};
use super::schema::{self, dates, Document};
use super::Dialect;
use crate::error::{FeedError, FeedResult};
use crate::model::{Article, Feed};

/// Parses `document` as `dialect` and maps it onto a [`Feed`].
pub fn normalize(document: &str, dialect: Dialect) -> FeedResult<Feed> {
    let feed = normalize_document(schema::parse(document, dialect)?)?;
    debug!(
        dialect = %dialect,
        title = %feed.title,
        articles = feed.articles.len(),
        "Normalized feed"
    );
    Ok(feed)
}

/// Maps an already parsed document. Any failing article fails the whole feed.
pub fn normalize_document(document: Document) -> FeedResult<Feed> {
    match document {
        Document::Rss1(doc) => from_rss1(doc),
        Document::Rss2(doc) => from_rss2(doc),
        Document::Atom(feed) => from_atom(feed),
    }
}

fn from_rss1(doc: Rss1Document) -> FeedResult<Feed> {
    let Rss1Document {
        channel,
        items,
        rss090,
    } = doc;

    let ids: Vec<String> = if rss090 {
        // 0.90 has no rdf:Seq; the link is the only identity an item has.
        items.iter().map(|item| item.link.clone()).collect()
    } else if channel.sequence.len() != items.len() {
        return Err(FeedError::MalformedDocument(format!(
            "channel lists {} items in rdf:Seq but document has {} <item> elements",
            channel.sequence.len(),
            items.len()
        )));
    } else {
        // Identity is positional: the n-th rdf:li names the n-th <item>.
        channel.sequence
    };

    let articles = ids
        .into_iter()
        .zip(items)
        .map(|(id, item)| rss1_article(id, item))
        .collect::<FeedResult<Vec<_>>>()?;

    Ok(Feed {
        title: channel.title,
        url: channel.link,
        summary: channel.description,
        articles,
    })
}

fn rss1_article(id: String, item: Rss1Item) -> FeedResult<Article> {
    if id.is_empty() {
        return Err(FeedError::MissingRequiredField(format!(
            "RSS 1.0 item {:?} has no identifier",
            item.title
        )));
    }
    Ok(Article {
        published: dates::optional(&item.date, dates::parse_w3c)?,
        authors: non_empty(item.creator),
        categories: non_empty(item.subject),
        title: item.title,
        id,
        url: item.link,
        updated: None,
        content: item.description,
    })
}

fn from_rss2(doc: Rss2Document) -> FeedResult<Feed> {
    let channel = doc.channel;
    let articles = channel
        .items
        .iter()
        .map(rss2_article)
        .collect::<FeedResult<Vec<_>>>()?;

    Ok(Feed {
        title: channel.title,
        url: channel.link,
        summary: channel.description,
        articles,
    })
}

fn rss2_article(item: &Rss2Item) -> FeedResult<Article> {
    Ok(Article {
        title: item.title.clone(),
        id: item.id()?.to_string(),
        url: item.link.clone(),
        authors: item.authors(),
        published: item.published()?,
        updated: None,
        categories: item
            .categories
            .iter()
            .filter(|c| !c.term.is_empty())
            .map(|c| c.term.clone())
            .collect(),
        content: item.content().to_string(),
    })
}

fn from_atom(feed: AtomFeed) -> FeedResult<Feed> {
    let articles = feed
        .entries
        .iter()
        .map(|entry| atom_article(entry, &feed.authors))
        .collect::<FeedResult<Vec<_>>>()?;

    Ok(Feed {
        title: feed.title.to_plain()?,
        url: feed.alternate_url().to_string(),
        summary: feed.subtitle.to_plain()?,
        articles,
    })
}

fn atom_article(entry: &Entry, feed_authors: &[Person]) -> FeedResult<Article> {
    if entry.id.is_empty() {
        return Err(FeedError::MissingRequiredField(format!(
            "entry {:?} has no <id>",
            entry.title.content
        )));
    }
    let authors = if entry.authors.is_empty() {
        feed_authors
    } else {
        entry.authors.as_slice()
    };
    let content = match entry.body() {
        Some(body) => body.to_html()?,
        None => String::new(),
    };

    Ok(Article {
        title: entry.title.to_plain()?,
        id: entry.id.clone(),
        url: entry.alternate_url().to_string(),
        authors: authors
            .iter()
            .filter(|p| !p.name.is_empty())
            .map(|p| p.name.clone())
            .collect(),
        published: entry.published_time(),
        updated: entry.updated_time(),
        categories: entry
            .categories
            .iter()
            .filter(|c| !c.term.is_empty())
            .map(|c| c.term.clone())
            .collect(),
        content,
    })
}

fn non_empty(value: String) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        vec![value]
    }
}

//! Atom 1.0 (RFC 4287) document shape, with the Atom 0.3 element names
//! (`tagline`, `modified`, `issued`) accepted alongside.
use chrono::{DateTime, Utc};

use super::cursor::{Cursor, Element};
use super::dates;
use super::expect_root;
use crate::error::FeedResult;
use crate::feed::text::{TextConstruct, TextKind};

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub const ATOM03_NS: &str = "http://purl.org/atom/ns#";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub uri: String,
    pub email: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Link {
    /// `None` when the attribute is absent, which RFC 4287 reads as `alternate`.
    pub rel: Option<String>,
    pub media_type: Option<String>,
    pub href: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Category {
    pub term: String,
    pub scheme: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AtomFeed {
    pub title: TextConstruct,
    /// `subtitle` (`tagline` in 0.3).
    pub subtitle: TextConstruct,
    pub links: Vec<Link>,
    pub authors: Vec<Person>,
    pub id: String,
    pub rights: TextConstruct,
    /// `updated` (`modified` in 0.3).
    pub updated: Option<DateTime<Utc>>,
    pub categories: Vec<Category>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: TextConstruct,
    pub links: Vec<Link>,
    pub authors: Vec<Person>,
    pub categories: Vec<Category>,
    pub id: String,
    pub updated: Option<DateTime<Utc>>,
    pub published: Option<DateTime<Utc>>,
    pub rights: TextConstruct,
    pub summary: TextConstruct,
    pub content: TextConstruct,
    /// Atom 0.3 `modified`.
    pub modified: Option<DateTime<Utc>>,
    /// Atom 0.3 `issued`.
    pub issued: Option<DateTime<Utc>>,
}

impl AtomFeed {
    pub fn alternate_url(&self) -> &str {
        alternate_url(&self.links)
    }
}

impl Entry {
    pub fn alternate_url(&self) -> &str {
        alternate_url(&self.links)
    }

    /// `published`, falling back to the 0.3 `issued`.
    pub fn published_time(&self) -> Option<DateTime<Utc>> {
        self.published.or(self.issued)
    }

    /// `updated`, falling back to the 0.3 `modified`.
    pub fn updated_time(&self) -> Option<DateTime<Utc>> {
        self.updated.or(self.modified)
    }

    /// `content` when it has a body, otherwise `summary`.
    pub fn body(&self) -> Option<&TextConstruct> {
        [&self.content, &self.summary]
            .into_iter()
            .find(|t| !t.is_empty())
    }
}

/// First link whose `rel` is `alternate` or absent, in document order.
/// Empty when there is none.
pub fn alternate_url(links: &[Link]) -> &str {
    links
        .iter()
        .find(|link| matches!(link.rel.as_deref(), None | Some("alternate")))
        .map_or("", |link| link.href.as_str())
}

fn atom_local<'e>(element: &'e Element<'_>) -> Option<&'e [u8]> {
    match element.namespace() {
        None | Some(ATOM_NS) | Some(ATOM03_NS) => Some(element.local_name()),
        Some(_) => None,
    }
}

pub fn parse(document: &str) -> FeedResult<AtomFeed> {
    let mut cursor = Cursor::new(document);
    let root = cursor.root()?;
    expect_root(&root, b"feed")?;

    let mut feed = AtomFeed::default();
    if root.is_empty() {
        return Ok(feed);
    }
    while let Some(child) = cursor.next_child()? {
        match atom_local(&child) {
            Some(b"title") => feed.title = text_construct(&mut cursor, &child)?,
            Some(b"subtitle" | b"tagline") => {
                feed.subtitle = text_construct(&mut cursor, &child)?
            }
            Some(b"rights" | b"copyright") => feed.rights = text_construct(&mut cursor, &child)?,
            Some(b"link") => feed.links.push(link(&mut cursor, &child)?),
            Some(b"author") => feed.authors.push(person(&mut cursor, &child)?),
            Some(b"id") => feed.id = cursor.text(&child)?,
            Some(b"updated" | b"modified") => feed.updated = date(&mut cursor, &child)?,
            Some(b"category") => feed.categories.push(category(&mut cursor, &child)?),
            Some(b"entry") => feed.entries.push(entry(&mut cursor, &child)?),
            _ => cursor.skip(&child)?,
        }
    }
    Ok(feed)
}

fn entry(cursor: &mut Cursor<'_>, element: &Element<'_>) -> FeedResult<Entry> {
    let mut entry = Entry::default();
    if element.is_empty() {
        return Ok(entry);
    }
    while let Some(child) = cursor.next_child()? {
        match atom_local(&child) {
            Some(b"title") => entry.title = text_construct(cursor, &child)?,
            Some(b"link") => entry.links.push(link(cursor, &child)?),
            Some(b"author") => entry.authors.push(person(cursor, &child)?),
            Some(b"category") => entry.categories.push(category(cursor, &child)?),
            Some(b"id") => entry.id = cursor.text(&child)?,
            Some(b"updated") => entry.updated = date(cursor, &child)?,
            Some(b"published") => entry.published = date(cursor, &child)?,
            Some(b"modified") => entry.modified = date(cursor, &child)?,
            Some(b"issued") => entry.issued = date(cursor, &child)?,
            Some(b"rights") => entry.rights = text_construct(cursor, &child)?,
            Some(b"summary") => entry.summary = text_construct(cursor, &child)?,
            Some(b"content") => entry.content = text_construct(cursor, &child)?,
            _ => cursor.skip(&child)?,
        }
    }
    Ok(entry)
}

fn text_construct(cursor: &mut Cursor<'_>, element: &Element<'_>) -> FeedResult<TextConstruct> {
    let kind = TextKind::from_type_attr(&element.attribute(b"type")?.unwrap_or_default());
    let content = match kind {
        TextKind::Xhtml => cursor.raw_inner(element)?,
        TextKind::Text | TextKind::Html => cursor.chardata(element)?,
    };
    Ok(TextConstruct { kind, content })
}

fn link(cursor: &mut Cursor<'_>, element: &Element<'_>) -> FeedResult<Link> {
    let link = Link {
        rel: element.attribute(b"rel")?,
        media_type: element.attribute(b"type")?,
        href: element.attribute(b"href")?.unwrap_or_default(),
    };
    cursor.skip(element)?;
    Ok(link)
}

fn category(cursor: &mut Cursor<'_>, element: &Element<'_>) -> FeedResult<Category> {
    let category = Category {
        term: element.attribute(b"term")?.unwrap_or_default(),
        scheme: element.attribute(b"scheme")?,
        label: element.attribute(b"label")?,
    };
    cursor.skip(element)?;
    Ok(category)
}

fn person(cursor: &mut Cursor<'_>, element: &Element<'_>) -> FeedResult<Person> {
    let mut person = Person::default();
    if element.is_empty() {
        return Ok(person);
    }
    while let Some(child) = cursor.next_child()? {
        match atom_local(&child) {
            Some(b"name") => person.name = cursor.text(&child)?,
            // `url` is the 0.3 spelling
            Some(b"uri" | b"url") => person.uri = cursor.text(&child)?,
            Some(b"email") => person.email = cursor.text(&child)?,
            _ => cursor.skip(&child)?,
        }
    }
    Ok(person)
}

fn date(cursor: &mut Cursor<'_>, element: &Element<'_>) -> FeedResult<Option<DateTime<Utc>>> {
    let value = cursor.text(element)?;
    dates::optional(&value, dates::parse_w3c)
}

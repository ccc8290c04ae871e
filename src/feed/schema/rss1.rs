//! RSS 1.0 (RDF Site Summary) document shape.
//!
//! Items are siblings of the channel under `rdf:RDF`; their order and identity
//! live in a separate `rdf:Seq` inside the channel:
//!
//! ```xml
//! <channel rdf:about="...">
//!   <items><rdf:Seq><rdf:li rdf:resource="https://example.com/1"/></rdf:Seq></items>
//! </channel>
//! <item rdf:about="https://example.com/1">...</item>
//! ```
//!
//! RSS 0.90 shares the `rdf:RDF` envelope but has no `rdf:Seq`; its items
//! are identified by their `<link>`.
use super::cursor::{Cursor, Element};
use super::{expect_root, RDF_NS};
use crate::error::FeedResult;

pub const RSS1_NS: &str = "http://purl.org/rss/1.0/";
pub const RSS090_NS: &str = "http://my.netscape.com/rdf/simple/0.9/";
pub const DUBLIN_CORE_NS: &str = "http://purl.org/dc/elements/1.1/";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rss1Document {
    pub channel: Rss1Channel,
    pub items: Vec<Rss1Item>,
    /// Channel is in the RSS 0.90 vocabulary.
    pub rss090: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rss1Channel {
    pub title: String,
    pub link: String,
    pub description: String,
    /// `dc:date`
    pub date: String,
    /// `dc:language`
    pub language: String,
    /// `rdf:resource` of every `rdf:li` in `items/rdf:Seq`, in order.
    pub sequence: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rss1Item {
    pub title: String,
    pub link: String,
    pub description: String,
    /// `dc:creator`
    pub creator: String,
    /// `dc:date`
    pub date: String,
    /// `dc:subject`
    pub subject: String,
}

/// Elements of the RSS 1.0 (or 0.90) vocabulary. Unqualified names are
/// accepted too; some generators forget the default namespace.
fn rss1_local<'e>(element: &'e Element<'_>) -> Option<&'e [u8]> {
    match element.namespace() {
        None | Some(RSS1_NS) | Some(RSS090_NS) => Some(element.local_name()),
        Some(_) => None,
    }
}

fn is_rdf(element: &Element<'_>, local: &[u8]) -> bool {
    matches!(element.namespace(), None | Some(RDF_NS)) && element.local_name() == local
}

pub fn parse(document: &str) -> FeedResult<Rss1Document> {
    let mut cursor = Cursor::new(document);
    let root = cursor.root()?;
    expect_root(&root, b"RDF")?;

    let mut doc = Rss1Document::default();
    if root.is_empty() {
        return Ok(doc);
    }
    while let Some(child) = cursor.next_child()? {
        match rss1_local(&child) {
            Some(b"channel") if !child.is_empty() => {
                doc.rss090 = child.namespace() == Some(RSS090_NS);
                doc.channel = parse_channel(&mut cursor)?;
            }
            Some(b"item") if !child.is_empty() => doc.items.push(parse_item(&mut cursor)?),
            Some(b"item") => doc.items.push(Rss1Item::default()),
            _ => cursor.skip(&child)?,
        }
    }
    Ok(doc)
}

fn parse_channel(cursor: &mut Cursor<'_>) -> FeedResult<Rss1Channel> {
    let mut channel = Rss1Channel::default();
    while let Some(child) = cursor.next_child()? {
        match (child.namespace(), child.local_name()) {
            (Some(DUBLIN_CORE_NS), b"date") => channel.date = cursor.text(&child)?,
            (Some(DUBLIN_CORE_NS), b"language") => channel.language = cursor.text(&child)?,
            _ => match rss1_local(&child) {
                Some(b"title") => channel.title = cursor.text(&child)?,
                Some(b"link") => channel.link = cursor.text(&child)?,
                Some(b"description") => channel.description = cursor.text(&child)?,
                Some(b"items") if !child.is_empty() => {
                    channel.sequence = parse_sequence(cursor)?;
                }
                _ => cursor.skip(&child)?,
            },
        }
    }
    Ok(channel)
}

/// Walks `<items>` down to the `rdf:li` resources of its `rdf:Seq`.
fn parse_sequence(cursor: &mut Cursor<'_>) -> FeedResult<Vec<String>> {
    let mut resources = Vec::new();
    while let Some(child) = cursor.next_child()? {
        if !is_rdf(&child, b"Seq") || child.is_empty() {
            cursor.skip(&child)?;
            continue;
        }
        while let Some(li) = cursor.next_child()? {
            if is_rdf(&li, b"li") {
                resources.push(li.attribute(b"resource")?.unwrap_or_default().trim().to_string());
            }
            cursor.skip(&li)?;
        }
    }
    Ok(resources)
}

fn parse_item(cursor: &mut Cursor<'_>) -> FeedResult<Rss1Item> {
    let mut item = Rss1Item::default();
    while let Some(child) = cursor.next_child()? {
        match (child.namespace(), child.local_name()) {
            (Some(DUBLIN_CORE_NS), b"creator") => item.creator = cursor.text(&child)?,
            (Some(DUBLIN_CORE_NS), b"date") => item.date = cursor.text(&child)?,
            (Some(DUBLIN_CORE_NS), b"subject") => item.subject = cursor.text(&child)?,
            _ => match rss1_local(&child) {
                Some(b"title") => item.title = cursor.text(&child)?,
                Some(b"link") => item.link = cursor.text(&child)?,
                Some(b"description") => item.description = cursor.text(&child)?,
                _ => cursor.skip(&child)?,
            },
        }
    }
    Ok(item)
}

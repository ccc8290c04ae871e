//! RSS 2.0 document shape and its item-level quirks.
use chrono::{DateTime, Utc};

use super::cursor::{Cursor, Element};
use super::dates;
use super::expect_root;
use super::rss1::DUBLIN_CORE_NS;
use crate::error::{FeedError, FeedResult};

pub const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rss2Document {
    /// `version` attribute of `<rss>`.
    pub version: String,
    pub channel: Rss2Channel,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rss2Channel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub last_build_date: String,
    pub items: Vec<Rss2Item>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rss2Item {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Author's email address.
    pub author: String,
    pub categories: Vec<Category>,
    pub guid: Option<Guid>,
    pub pub_date: String,
    /// `dc:creator`
    pub creator: String,
    /// `content:encoded`
    pub encoded: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Category {
    pub domain: Option<String>,
    pub term: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guid {
    /// `isPermaLink="true"`. An absent attribute does not mark the GUID.
    pub is_perma_link: bool,
    pub value: String,
}

impl Rss2Item {
    /// Stable identifier: the GUID when it is a non-empty permalink,
    /// otherwise the item link.
    pub fn id(&self) -> FeedResult<&str> {
        match &self.guid {
            Some(guid) if guid.is_perma_link && !guid.value.is_empty() => Ok(guid.value.as_str()),
            _ if !self.link.is_empty() => Ok(self.link.as_str()),
            _ => Err(FeedError::MissingRequiredField(
                "item has neither a permalink <guid> nor a <link>".to_string(),
            )),
        }
    }

    /// `content:encoded` when present, otherwise the description.
    pub fn content(&self) -> &str {
        if self.encoded.is_empty() {
            &self.description
        } else {
            &self.encoded
        }
    }

    /// Zero or one author: `author`, falling back to `dc:creator`.
    pub fn authors(&self) -> Vec<String> {
        [&self.author, &self.creator]
            .into_iter()
            .find(|a| !a.is_empty())
            .map(|a| vec![a.clone()])
            .unwrap_or_default()
    }

    pub fn published(&self) -> FeedResult<Option<DateTime<Utc>>> {
        dates::optional(&self.pub_date, dates::parse_rfc2822)
    }
}

/// Local name of an element in the document's own vocabulary, which is
/// whatever namespace `<rss>` itself resolved to (usually none).
fn core_local<'e>(element: &'e Element<'_>, core: Option<&str>) -> Option<&'e [u8]> {
    (element.namespace() == core).then(|| element.local_name())
}

pub fn parse(document: &str) -> FeedResult<Rss2Document> {
    let mut cursor = Cursor::new(document);
    let root = cursor.root()?;
    expect_root(&root, b"rss")?;

    let mut doc = Rss2Document {
        version: root.attribute(b"version")?.unwrap_or_default(),
        ..Rss2Document::default()
    };
    if root.is_empty() {
        return Ok(doc);
    }
    let core = root.namespace().map(str::to_string);
    let core = core.as_deref();
    while let Some(child) = cursor.next_child()? {
        if matches!(core_local(&child, core), Some(b"channel")) && !child.is_empty() {
            doc.channel = parse_channel(&mut cursor, core)?;
        } else {
            cursor.skip(&child)?;
        }
    }
    Ok(doc)
}

fn parse_channel(cursor: &mut Cursor<'_>, core: Option<&str>) -> FeedResult<Rss2Channel> {
    let mut channel = Rss2Channel::default();
    while let Some(child) = cursor.next_child()? {
        // atom:link rel="self", itunes:*, and friends fall through to skip
        match core_local(&child, core) {
            Some(b"title") => channel.title = cursor.text(&child)?,
            Some(b"link") => channel.link = cursor.text(&child)?,
            Some(b"description") => channel.description = cursor.text(&child)?,
            Some(b"language") => channel.language = cursor.text(&child)?,
            Some(b"lastBuildDate") => channel.last_build_date = cursor.text(&child)?,
            Some(b"item") if child.is_empty() => channel.items.push(Rss2Item::default()),
            Some(b"item") => channel.items.push(parse_item(cursor, core)?),
            _ => cursor.skip(&child)?,
        }
    }
    Ok(channel)
}

fn parse_item(cursor: &mut Cursor<'_>, core: Option<&str>) -> FeedResult<Rss2Item> {
    let mut item = Rss2Item::default();
    while let Some(child) = cursor.next_child()? {
        match core_local(&child, core) {
            Some(b"title") => item.title = cursor.text(&child)?,
            Some(b"link") => item.link = cursor.text(&child)?,
            Some(b"description") => item.description = cursor.text(&child)?,
            Some(b"author") => item.author = cursor.text(&child)?,
            Some(b"pubDate") => item.pub_date = cursor.text(&child)?,
            Some(b"category") => {
                let domain = child.attribute(b"domain")?;
                let term = cursor.text(&child)?;
                item.categories.push(Category { domain, term });
            }
            Some(b"guid") => {
                let is_perma_link = child
                    .attribute(b"isPermaLink")?
                    .is_some_and(|v| {
                        let v = v.trim();
                        v == "1" || v.eq_ignore_ascii_case("true")
                    });
                let value = cursor.text(&child)?;
                item.guid = Some(Guid {
                    is_perma_link,
                    value,
                });
            }
            Some(_) => cursor.skip(&child)?,
            None => match (child.namespace(), child.local_name()) {
                (Some(DUBLIN_CORE_NS), b"creator") => item.creator = cursor.text(&child)?,
                (Some(CONTENT_NS), b"encoded") => item.encoded = cursor.text(&child)?,
                _ => cursor.skip(&child)?,
            },
        }
    }
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<rss version='2.0'
     xmlns:atom="http://www.w3.org/2005/Atom"
     xmlns:dc="http://purl.org/dc/elements/1.1/"
     xmlns:content="http://purl.org/rss/1.0/modules/content/">
	<channel>
		<title>PHP &amp; JavaScript：更新情報</title>
		<link>http://phpjavascriptroom.com/</link>
		<atom:link href="http://phpjavascriptroom.com/rss.xml" rel="self"/>
		<description>PHP &amp; JavaScript Room：新着3件</description>
		<image><title>logo</title><url>http://phpjavascriptroom.com/logo.png</url></image>
		<item>
			<title>記事タイトル3</title>
			<link>http://phpjavascriptroom.com/post3.html</link>
			<description>記事の内容です。</description>
			<pubDate>Wed, 11 Jun 2008 15:30:59 +0900</pubDate>
			<category domain="tags">php</category>
			<category>js</category>
			<content:encoded><![CDATA[<p>全文</p>]]></content:encoded>
			<dc:creator>room</dc:creator>
		</item>
		<item>
			<title>記事タイトル2</title>
			<guid isPermaLink="false">post-2</guid>
			<link>http://phpjavascriptroom.com/post2.html</link>
			<author>editor@phpjavascriptroom.com</author>
		</item>
	</channel>
</rss>"#;

    fn item_with(guid: Option<(bool, &str)>, link: &str) -> Rss2Item {
        Rss2Item {
            guid: guid.map(|(is_perma_link, value)| Guid {
                is_perma_link,
                value: value.to_string(),
            }),
            link: link.to_string(),
            ..Rss2Item::default()
        }
    }

    #[test]
    fn test_parse_channel() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(doc.version, "2.0");
        assert_eq!(doc.channel.title, "PHP & JavaScript：更新情報");
        // atom:link must not overwrite the channel link
        assert_eq!(doc.channel.link, "http://phpjavascriptroom.com/");
        assert_eq!(doc.channel.items.len(), 2);
    }

    #[test]
    fn test_parse_item_extensions() {
        let doc = parse(SAMPLE).unwrap();
        let item = &doc.channel.items[0];
        assert_eq!(item.encoded, "<p>全文</p>");
        assert_eq!(item.creator, "room");
        assert_eq!(item.categories.len(), 2);
        assert_eq!(item.categories[0].domain.as_deref(), Some("tags"));
        assert_eq!(item.categories[1].term, "js");
        assert_eq!(item.content(), "<p>全文</p>");
        assert_eq!(item.authors(), vec!["room".to_string()]);
    }

    #[test]
    fn test_guid_permalink_attribute() {
        let doc = parse(SAMPLE).unwrap();
        let guid = doc.channel.items[1].guid.as_ref().unwrap();
        assert!(!guid.is_perma_link);
        assert_eq!(guid.value, "post-2");

        let doc = parse(
            r#"<rss version="2.0"><channel>
                <item><guid>x</guid></item>
                <item><guid isPermaLink="true">y</guid></item>
            </channel></rss>"#,
        )
        .unwrap();
        assert!(!doc.channel.items[0].guid.as_ref().unwrap().is_perma_link);
        assert!(doc.channel.items[1].guid.as_ref().unwrap().is_perma_link);
    }

    #[test]
    fn test_id_resolution() {
        assert_eq!(item_with(Some((true, "X")), "").id().unwrap(), "X");
        assert_eq!(item_with(Some((true, "X")), "Y").id().unwrap(), "X");
        assert_eq!(item_with(None, "Y").id().unwrap(), "Y");
        assert_eq!(item_with(Some((false, "X")), "Y").id().unwrap(), "Y");
        assert_eq!(item_with(Some((true, "")), "Y").id().unwrap(), "Y");
        assert!(matches!(
            item_with(None, "").id(),
            Err(FeedError::MissingRequiredField(_))
        ));
        assert!(matches!(
            item_with(Some((false, "X")), "").id(),
            Err(FeedError::MissingRequiredField(_))
        ));
    }

    #[test]
    fn test_content_falls_back_to_description() {
        let item = Rss2Item {
            description: "summary".to_string(),
            ..Rss2Item::default()
        };
        assert_eq!(item.content(), "summary");
    }

    #[test]
    fn test_author_preferred_over_creator() {
        let item = Rss2Item {
            author: "a@example.com".to_string(),
            creator: "A".to_string(),
            ..Rss2Item::default()
        };
        assert_eq!(item.authors(), vec!["a@example.com".to_string()]);
        assert!(Rss2Item::default().authors().is_empty());
    }

    #[test]
    fn test_published_dates() {
        let mut item = Rss2Item::default();
        assert_eq!(item.published().unwrap(), None);

        item.pub_date = "Wed, 11 Jun 2008 15:30:59 +0900".to_string();
        assert!(item.published().unwrap().is_some());

        item.pub_date = "Wed, 11 Jun 2008 15:30:59 JST".to_string();
        assert!(item.published().unwrap().is_some());

        item.pub_date = "11/06/2008".to_string();
        assert!(matches!(item.published(), Err(FeedError::InvalidDate(_))));
    }

    #[test]
    fn test_default_namespace_is_core_vocabulary() {
        let doc = parse(
            r#"<rss version="2.0" xmlns="http://backend.userland.com/rss2"
                     xmlns:atom="http://www.w3.org/2005/Atom">
              <channel>
                <title>T</title>
                <atom:link href="http://a/feed" rel="self"/>
                <link>http://a/</link>
                <item><link>http://a/1</link><atom:title>not this</atom:title></item>
              </channel>
            </rss>"#,
        )
        .unwrap();
        assert_eq!(doc.channel.title, "T");
        assert_eq!(doc.channel.link, "http://a/");
        assert_eq!(doc.channel.items.len(), 1);
        assert_eq!(doc.channel.items[0].link, "http://a/1");
        assert_eq!(doc.channel.items[0].title, "");
    }
}

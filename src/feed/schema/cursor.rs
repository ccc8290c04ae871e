//! Namespace-aware element cursor over a buffered document.
//!
//! The dialect schemas walk the document top-down: `next_child` yields the
//! direct children of the element most recently entered, and every child must
//! be consumed with `text`, `raw_inner`, `skip`, or by walking its own
//! children to their end.
//!
//! SEC-002: quick-xml (0.37) never expands `<!ENTITY>` declarations; only the
//! five XML builtins and character references are resolved by `unescape()`,
//! so custom entities surface as a malformed document instead of an XXE.
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::{FeedError, FeedResult};

/// A start (or self-closing) tag with its resolved namespace.
pub struct Element<'i> {
    namespace: Option<String>,
    start: BytesStart<'i>,
    empty: bool,
}

impl<'i> Element<'i> {
    /// Namespace URI the element's prefix (or the default namespace) is bound to.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Tag name without prefix.
    pub fn local_name(&self) -> &[u8] {
        self.start.local_name().into_inner()
    }

    /// True for self-closing tags, which have no content to consume.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Value of the first attribute whose local name is `local`, unescaped.
    ///
    /// Prefixes are ignored (`rdf:resource` matches `resource`) and namespace
    /// declarations are never returned.
    pub fn attribute(&self, local: &[u8]) -> FeedResult<Option<String>> {
        for attr in self.start.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            if attr.key.local_name().as_ref() == local {
                return Ok(Some(attr.unescape_value()?.into_owned()));
            }
        }
        Ok(None)
    }

    /// `{namespace}local` (or just `local`), for error messages.
    pub fn describe(&self) -> String {
        let local = String::from_utf8_lossy(self.local_name());
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, local),
            None => local.into_owned(),
        }
    }
}

enum Step<'i> {
    Open(Element<'i>),
    Close,
    Eof,
    Skip,
}

pub struct Cursor<'i> {
    reader: NsReader<&'i [u8]>,
}

impl<'i> Cursor<'i> {
    pub fn new(document: &'i str) -> Self {
        Self {
            reader: NsReader::from_str(document),
        }
    }

    fn step(&mut self) -> FeedResult<Step<'i>> {
        let (resolved, event) = self.reader.read_resolved_event()?;
        let namespace = match resolved {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
            _ => None,
        };
        Ok(match event {
            Event::Start(start) => Step::Open(Element {
                namespace,
                start,
                empty: false,
            }),
            Event::Empty(start) => Step::Open(Element {
                namespace,
                start,
                empty: true,
            }),
            Event::End(_) => Step::Close,
            Event::Eof => Step::Eof,
            _ => Step::Skip,
        })
    }

    /// Skips the prolog (declaration, doctype, comments, processing
    /// instructions) and returns the root element.
    pub fn root(&mut self) -> FeedResult<Element<'i>> {
        loop {
            match self.step()? {
                Step::Open(element) => return Ok(element),
                Step::Eof => {
                    return Err(FeedError::MalformedDocument(
                        "document has no root element".to_string(),
                    ))
                }
                Step::Close => {
                    return Err(FeedError::MalformedDocument(
                        "closing tag before the root element".to_string(),
                    ))
                }
                Step::Skip => {}
            }
        }
    }

    /// Next direct child of the element being walked, or `None` once its end
    /// tag is reached.
    pub fn next_child(&mut self) -> FeedResult<Option<Element<'i>>> {
        loop {
            match self.step()? {
                Step::Open(element) => return Ok(Some(element)),
                Step::Close => return Ok(None),
                Step::Eof => {
                    return Err(FeedError::MalformedDocument(
                        "unexpected end of document".to_string(),
                    ))
                }
                Step::Skip => {}
            }
        }
    }

    /// Character data of `element` (text and CDATA, entities resolved),
    /// trimmed. Nested elements are skipped.
    pub fn text(&mut self, element: &Element<'_>) -> FeedResult<String> {
        let text = self.chardata(element)?;
        Ok(text.trim().to_string())
    }

    /// Like [`Cursor::text`], but whitespace is kept exactly as written.
    pub fn chardata(&mut self, element: &Element<'_>) -> FeedResult<String> {
        if element.empty {
            return Ok(String::new());
        }
        let mut text = String::new();
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(child) => {
                    self.reader.read_to_end(child.name())?;
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(FeedError::MalformedDocument(format!(
                        "unexpected end of document inside {}",
                        element.describe()
                    )))
                }
                _ => {}
            }
        }
        Ok(text)
    }

    /// Raw markup between the start and end tags of `element`, trimmed and
    /// not unescaped.
    pub fn raw_inner(&mut self, element: &Element<'_>) -> FeedResult<String> {
        if element.empty {
            return Ok(String::new());
        }
        let raw = self.reader.read_text(element.start.name())?;
        Ok(raw.trim().to_string())
    }

    /// Consumes `element` and everything inside it.
    pub fn skip(&mut self, element: &Element<'_>) -> FeedResult<()> {
        if !element.empty {
            self.reader.read_to_end(element.start.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_skips_prolog() {
        let doc = r#"<?xml version="1.0"?>
<!-- generated -->
<rss version="2.0"><channel/></rss>"#;
        let mut cursor = Cursor::new(doc);
        let root = cursor.root().unwrap();
        assert_eq!(root.local_name(), b"rss");
        assert_eq!(root.namespace(), None);
        assert_eq!(root.attribute(b"version").unwrap().as_deref(), Some("2.0"));
    }

    #[test]
    fn test_prefixed_root_resolves_namespace() {
        let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/>"#;
        let root = Cursor::new(doc).root().unwrap();
        assert_eq!(root.local_name(), b"RDF");
        assert_eq!(
            root.namespace(),
            Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#")
        );
        assert!(root.is_empty());
    }

    #[test]
    fn test_empty_document_has_no_root() {
        let result = Cursor::new("<?xml version=\"1.0\"?>").root();
        assert!(matches!(result, Err(FeedError::MalformedDocument(_))));
    }

    #[test]
    fn test_children_and_text() {
        let doc = "<a><b>one &amp; two</b><c><![CDATA[<raw>]]></c><d><e>x</e>tail</d></a>";
        let mut cursor = Cursor::new(doc);
        cursor.root().unwrap();

        let b = cursor.next_child().unwrap().unwrap();
        assert_eq!(cursor.text(&b).unwrap(), "one & two");
        let c = cursor.next_child().unwrap().unwrap();
        assert_eq!(cursor.text(&c).unwrap(), "<raw>");
        let d = cursor.next_child().unwrap().unwrap();
        assert_eq!(cursor.text(&d).unwrap(), "tail");
        assert!(cursor.next_child().unwrap().is_none());
    }

    #[test]
    fn test_raw_inner_keeps_markup() {
        let doc = "<a><b> <div><em>x</em>&lt;</div> </b></a>";
        let mut cursor = Cursor::new(doc);
        cursor.root().unwrap();
        let b = cursor.next_child().unwrap().unwrap();
        assert_eq!(cursor.raw_inner(&b).unwrap(), "<div><em>x</em>&lt;</div>");
        assert!(cursor.next_child().unwrap().is_none());
    }

    #[test]
    fn test_skip_consumes_subtree() {
        let doc = "<a><image><title>ignored</title></image><title>kept</title></a>";
        let mut cursor = Cursor::new(doc);
        cursor.root().unwrap();
        let image = cursor.next_child().unwrap().unwrap();
        cursor.skip(&image).unwrap();
        let title = cursor.next_child().unwrap().unwrap();
        assert_eq!(cursor.text(&title).unwrap(), "kept");
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let mut cursor = Cursor::new("<a><b>text");
        cursor.root().unwrap();
        let b = cursor.next_child().unwrap().unwrap();
        assert!(matches!(
            cursor.text(&b),
            Err(FeedError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        let mut cursor = Cursor::new("<a><b>text</c></a>");
        cursor.root().unwrap();
        let b = cursor.next_child().unwrap().unwrap();
        assert!(matches!(
            cursor.text(&b),
            Err(FeedError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_namespace_declaration_not_an_attribute() {
        let doc = r#"<feed xmlns:version="urn:x" version="0.3"/>"#;
        let root = Cursor::new(doc).root().unwrap();
        assert_eq!(root.attribute(b"version").unwrap().as_deref(), Some("0.3"));
    }
}

//! Atom text constructs and their plain/HTML renderings.
use html_escape::decode_html_entities;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{FeedError, FeedResult};

/// The `type` attribute of an Atom text construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextKind {
    /// Plain text (`type="text"`, the default).
    #[default]
    Text,
    /// Entity-escaped HTML (`type="html"`).
    Html,
    /// An inline XHTML fragment, conventionally wrapped in a `<div>` (`type="xhtml"`).
    Xhtml,
}

impl TextKind {
    /// Maps a `type` attribute value. Anything unrecognized, including an
    /// absent or empty attribute, is plain text.
    pub fn from_type_attr(value: &str) -> Self {
        match value.trim() {
            "html" => TextKind::Html,
            "xhtml" => TextKind::Xhtml,
            _ => TextKind::Text,
        }
    }
}

/// A typed text fragment as it appeared in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextConstruct {
    pub kind: TextKind,
    /// Character data for `Text`/`Html`, raw inner markup for `Xhtml`.
    pub content: String,
}

impl TextConstruct {
    pub fn new(kind: TextKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Renders the construct as plain text.
    ///
    /// Only plain-text constructs have a plain rendering. Reducing HTML or
    /// XHTML to text is not implemented and reported as a rendering failure
    /// rather than guessed at.
    pub fn to_plain(&self) -> FeedResult<String> {
        match self.kind {
            TextKind::Text => Ok(self.content.clone()),
            TextKind::Html | TextKind::Xhtml => Err(FeedError::TextRendering(
                "plain-text rendering of html content is not implemented".to_string(),
            )),
        }
    }

    /// Renders the construct as an HTML string.
    ///
    /// - text: wrapped in `<pre>` so whitespace survives display
    /// - html: entities decoded once, wrapped in `<div>`
    /// - xhtml: re-tokenized; a wrapping `<div>` is removed and its inner
    ///   markup returned untouched, any other fragment is returned as is
    pub fn to_html(&self) -> FeedResult<String> {
        match self.kind {
            TextKind::Text => Ok(format!("<pre>{}</pre>", self.content)),
            TextKind::Html => Ok(format!(
                "<div>{}</div>",
                decode_html_entities(&self.content)
            )),
            TextKind::Xhtml => unwrap_xhtml(&self.content),
        }
    }
}

fn rendering_error(err: quick_xml::Error) -> FeedError {
    FeedError::TextRendering(format!("xhtml fragment: {}", err))
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| b.is_ascii_whitespace())
}

/// First event that is not whitespace-only text.
fn next_significant<'i>(reader: &mut Reader<&'i [u8]>) -> FeedResult<Event<'i>> {
    loop {
        match reader.read_event().map_err(rendering_error)? {
            Event::Text(t) if is_blank(&t) => {}
            event => return Ok(event),
        }
    }
}

/// Reads the remainder of the fragment, failing on bad markup. Returns true
/// when nothing but whitespace was left.
fn drain(reader: &mut Reader<&[u8]>) -> FeedResult<bool> {
    let mut blank = true;
    loop {
        match reader.read_event().map_err(rendering_error)? {
            Event::Eof => return Ok(blank),
            Event::Text(t) if is_blank(&t) => {}
            _ => blank = false,
        }
    }
}

fn unwrap_xhtml(fragment: &str) -> FeedResult<String> {
    let mut reader = Reader::from_str(fragment);
    match next_significant(&mut reader)? {
        Event::Start(start) if start.local_name().as_ref() == b"div" => {
            let inner = reader.read_text(start.name()).map_err(rendering_error)?;
            if drain(&mut reader)? {
                Ok(inner.into_owned())
            } else {
                // The div was only the first of several top-level nodes.
                Ok(fragment.trim().to_string())
            }
        }
        Event::Empty(start) if start.local_name().as_ref() == b"div" => {
            if drain(&mut reader)? {
                Ok(String::new())
            } else {
                Ok(fragment.trim().to_string())
            }
        }
        Event::Eof => Ok(String::new()),
        _ => {
            drain(&mut reader)?;
            Ok(fragment.trim().to_string())
        }
    }
}

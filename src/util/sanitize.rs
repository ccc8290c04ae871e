use std::borrow::Cow;

/// Bytes stripped by [`Sanitizer::default`]: the vertical tab.
///
/// Some publishers leak VT from word processors into feed bodies, and every
/// conforming XML decoder rejects the document outright when it sees one.
pub const DEFAULT_STRIP_BYTES: &[u8] = &[0x0b];

/// Returns true for the C0 control bytes XML 1.0 forbids anywhere in a document.
///
/// Tab (0x09), newline (0x0A) and carriage return (0x0D) are legal and never
/// reported.
pub fn is_xml_illegal_control(b: u8) -> bool {
    b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d
}

/// Removes a fixed set of XML-illegal control bytes from raw documents.
///
/// Only ASCII control bytes can be configured, so filtering never splits a
/// multi-byte UTF-8 sequence and the result is valid UTF-8 whenever the
/// input was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitizer {
    strip: [bool; 0x20],
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::with_bytes(DEFAULT_STRIP_BYTES)
    }
}

impl Sanitizer {
    /// Builds a sanitizer stripping `bytes`. Values that are not XML-illegal
    /// control bytes are ignored; `ParserConfig::validate` reports them.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mut strip = [false; 0x20];
        for &b in bytes.iter().filter(|&&b| is_xml_illegal_control(b)) {
            strip[b as usize] = true;
        }
        Self { strip }
    }

    #[inline]
    fn strips(&self, b: u8) -> bool {
        b < 0x20 && self.strip[b as usize]
    }

    /// Returns `bytes` without any stripped byte, preserving the order of
    /// everything else.
    ///
    /// Returns `Cow::Borrowed` when the input is already clean (the common case).
    pub fn clean<'a>(&self, bytes: &'a [u8]) -> Cow<'a, [u8]> {
        if !bytes.iter().any(|&b| self.strips(b)) {
            return Cow::Borrowed(bytes);
        }
        let mut cleaned = bytes.to_vec();
        self.clean_in_place(&mut cleaned);
        Cow::Owned(cleaned)
    }

    /// Filters `buf` in place. Returns the number of bytes removed.
    pub fn clean_in_place(&self, buf: &mut Vec<u8>) -> usize {
        let before = buf.len();
        buf.retain(|&b| !self.strips(b));
        let removed = before - buf.len();
        if removed > 0 {
            tracing::trace!(removed, "Stripped XML-illegal control bytes");
        }
        removed
    }
}

/// Strips the default control bytes (vertical tab) from `bytes`.
pub fn clean(bytes: &[u8]) -> Cow<'_, [u8]> {
    Sanitizer::default().clean(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{span, Event, Level, Metadata};

    #[test]
    fn test_clean_table() {
        let cases: &[(&[u8], &[u8])] = &[
            (b"abc", b"abc"),
            (b"abc\x0b", b"abc"),
            (b"\x0babc", b"abc"),
            (b"\x0ba\x0bb\x0bc\x0b", b"abc"),
            (b"\x0b\x0b", b""),
        ];
        for (input, want) in cases {
            assert_eq!(&*clean(input), *want, "clean({:?})", input);
        }
    }

    #[test]
    fn test_clean_input_returns_borrowed() {
        let input = b"<rss version=\"2.0\">\n\t<channel/>\r\n</rss>";
        assert!(matches!(clean(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_default_keeps_other_controls() {
        // Only VT is stripped by default.
        assert_eq!(&*clean(b"a\x0cb\x0bc"), b"a\x0cbc");
    }

    #[test]
    fn test_extended_set() {
        let sanitizer = Sanitizer::with_bytes(&[0x0b, 0x0c, 0x00]);
        assert_eq!(&*sanitizer.clean(b"\x00a\x0cb\x0bc"), b"abc");
    }

    #[test]
    fn test_legal_whitespace_never_configurable() {
        let sanitizer = Sanitizer::with_bytes(&[b'\t', b'\n', b'\r', b'a']);
        assert_eq!(&*sanitizer.clean(b"a\tb\nc\r"), b"a\tb\nc\r");
    }

    #[test]
    fn test_clean_in_place_counts_removed() {
        let mut buf = b"\x0bh\x0bi\x0b".to_vec();
        let removed = Sanitizer::default().clean_in_place(&mut buf);
        assert_eq!(removed, 3);
        assert_eq!(buf, b"hi");
    }

    /// Counts TRACE events seen on the current thread.
    struct TraceCounter(Arc<AtomicUsize>);

    impl tracing::Subscriber for TraceCounter {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }
        fn record(&self, _: &span::Id, _: &span::Record<'_>) {}
        fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}
        fn event(&self, event: &Event<'_>) {
            if *event.metadata().level() == Level::TRACE {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn enter(&self, _: &span::Id) {}
        fn exit(&self, _: &span::Id) {}
    }

    #[test]
    fn test_both_paths_trace_removals() {
        let count = Arc::new(AtomicUsize::new(0));
        let sanitizer = Sanitizer::default();

        tracing::subscriber::with_default(TraceCounter(count.clone()), || {
            assert_eq!(&*sanitizer.clean(b"a\x0bb"), b"ab");
            assert_eq!(count.load(Ordering::SeqCst), 1);

            let mut buf = b"a\x0bb".to_vec();
            sanitizer.clean_in_place(&mut buf);
            assert_eq!(count.load(Ordering::SeqCst), 2);

            // nothing stripped, nothing logged
            sanitizer.clean(b"ab");
            sanitizer.clean_in_place(&mut buf);
            assert_eq!(count.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn test_multibyte_utf8_preserved() {
        let input = "記事\u{b}の内容".as_bytes();
        let cleaned = clean(input);
        assert_eq!(std::str::from_utf8(&cleaned).unwrap(), "記事の内容");
    }
}

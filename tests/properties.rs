//! Property tests for the sanitizer and the dialect detector.

use proptest::prelude::*;

use feedsift::util::{clean, is_xml_illegal_control, Sanitizer};
use feedsift::{Dialect, FeedError};

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

proptest! {
    #[test]
    fn clean_removes_every_vertical_tab(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let cleaned = clean(&bytes);
        prop_assert!(!cleaned.contains(&0x0b));
    }

    #[test]
    fn clean_preserves_everything_else_in_order(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let expected: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0x0b).collect();
        prop_assert_eq!(clean(&bytes).into_owned(), expected);
    }

    #[test]
    fn clean_is_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let once = clean(&bytes).into_owned();
        let twice = clean(&once).into_owned();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn clean_keeps_text_valid_utf8(text in ".*") {
        let cleaned = clean(text.as_bytes());
        prop_assert!(std::str::from_utf8(&cleaned).is_ok());
    }

    #[test]
    fn in_place_matches_borrowed(
        strip in proptest::collection::vec(0u8..0x20, 0..4),
        bytes in proptest::collection::vec(any::<u8>(), 0..128),
    ) {
        let sanitizer = Sanitizer::with_bytes(&strip);
        let mut buf = bytes.clone();
        let removed = sanitizer.clean_in_place(&mut buf);
        let cleaned = sanitizer.clean(&bytes);
        prop_assert_eq!(&buf[..], &cleaned[..]);
        prop_assert_eq!(removed, bytes.len() - buf.len());
        prop_assert!(buf.iter().all(|&b| !(strip.contains(&b) && is_xml_illegal_control(b))));
    }

    #[test]
    fn rdf_root_is_rss1_whatever_the_prefix(prefix in "[a-z]{1,8}") {
        prop_assume!(!prefix.starts_with("xml"));
        let doc = format!(r#"<{p}:RDF xmlns:{p}="{ns}"/>"#, p = prefix, ns = RDF_NS);
        prop_assert_eq!(feedsift::detect(&doc).unwrap(), Dialect::Rss1);
    }

    #[test]
    fn atom_root_is_atom_whatever_the_prefix(prefix in "[a-z]{1,8}") {
        prop_assume!(!prefix.starts_with("xml"));
        let doc = format!(r#"<{p}:feed xmlns:{p}="{ns}"/>"#, p = prefix, ns = ATOM_NS);
        prop_assert_eq!(feedsift::detect(&doc).unwrap(), Dialect::Atom);
    }

    #[test]
    fn rss_version_other_than_2_is_unknown(version in "[0-9]\\.[0-9]{1,2}") {
        prop_assume!(version != "2.0");
        let doc = format!(r#"<rss version="{}"/>"#, version);
        prop_assert!(matches!(
            feedsift::detect(&doc),
            Err(FeedError::UnknownDialect(_))
        ));
    }

    #[test]
    fn unrelated_roots_are_unknown(name in "[a-z][a-z0-9]{0,10}") {
        prop_assume!(name != "rss" && name != "feed" && !name.starts_with("xml"));
        let doc = format!("<{}/>", name);
        prop_assert!(matches!(
            feedsift::detect(&doc),
            Err(FeedError::UnknownDialect(_))
        ));
    }
}

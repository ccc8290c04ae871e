//! Byte-level utilities applied before XML decoding.
//!
//! - **Sanitizing**: removal of XML-illegal control bytes that publishers
//!   leak into otherwise well-formed documents
//!
//! # Examples
//!
//! ```
//! use feedsift::util::clean;
//!
//! assert_eq!(&*clean(b"<title>a\x0bb</title>"), b"<title>ab</title>");
//! ```

mod sanitize;

pub use sanitize::{clean, is_xml_illegal_control, Sanitizer, DEFAULT_STRIP_BYTES};

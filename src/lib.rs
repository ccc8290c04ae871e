//! Dialect detection and normalization for syndication feeds.
//!
//! `feedsift` reads one RSS 1.0, RSS 2.0 or Atom (1.0 and 0.3) document and
//! returns a single canonical [`Feed`] with its [`Article`]s, whatever the
//! source vocabulary was.
//!
//! ```
//! let xml = br#"<?xml version="1.0" encoding="utf-8"?>
//! <feed xmlns="http://www.w3.org/2005/Atom">
//!   <title>Example Feed</title>
//!   <link href="http://example.org/"/>
//!   <entry>
//!     <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
//!     <title>Atom-Powered Robots Run Amok</title>
//!     <summary>Some text.</summary>
//!   </entry>
//! </feed>"#;
//!
//! let feed = feedsift::parse(xml).unwrap();
//! assert_eq!(feed.url, "http://example.org/");
//! assert_eq!(feed.articles[0].content, "<pre>Some text.</pre>");
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod model;
pub mod util;

pub use config::{ConfigError, ParserConfig};
pub use error::{FeedError, FeedResult};
pub use feed::{detect, normalize, parse, Dialect, FeedParser};
pub use model::{Article, Feed};

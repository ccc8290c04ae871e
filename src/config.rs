//! Parser configuration, optionally loaded from a TOML file.
//!
//! The file is optional: a missing or empty file yields
//! `ParserConfig::default()`. Unknown keys are accepted by serde but logged,
//! since they are usually typos.
//!
//! ```toml
//! max_document_bytes = 5242880
//! strip_bytes = [11, 12]
//! dialects = ["rss2.0", "atom"]
//! ```
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::feed::Dialect;
use crate::util::{is_xml_illegal_control, DEFAULT_STRIP_BYTES};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Well-formed TOML with values the parser cannot use.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Settings for a [`crate::FeedParser`].
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Largest accepted document in bytes. 0 = unlimited.
    pub max_document_bytes: u64,

    /// Control bytes removed before decoding. Only XML-illegal C0 bytes are
    /// allowed.
    pub strip_bytes: Vec<u8>,

    /// Dialects the parser accepts. Detected documents of any other dialect
    /// fail with `UnsupportedDialect`.
    pub dialects: Vec<Dialect>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: Self::DEFAULT_MAX_DOCUMENT_BYTES,
            strip_bytes: DEFAULT_STRIP_BYTES.to_vec(),
            dialects: Dialect::ALL.to_vec(),
        }
    }
}

impl ParserConfig {
    /// Default document ceiling (10 MB).
    pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 3] = ["max_document_bytes", "strip_bytes", "dialects"];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(ParserConfig::default())`
    /// - Empty file → `Ok(ParserConfig::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unusable values → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check size before reading so a huge file is never buffered.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::from_toml(&content)?;
        tracing::debug!(
            path = %path.display(),
            max_document_bytes = config.max_document_bytes,
            dialects = config.dialects.len(),
            "Loaded parser configuration"
        );
        Ok(config)
    }

    /// Parses and validates configuration from TOML text. Blank text yields
    /// the defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.iter().any(|known| known == key) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: ParserConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects strip bytes that are legal XML characters and an empty
    /// dialect list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(b) = self
            .strip_bytes
            .iter()
            .find(|&&b| !is_xml_illegal_control(b))
        {
            return Err(ConfigError::Invalid(format!(
                "strip_bytes may only contain XML-illegal control bytes, got 0x{:02X}",
                b
            )));
        }
        if self.dialects.is_empty() {
            return Err(ConfigError::Invalid(
                "dialects must name at least one dialect".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether documents of `dialect` are accepted.
    pub fn accepts(&self, dialect: Dialect) -> bool {
        self.dialects.contains(&dialect)
    }
}

// ============================================================================
// Tests
// ============================================================================

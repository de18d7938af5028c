//! Error type shared by the loading, building and conversion layers.

use std::io;

/// Errors surfaced while loading mapping data or building a locale dictionary.
///
/// Conversion itself never fails for an unknown locale tag; the only way
/// [`crate::ZhConverter::convert`] returns an error is when the mapping data
/// for the requested locale turns out to be corrupt.
#[derive(Debug, thiserror::Error)]
pub enum ZhConvError {
    /// The resource could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON, CBOR or Zstd decoding failed, or the document root is not a mapping.
    #[error("parse error: {0}")]
    Parse(String),

    /// File extension not recognised by [`crate::RuleData::from_path`].
    #[error("unsupported dictionary format: {0}")]
    UnsupportedFormat(String),

    /// A rule set that was merged is not a `source -> replacement` mapping.
    #[error("rule set `{rule_set}` is not a mapping")]
    InvalidRuleSet { rule_set: String },

    /// A merged entry has a non-string replacement.
    #[error("rule set `{rule_set}` has a non-string replacement for `{key}`")]
    InvalidDictionaryEntry { rule_set: String, key: String },

    /// Returned by `Locale::from_str` only.
    #[error("unsupported locale tag: {0}")]
    UnsupportedLocale(String),
}

impl From<serde_json::Error> for ZhConvError {
    fn from(err: serde_json::Error) -> Self {
        ZhConvError::Parse(err.to_string())
    }
}

impl From<serde_cbor::Error> for ZhConvError {
    fn from(err: serde_cbor::Error) -> Self {
        ZhConvError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ZhConvError>;

//! Raw mapping data: named rule sets of `source -> replacement` terms.
//!
//! [`RuleData`] is the "load once, then hold immutable" resource the
//! dictionary builder reads from. It is normally loaded from a JSON file
//! shaped like
//!
//! ```json
//! { "zh2Hans": { "壯": "壮", "軟體": "软件" }, "zh2CN": { ... } }
//! ```
//!
//! or from the compact Zstd-compressed CBOR form written by
//! [`RuleData::save_cbor_compressed`].
//!
//! Values are kept as untyped documents; whether a rule set really is a
//! `string -> string` mapping is only checked when a locale that uses it is
//! built (see [`crate::dictionary_lib::build_dictionary`]).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_cbor::{from_reader, from_slice};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;
use zstd::{decode_all, Decoder, Encoder};

use crate::error::{Result, ZhConvError};

/// Default Zstd level used by the `pack` tooling.
pub const DEFAULT_ZSTD_LEVEL: i32 = 19;

/// Immutable table of rule sets keyed by rule-set identifier.
///
/// Serializes as the bare `{ id: mapping }` document.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleData {
    rule_sets: FxHashMap<String, Value>,
}

impl RuleData {
    /// Builds rule data from already-parsed `(id, mapping)` pairs.
    ///
    /// Later pairs with the same id replace earlier ones.
    pub fn from_rule_sets<I, K>(rule_sets: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            rule_sets: rule_sets.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Parses a JSON document whose root is an object of rule sets.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        Self::from_root(root)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let root: Value = serde_json::from_slice(bytes)?;
        Self::from_root(root)
    }

    /// Parses a raw CBOR document with the same shape as the JSON form.
    pub fn from_cbor_slice(bytes: &[u8]) -> Result<Self> {
        let root: Value = from_slice(bytes)?;
        Self::from_root(root)
    }

    /// Decompresses Zstd and parses the CBOR document inside.
    pub fn from_zstd_slice(bytes: &[u8]) -> Result<Self> {
        let decompressed = decode_all(Cursor::new(bytes))
            .map_err(|err| ZhConvError::Parse(format!("failed to decompress Zstd: {}", err)))?;
        Self::from_cbor_slice(&decompressed)
    }

    /// Loads rule data from disk, picking the decoder from the file extension:
    /// `.json`, `.cbor`, or `.zst` / `.zstd` (compressed CBOR).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let data = match ext.as_str() {
            "json" => Self::from_json_slice(&fs::read(path)?)?,
            "cbor" => Self::from_cbor_slice(&fs::read(path)?)?,
            "zst" | "zstd" => {
                let reader = BufReader::new(File::open(path)?);
                let mut decoder = Decoder::new(reader)?;
                let root: Value = from_reader(&mut decoder)?;
                Self::from_root(root)?
            }
            _ => {
                return Err(ZhConvError::UnsupportedFormat(
                    path.to_string_lossy().into_owned(),
                ))
            }
        };

        tracing::info!(
            path = %path.display(),
            rule_sets = data.len(),
            "loaded conversion rule data"
        );
        Ok(data)
    }

    fn from_root(root: Value) -> Result<Self> {
        match root {
            Value::Object(map) => Ok(Self {
                rule_sets: map.into_iter().collect(),
            }),
            other => Err(ZhConvError::Parse(format!(
                "rule data root must be a mapping, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Writes the data as Zstd-compressed CBOR.
    ///
    /// Buffered output is flushed and synced before returning, so a failed
    /// write surfaces as [`ZhConvError::Io`] instead of a truncated file.
    pub fn save_cbor_compressed<P: AsRef<Path>>(&self, path: P, level: i32) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let mut encoder = Encoder::new(writer, level)?;
        serde_cbor::to_writer(&mut encoder, self)?;
        let mut writer = encoder.finish()?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|err| err.into_error())?;
        file.sync_all()?;
        Ok(())
    }

    /// Looks up a rule set; `None` when absent.
    #[inline]
    pub fn rule_set(&self, id: &str) -> Option<&Value> {
        self.rule_sets.get(id)
    }

    /// Rule-set identifiers in sorted order.
    pub fn rule_set_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rule_sets.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_root_must_be_object() {
        let err = RuleData::from_json_str(r#"["zh2Hans"]"#).unwrap_err();
        assert!(matches!(err, ZhConvError::Parse(msg) if msg.contains("an array")));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = RuleData::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ZhConvError::Parse(_)));
    }

    #[test]
    fn lookup_by_id() {
        let data = RuleData::from_json_str(r#"{"zh2Hans": {"壯": "壮"}, "zh2CN": {}}"#).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.rule_set_ids(), vec!["zh2CN", "zh2Hans"]);
        assert_eq!(data.rule_set("zh2Hans"), Some(&json!({"壯": "壮"})));
        assert!(data.rule_set("zh2TW").is_none());
    }

    #[test]
    fn cbor_matches_json() {
        let source = json!({"zh2Hant": {"汉": "漢", "发展": "發展"}});
        let bytes = serde_cbor::to_vec(&source).unwrap();
        let data = RuleData::from_cbor_slice(&bytes).unwrap();
        assert_eq!(data.rule_set("zh2Hant"), source.get("zh2Hant"));
    }

    #[test]
    fn serializes_as_bare_document() {
        let data = RuleData::from_rule_sets([("zh2TW", json!({"软件": "軟體"}))]);
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value, json!({"zh2TW": {"软件": "軟體"}}));
        let back: RuleData = serde_json::from_value(value).unwrap();
        assert_eq!(back.rule_set("zh2TW"), data.rule_set("zh2TW"));
    }

    #[test]
    fn garbage_zstd_is_parse_error() {
        let err = RuleData::from_zstd_slice(b"definitely not zstd").unwrap_err();
        assert!(matches!(err, ZhConvError::Parse(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = RuleData::from_path("rules.txt").unwrap_err();
        assert!(matches!(err, ZhConvError::UnsupportedFormat(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_is_reported() {
        let data = RuleData::from_rule_sets([("zh2Hans", json!({"壯": "壮"}))]);
        let err = data.save_cbor_compressed("/dev/full", 3).unwrap_err();
        assert!(matches!(err, ZhConvError::Io(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RuleData::from_path("no/such/dir/zhcdict.json").unwrap_err();
        assert!(matches!(err, ZhConvError::Io(_)));
    }
}

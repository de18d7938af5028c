//! Chinese script and regional variant conversion.
//!
//! Text is rewritten by greedy longest match against a per-locale dictionary
//! merged from named rule sets (`zh2Hans`, `zh2Hant`, `zh2CN`, `zh2TW`,
//! `zh2HK`, `zh2SG`). Dictionaries are built lazily, once per locale, and
//! cached by the [`ZhConverter`] that owns the rule data.
//!
//! ```
//! use serde_json::json;
//! use zhconv::{RuleData, ZhConverter};
//!
//! let rules = RuleData::from_rule_sets([
//!     ("zh2Hans", json!({"壯": "壮", "軟": "软", "體": "体"})),
//!     ("zh2CN", json!({"軟體": "软件"})),
//! ]);
//! let converter = ZhConverter::new(rules);
//!
//! assert_eq!(converter.convert("函谷壯皇居", "zh-cn").unwrap(), "函谷壮皇居");
//! assert_eq!(converter.convert("軟體", "zh-cn").unwrap(), "软件");
//! // `zh` and unknown tags leave the text untouched.
//! assert_eq!(converter.convert("軟體", "zh").unwrap(), "軟體");
//! assert_eq!(converter.convert("軟體", "en-us").unwrap(), "軟體");
//! ```

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

pub mod delimiter_set;
pub mod dictionary_lib;
pub mod error;
pub mod locale;
pub mod scanner;
pub mod utils;

pub use crate::dictionary_lib::{DictCache, LocaleDict, RuleData};
pub use crate::error::{Result, ZhConvError};
pub use crate::locale::{is_supported, Locale};

static STRIP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[!-/:-@\[-`{-~\t\n\v\f\r 0-9A-Za-z_]").expect("strip pattern is valid")
});

/// Bytes of stripped text inspected by [`ZhConverter::detect_script`].
const DETECT_MAX_BYTES: usize = 200;

/// Converts `input` to the locale named by `tag`, using `rules` and an
/// explicit dictionary `cache`.
///
/// `zh` and unrecognised tags return the input unchanged without touching
/// the cache.
pub fn convert(input: &str, tag: &str, rules: &RuleData, cache: &DictCache) -> Result<String> {
    match Locale::from_tag(tag) {
        Some(locale) => convert_locale(input, locale, rules, cache),
        None => Ok(input.to_string()),
    }
}

/// Same as [`convert`] with an already-parsed [`Locale`].
pub fn convert_locale(
    input: &str,
    locale: Locale,
    rules: &RuleData,
    cache: &DictCache,
) -> Result<String> {
    if locale == Locale::Zh {
        return Ok(input.to_string());
    }
    let dict = cache.get_or_build(rules, locale)?;
    Ok(scanner::convert_str(input, &dict))
}

/// Result of [`ZhConverter::detect_script`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Nothing in the text changes under either script conversion.
    Unknown,
    Traditional,
    Simplified,
}

/// Owns the rule data and the per-locale dictionary cache.
///
/// `ZhConverter` is `Send + Sync`; share it behind an `Arc` or a `static`
/// to convert from many threads against the same cached dictionaries.
pub struct ZhConverter {
    rules: Arc<RuleData>,
    cache: DictCache,
    is_parallel: bool,
}

impl ZhConverter {
    pub fn new(rules: RuleData) -> Self {
        Self::with_shared_rules(Arc::new(rules))
    }

    /// Builds a converter over rule data shared with other owners.
    pub fn with_shared_rules(rules: Arc<RuleData>) -> Self {
        ZhConverter {
            rules,
            cache: DictCache::new(),
            is_parallel: true,
        }
    }

    /// Loads rule data from `path` (see [`RuleData::from_path`]).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(RuleData::from_path(path)?))
    }

    pub fn rules(&self) -> &RuleData {
        &self.rules
    }

    pub fn set_parallel(&mut self, is_parallel: bool) {
        self.is_parallel = is_parallel;
    }

    pub fn get_parallel(&self) -> bool {
        self.is_parallel
    }

    /// Converts `input` to the locale named by `tag`.
    ///
    /// `zh` and unsupported tags return the input unchanged. An error is only
    /// returned when the rule data for the locale is malformed.
    pub fn convert(&self, input: &str, tag: &str) -> Result<String> {
        match Locale::from_tag(tag) {
            Some(locale) => self.convert_to(input, locale),
            None => Ok(input.to_string()),
        }
    }

    pub fn convert_to(&self, input: &str, locale: Locale) -> Result<String> {
        if locale == Locale::Zh {
            return Ok(input.to_string());
        }
        let dict = self.dictionary(locale)?;
        if self.is_parallel {
            Ok(scanner::convert_str_parallel(input, &dict))
        } else {
            Ok(scanner::convert_str(input, &dict))
        }
    }

    /// Converts every input on the rayon pool, preserving order.
    pub fn convert_batch(&self, inputs: &[&str], tag: &str) -> Result<Vec<String>> {
        let Some(locale) = Locale::from_tag(tag).filter(|l| *l != Locale::Zh) else {
            return Ok(inputs.iter().map(|s| s.to_string()).collect());
        };
        let dict = self.dictionary(locale)?;
        Ok(inputs
            .par_iter()
            .map(|input| scanner::convert_str(input, &dict))
            .collect())
    }

    /// Returns the merged dictionary for `locale`, building it on first use.
    pub fn dictionary(&self, locale: Locale) -> Result<Arc<LocaleDict>> {
        self.cache.get_or_build(&self.rules, locale)
    }

    /// Builds the listed locales' dictionaries up front, in parallel.
    pub fn warm_up(&self, locales: &[Locale]) -> Result<()> {
        locales
            .par_iter()
            .filter(|l| **l != Locale::Zh)
            .try_for_each(|l| self.dictionary(*l).map(|_| ()))
    }

    pub fn cache(&self) -> &DictCache {
        &self.cache
    }

    /// Guesses whether `input` is written in Traditional or Simplified script.
    ///
    /// ASCII punctuation, digits, letters and whitespace are stripped and the
    /// first 200 bytes of what remains are inspected: text that changes when
    /// converted to `zh-hans` is Traditional, text that changes when
    /// converted to `zh-hant` is Simplified.
    pub fn detect_script(&self, input: &str) -> Result<ScriptKind> {
        if input.is_empty() {
            return Ok(ScriptKind::Unknown);
        }
        let stripped = STRIP_REGEX.replace_all(input, "");
        let max_bytes = utils::find_max_utf8_length(&stripped, DETECT_MAX_BYTES);
        let sample = &stripped[..max_bytes];
        if sample.is_empty() {
            return Ok(ScriptKind::Unknown);
        }

        let to_hans = self.dictionary(Locale::ZhHans)?;
        if sample != scanner::convert_str(sample, &to_hans) {
            return Ok(ScriptKind::Traditional);
        }
        let to_hant = self.dictionary(Locale::ZhHant)?;
        if sample != scanner::convert_str(sample, &to_hant) {
            return Ok(ScriptKind::Simplified);
        }
        Ok(ScriptKind::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn converter() -> ZhConverter {
        ZhConverter::new(RuleData::from_rule_sets([
            ("zh2Hans", json!({"龍": "龙", "馬": "马"})),
            ("zh2Hant", json!({"龙": "龍", "马": "馬"})),
        ]))
    }

    #[test]
    fn is_parallel_test() {
        let mut converter = converter();
        assert!(converter.get_parallel());
        converter.set_parallel(false);
        assert!(!converter.get_parallel());
    }

    #[test]
    fn free_function_uses_given_cache() {
        let rules = converter().rules().clone();
        let cache = DictCache::new();
        assert_eq!(convert("龍馬精神", "zh-hans", &rules, &cache).unwrap(), "龙马精神");
        assert!(cache.is_built(Locale::ZhHans));
        assert_eq!(convert("龍馬精神", "zh", &rules, &cache).unwrap(), "龍馬精神");
        assert_eq!(convert("龍馬精神", "xx", &rules, &cache).unwrap(), "龍馬精神");
        assert!(!cache.is_built(Locale::Zh));
    }

    #[test]
    fn detect_script_test() {
        let converter = converter();
        assert_eq!(converter.detect_script("龍馬精神!").unwrap(), ScriptKind::Traditional);
        assert_eq!(converter.detect_script("龙马精神").unwrap(), ScriptKind::Simplified);
        assert_eq!(converter.detect_script("精神 abc").unwrap(), ScriptKind::Unknown);
        assert_eq!(converter.detect_script("abc 123").unwrap(), ScriptKind::Unknown);
        assert_eq!(converter.detect_script("").unwrap(), ScriptKind::Unknown);
    }

    #[test]
    fn batch_preserves_order() {
        let converter = converter();
        let out = converter.convert_batch(&["龍", "馬", "人"], "zh-hans").unwrap();
        assert_eq!(out, vec!["龙", "马", "人"]);
        let same = converter.convert_batch(&["龍"], "zh").unwrap();
        assert_eq!(same, vec!["龍"]);
    }

    #[test]
    fn warm_up_builds_requested_locales() {
        let converter = converter();
        converter.warm_up(&[Locale::Zh, Locale::ZhHans, Locale::ZhTw]).unwrap();
        assert!(converter.cache().is_built(Locale::ZhHans));
        assert!(converter.cache().is_built(Locale::ZhTw));
        assert!(!converter.cache().is_built(Locale::Zh));
        assert!(!converter.cache().is_built(Locale::ZhCn));
    }

    #[test]
    fn converter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ZhConverter>();
    }
}

//! Per-locale merged dictionary and its prefix index.
//!
//! [`Dictionary`] stores `source -> replacement` with keys held as
//! `Box<[char]>`, so the scanner can probe `&[char]` windows of the input
//! directly without building intermediate `String`s. [`PrefixSet`] holds
//! every non-empty prefix of every key and tells the scanner whether
//! extending the current window can still reach a key.
//!
//! Both are always built together into a [`LocaleDict`].

use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;
use std::time::Instant;

use crate::dictionary_lib::rule_data::{json_kind, RuleData};
use crate::error::{Result, ZhConvError};
use crate::locale::Locale;

/// Flat `source -> replacement` mapping merged from one or more rule sets.
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    /// Keys are code-point slices; lookups take `&[char]`.
    pub map: FxHashMap<Box<[char]>, Box<str>>,

    /// Longest key, in characters. `0` when empty.
    pub max_len: usize,
}

impl Dictionary {
    /// Builds a dictionary from `(source, replacement)` pairs.
    ///
    /// Duplicate keys are **last-wins**. Empty keys are dropped since the
    /// scanner can never match them.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Box<str>>,
    {
        let mut dict = Self::default();
        for (k, v) in pairs {
            dict.insert(k.as_ref(), v.into());
        }
        dict
    }

    fn insert(&mut self, key: &str, value: Box<str>) {
        let chars: Box<[char]> = key.chars().collect::<Vec<_>>().into_boxed_slice();
        if chars.is_empty() {
            return;
        }
        self.max_len = self.max_len.max(chars.len());
        self.map.insert(chars, value);
    }

    #[inline]
    pub fn get(&self, key: &[char]) -> Option<&str> {
        self.map.get(key).map(|v| v.as_ref())
    }

    /// Convenience lookup by `&str` (allocates; not for hot paths).
    pub fn get_str(&self, key: &str) -> Option<&str> {
        let chars: Vec<char> = key.chars().collect();
        self.get(&chars)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Every non-empty prefix (full key included) of every dictionary key.
#[derive(Debug, Default, Clone)]
pub struct PrefixSet {
    prefixes: FxHashSet<Box<[char]>>,
}

impl PrefixSet {
    /// `true` if some dictionary key starts with `fragment`.
    #[inline]
    pub fn contains(&self, fragment: &[char]) -> bool {
        self.prefixes.contains(fragment)
    }

    pub fn contains_str(&self, fragment: &str) -> bool {
        let chars: Vec<char> = fragment.chars().collect();
        self.contains(&chars)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Merges the rule sets named in `rule_set_ids`, in order, into one dictionary.
///
/// - Ids missing from `rules` are skipped.
/// - For a source term defined by several rule sets, the **last** rule set
///   processed wins.
/// - A merged rule set that is not a mapping fails with
///   [`ZhConvError::InvalidRuleSet`]; a non-string replacement fails with
///   [`ZhConvError::InvalidDictionaryEntry`].
///
/// # Example
/// ```
/// use serde_json::json;
/// use zhconv::dictionary_lib::build_dictionary;
/// use zhconv::RuleData;
///
/// let rules = RuleData::from_rule_sets([
///     ("A", json!({"甲": "X", "乙": "Z"})),
///     ("B", json!({"甲": "Y"})),
/// ]);
/// let dict = build_dictionary(&rules, &["A", "missing", "B"]).unwrap();
/// assert_eq!(dict.get_str("甲"), Some("Y"));
/// assert_eq!(dict.get_str("乙"), Some("Z"));
/// ```
pub fn build_dictionary(rules: &RuleData, rule_set_ids: &[&str]) -> Result<Dictionary> {
    let mut dict = Dictionary::default();

    for &id in rule_set_ids {
        let Some(rule_set) = rules.rule_set(id) else {
            tracing::debug!(rule_set = id, "rule set not present, skipped");
            continue;
        };
        let Value::Object(entries) = rule_set else {
            return Err(ZhConvError::InvalidRuleSet {
                rule_set: id.to_string(),
            });
        };

        dict.map.reserve(entries.len());
        for (key, value) in entries {
            match value {
                Value::String(replacement) => dict.insert(key, replacement.as_str().into()),
                other => {
                    tracing::error!(
                        rule_set = id,
                        key = key.as_str(),
                        found = json_kind(other),
                        "non-string replacement in rule data"
                    );
                    return Err(ZhConvError::InvalidDictionaryEntry {
                        rule_set: id.to_string(),
                        key: key.clone(),
                    });
                }
            }
        }
    }

    Ok(dict)
}

/// Collects every non-empty prefix of every key in `dictionary`.
///
/// For a key of `n` characters all `n` prefixes are inserted, the key itself
/// included.
pub fn build_prefix_set(dictionary: &Dictionary) -> PrefixSet {
    let mut prefixes: FxHashSet<Box<[char]>> = FxHashSet::default();
    prefixes.reserve(dictionary.len() * 2);

    for key in dictionary.map.keys() {
        for end in 1..=key.len() {
            let prefix = &key[..end];
            if !prefixes.contains(prefix) {
                prefixes.insert(Box::from(prefix));
            }
        }
    }

    PrefixSet { prefixes }
}

/// A locale's dictionary together with its prefix set.
///
/// Built in one step and shared as `Arc<LocaleDict>`, so a reader never sees
/// one without the other.
#[derive(Debug, Default)]
pub struct LocaleDict {
    pub dictionary: Dictionary,
    pub prefixes: PrefixSet,
    /// Every character that occurs anywhere in a key. A character outside
    /// this set cannot be part of any match.
    pub key_chars: FxHashSet<char>,
}

impl LocaleDict {
    /// Builds the dictionary for `locale` from its rule-set chain.
    pub fn build(rules: &RuleData, locale: Locale) -> Result<Self> {
        let started = Instant::now();
        let dictionary = build_dictionary(rules, locale.resolve_chain())?;
        let built = Self::from_dictionary(dictionary);

        tracing::debug!(
            locale = locale.as_str(),
            entries = built.dictionary.len(),
            prefixes = built.prefixes.len(),
            max_len = built.dictionary.max_len,
            elapsed_us = started.elapsed().as_micros() as u64,
            "built locale dictionary"
        );
        Ok(built)
    }

    /// Derives the prefix index and key characters for an existing dictionary.
    pub fn from_dictionary(dictionary: Dictionary) -> Self {
        let prefixes = build_prefix_set(&dictionary);
        let key_chars = dictionary
            .map
            .keys()
            .flat_map(|k| k.iter().copied())
            .collect();
        Self {
            dictionary,
            prefixes,
            key_chars,
        }
    }

    /// `true` if `c` appears in no key at all.
    #[inline]
    pub fn is_inert(&self, c: char) -> bool {
        !self.key_chars.contains(&c)
    }
}

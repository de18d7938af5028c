//! Dictionary layer: raw rule data, merged per-locale dictionaries with their
//! prefix index, and the per-locale cache.
//!
//! Users normally go through [`crate::ZhConverter`]; the pieces here are
//! public for callers that want to manage the cache or inspect a merged
//! dictionary themselves.

mod dict_cache;
mod locale_dict;
mod rule_data;

pub use dict_cache::DictCache;
pub use locale_dict::{build_dictionary, build_prefix_set, Dictionary, LocaleDict, PrefixSet};
pub use rule_data::{RuleData, DEFAULT_ZSTD_LEVEL};

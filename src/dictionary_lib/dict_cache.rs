//! Per-locale cache of built [`LocaleDict`]s.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::dictionary_lib::{LocaleDict, RuleData};
use crate::error::Result;
use crate::locale::Locale;

/// One lazily-initialised slot per distinct rule-set chain.
///
/// Locales sharing a chain (`zh-hk`/`zh-mo`, `zh-sg`/`zh-my`) share one
/// dictionary.
/// Each slot is initialised at most once (`OnceCell::get_or_try_init`), and
/// publishes the dictionary and its prefix set together as a single
/// `Arc<LocaleDict>`. Slots are independent: building one locale does not
/// block readers of another. A failed build leaves its slot empty.
#[derive(Debug, Default)]
pub struct DictCache {
    slots: [OnceCell<Arc<LocaleDict>>; Locale::CACHE_SLOTS],
}

impl DictCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached dictionary for `locale`, building it from `rules`
    /// on first use.
    pub fn get_or_build(&self, rules: &RuleData, locale: Locale) -> Result<Arc<LocaleDict>> {
        self.slots[locale.cache_slot()]
            .get_or_try_init(|| LocaleDict::build(rules, locale).map(Arc::new))
            .cloned()
    }

    /// Returns the dictionary only if it has already been built.
    #[inline]
    pub fn get(&self, locale: Locale) -> Option<Arc<LocaleDict>> {
        self.slots[locale.cache_slot()].get().cloned()
    }

    pub fn is_built(&self, locale: Locale) -> bool {
        self.slots[locale.cache_slot()].get().is_some()
    }

    /// Drops every cached dictionary; they are rebuilt lazily on next use.
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

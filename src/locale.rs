//! Locale tags and the rule-set chains merged for each of them.

use std::fmt;
use std::str::FromStr;

use crate::error::ZhConvError;

/// Script rule sets.
pub const ZH2HANS: &str = "zh2Hans";
pub const ZH2HANT: &str = "zh2Hant";
/// Regional term rule sets.
pub const ZH2CN: &str = "zh2CN";
pub const ZH2TW: &str = "zh2TW";
pub const ZH2HK: &str = "zh2HK";
pub const ZH2SG: &str = "zh2SG";

/// One of the nine recognised Chinese locale tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    /// `zh`, the generic tag. Converting to it is the identity.
    Zh,
    /// `zh-cn`, mainland China.
    ZhCn,
    /// `zh-hk`, Hong Kong.
    ZhHk,
    /// `zh-tw`, Taiwan.
    ZhTw,
    /// `zh-sg`, Singapore.
    ZhSg,
    /// `zh-my`, Malaysia.
    ZhMy,
    /// `zh-mo`, Macau.
    ZhMo,
    /// `zh-hant`, generic Traditional script.
    ZhHant,
    /// `zh-hans`, generic Simplified script.
    ZhHans,
}

impl Locale {
    pub const COUNT: usize = 9;

    pub const ALL: [Locale; Locale::COUNT] = [
        Locale::Zh,
        Locale::ZhCn,
        Locale::ZhHk,
        Locale::ZhTw,
        Locale::ZhSg,
        Locale::ZhMy,
        Locale::ZhMo,
        Locale::ZhHant,
        Locale::ZhHans,
    ];

    /// Parses an exact, lower-case tag such as `"zh-tw"`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "zh" => Some(Locale::Zh),
            "zh-cn" => Some(Locale::ZhCn),
            "zh-hk" => Some(Locale::ZhHk),
            "zh-tw" => Some(Locale::ZhTw),
            "zh-sg" => Some(Locale::ZhSg),
            "zh-my" => Some(Locale::ZhMy),
            "zh-mo" => Some(Locale::ZhMo),
            "zh-hant" => Some(Locale::ZhHant),
            "zh-hans" => Some(Locale::ZhHans),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::ZhCn => "zh-cn",
            Locale::ZhHk => "zh-hk",
            Locale::ZhTw => "zh-tw",
            Locale::ZhSg => "zh-sg",
            Locale::ZhMy => "zh-my",
            Locale::ZhMo => "zh-mo",
            Locale::ZhHant => "zh-hant",
            Locale::ZhHans => "zh-hans",
        }
    }

    /// Rule-set identifiers merged to build this locale's dictionary.
    ///
    /// The script rule set comes first and the regional term rule set last,
    /// so regional terms override script-level mappings of the same source.
    /// `zh` resolves to nothing.
    pub fn resolve_chain(&self) -> &'static [&'static str] {
        match self {
            Locale::Zh => &[],
            Locale::ZhCn => &[ZH2HANS, ZH2CN],
            Locale::ZhTw => &[ZH2HANT, ZH2TW],
            Locale::ZhHk | Locale::ZhMo => &[ZH2HANT, ZH2HK],
            Locale::ZhSg | Locale::ZhMy => &[ZH2HANS, ZH2SG],
            Locale::ZhHant => &[ZH2HANT],
            Locale::ZhHans => &[ZH2HANS],
        }
    }

    /// Locale fallback order, most specific first, always ending in `zh`.
    pub fn fallbacks(&self) -> &'static [Locale] {
        use Locale::*;
        match self {
            ZhCn => &[ZhCn, ZhHans, ZhSg, Zh],
            ZhHk => &[ZhHk, ZhHant, ZhTw, Zh],
            ZhTw => &[ZhTw, ZhHant, ZhHk, Zh],
            ZhSg => &[ZhSg, ZhHans, ZhCn, Zh],
            ZhMy => &[ZhMy, ZhSg, ZhHans, ZhCn, Zh],
            ZhMo => &[ZhMo, ZhHk, ZhHant, ZhTw, Zh],
            ZhHant => &[ZhHant, ZhTw, ZhHk, Zh],
            ZhHans => &[ZhHans, ZhCn, ZhSg, Zh],
            Zh => &[Zh],
        }
    }

    /// Distinct rule-set chains, hence distinct dictionaries.
    pub(crate) const CACHE_SLOTS: usize = 7;

    /// Dictionary cache slot. Locales with the same chain share a slot:
    /// `zh-mo` reuses `zh-hk` and `zh-my` reuses `zh-sg`.
    #[inline]
    pub(crate) fn cache_slot(&self) -> usize {
        match self {
            Locale::Zh => 0,
            Locale::ZhCn => 1,
            Locale::ZhHk | Locale::ZhMo => 2,
            Locale::ZhTw => 3,
            Locale::ZhSg | Locale::ZhMy => 4,
            Locale::ZhHant => 5,
            Locale::ZhHans => 6,
        }
    }
}

/// Returns `true` for the nine recognised tags, `zh` included.
pub fn is_supported(tag: &str) -> bool {
    Locale::from_tag(tag).is_some()
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ZhConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_tag(s).ok_or_else(|| ZhConvError::UnsupportedLocale(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_tag(locale.as_str()), Some(locale));
            assert_eq!(locale.to_string().parse::<Locale>().unwrap(), locale);
        }
    }

    #[test]
    fn supported_tags_are_exact() {
        assert!(is_supported("zh"));
        assert!(is_supported("zh-mo"));
        assert!(!is_supported("zh-TW"));
        assert!(!is_supported("en"));
        assert!(!is_supported(""));
        assert!(matches!(
            "ja".parse::<Locale>(),
            Err(ZhConvError::UnsupportedLocale(tag)) if tag == "ja"
        ));
    }

    #[test]
    fn chains_put_regional_rules_last() {
        assert_eq!(Locale::ZhCn.resolve_chain(), &["zh2Hans", "zh2CN"]);
        assert_eq!(Locale::ZhHk.resolve_chain(), &["zh2Hant", "zh2HK"]);
        assert_eq!(Locale::ZhMo.resolve_chain(), Locale::ZhHk.resolve_chain());
        assert_eq!(Locale::ZhMy.resolve_chain(), Locale::ZhSg.resolve_chain());
        assert!(Locale::Zh.resolve_chain().is_empty());
    }

    #[test]
    fn fallbacks_end_in_generic() {
        for locale in Locale::ALL {
            let chain = locale.fallbacks();
            assert_eq!(chain.first(), Some(&locale));
            assert_eq!(chain.last(), Some(&Locale::Zh));
        }
        assert_eq!(
            Locale::ZhMy.fallbacks(),
            &[Locale::ZhMy, Locale::ZhSg, Locale::ZhHans, Locale::ZhCn, Locale::Zh]
        );
    }

    #[test]
    fn cache_slots_follow_chains() {
        for a in Locale::ALL {
            assert!(a.cache_slot() < Locale::CACHE_SLOTS);
            for b in Locale::ALL {
                assert_eq!(
                    a.cache_slot() == b.cache_slot(),
                    a.resolve_chain() == b.resolve_chain(),
                    "{a} / {b}"
                );
            }
        }
    }
}

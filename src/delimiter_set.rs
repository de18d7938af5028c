use once_cell::sync::Lazy;

/// Whitespace plus ASCII and CJK punctuation considered as candidate split
/// points for parallel conversion.
pub const DELIMITERS: &str =
    " \t\n\r!\"#$%&'()*+,-./:;<=>?@[\\]^_{}|~＝、。“”‘’『』「」﹁﹂—－（）《》〈〉？！…／＼︒︑︔︓︿﹀︹︺︙︐［﹇］﹈︕︖︰︳︴︽︾︵︶｛︷｝︸﹃﹄【︻】︼　～．，；：";

/// Bitset over the Basic Multilingual Plane for per-character membership tests.
///
/// Astral characters are never delimiters.
#[derive(Clone)]
pub struct DelimiterSet {
    bmp_bits: Box<[u64; 1024]>,
}

impl DelimiterSet {
    pub fn from_chars(delimiters: &str) -> Self {
        let mut bmp_bits = Box::new([0u64; 1024]);
        for ch in delimiters.chars() {
            let u = ch as u32;
            if u <= 0xFFFF {
                bmp_bits[(u >> 6) as usize] |= 1u64 << (u & 63);
            }
        }
        Self { bmp_bits }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        let u = c as u32;
        if u > 0xFFFF {
            return false;
        }
        (self.bmp_bits[(u >> 6) as usize] >> (u & 63)) & 1 == 1
    }
}

pub static DELIMITER_SET: Lazy<DelimiterSet> = Lazy::new(|| DelimiterSet::from_chars(DELIMITERS));

#[inline]
pub fn is_delimiter(c: char) -> bool {
    DELIMITER_SET.contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_char_is_a_delimiter() {
        for c in DELIMITERS.chars() {
            assert!(is_delimiter(c), "{c:?} should be a delimiter");
        }
    }

    #[test]
    fn han_and_astral_are_not_delimiters() {
        assert!(!is_delimiter('漢'));
        assert!(!is_delimiter('a'));
        assert!(!is_delimiter('𬴂'));
    }
}

//! Greedy longest-match rewriting over a code-point view of the input.

use rayon::prelude::*;

use crate::delimiter_set::is_delimiter;
use crate::dictionary_lib::{Dictionary, LocaleDict, PrefixSet};

/// Inputs shorter than this (in chars) are never split for parallel conversion.
pub const PARALLEL_THRESHOLD: usize = 1000;

/// Rewrites `chars` with the longest dictionary key found at each position.
///
/// At each cursor position the fragment is extended one character at a time
/// for as long as it is still a prefix of some key, remembering the longest
/// fragment that is itself a key. The cursor then jumps past that match, or
/// past a single unchanged character when nothing matched. Positions are
/// never revisited.
pub fn convert_chars(chars: &[char], dictionary: &Dictionary, prefixes: &PrefixSet) -> String {
    let mut result = String::with_capacity(chars.len() * 3);
    let text_length = chars.len();
    let mut pos = 0;

    while pos < text_length {
        let mut best_match: Option<(&str, usize)> = None;
        let mut end = pos + 1;

        while end <= text_length && prefixes.contains(&chars[pos..end]) {
            if let Some(replacement) = dictionary.get(&chars[pos..end]) {
                best_match = Some((replacement, end));
            }
            end += 1;
        }

        match best_match {
            Some((replacement, best_end)) => {
                result.push_str(replacement);
                pos = best_end;
            }
            None => {
                result.push(chars[pos]);
                pos += 1;
            }
        }
    }

    result
}

/// Sequential conversion of a whole string.
pub fn convert_str(text: &str, dict: &LocaleDict) -> String {
    if text.is_empty() || dict.dictionary.is_empty() {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    convert_chars(&chars, &dict.dictionary, &dict.prefixes)
}

/// Parallel conversion: splits after characters no match can span, converts
/// the chunks on the rayon pool and joins them in order.
///
/// A split point is a delimiter that occurs in no dictionary key, so every
/// chunk boundary is also a boundary of the sequential scan and the output is
/// identical to [`convert_str`].
pub fn convert_str_parallel(text: &str, dict: &LocaleDict) -> String {
    if text.is_empty() || dict.dictionary.is_empty() {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < PARALLEL_THRESHOLD {
        return convert_chars(&chars, &dict.dictionary, &dict.prefixes);
    }

    let chunks: Vec<&[char]> = chars
        .split_inclusive(|&c| is_delimiter(c) && dict.is_inert(c))
        .collect();

    let converted: Vec<String> = chunks
        .par_iter()
        .map(|chunk| convert_chars(chunk, &dict.dictionary, &dict.prefixes))
        .collect();

    let mut result = String::with_capacity(text.len());
    for part in &converted {
        result.push_str(part);
    }
    result
}

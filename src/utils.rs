/// Largest byte index `<= max_byte_count` that falls on a UTF-8 character
/// boundary of `sv`, so `&sv[..index]` never panics.
///
/// # Example
/// ```rust
/// use zhconv::utils::find_max_utf8_length;
///
/// let input = "汉字转换测试"; // 3 bytes per character
/// let safe_index = find_max_utf8_length(input, 7);
/// assert_eq!(&input[..safe_index], "汉字");
/// ```
pub fn find_max_utf8_length(sv: &str, max_byte_count: usize) -> usize {
    if sv.len() <= max_byte_count {
        return sv.len();
    }
    let mut byte_count = max_byte_count;
    while byte_count > 0 && !sv.is_char_boundary(byte_count) {
        byte_count -= 1;
    }
    byte_count
}

/// Formats `n` with `,` thousands separators, e.g. for CLI summaries.
pub fn format_thousand(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

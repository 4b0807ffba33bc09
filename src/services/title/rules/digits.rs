/// Replace full-width digits (U+FF10..=U+FF19) with their ASCII forms.
pub fn to_ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{FF10}'..='\u{FF19}' => {
                char::from_digit(c as u32 - 0xFF10, 10).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// True when the whole string is one or more ASCII digits.
pub fn is_pure_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Drops leading zeros, keeping a single "0" for all-zero input.
pub fn canonical_number(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0"
    } else {
        trimmed
    }
}

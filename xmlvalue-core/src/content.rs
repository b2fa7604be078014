//! Character data encoding for the `content` field
//!
//! Text is stored escape-encoded: backslash, double quote, carriage return,
//! tab and newline become their two-character literal forms.

/// Escape text for storage in a `content` field
pub fn encode_content(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`encode_content`].
///
/// Unknown escapes are kept as written.
pub fn decode_content(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// True if the text holds nothing but CR, TAB, LF and spaces
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| matches!(c, '\r' | '\t' | '\n' | ' '))
}

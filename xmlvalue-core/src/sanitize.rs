//! Strip characters that XML 1.0 does not allow
//!
//! Legal: `#x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]`.
//! Scraped HTML and log output regularly carry stray control characters that
//! make an otherwise fine document fail to tokenize.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static ILLEGAL_XML_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\x09\x0A\x0D\x20-\x{D7FF}\x{E000}-\x{FFFD}\x{10000}-\x{10FFFF}]").unwrap()
});

/// Remove every character that may not appear in an XML document
pub fn xml_legal_string(input: &str) -> Cow<'_, str> {
    ILLEGAL_XML_CHARS.replace_all(input, "")
}

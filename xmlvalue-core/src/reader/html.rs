//! HTML element tables used by lenient mode

/// Elements that never have content or an end tag
pub static VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
    // Obsolete, still seen in the wild
    "basefont", "bgsound", "frame", "keygen",
];

/// Check if an element is void (case-insensitive)
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

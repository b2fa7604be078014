//! Path-addressable tree value
//!
//! Documents are held in a `serde_json::Value`. Objects keep their keys in
//! insertion order (`preserve_order`), arrays hold ordered children, and a
//! sequence of [`PathKey`]s addresses any region of the tree.
//!
//! Scalars are compared through [`scalar_string`], which maps strings and
//! numbers with the same textual form onto the same canonical string.

use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::fmt;

/// One step of a path into the tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// Object member
    Key(String),
    /// Array element
    Index(usize),
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        PathKey::Key(key)
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Key(key) => write!(f, "{}", key),
            PathKey::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Format a path as `elements[0].elements[2].name` for diagnostics
pub fn display_path(path: &[PathKey]) -> String {
    let mut out = String::new();
    for key in path {
        if let PathKey::Key(_) = key {
            if !out.is_empty() {
                out.push('.');
            }
        }
        out.push_str(&key.to_string());
    }
    out
}

/// Read the value at `path`, or `None` if any step is missing or has the wrong shape
pub fn value_at<'a>(root: &'a Value, path: &[PathKey]) -> Option<&'a Value> {
    path.iter().try_fold(root, |current, key| match key {
        PathKey::Key(k) => current.as_object()?.get(k),
        PathKey::Index(i) => current.as_array()?.get(*i),
    })
}

/// Read the array at `path`; anything else reads as an empty slice
pub fn array_at<'a>(root: &'a Value, path: &[PathKey]) -> &'a [Value] {
    value_at(root, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Write `value` at `path`, creating intermediate objects and arrays.
///
/// A step that meets a value of the wrong shape replaces it. Writing past
/// the end of an array pads it with nulls.
pub fn set_value_at(root: &mut Value, path: &[PathKey], value: Value) {
    let mut current = root;
    for key in path {
        current = match key {
            PathKey::Key(k) => object_mut(current)
                .entry(k.clone())
                .or_insert(Value::Null),
            PathKey::Index(i) => {
                let items = array_mut(current);
                if items.len() <= *i {
                    items.resize(*i + 1, Value::Null);
                }
                &mut items[*i]
            }
        };
    }
    *current = value;
}

fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}

fn array_mut(value: &mut Value) -> &mut Vec<Value> {
    if !value.is_array() {
        *value = Value::Array(Vec::new());
    }
    match value {
        Value::Array(items) => items,
        _ => unreachable!("value was just replaced by an array"),
    }
}

/// Canonical string form of a scalar.
///
/// Numbers, and strings that spell a number, are normalized so that `2`,
/// `2.0`, `"2"` and `"02"` all read as `"2"`. Normalization never loses
/// digits: integer spellings keep their full width, and a fractional or
/// exponent spelling is only rewritten when an `f64` holds it exactly.
/// Booleans read as `"true"`/`"false"`. Null, arrays and objects read as the
/// empty string.
pub fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => canonical_str(s).into_owned(),
        Value::Number(n) => canonical_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Canonical form of a string: numeric spellings are normalized, anything else is unchanged
pub fn canonical_str(s: &str) -> Cow<'_, str> {
    if !looks_numeric(s) {
        return Cow::Borrowed(s);
    }
    if let Some(integer) = canonical_integer(s) {
        return Cow::Owned(integer);
    }
    if significant_digits(s) > f64::DIGITS as usize {
        return Cow::Borrowed(s);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Cow::Owned(format_f64(f)),
        _ => Cow::Borrowed(s),
    }
}

/// Sign plus digits with leading zeros trimmed, at any width
fn canonical_integer(s: &str) -> Option<String> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let trimmed = digits.trim_start_matches('0');
    Some(match (trimmed.is_empty(), negative) {
        (true, _) => "0".to_string(),
        (false, true) => format!("-{}", trimmed),
        (false, false) => trimmed.to_string(),
    })
}

/// Significant decimal digits in the mantissa of a numeric spelling
fn significant_digits(s: &str) -> usize {
    let mantissa = s.split(|c| c == 'e' || c == 'E').next().unwrap_or(s);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}

fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(format_f64).unwrap_or_else(|| n.to_string())
    }
}

fn format_f64(f: f64) -> String {
    // Integral values print without a fractional part so 2.0 == "2"
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Only plain decimal spellings count; `parse::<f64>` alone would also accept "inf" and "NaN".
fn looks_numeric(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().any(|b| b.is_ascii_digit())
        && s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

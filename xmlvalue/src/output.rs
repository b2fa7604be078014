//! Output formatters for query results

use serde::Serialize;
use serde_json::Value;
use xmlvalue_core::Node;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty JSON array of file/node records
    Json,
    /// One compact JSON node per line
    Lines,
    /// Decoded text content of each matched node
    Content,
    /// Number of matches
    Count,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "lines" => Some(OutputFormat::Lines),
            "content" => Some(OutputFormat::Content),
            "count" => Some(OutputFormat::Count),
            _ => None,
        }
    }

    /// Get list of all valid format names
    pub fn valid_formats() -> &'static [&'static str] {
        &["json", "lines", "content", "count"]
    }
}

/// One matched node, detached from the document it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub file: String,
    pub node: Value,
}

impl Match {
    pub fn new(file: impl Into<String>, node: Node<'_>) -> Self {
        Match {
            file: file.into(),
            node: node.value().clone(),
        }
    }
}

/// Format matches according to the specified format
pub fn format_matches(matches: &[Match], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(matches),
        OutputFormat::Lines => format_lines(matches),
        OutputFormat::Content => format_content(matches),
        OutputFormat::Count => format!("{}\n", matches.len()),
    }
}

fn format_json(matches: &[Match]) -> String {
    let mut output = serde_json::to_string_pretty(matches).unwrap_or_else(|_| "[]".to_string());
    output.push('\n');
    output
}

fn format_lines(matches: &[Match]) -> String {
    let mut output = String::new();
    for m in matches {
        output.push_str(&m.node.to_string());
        output.push('\n');
    }
    output
}

fn format_content(matches: &[Match]) -> String {
    let mut output = String::new();
    for m in matches {
        if let Some(text) = Node::new(&m.node).text() {
            output.push_str(&text);
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<Match> {
        let a = json!({"name": "b", "attributes": {"x": "1"}, "content": r"one\ttwo"});
        let b = json!({"name": "b"});
        vec![Match::new("a.xml", Node::new(&a)), Match::new("b.xml", Node::new(&b))]
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("count"), Some(OutputFormat::Count));
        assert_eq!(OutputFormat::from_str("xml"), None);
        for name in OutputFormat::valid_formats() {
            assert!(OutputFormat::from_str(name).is_some());
        }
    }

    #[test]
    fn test_format_json_records() {
        let output = format_matches(&sample(), OutputFormat::Json);
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["file"], "a.xml");
        assert_eq!(parsed[0]["node"]["attributes"]["x"], "1");
        assert_eq!(parsed[1]["node"], json!({"name": "b"}));
    }

    #[test]
    fn test_format_lines_keeps_key_order() {
        let output = format_matches(&sample(), OutputFormat::Lines);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            r#"{"name":"b","attributes":{"x":"1"},"content":"one\\ttwo"}"#
        );
        assert_eq!(lines[1], r#"{"name":"b"}"#);
    }

    #[test]
    fn test_format_content_decodes_and_skips_empty() {
        let output = format_matches(&sample(), OutputFormat::Content);
        assert_eq!(output, "one\ttwo\n");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_matches(&sample(), OutputFormat::Count), "2\n");
        assert_eq!(format_matches(&[], OutputFormat::Count), "0\n");
    }
}

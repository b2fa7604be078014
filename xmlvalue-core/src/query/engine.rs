//! Bounded depth-first search over a document tree

use serde_json::Value;

use super::{Node, Query};
use crate::keys;

/// Find nodes matching `query`, starting at (and including) `root`.
///
/// Results come in document pre-order. Without `recursive`, a matched node's
/// descendants are not searched. The search stops as soon as `max` results
/// are collected. An explicit stack keeps deep documents off the call stack.
pub fn search<'a>(root: &'a Value, query: &Query) -> Vec<Node<'a>> {
    let limit = query.max();
    let mut found = Vec::new();
    if limit == 0 {
        return found;
    }

    let mut stack: Vec<&'a Value> = vec![root];
    while let Some(value) = stack.pop() {
        if query.matches(value) {
            found.push(Node::new(value));
            if found.len() >= limit {
                break;
            }
            if !query.is_recursive() {
                continue;
            }
        }
        if let Some(children) = value.get(keys::ELEMENTS).and_then(Value::as_array) {
            stack.extend(children.iter().rev());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> Value {
        // <r><a id="1"><a id="2"/></a><b><a id="3"/></b><a id="4"/></r>
        json!({
            "name": "r",
            "elements": [
                {"name": "a", "attributes": {"id": "1"}, "elements": [
                    {"name": "a", "attributes": {"id": "2"}}
                ]},
                {"name": "b", "elements": [
                    {"name": "a", "attributes": {"id": "3"}}
                ]},
                {"name": "a", "attributes": {"id": "4"}}
            ]
        })
    }

    fn ids(nodes: &[Node<'_>]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| n.attribute("id").unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_non_recursive_stops_at_match() {
        let t = tree();
        let found = search(&t, &Query::new("a"));
        assert_eq!(ids(&found), vec!["1", "3", "4"]);
    }

    #[test]
    fn test_recursive_includes_descendants_in_preorder() {
        let t = tree();
        let found = search(&t, &Query::new("a").with_recursive(true));
        assert_eq!(ids(&found), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_max_returns_prefix() {
        let t = tree();
        let all = search(&t, &Query::new("a").with_recursive(true));
        for k in 0..=5 {
            let bounded = search(&t, &Query::new("a").with_recursive(true).with_max(k));
            assert!(bounded.len() <= k);
            assert_eq!(ids(&bounded), ids(&all[..bounded.len()]));
            assert_eq!(bounded.len(), k.min(all.len()));
        }
    }

    #[test]
    fn test_root_itself_can_match() {
        let t = tree();
        let found = search(&t, &Query::new("r").with_recursive(true));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), Some("r"));
    }

    #[test]
    fn test_attribute_filter() {
        let t = tree();
        let found = search(&t, &Query::new("a").with_attribute("id", 3));
        assert_eq!(ids(&found), vec!["3"]);
    }

    #[test]
    fn test_missing_name_is_empty() {
        let t = tree();
        assert!(search(&t, &Query::new("missing")).is_empty());
        assert!(search(&Value::Null, &Query::new("a")).is_empty());
    }

    #[test]
    fn test_deep_document_does_not_overflow() {
        let mut value = json!({"name": "leaf"});
        for _ in 0..100_000 {
            let mut node = serde_json::Map::new();
            node.insert("name".to_string(), Value::from("n"));
            node.insert("elements".to_string(), Value::Array(vec![value]));
            value = Value::Object(node);
        }
        let found = search(&value, &Query::new("leaf"));
        assert_eq!(found.len(), 1);
        // serde_json's Drop is recursive; leak the chain instead of dropping it
        std::mem::forget(value);
    }
}

//! Node lookup by tag name and attribute equality
//!
//! Queries never fail: a constraint that cannot match simply yields no
//! nodes, and [`Node::get_one`] returns an empty node on a miss.

mod engine;
mod node;

pub use engine::search;
pub use node::Node;

use serde_json::Value;

use crate::keys;
use crate::value::{canonical_str, scalar_string};

/// A lookup by name and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    name: String,
    /// `name` after scalar coercion, compared against every visited node
    canonical_name: String,
    attributes: Vec<(String, Value)>,
    recursive: bool,
    max: usize,
}

impl Query {
    /// Match nodes named `name`; first match per branch, no limit
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Query {
            canonical_name: canonical_str(&name).into_owned(),
            name,
            attributes: Vec::new(),
            recursive: false,
            max: usize::MAX,
        }
    }

    /// Require an attribute whose value equals `value` after scalar coercion
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_attributes<K, V>(mut self, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Keep searching below a matched node
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Stop after `max` results
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, Value)] {
        &self.attributes
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Check a single node against the name and attribute constraints
    pub fn matches(&self, node: &Value) -> bool {
        let Some(name) = node.get(keys::NAME) else {
            return false;
        };
        if scalar_string(name) != self.canonical_name {
            return false;
        }

        let node_attributes = node.get(keys::ATTRIBUTES);
        self.attributes.iter().all(|(key, expected)| {
            node_attributes
                .and_then(|attrs| attrs.get(key))
                .map_or(false, |actual| scalar_string(actual) == scalar_string(expected))
        })
    }
}

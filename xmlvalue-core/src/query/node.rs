//! Read-only view of one document node

use base64::Engine;
use serde_json::{Map, Value};

use super::{search, Query};
use crate::content::decode_content;
use crate::keys;

static EMPTY: Value = Value::Null;

/// A document node borrowed from a built tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<'a> {
    value: &'a Value,
}

impl<'a> Node<'a> {
    pub fn new(value: &'a Value) -> Self {
        Node { value }
    }

    /// The node returned for lookups that find nothing
    pub fn empty() -> Node<'static> {
        Node { value: &EMPTY }
    }

    /// True for the empty node (or anything that is not an element object)
    pub fn is_empty(&self) -> bool {
        self.value.as_object().map_or(true, Map::is_empty)
    }

    /// The raw tree value at this node
    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn name(&self) -> Option<&'a str> {
        self.str_field(keys::NAME)
    }

    pub fn attributes(&self) -> Option<&'a Map<String, Value>> {
        self.value.get(keys::ATTRIBUTES).and_then(Value::as_object)
    }

    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.attributes()?.get(key)?.as_str()
    }

    /// Direct text content, escape-encoded as stored in the tree
    pub fn content(&self) -> Option<&'a str> {
        self.str_field(keys::CONTENT)
    }

    /// Direct text content with escapes decoded
    pub fn text(&self) -> Option<String> {
        self.content().map(decode_content)
    }

    pub fn namespace_uri(&self) -> Option<&'a str> {
        self.str_field(keys::NAMESPACE_URI)
    }

    pub fn qualified_name(&self) -> Option<&'a str> {
        self.str_field(keys::QUALIFIED_NAME)
    }

    /// Raw CDATA bytes; `None` if absent or not valid base64
    pub fn cdata(&self) -> Option<Vec<u8>> {
        let encoded = self.str_field(keys::CDATA)?;
        base64::engine::general_purpose::STANDARD.decode(encoded).ok()
    }

    /// Child nodes in document order
    pub fn elements(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let value: &'a Value = self.value;
        value
            .get(keys::ELEMENTS)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(Node::new)
    }

    /// All nodes matching `query`, this node included
    pub fn get(&self, query: &Query) -> Vec<Node<'a>> {
        search(self.value, query)
    }

    /// First node matching `query`'s name and attributes, or the empty node.
    ///
    /// The search never descends below a match and stops at the first result,
    /// whatever `query`'s own recursion and limit settings say.
    pub fn get_one(&self, query: &Query) -> Node<'a> {
        let first = query.clone().with_recursive(false).with_max(1);
        search(self.value, &first)
            .into_iter()
            .next()
            .unwrap_or_else(|| Node { value: &EMPTY })
    }

    /// Shorthand for `get_one(&Query::new(name))`
    pub fn get_one_named(&self, name: &str) -> Node<'a> {
        self.get_one(&Query::new(name))
    }

    fn str_field(&self, field: &str) -> Option<&'a str> {
        self.value.get(field).and_then(Value::as_str)
    }
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        Node::new(value)
    }
}

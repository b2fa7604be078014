//! Build an ordered tree value from a stream of markup events
//!
//! Each element becomes an object at a path computed from its ancestors:
//! the root element is written at the root of the tree, every other node at
//! `<parent path>.elements[<sibling index>]`.
//!
//! Sibling indices come from counters keyed by the sequence of ancestor tag
//! names. The counter for a scope is cleared when the element owning it
//! closes, so the next element with the same ancestor names starts again
//! from zero. Two live parents can never share a key: if both are open, one
//! is an ancestor of the other and their ancestor sequences differ in length.
//!
//! Text seen before an element's first child is appended to its `content`.
//! Text seen after that becomes a synthesized `{"name": "content"}` child so
//! document order is kept.
//!
//! The stream must hold exactly one root element. A second root, an
//! unmatched end, or non-blank text or CDATA outside the root is recorded as
//! an error instead of being written over the tree.

use base64::Engine;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::content::{encode_content, is_blank};
use crate::events::{EventSink, TokenizerError, XmlEvent};
use crate::keys;
use crate::value::{array_at, display_path, set_value_at, value_at, PathKey};

/// Streaming builder state for a single parse
pub struct TreeBuilder {
    tree: Value,
    /// Tag names from the root down to the current element
    ancestors: Vec<String>,
    /// Next sibling index per ancestor scope
    sibling_counters: HashMap<Vec<String>, usize>,
    /// Path of the current element
    path: Vec<PathKey>,
    /// First reported error; once set, later events are ignored
    error: Option<TokenizerError>,
    node_count: usize,
}

impl TreeBuilder {
    /// Create a builder with an empty tree
    pub fn new() -> Self {
        TreeBuilder {
            tree: Value::Null,
            ancestors: Vec::new(),
            sibling_counters: HashMap::new(),
            path: Vec::new(),
            error: None,
            node_count: 0,
        }
    }

    /// Open an element and make it the current node
    pub fn start_element(
        &mut self,
        name: &str,
        attributes: &[(String, String)],
        namespace_uri: Option<&str>,
        qualified_name: Option<&str>,
    ) {
        if self.ancestors.is_empty() && !self.tree.is_null() {
            self.reject(format!("element <{}> after the root element", name));
            return;
        }
        let path = self.allocate_child_path();

        self.write(&path, keys::NAME, Value::String(name.to_string()));

        if !attributes.is_empty() {
            let map: Map<String, Value> = attributes
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            self.write(&path, keys::ATTRIBUTES, Value::Object(map));
        }
        if let Some(uri) = namespace_uri {
            self.write(&path, keys::NAMESPACE_URI, Value::String(uri.to_string()));
        }
        if let Some(qname) = qualified_name {
            self.write(&path, keys::QUALIFIED_NAME, Value::String(qname.to_string()));
        }

        self.ancestors.push(name.to_string());
        self.path = path;
        self.node_count += 1;
    }

    /// Store a CDATA block on the current node (last one wins)
    pub fn cdata(&mut self, bytes: &[u8]) {
        if self.ancestors.is_empty() {
            self.reject("CDATA outside the root element");
            return;
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let path = self.path.clone();
        self.write(&path, keys::CDATA, Value::String(encoded));
    }

    /// Add character data to the current node
    pub fn characters(&mut self, text: &str) {
        if is_blank(text) {
            return;
        }
        if self.ancestors.is_empty() {
            self.reject("text outside the root element");
            return;
        }
        let encoded = encode_content(text);
        let current = self.path.clone();

        if self.has_child_elements(&current) {
            // Text after a child element keeps its place as a sibling node.
            // It is never opened, so the ancestor stack and current path stay put.
            let text_path = self.allocate_child_path();
            self.write(&text_path, keys::NAME, Value::String(keys::TEXT_NODE_NAME.to_string()));
            self.write(&text_path, keys::CONTENT, Value::String(encoded));
            self.node_count += 1;
        } else {
            let mut content_path = current.clone();
            content_path.push(PathKey::from(keys::CONTENT));
            let existing = value_at(&self.tree, &content_path)
                .and_then(Value::as_str)
                .unwrap_or("");
            let joined = format!("{}{}", existing, encoded);
            self.write(&current, keys::CONTENT, Value::String(joined));
        }
    }

    /// Close the current element and return to its parent
    pub fn end_element(&mut self, name: &str) {
        if self.ancestors.is_empty() {
            self.reject(format!("end tag </{}> with no open element", name));
            return;
        }
        // The closing element's own children were counted under the full stack
        self.sibling_counters.remove(&self.ancestors);
        self.ancestors.pop();

        if self.path.len() > 1 {
            self.path.truncate(self.path.len() - 2);
        }
    }

    /// Record a tokenizer failure; the first one wins
    pub fn error(&mut self, error: TokenizerError) {
        if self.error.is_none() {
            debug!(position = error.position, message = %error.message, "tokenizer error recorded");
            self.error = Some(error);
        }
    }

    /// Record a structural error found by the builder itself
    fn reject(&mut self, message: impl Into<String>) {
        self.error(TokenizerError::new(0, message));
    }

    /// True once an error has been recorded
    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Number of element and synthesized text nodes written so far
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Consume the builder, returning the tree or the recorded error
    pub fn finish(self) -> Result<Value, TokenizerError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.tree),
        }
    }

    /// Compute the path of the next child of the current element.
    ///
    /// With no open element this is the root itself.
    fn allocate_child_path(&mut self) -> Vec<PathKey> {
        if self.ancestors.is_empty() {
            return Vec::new();
        }
        let counter = self
            .sibling_counters
            .entry(self.ancestors.clone())
            .or_insert(0);
        let index = *counter;
        *counter += 1;

        let mut path = self.path.clone();
        path.push(PathKey::from(keys::ELEMENTS));
        path.push(PathKey::Index(index));
        path
    }

    fn has_child_elements(&self, node: &[PathKey]) -> bool {
        let mut path = node.to_vec();
        path.push(PathKey::from(keys::ELEMENTS));
        !array_at(&self.tree, &path).is_empty()
    }

    fn write(&mut self, node: &[PathKey], field: &str, value: Value) {
        let mut path = node.to_vec();
        path.push(PathKey::from(field));
        set_value_at(&mut self.tree, &path, value);
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for TreeBuilder {
    fn handle(&mut self, event: XmlEvent) {
        if self.error.is_some() {
            return;
        }
        trace!(path = %display_path(&self.path), ?event, "builder event");

        match event {
            XmlEvent::Start {
                name,
                attributes,
                namespace_uri,
                qualified_name,
            } => self.start_element(
                &name,
                &attributes,
                namespace_uri.as_deref(),
                qualified_name.as_deref(),
            ),
            XmlEvent::End { name } => self.end_element(&name),
            XmlEvent::Characters(text) => self.characters(&text),
            XmlEvent::Cdata(bytes) => self.cdata(&bytes),
            XmlEvent::Error(e) => self.error(e),
            XmlEvent::DocumentEnd => {}
        }
    }
}

/// Run a complete event sequence through a fresh builder
pub fn build_from_events<I>(events: I) -> Result<Value, TokenizerError>
where
    I: IntoIterator<Item = XmlEvent>,
{
    let mut builder = TreeBuilder::new();
    for event in events {
        builder.handle(event);
    }
    builder.finish()
}

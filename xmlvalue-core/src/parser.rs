//! Build entry points: markup in, [`Document`] out
//!
//! Every entry point is synchronous and all-or-nothing: it returns the
//! assembled tree, or the first error reported while tokenizing.

use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::builder::TreeBuilder;
use crate::events::{EventSink, TokenizerError};
use crate::options::ParseOptions;
use crate::query::Node;
use crate::reader::read_events;
use crate::sanitize::xml_legal_string;

/// Errors that can occur while building a document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// A built document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    tree: Value,
}

impl Document {
    /// Wrap an already built tree value
    pub fn from_value(tree: Value) -> Self {
        Document { tree }
    }

    /// The root element, ready for querying
    pub fn root(&self) -> Node<'_> {
        Node::new(&self.tree)
    }

    /// The underlying tree value
    pub fn value(&self) -> &Value {
        &self.tree
    }

    pub fn into_value(self) -> Value {
        self.tree
    }
}

/// Parse an XML string with default options
pub fn parse_str(xml: &str) -> Result<Document, ParseError> {
    parse_str_with_options(xml, &ParseOptions::default())
}

/// Parse an HTML string (lenient, sanitized)
pub fn parse_html(html: &str) -> Result<Document, ParseError> {
    parse_str_with_options(html, &ParseOptions::html())
}

/// Parse a string with the given options
pub fn parse_str_with_options(xml: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    let input = if options.sanitize {
        xml_legal_string(xml)
    } else {
        xml.into()
    };
    debug!(bytes = input.len(), lenient = options.lenient, namespaces = options.process_namespaces, "parsing document");

    let mut builder = TreeBuilder::new();
    read_events(&input, options, &mut builder);
    let nodes = builder.node_count();
    let tree = builder.finish()?;

    debug!(nodes, "document built");
    Ok(Document::from_value(tree))
}

/// Parse UTF-8 bytes with default options
pub fn parse_bytes(bytes: &[u8]) -> Result<Document, ParseError> {
    parse_bytes_with_options(bytes, &ParseOptions::default())
}

/// Parse UTF-8 bytes with the given options
pub fn parse_bytes_with_options(bytes: &[u8], options: &ParseOptions) -> Result<Document, ParseError> {
    let text = std::str::from_utf8(bytes)?;
    parse_str_with_options(text, options)
}

/// Read and parse a file with default options
pub fn parse_file(path: &Path) -> Result<Document, ParseError> {
    parse_file_with_options(path, &ParseOptions::default())
}

/// Read and parse a file with the given options
pub fn parse_file_with_options(path: &Path, options: &ParseOptions) -> Result<Document, ParseError> {
    let bytes = fs::read(path)?;
    parse_bytes_with_options(&bytes, options)
}

/// Run any event source into a fresh builder.
///
/// `feed` receives the builder as an [`EventSink`]; use it to plug in a
/// tokenizer other than the built-in one.
pub fn build_with<F>(feed: F) -> Result<Document, ParseError>
where
    F: FnOnce(&mut dyn EventSink),
{
    let mut builder = TreeBuilder::new();
    feed(&mut builder);
    Ok(Document::from_value(builder.finish()?))
}

//! Tokenizer events consumed by the tree builder
//!
//! The tokenizer adapter in [`crate::reader`] produces these; tests can feed
//! them to a [`crate::TreeBuilder`] directly without any markup at all.

use thiserror::Error;

/// Malformed markup reported by the tokenizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed markup at byte {position}: {message}")]
pub struct TokenizerError {
    /// Byte offset into the input where the problem was detected
    pub position: u64,
    pub message: String,
}

impl TokenizerError {
    pub fn new(position: u64, message: impl Into<String>) -> Self {
        TokenizerError {
            position,
            message: message.into(),
        }
    }
}

/// One event of the markup stream, in document order
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    /// Element start tag; attributes keep source order
    Start {
        name: String,
        attributes: Vec<(String, String)>,
        namespace_uri: Option<String>,
        qualified_name: Option<String>,
    },
    /// Element end tag (also emitted for self-closing tags)
    End { name: String },
    /// Entity-resolved character data
    Characters(String),
    /// Raw CDATA section bytes
    Cdata(Vec<u8>),
    /// Parse or validation failure; nothing after it is meaningful
    Error(TokenizerError),
    DocumentEnd,
}

impl XmlEvent {
    /// Start tag without attributes or namespace information
    pub fn start(name: impl Into<String>) -> Self {
        XmlEvent::Start {
            name: name.into(),
            attributes: Vec::new(),
            namespace_uri: None,
            qualified_name: None,
        }
    }

    /// Start tag with attributes
    pub fn start_with_attributes<K, V>(name: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        XmlEvent::Start {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            namespace_uri: None,
            qualified_name: None,
        }
    }

    pub fn end(name: impl Into<String>) -> Self {
        XmlEvent::End { name: name.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        XmlEvent::Characters(text.into())
    }
}

/// Receiver of tokenizer events
pub trait EventSink {
    fn handle(&mut self, event: XmlEvent);
}

impl EventSink for Vec<XmlEvent> {
    fn handle(&mut self, event: XmlEvent) {
        self.push(event);
    }
}

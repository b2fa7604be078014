//! Field names of a document node

pub const NAME: &str = "name";
pub const ATTRIBUTES: &str = "attributes";
pub const CONTENT: &str = "content";
pub const ELEMENTS: &str = "elements";
pub const NAMESPACE_URI: &str = "namespaceURI";
pub const QUALIFIED_NAME: &str = "qualifiedName";
/// Base64 of the raw CDATA bytes
pub const CDATA: &str = "CDATA";

/// `name` of a synthesized text node
pub const TEXT_NODE_NAME: &str = CONTENT;

//! xmlvalue-core: XML/HTML to ordered tree value
//!
//! This library provides:
//! - A quick-xml based tokenizer adapter (strict XML, lenient HTML)
//! - A streaming tree builder producing an ordered `serde_json::Value`
//! - Node lookup by tag name and attribute equality
//!
//! ```
//! use xmlvalue_core::{parse_str, Query};
//!
//! let doc = parse_str(r#"<a><b x="1"/><b x="2"/></a>"#).unwrap();
//! let b = doc.root().get_one(&Query::new("b").with_attribute("x", 2));
//! assert_eq!(b.attribute("x"), Some("2"));
//! ```

pub mod builder;
pub mod content;
pub mod events;
pub mod keys;
pub mod options;
pub mod parser;
pub mod query;
pub mod reader;
pub mod sanitize;
pub mod value;

pub use builder::{build_from_events, TreeBuilder};
pub use events::{EventSink, TokenizerError, XmlEvent};
pub use options::ParseOptions;
pub use parser::{
    build_with, parse_bytes, parse_bytes_with_options, parse_file, parse_file_with_options,
    parse_html, parse_str, parse_str_with_options, Document, ParseError,
};
pub use query::{Node, Query};
pub use sanitize::xml_legal_string;
pub use value::{array_at, scalar_string, set_value_at, value_at, PathKey};

//! Parse configuration

/// Options controlling how markup is tokenized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Resolve namespaces: `name` becomes the local name and the node also
    /// gets `namespaceURI` and `qualifiedName`. `xmlns` declarations are
    /// consumed instead of being reported as attributes.
    pub process_namespaces: bool,
    /// Tolerate HTML: void elements, stray end tags and unclosed elements
    pub lenient: bool,
    /// Strip characters that are illegal in XML before tokenizing
    pub sanitize: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings for real-world HTML
    pub fn html() -> Self {
        ParseOptions {
            process_namespaces: false,
            lenient: true,
            sanitize: true,
        }
    }

    pub fn with_namespaces(mut self, process_namespaces: bool) -> Self {
        self.process_namespaces = process_namespaces;
        self
    }

    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }
}

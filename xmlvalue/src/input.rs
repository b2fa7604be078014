//! Input collection: glob expansion and per-source parsing

use std::path::Path;

use tracing::{debug, warn};
use xmlvalue_core::{parse_file_with_options, parse_str_with_options, Document, ParseError, ParseOptions};

/// Label used for documents read from standard input
pub const STDIN_LABEL: &str = "<stdin>";

/// Expand glob patterns to file paths, keeping plain paths as given
pub fn expand_globs(patterns: &[String]) -> Vec<String> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            match glob::glob(pattern) {
                Ok(paths) => {
                    let before = files.len();
                    for entry in paths.flatten() {
                        if entry.is_file() {
                            if let Some(path) = entry.to_str() {
                                files.push(path.to_string());
                            }
                        }
                    }
                    if files.len() == before {
                        warn!("pattern '{}' matched no files", pattern);
                    }
                }
                Err(e) => {
                    warn!("invalid glob pattern '{}': {}", pattern, e);
                }
            }
        } else {
            files.push(pattern.clone());
        }
    }

    files
}

/// Parse one file, logging failures instead of aborting the run
pub fn load_file(path: &str, options: &ParseOptions) -> Option<Document> {
    match parse_file_with_options(Path::new(path), options) {
        Ok(doc) => {
            debug!("parsed {}", path);
            Some(doc)
        }
        Err(e) => {
            report_failure(path, &e);
            None
        }
    }
}

/// Parse a document already held in memory
pub fn load_source(label: &str, source: &str, options: &ParseOptions) -> Option<Document> {
    match parse_str_with_options(source, options) {
        Ok(doc) => Some(doc),
        Err(e) => {
            report_failure(label, &e);
            None
        }
    }
}

fn report_failure(label: &str, error: &ParseError) {
    warn!("{}: {}", label, error);
}

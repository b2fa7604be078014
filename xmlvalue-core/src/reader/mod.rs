//! Tokenizer adapter: drives quick-xml and emits [`XmlEvent`]s
//!
//! quick-xml does the lexing, entity resolution and end-tag checking. This
//! layer adds what the builder relies on: exactly one root element, no text
//! outside it, every start matched by an end, and a single terminal event
//! (`DocumentEnd` or `Error`).
//!
//! In lenient mode the same stream is repaired for HTML instead of rejected:
//! void elements close immediately, stray end tags are dropped, unclosed
//! elements are closed, and content outside the first root is ignored.

pub mod html;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use tracing::warn;

use crate::content::is_blank;
use crate::events::{EventSink, TokenizerError, XmlEvent};
use crate::options::ParseOptions;

/// Tokenize `input`, sending every event to `sink`.
///
/// The last event is always `DocumentEnd` or `Error`.
pub fn read_events<S: EventSink + ?Sized>(input: &str, options: &ParseOptions, sink: &mut S) {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut tokenizer = Tokenizer {
        sink,
        options,
        open: Vec::new(),
        root_seen: false,
        skip_depth: 0,
    };
    match tokenizer.run(input) {
        Ok(()) => tokenizer.sink.handle(XmlEvent::DocumentEnd),
        Err(e) => tokenizer.sink.handle(XmlEvent::Error(e)),
    }
}

/// Collect the event stream for `input` (handy for inspection and tests)
pub fn collect_events(input: &str, options: &ParseOptions) -> Vec<XmlEvent> {
    let mut events = Vec::new();
    read_events(input, options, &mut events);
    events
}

struct OpenElement {
    /// Name as written in the source, for end-tag matching
    raw: String,
    /// Name reported in events (local name when resolving namespaces)
    name: String,
}

struct Tokenizer<'a, S: ?Sized> {
    sink: &'a mut S,
    options: &'a ParseOptions,
    open: Vec<OpenElement>,
    root_seen: bool,
    /// Depth inside an ignored extra top-level element (lenient mode)
    skip_depth: usize,
}

impl<'a, S: EventSink + ?Sized> Tokenizer<'a, S> {
    fn run(&mut self, input: &str) -> Result<(), TokenizerError> {
        let mut reader = NsReader::from_str(input);
        {
            let config = reader.config_mut();
            config.expand_empty_elements = false;
            config.check_end_names = !self.options.lenient;
            config.allow_unmatched_ends = self.options.lenient;
        }

        loop {
            let (namespace_uri, event) = match reader.read_resolved_event() {
                Ok((resolved, event)) => (resolved_uri(&resolved), event),
                Err(e) => return Err(TokenizerError::new(reader.error_position() as u64, e.to_string())),
            };
            let position = reader.buffer_position() as u64;

            match event {
                Event::Start(e) => self.open_element(&e, namespace_uri, false, position)?,
                Event::Empty(e) => self.open_element(&e, namespace_uri, true, position)?,
                Event::End(e) => self.close_element(&decode_name(e.name().as_ref()), position)?,
                Event::Text(e) => {
                    let text = match e.unescape() {
                        Ok(text) => text.into_owned(),
                        Err(_) if self.options.lenient => String::from_utf8_lossy(&e).into_owned(),
                        Err(err) => return Err(TokenizerError::new(position, err.to_string())),
                    };
                    self.characters(text, position)?;
                }
                Event::CData(e) => self.cdata(e.into_inner().into_owned(), position)?,
                Event::Eof => return self.finish(position),
                // Comments, processing instructions, declarations and DOCTYPE carry no tree data
                _ => {}
            }
        }
    }

    fn open_element(
        &mut self,
        e: &BytesStart<'_>,
        namespace_uri: Option<String>,
        empty: bool,
        position: u64,
    ) -> Result<(), TokenizerError> {
        let raw = decode_name(e.name().as_ref());

        if self.skip_depth > 0 {
            if !empty {
                self.skip_depth += 1;
            }
            return Ok(());
        }
        if self.open.is_empty() {
            if self.root_seen {
                if !self.options.lenient {
                    return Err(TokenizerError::new(
                        position,
                        format!("multiple top-level elements: <{}>", raw),
                    ));
                }
                warn!(element = %raw, "ignoring content after the root element");
                if !empty {
                    self.skip_depth = 1;
                }
                return Ok(());
            }
            self.root_seen = true;
        }

        let attributes = self.attributes(e, position)?;
        let (name, namespace_uri, qualified_name) = if self.options.process_namespaces {
            (decode_name(e.local_name().as_ref()), namespace_uri, Some(raw.clone()))
        } else {
            (raw.clone(), None, None)
        };

        self.sink.handle(XmlEvent::Start {
            name: name.clone(),
            attributes,
            namespace_uri,
            qualified_name,
        });

        if empty || (self.options.lenient && html::is_void_element(&raw)) {
            self.sink.handle(XmlEvent::End { name });
        } else {
            self.open.push(OpenElement { raw, name });
        }
        Ok(())
    }

    fn attributes(&self, e: &BytesStart<'_>, position: u64) -> Result<Vec<(String, String)>, TokenizerError> {
        let lenient = self.options.lenient;
        let attrs = if lenient { e.html_attributes() } else { e.attributes() };

        let mut out = Vec::new();
        for attr in attrs {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) if lenient => {
                    warn!(error = %err, "skipping malformed attribute");
                    continue;
                }
                Err(err) => return Err(TokenizerError::new(position, err.to_string())),
            };
            if self.options.process_namespaces && attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = decode_name(attr.key.as_ref());
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) if lenient => String::from_utf8_lossy(&attr.value).into_owned(),
                Err(err) => return Err(TokenizerError::new(position, err.to_string())),
            };
            out.push((key, value));
        }
        Ok(out)
    }

    fn close_element(&mut self, raw: &str, position: u64) -> Result<(), TokenizerError> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return Ok(());
        }

        if !self.options.lenient {
            // quick-xml has already checked that the name matches
            return match self.open.pop() {
                Some(open) => {
                    self.sink.handle(XmlEvent::End { name: open.name });
                    Ok(())
                }
                None => Err(TokenizerError::new(position, format!("unexpected end tag </{}>", raw))),
            };
        }

        let Some(index) = self.open.iter().rposition(|o| o.raw.eq_ignore_ascii_case(raw)) else {
            warn!(element = %raw, "dropping end tag with no open element");
            return Ok(());
        };
        for inner in self.open.drain(index + 1..).rev() {
            warn!(element = %inner.raw, closed_by = %raw, "closing unclosed element");
            self.sink.handle(XmlEvent::End { name: inner.name });
        }
        if let Some(open) = self.open.pop() {
            self.sink.handle(XmlEvent::End { name: open.name });
        }
        Ok(())
    }

    fn characters(&mut self, text: String, position: u64) -> Result<(), TokenizerError> {
        if self.skip_depth > 0 {
            return Ok(());
        }
        if self.open.is_empty() {
            return self.outside_root(is_blank(&text), "text", position);
        }
        self.sink.handle(XmlEvent::Characters(text));
        Ok(())
    }

    fn cdata(&mut self, bytes: Vec<u8>, position: u64) -> Result<(), TokenizerError> {
        if self.skip_depth > 0 {
            return Ok(());
        }
        if self.open.is_empty() {
            return self.outside_root(false, "CDATA", position);
        }
        self.sink.handle(XmlEvent::Cdata(bytes));
        Ok(())
    }

    fn outside_root(&self, blank: bool, what: &str, position: u64) -> Result<(), TokenizerError> {
        if blank {
            return Ok(());
        }
        if self.options.lenient {
            warn!("dropping {} outside of the root element", what);
            return Ok(());
        }
        Err(TokenizerError::new(position, format!("{} outside of the root element", what)))
    }

    fn finish(&mut self, position: u64) -> Result<(), TokenizerError> {
        if !self.options.lenient {
            if let Some(open) = self.open.last() {
                return Err(TokenizerError::new(position, format!("unclosed element <{}>", open.raw)));
            }
            if !self.root_seen {
                return Err(TokenizerError::new(position, "document has no root element"));
            }
            return Ok(());
        }

        while let Some(open) = self.open.pop() {
            warn!(element = %open.raw, "closing element left open at end of input");
            self.sink.handle(XmlEvent::End { name: open.name });
        }
        Ok(())
    }
}

fn resolved_uri(resolved: &ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(ns) => Some(decode_name(ns.as_ref())),
        _ => None,
    }
}

fn decode_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

//! Structural events
//!
//! The translator does not read markup itself. It pulls [`Event`]s from an
//! [`EventSource`]: [`XmlEventReader`] decodes an XML document with
//! `quick-xml`, and a `VecDeque<Event>` serves events built in memory.

use std::collections::VecDeque;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event as XmlEvent};

use crate::error::{DocumentError, Result};

/// A single attribute of a start element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name, including any namespace prefix
    pub name: String,
    /// Unescaped attribute value
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The attribute name without its namespace prefix
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Whether the attribute name carries a namespace prefix
    pub fn is_prefixed(&self) -> bool {
        self.name.contains(':')
    }
}

/// A structural event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An element was opened
    Start {
        /// Local element name
        name: String,
        /// Attributes in document order
        attributes: Vec<Attribute>,
    },
    /// An element was closed
    End {
        /// Local element name
        name: String,
    },
}

impl Event {
    /// Create a start event
    pub fn start(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Event::Start {
            name: name.into(),
            attributes,
        }
    }

    /// Create an end event
    pub fn end(name: impl Into<String>) -> Self {
        Event::End { name: name.into() }
    }

    /// The element name of the event
    pub fn name(&self) -> &str {
        match self {
            Event::Start { name, .. } | Event::End { name } => name,
        }
    }
}

/// A pull-style source of structural events
pub trait EventSource {
    /// Return the next event, or `None` once the document is exhausted
    fn next_event(&mut self) -> Result<Option<Event>>;
}

impl EventSource for VecDeque<Event> {
    fn next_event(&mut self) -> Result<Option<Event>> {
        Ok(self.pop_front())
    }
}

/// Event source decoding an XML document
pub struct XmlEventReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    pending_end: Option<String>,
}

impl<R: BufRead> XmlEventReader<R> {
    /// Create a reader over a buffered XML stream
    pub fn new(inner: R) -> Self {
        let mut reader = Reader::from_reader(inner);
        reader.config_mut().trim_text(true);
        XmlEventReader {
            reader,
            buf: Vec::new(),
            pending_end: None,
        }
    }
}

impl<'a> XmlEventReader<&'a [u8]> {
    /// Create a reader over an in-memory XML document
    pub fn from_xml(xml: &'a str) -> Self {
        Self::new(xml.as_bytes())
    }
}

impl<R: BufRead> EventSource for XmlEventReader<R> {
    fn next_event(&mut self) -> Result<Option<Event>> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(Event::End { name }));
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(err) => {
                    return Err(DocumentError::Xml(format!(
                        "{} (at byte {})",
                        err,
                        self.reader.buffer_position()
                    ))
                    .into());
                }
            };

            match event {
                XmlEvent::Start(start) => return start_event(&start).map(Some),
                XmlEvent::Empty(start) => {
                    let event = start_event(&start)?;
                    self.pending_end = Some(event.name().to_string());
                    return Ok(Some(event));
                }
                XmlEvent::End(end) => {
                    let name = decode(end.local_name().as_ref())?;
                    return Ok(Some(Event::End { name }));
                }
                XmlEvent::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

fn start_event(start: &BytesStart<'_>) -> Result<Event> {
    let name = decode(start.local_name().as_ref())?;
    let mut attributes = Vec::new();

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| DocumentError::Xml(err.to_string()))?;
        let key = decode(attribute.key.as_ref())?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attribute
            .unescape_value()
            .map_err(|err| DocumentError::Xml(err.to_string()))?;
        attributes.push(Attribute::new(key, value.into_owned()));
    }

    Ok(Event::Start { name, attributes })
}

fn decode(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| DocumentError::Xml(err.to_string()).into())
}

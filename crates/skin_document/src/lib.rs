//! Skin document parsing.
//!
//! Skins are XML files. This crate parses them into a plain element tree
//! that the store and resolver walk; attributes keep their document order
//! because downstream application is order-sensitive.

#![forbid(unsafe_code)]

use log::warn;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("the document has no root element")]
    Empty,
}

/// One element of a parsed skin document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    /// The value of the first attribute with this name, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children_named<'e>(&'e self, tag: &str) -> impl Iterator<Item = &'e Element> {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    pub fn first_child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.tag == tag)
    }
}

/// Parse an XML document into its root element.
pub fn parse_document(xml: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text_start = true;
    config.trim_text_end = true;
    // The stack bottom collects root-level elements; extras are ignored.
    let mut stack = vec![Element::new("")];
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from(&start)?;
                close(&mut stack, element);
            }
            Event::End(_) => {
                // The reader rejects mismatched end tags, so the bottom
                // collector can never be popped here.
                if stack.len() > 1
                    && let Some(element) = stack.pop()
                {
                    close(&mut stack, element);
                }
            }
            Event::Text(text) => {
                if let Some(open) = stack.last_mut() {
                    let value = text.unescape()?;
                    match &mut open.text {
                        Some(existing) => existing.push_str(&value),
                        None => open.text = Some(value.into_owned()),
                    }
                }
            }
            Event::CData(data) => {
                if let Some(open) = stack.last_mut() {
                    let raw = data.into_inner();
                    let value = String::from_utf8_lossy(&raw);
                    match &mut open.text {
                        Some(existing) => existing.push_str(&value),
                        None => open.text = Some(value.into_owned()),
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions carry
            // nothing a skin uses.
            _ => {}
        }
    }
    let mut bottom = stack.swap_remove(0);
    if bottom.children.len() > 1 {
        warn!("the document has {} root elements, keeping the first", bottom.children.len());
    }
    if bottom.children.is_empty() {
        return Err(DocumentError::Empty);
    }
    Ok(bottom.children.swap_remove(0))
}

fn element_from(start: &BytesStart) -> Result<Element, DocumentError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn close(stack: &mut Vec<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => stack.push(element),
    }
}

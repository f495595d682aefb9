//! Minimal XML element tree and its quick-xml backed parser/serializer.
//!
//! The wire encoding never uses attributes or namespaces, so the tree
//! keeps only element names, child elements and text nodes. The tree is
//! also what [`TreeFilter`](crate::TreeFilter) hooks receive, standing
//! in for a full DOM.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{ProtocolError, ProtocolResult};

/// A child of an [`Element`]: either a nested element or a text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// A text node, stored unescaped.
    Text(String),
}

/// An XML element: a name and its children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// The element name.
    pub name: String,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Creates an element holding a single text node.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.push_text(text);
        element
    }

    /// Appends a child element.
    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Appends a text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Iterates the child elements in document order, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Returns the first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    /// Mutable form of [`Element::child`].
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Concatenates the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Parses a document into its root element.
///
/// Whitespace-only text between elements is dropped; attributes,
/// comments and processing instructions are ignored.
pub fn parse_document(xml: &str) -> ProtocolResult<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(Element::new(name));
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                attach(&mut stack, &mut root, Element::new(name));
            }
            Ok(Event::Text(e)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    parent.push_text(text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(String::from_utf8_lossy(&e).into_owned());
                }
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ProtocolError::malformed("unbalanced closing tag"))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ProtocolError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ProtocolError::malformed("unexpected end of document"));
    }
    root.ok_or_else(|| ProtocolError::malformed("document has no root element"))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.push_element(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

/// Serializes a document: XML declaration with the given charset
/// followed by the root element. Text nodes are entity-escaped.
pub fn serialize_document(root: &Element, encoding: &str) -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding), None)))
        .unwrap();
    write_element(&mut writer, root);

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).unwrap()
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, element: &Element) {
    if element.children.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(element.name.as_str())))
            .unwrap();
        return;
    }

    writer
        .write_event(Event::Start(BytesStart::new(element.name.as_str())))
        .unwrap();
    for child in &element.children {
        match child {
            Node::Element(nested) => write_element(writer, nested),
            Node::Text(text) => {
                writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .unwrap();
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .unwrap();
}

//! Explicit in-memory model of an `.exb` document.
//!
//! The whole file is parsed into an owned tree, so structural edits are
//! plain vector operations and writing a file back is a single pass over
//! the tree. Attribute order, whitespace between elements and self-closing
//! tags are all preserved.

use quick_xml::Reader;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesDecl, BytesStart, Event};

use super::error::ExbError;

pub const TIER_TAG: &str = "tier";
const CATEGORY_ATTR: &str = "category";

/// One node of the document tree. Everything quick-xml can hand us is kept
/// so serialization reproduces the original file around our edits.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
    DocType(String),
    ProcessingInstruction(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of the element and all its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) | Node::CData(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
            _ => {}
        }
    }
}

/// The XML declaration of a document, if it had one.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDecl {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl XmlDecl {
    fn from_event(decl: &BytesDecl) -> Result<Self, ExbError> {
        let version = String::from_utf8_lossy(&decl.version()?).into_owned();
        let encoding = match decl.encoding() {
            Some(value) => Some(String::from_utf8_lossy(&value?).into_owned()),
            None => None,
        };
        let standalone = match decl.standalone() {
            Some(value) => Some(String::from_utf8_lossy(&value?).into_owned()),
            None => None,
        };
        Ok(XmlDecl {
            version,
            encoding,
            standalone,
        })
    }

    fn write(&self, out: &mut String) {
        out.push_str("<?xml version=\"");
        out.push_str(&self.version);
        out.push('"');
        if let Some(encoding) = &self.encoding {
            out.push_str(" encoding=\"");
            out.push_str(encoding);
            out.push('"');
        }
        if let Some(standalone) = &self.standalone {
            out.push_str(" standalone=\"");
            out.push_str(standalone);
            out.push('"');
        }
        out.push_str("?>");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub decl: Option<XmlDecl>,
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn parse(input: &str) -> Result<Document, ExbError> {
        let mut reader = Reader::from_str(input);
        let mut decl = None;
        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    stack.push(element_from_start(&start, false)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start, true)?;
                    push_node(&mut stack, &mut nodes, Node::Element(element));
                }
                Event::End(end) => {
                    let element = stack.pop().ok_or_else(|| {
                        ExbError::UnexpectedClose(
                            String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                        )
                    })?;
                    push_node(&mut stack, &mut nodes, Node::Element(element));
                }
                Event::Text(text) => {
                    let text = text.unescape()?.into_owned();
                    push_node(&mut stack, &mut nodes, Node::Text(text));
                }
                Event::CData(data) => {
                    let data = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    push_node(&mut stack, &mut nodes, Node::CData(data));
                }
                Event::Comment(text) => {
                    let text = String::from_utf8_lossy(&text.into_inner()).into_owned();
                    push_node(&mut stack, &mut nodes, Node::Comment(text));
                }
                Event::DocType(text) => {
                    let text = String::from_utf8_lossy(&text.into_inner()).into_owned();
                    push_node(&mut stack, &mut nodes, Node::DocType(text));
                }
                Event::PI(pi) => {
                    let text = String::from_utf8_lossy(&pi.into_inner()).into_owned();
                    push_node(&mut stack, &mut nodes, Node::ProcessingInstruction(text));
                }
                Event::Decl(event) => {
                    decl = Some(XmlDecl::from_event(&event)?);
                }
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.pop() {
            return Err(ExbError::Unclosed(open.name));
        }

        Ok(Document { decl, nodes })
    }

    pub fn has_tier(&self, category: &str) -> bool {
        self.tier(category).is_some()
    }

    /// First `<tier category="...">` element in document order.
    pub fn tier(&self, category: &str) -> Option<&Element> {
        find_tier(&self.nodes, category)
    }

    pub fn tier_mut(&mut self, category: &str) -> Option<&mut Element> {
        find_tier_mut(&mut self.nodes, category)
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if let Some(decl) = &self.decl {
            decl.write(&mut out);
        }
        for node in &self.nodes {
            write_node(node, &mut out);
        }
        out
    }
}

fn element_from_start(start: &BytesStart, self_closing: bool) -> Result<Element, ExbError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.push((key, value));
    }
    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
        self_closing,
    })
}

fn push_node(stack: &mut Vec<Element>, nodes: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => nodes.push(node),
    }
}

fn find_tier<'a>(nodes: &'a [Node], category: &str) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(element) = node {
            if element.name == TIER_TAG && element.attr(CATEGORY_ATTR) == Some(category) {
                return Some(element);
            }
            if let Some(found) = find_tier(&element.children, category) {
                return Some(found);
            }
        }
    }
    None
}

fn find_tier_mut<'a>(nodes: &'a mut [Node], category: &str) -> Option<&'a mut Element> {
    for node in nodes {
        if let Node::Element(element) = node {
            if element.name == TIER_TAG && element.attr(CATEGORY_ATTR) == Some(category) {
                return Some(element);
            }
            if let Some(found) = find_tier_mut(&mut element.children, category) {
                return Some(found);
            }
        }
    }
    None
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(element) => write_element(element, out),
        Node::Text(text) => out.push_str(&partial_escape(text)),
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Node::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        Node::DocType(text) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(text);
            out.push('>');
        }
        Node::ProcessingInstruction(text) => {
            out.push_str("<?");
            out.push_str(text);
            out.push_str("?>");
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
    if element.self_closing && element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

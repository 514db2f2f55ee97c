//! A small XML element tree for MSBuild documents.
//!
//! Documents are built in memory and rendered in one go with two-space
//! indentation and CRLF line endings, matching what Visual Studio writes.

use std::fmt::Write as _;

const NEWLINE: &str = "\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// One element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set an attribute, replacing an existing one with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();

        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(attr) => attr.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append a new empty child element and return it.
    pub fn add_child(&mut self, name: impl Into<String>) -> &mut XmlElement {
        self.children.push(XmlNode::Element(XmlElement::new(name)));
        match self.children.last_mut() {
            Some(XmlNode::Element(e)) => e,
            _ => unreachable!("just pushed an element"),
        }
    }

    /// Append a child holding only `text`.
    pub fn add_text_child(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.add_child(name).add_text(text);
        self
    }

    /// Append an already built element.
    pub fn push(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Child elements, in order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Mutable child elements named `name`.
    pub fn elements_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> + 'a {
        self.children.iter_mut().filter_map(move |c| match c {
            XmlNode::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    pub fn has_child_named(&self, name: &str) -> bool {
        self.elements().any(|e| e.name == name)
    }

    /// Render as a complete document with an XML declaration.
    pub fn to_document(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        out.push_str(NEWLINE);
        out.push_str(NEWLINE);
        self.write_to(&mut out, 0);
        out
    }

    fn write_to(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);

        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
        }

        if self.children.is_empty() {
            out.push_str("/>");
            out.push_str(NEWLINE);
            return;
        }

        out.push('>');

        let text_only = self.children.iter().all(|c| matches!(c, XmlNode::Text(_)));

        if text_only {
            for child in &self.children {
                if let XmlNode::Text(text) = child {
                    out.push_str(&escape(text, false));
                }
            }
        } else {
            out.push_str(NEWLINE);
            for child in &self.children {
                match child {
                    XmlNode::Element(e) => e.write_to(out, depth + 1),
                    XmlNode::Text(text) => {
                        out.push_str(&"  ".repeat(depth + 1));
                        out.push_str(&escape(text, false));
                        out.push_str(NEWLINE);
                    }
                }
            }
            out.push_str(&indent);
        }

        let _ = write!(out, "</{}>", self.name);
        out.push_str(NEWLINE);
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\r' | '\n' | '\t' => {
                let _ = write!(out, "&#{};", c as u32);
            }
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "&#{};", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

use std::fmt::Write as _;

/// Elements that never have content and are written as `<tag ... />`.
const VOID_ELEMENTS: &[&str] = &["br", "img"];

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Markup that is already serialized (inline content of a paragraph).
    Raw(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An HTML element with ordered attributes and owned children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn with_raw(mut self, html: impl Into<String>) -> Self {
        self.children.push(Node::Raw(html.into()));
        self
    }

    pub fn set_attribute(&mut self, name: &'static str, value: impl Into<String>) {
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.into(),
            None => self.attributes.push((name, value.into())),
        }
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Last child element with the given tag.
    pub fn last_child_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().rev().find_map(|child| match child {
            Node::Element(el) if el.tag == tag => Some(el),
            _ => None,
        })
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag)
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(
                out,
                " {}=\"{}\"",
                name,
                html_escape::encode_double_quoted_attribute(value)
            );
        }
        if self.is_void() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

impl Node {
    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_html(out),
            Node::Raw(html) => out.push_str(html),
        }
    }
}

/// `<br />`, the separator between fragments of one list item or cell.
pub fn line_break() -> Node {
    Node::Element(Element::new("br"))
}

/// Append `fragments` to `parent`, separated by line breaks.
pub fn push_joined(parent: &mut Element, fragments: Vec<Node>) {
    for (i, fragment) in fragments.into_iter().enumerate() {
        if i > 0 {
            parent.push(line_break());
        }
        parent.push(fragment);
    }
}

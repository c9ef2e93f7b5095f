use std::collections::HashMap;

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const WPD_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub(crate) const VML_NS: &str = "urn:schemas-microsoft-com:vml";
pub(crate) const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

const TRANSITIONAL: &[(&str, &str)] = &[
    ("w", WML_NS),
    ("r", REL_NS),
    ("a", DML_NS),
    ("wp", WPD_NS),
    ("v", VML_NS),
    ("mc", MC_NS),
];

/// Prefix to namespace-URI table for one parsed part.
///
/// Prefixes are resolved against what the part itself declares, so strict
/// documents (which bind `w` to a purl.oclc.org URI) match the same tags as
/// transitional ones. Prefixes the part never declares fall back to the
/// transitional URIs. The table is read-only once built.
#[derive(Clone, Debug, Default)]
pub struct Namespaces {
    uris: HashMap<String, String>,
}

impl Namespaces {
    pub fn from_document(doc: &roxmltree::Document) -> Self {
        let mut uris: HashMap<String, String> = HashMap::new();
        // Drawing prefixes (a, pic, wp) are commonly declared on the drawing
        // elements themselves rather than on the root.
        for node in doc.descendants().filter(|n| n.is_element()) {
            for ns in node.namespaces() {
                if let Some(prefix) = ns.name() {
                    uris.entry(prefix.to_string())
                        .or_insert_with(|| ns.uri().to_string());
                }
            }
        }
        for &(prefix, uri) in TRANSITIONAL {
            uris.entry(prefix.to_string())
                .or_insert_with(|| uri.to_string());
        }
        Self { uris }
    }

    /// Table holding only the transitional bindings.
    pub fn transitional() -> Self {
        Self {
            uris: TRANSITIONAL
                .iter()
                .map(|&(p, u)| (p.to_string(), u.to_string()))
                .collect(),
        }
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.uris.get(prefix).map(String::as_str)
    }

    pub(crate) fn is(&self, node: roxmltree::Node, prefix: &str, name: &str) -> bool {
        node.is_element()
            && node.tag_name().name() == name
            && matches!(self.uri(prefix), Some(uri) if node.tag_name().namespace() == Some(uri))
    }

    pub(crate) fn child<'a>(
        &self,
        node: roxmltree::Node<'a, 'a>,
        prefix: &str,
        name: &str,
    ) -> Option<roxmltree::Node<'a, 'a>> {
        node.children().find(|n| self.is(*n, prefix, name))
    }

    pub(crate) fn descendant<'a>(
        &self,
        node: roxmltree::Node<'a, 'a>,
        prefix: &str,
        name: &str,
    ) -> Option<roxmltree::Node<'a, 'a>> {
        node.descendants().find(|n| self.is(*n, prefix, name))
    }

    pub(crate) fn attr<'a>(
        &self,
        node: roxmltree::Node<'a, 'a>,
        prefix: &str,
        name: &str,
    ) -> Option<&'a str> {
        let uri = self.uri(prefix)?;
        node.attribute((uri, name))
    }

    pub(crate) fn is_w(&self, node: roxmltree::Node, name: &str) -> bool {
        self.is(node, "w", name)
    }

    pub(crate) fn w<'a>(
        &self,
        node: roxmltree::Node<'a, 'a>,
        name: &str,
    ) -> Option<roxmltree::Node<'a, 'a>> {
        self.child(node, "w", name)
    }

    /// `w:val` of the named WML child, e.g. `<w:pStyle w:val="Heading1"/>`.
    pub(crate) fn w_val<'a>(&self, node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
        self.w(node, child).and_then(|n| self.attr(n, "w", "val"))
    }

    /// Local name of a WML element, `None` for anything in another namespace.
    pub(crate) fn w_name<'a>(&self, node: roxmltree::Node<'a, 'a>) -> Option<&'a str> {
        let uri = self.uri("w")?;
        (node.is_element() && node.tag_name().namespace() == Some(uri))
            .then(|| node.tag_name().name())
    }
}

//! HTML rendering of a parsed `word/document.xml`.

mod element;
mod inline;
mod list;
mod table;

use std::collections::HashSet;

use roxmltree::NodeId;

use crate::docx::ConversionContext;
use crate::docx::classify::{heading, is_li, is_title};
use crate::error::Result;

pub use element::{Element, Node};

use inline::paragraph_content;
use list::build_lists;
use table::build_table;

/// Mark `node` and everything below it as consumed.
fn mark_visited(node: roxmltree::Node, visited: &mut HashSet<NodeId>) {
    visited.extend(node.descendants().map(|n| n.id()));
}

/// Walk the document once and collect headings, paragraphs, lists and
/// tables, in document order, under an `<html>` root.
pub fn render_document(document: &roxmltree::Document, ctx: &ConversionContext) -> Result<Element> {
    let ns = &ctx.ns;
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut root = Element::new("html");

    for node in document.root_element().descendants() {
        if !node.is_element() || visited.contains(&node.id()) {
            continue;
        }
        // Section properties hold headers/footers, never body content.
        if ns.is_w(node, "sectPr") {
            mark_visited(node, &mut visited);
            continue;
        }

        if let Some(tag) = heading(node, ctx) {
            let content = paragraph_content(node, ctx, false)?.unwrap_or_default();
            if !content.is_empty() {
                root.push(Element::new(tag.as_str()).with_raw(content));
            }
        } else if ns.is_w(node, "p") {
            if is_title(node, ns) {
                continue;
            }
            if is_li(node, ctx) {
                for list in build_lists(node, ctx, &mut visited)? {
                    root.push(list);
                }
            } else {
                let content = paragraph_content(node, ctx, false)?.unwrap_or_default();
                if !content.is_empty() {
                    root.push(Element::new("p").with_raw(content));
                }
            }
        } else if ns.is_w(node, "tbl") {
            root.push(build_table(node, ctx, &mut visited)?);
        }
        visited.insert(node.id());
    }

    Ok(root)
}

/// Render the document to a compact HTML string.
pub fn render_html(document: &roxmltree::Document, ctx: &ConversionContext) -> Result<String> {
    Ok(render_document(document, ctx)?.to_html())
}

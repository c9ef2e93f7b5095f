//! Predicates over paragraph, run and table nodes.
//!
//! Nothing in here fails: a node of the wrong kind, or one with missing or
//! malformed metadata, simply classifies as "no".

use crate::model::HeadingTag;
use crate::namespace::Namespaces;

use super::ConversionContext;
use super::styles::{StyleTable, paragraph_font_size};

/// Paragraphs with more words than this are never promoted to headings.
const MAX_HEADING_WORDS: usize = 8;

/// Indent level of a list paragraph (first `w:ilvl` in its subtree).
pub fn ilvl(p: roxmltree::Node, ns: &Namespaces) -> Option<u32> {
    if !ns.is_w(p, "p") {
        return None;
    }
    p.descendants()
        .find(|n| ns.is_w(*n, "ilvl"))
        .and_then(|n| ns.attr(n, "w", "val"))
        .and_then(|v| v.trim().parse().ok())
}

/// List id of a list paragraph (first `w:numId` in its subtree).
pub fn num_id<'a>(p: roxmltree::Node<'a, 'a>, ns: &Namespaces) -> Option<&'a str> {
    if !ns.is_w(p, "p") {
        return None;
    }
    p.descendants()
        .find(|n| ns.is_w(*n, "numId"))
        .and_then(|n| ns.attr(n, "w", "val"))
}

/// True when the paragraph carries a `w:numPr/w:ilvl` marker anywhere below it.
pub fn has_list_marker(p: roxmltree::Node, ns: &Namespaces) -> bool {
    ns.is_w(p, "p")
        && p
            .descendants()
            .filter(|n| ns.is_w(*n, "numPr"))
            .any(|num_pr| ns.w(num_pr, "ilvl").is_some())
}

/// Heading level declared through the paragraph style ("heading 1" and so on).
pub fn natural_header(
    p: roxmltree::Node,
    ns: &Namespaces,
    styles: &StyleTable,
) -> Option<HeadingTag> {
    if !ns.is_w(p, "p") {
        return None;
    }
    let style_id = ns.w(p, "pPr").and_then(|ppr| ns.w_val(ppr, "pStyle"))?;
    styles.header(style_id)
}

/// Indent-0 items of an `upperRoman` list are section headings.
pub fn is_top_level_upper_roman(p: roxmltree::Node, ctx: &ConversionContext) -> bool {
    let ns = &ctx.ns;
    if ilvl(p, ns) != Some(0) {
        return false;
    }
    num_id(p, ns)
        .and_then(|id| ctx.numbering.format(id, 0))
        .is_some_and(|fmt| fmt == "upperRoman")
}

/// Heading tag for a paragraph, or `None` when it is body text.
pub fn heading(p: roxmltree::Node, ctx: &ConversionContext) -> Option<HeadingTag> {
    let ns = &ctx.ns;
    if !ns.is_w(p, "p") {
        return None;
    }
    if is_top_level_upper_roman(p, ctx) {
        return Some(HeadingTag::H2);
    }
    if let Some(tag) = natural_header(p, ns, &ctx.styles) {
        return Some(tag);
    }
    if has_list_marker(p, ns) {
        return None;
    }

    if ctx.detect_font_size
        && let Some(size) = paragraph_font_size(p, ns, &ctx.styles)
        && let Some(tag) = ctx.font_sizes.heading_for(size)
    {
        return Some(tag);
    }

    if paragraph_text(p, ns).split_whitespace().count() > MAX_HEADING_WORDS {
        return None;
    }

    let (bold, italic) = whole_line_styled(p, ns);
    (bold || italic).then_some(HeadingTag::H2)
}

/// A paragraph with a list marker that did not classify as a heading.
pub fn is_li(node: roxmltree::Node, ctx: &ConversionContext) -> bool {
    has_list_marker(node, &ctx.ns) && heading(node, ctx).is_none()
}

/// True when no list item after `li` belongs to the list `num_id`.
pub fn is_last_li(li: roxmltree::Node, ctx: &ConversionContext, num_id: Option<&str>) -> bool {
    if !is_li(li, ctx) {
        return false;
    }
    let mut next = li.next_sibling_element();
    while let Some(node) = next {
        if is_li(node, ctx) {
            return self::num_id(node, &ctx.ns) != num_id;
        }
        next = node.next_sibling_element();
    }
    true
}

/// `(every run bold or underlined, every run italic)`.
///
/// A paragraph without runs is vacuously both.
pub fn whole_line_styled(p: roxmltree::Node, ns: &Namespaces) -> (bool, bool) {
    if !ns.is_w(p, "p") {
        return (false, false);
    }
    let mut bold = true;
    let mut italic = true;
    for r in p.descendants().filter(|n| ns.is_w(*n, "r")) {
        bold &= is_bold(r, ns) || is_underlined(r, ns);
        italic &= is_italic(r, ns);
    }
    (bold, italic)
}

/// Paragraphs styled `Title` are rendered by the embedding page, not here.
pub fn is_title(p: roxmltree::Node, ns: &Namespaces) -> bool {
    if !ns.is_w(p, "p") {
        return false;
    }
    p.descendants()
        .find(|n| ns.is_w(*n, "pStyle"))
        .and_then(|n| ns.attr(n, "w", "val"))
        == Some("Title")
}

/// Whether the node has any non-whitespace text below it.
pub fn has_text(node: roxmltree::Node) -> bool {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .any(|t| !t.trim().is_empty())
}

fn paragraph_text(p: roxmltree::Node, ns: &Namespaces) -> String {
    p.descendants()
        .filter(|n| ns.is_w(*n, "t"))
        .filter_map(|n| n.text())
        .collect()
}

fn run_toggle(r: roxmltree::Node, ns: &Namespaces, name: &str, off: &[&str]) -> bool {
    if !ns.is_w(r, "r") {
        return false;
    }
    ns.w(r, "rPr")
        .and_then(|rpr| ns.w(rpr, name))
        .is_some_and(|el| ns.attr(el, "w", "val").is_none_or(|v| !off.contains(&v)))
}

pub fn is_bold(r: roxmltree::Node, ns: &Namespaces) -> bool {
    run_toggle(r, ns, "b", &["0", "false"])
}

pub fn is_italic(r: roxmltree::Node, ns: &Namespaces) -> bool {
    run_toggle(r, ns, "i", &["0", "false"])
}

pub fn is_underlined(r: roxmltree::Node, ns: &Namespaces) -> bool {
    run_toggle(r, ns, "u", &["none", "0", "false"])
}

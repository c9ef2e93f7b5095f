//! Nested list reconstruction.
//!
//! WordprocessingML has no list container: a list is a run of sibling
//! paragraphs that each carry a list id and an indent level, possibly
//! interrupted by ordinary paragraphs and tables that belong to the
//! preceding item. [`ListRun`] finds the extent of one such run and
//! [`ListBuilder`] folds it into nested `<ol>`/`<ul>` elements.

use std::collections::{BTreeMap, HashSet};

use roxmltree::NodeId;

use crate::docx::classify::{has_text, ilvl, is_last_li, is_li, is_top_level_upper_roman, num_id};
use crate::docx::{ConversionContext, collect_block_nodes};
use crate::error::{Error, Result};
use crate::model::ListKind;

use super::element::{Element, Node, push_joined};
use super::inline::paragraph_content;
use super::mark_visited;
use super::table::build_table;

/// A sibling node seen by [`ListRun`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RunNode<'a> {
    /// Part of the list: an item or content continuing the previous item.
    Member(roxmltree::Node<'a, 'a>),
    /// A node without text inside the run. It never ends the run.
    Skipped(roxmltree::Node<'a, 'a>),
}

/// Sibling nodes making up one list, starting at a list item.
///
/// The run ends before a top-level roman numeral heading, before a list item
/// indented less than the first one, and before an item of a different list.
/// It ends after the last item of its list. Nodes without text never end
/// the run and are yielded as [`RunNode::Skipped`].
pub(crate) struct ListRun<'a, 'c> {
    ctx: &'c ConversionContext,
    next: Option<roxmltree::Node<'a, 'a>>,
    num_id: Option<&'a str>,
    start_level: u32,
    started: bool,
    done: bool,
}

impl<'a, 'c> ListRun<'a, 'c> {
    pub(crate) fn new(first: roxmltree::Node<'a, 'a>, ctx: &'c ConversionContext) -> Self {
        Self {
            ctx,
            next: Some(first),
            num_id: num_id(first, &ctx.ns),
            start_level: ilvl(first, &ctx.ns).unwrap_or(0),
            started: false,
            done: false,
        }
    }
}

impl<'a> Iterator for ListRun<'a, '_> {
    type Item = RunNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let ctx = self.ctx;
        let ns = &ctx.ns;

        if !self.started {
            self.started = true;
            let first = self.next?;
            self.next = first.next_sibling_element();
            self.done = is_last_li(first, ctx, self.num_id);
            return Some(RunNode::Member(first));
        }

        while let Some(node) = self.next {
            self.next = node.next_sibling_element();
            if ns.is_w(node, "sectPr") {
                continue;
            }
            if !has_text(node) {
                return Some(RunNode::Skipped(node));
            }
            if is_top_level_upper_roman(node, ctx) {
                break;
            }
            if is_li(node, ctx) && ilvl(node, ns).unwrap_or(0) < self.start_level {
                break;
            }
            let Some(node_num_id) = num_id(node, ns) else {
                // Ordinary paragraph or table continuing the current item.
                return Some(RunNode::Member(node));
            };
            if Some(node_num_id) != self.num_id {
                break;
            }
            self.done = is_last_li(node, ctx, self.num_id);
            return Some(RunNode::Member(node));
        }

        self.done = true;
        None
    }
}

fn new_list(kind: ListKind) -> Element {
    let list = Element::new(kind.tag());
    match kind {
        ListKind::Unordered => list,
        ListKind::Ordered(style) => list.with_attribute("data-list-type", style),
    }
}

/// Make `child` part of the last item of `parent`.
fn attach(parent: &mut Element, child: Element) {
    match parent.last_child_mut("li") {
        Some(li) => li.push(child),
        None => {
            let mut li = Element::new("li");
            li.push(child);
            parent.push(li);
        }
    }
}

/// State machine folding list items into nested lists.
///
/// Each open list is owned by the indent level it was opened at. A list is
/// closed by moving it into the last item of the nearest shallower open
/// list; a list with nothing open above it is finished.
pub(crate) struct ListBuilder<'c> {
    ctx: &'c ConversionContext,
    open: BTreeMap<u32, Element>,
    level: Option<u32>,
    num_id: Option<String>,
    pending: Vec<Node>,
    finished: Vec<Element>,
}

impl<'c> ListBuilder<'c> {
    pub(crate) fn new(ctx: &'c ConversionContext) -> Self {
        Self {
            ctx,
            open: BTreeMap::new(),
            level: None,
            num_id: None,
            pending: Vec::new(),
            finished: Vec::new(),
        }
    }

    /// Start a new item at `level` of list `num_id`.
    pub(crate) fn push_item(&mut self, level: u32, num_id: Option<&str>, content: Node) {
        self.flush_pending();

        let opens_list = match self.level {
            None => true,
            Some(current) => level > current || num_id != self.num_id.as_deref(),
        };
        if opens_list {
            self.close(|l| l >= level);
        } else {
            self.close(|l| l > level);
        }
        if !self.open.contains_key(&level) {
            let kind = self.ctx.numbering.list_kind(num_id, level);
            self.open.insert(level, new_list(kind));
        }

        self.level = Some(level);
        self.num_id = num_id.map(str::to_string);
        self.pending.push(content);
    }

    /// Content that continues the current item.
    pub(crate) fn push_continuation(&mut self, content: Node) {
        self.pending.push(content);
    }

    pub(crate) fn finish(mut self) -> Vec<Element> {
        self.flush_pending();
        self.close(|_| true);
        self.finished
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let fragments = std::mem::take(&mut self.pending);
        let Some(list) = self.level.and_then(|l| self.open.get_mut(&l)) else {
            return;
        };
        let mut li = Element::new("li");
        push_joined(&mut li, fragments);
        list.push(li);
    }

    /// Close every open list whose level matches, deepest first.
    fn close(&mut self, matches: impl Fn(u32) -> bool) {
        let levels: Vec<u32> = self.open.keys().copied().filter(|&l| matches(l)).collect();
        for level in levels.into_iter().rev() {
            let Some(list) = self.open.remove(&level) else {
                continue;
            };
            match self.open.range_mut(..level).next_back() {
                Some((_, parent)) => attach(parent, list),
                None => self.finished.push(list),
            }
        }
    }
}

/// Feed one block node of a list run into `builder`.
///
/// Block content controls are transparent: their paragraphs, tables and
/// list items are handled as if they were siblings of the list.
fn push_block(
    builder: &mut ListBuilder,
    node: roxmltree::Node,
    ctx: &ConversionContext,
    visited: &mut HashSet<NodeId>,
) -> Result<()> {
    let ns = &ctx.ns;
    if is_li(node, ctx) {
        let content = paragraph_content(node, ctx, false)?.unwrap_or_default();
        builder.push_item(
            ilvl(node, ns).unwrap_or(0),
            num_id(node, ns),
            Node::Raw(content),
        );
    } else if ns.is_w(node, "tbl") {
        let table = build_table(node, ctx, visited)?;
        builder.push_continuation(table.into());
    } else if ns.is_w(node, "p") {
        let content = paragraph_content(node, ctx, false)?.unwrap_or_default();
        builder.push_continuation(Node::Raw(content));
    } else if ns.is_w(node, "sdt") {
        let Some(content) = ns.w(node, "sdtContent") else {
            return Ok(());
        };
        for child in collect_block_nodes(content, ns) {
            if has_text(child) {
                push_block(builder, child, ctx, visited)?;
            }
        }
    } else if has_text(node) {
        return Err(Error::UnexpectedStructuralTag(format!(
            "{} inside a list",
            node.tag_name().name()
        )));
    }
    Ok(())
}

/// Build the list(s) starting at list item `first`, consuming the sibling
/// nodes that belong to them.
pub(crate) fn build_lists(
    first: roxmltree::Node,
    ctx: &ConversionContext,
    visited: &mut HashSet<NodeId>,
) -> Result<Vec<Element>> {
    let mut builder = ListBuilder::new(ctx);

    for step in ListRun::new(first, ctx) {
        let node = match step {
            RunNode::Member(node) | RunNode::Skipped(node) if visited.contains(&node.id()) => {
                break;
            }
            RunNode::Member(node) => {
                push_block(&mut builder, node, ctx, visited)?;
                node
            }
            // An empty item belongs to this list. Other text-less nodes,
            // such as image-only paragraphs, are left for the caller.
            RunNode::Skipped(node) if is_li(node, ctx) => node,
            RunNode::Skipped(_) => continue,
        };
        mark_visited(node, visited);
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConvertOptions;
    use crate::docx::build_context;
    use crate::namespace::WML_NS;
    use std::collections::HashMap;

    fn empty_context() -> ConversionContext {
        let xml = format!(r#"<w:document xmlns:w="{WML_NS}"><w:body/></w:document>"#);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        build_context(&doc, None, None, None, &HashMap::new(), &ConvertOptions::default())
    }

    fn fold(items: &[(u32, &str, &str)]) -> String {
        let ctx = empty_context();
        let mut builder = ListBuilder::new(&ctx);
        for &(level, num_id, text) in items {
            builder.push_item(level, Some(num_id), Node::Raw(text.to_string()));
        }
        builder.finish().iter().map(Element::to_html).collect()
    }

    #[test]
    fn increasing_levels_nest_inside_previous_item() {
        assert_eq!(
            fold(&[(0, "1", "A"), (1, "1", "B"), (2, "1", "C"), (0, "1", "D")]),
            concat!(
                r#"<ol data-list-type="decimal"><li>A"#,
                r#"<ol data-list-type="decimal"><li>B"#,
                r#"<ol data-list-type="decimal"><li>C</li></ol>"#,
                "</li></ol></li><li>D</li></ol>"
            )
        );
    }

    #[test]
    fn skipped_levels_attach_to_nearest_open_list() {
        assert_eq!(
            fold(&[(1, "1", "AAA"), (3, "1", "BBB"), (2, "1", "CCC")]),
            concat!(
                r#"<ol data-list-type="decimal"><li>AAA"#,
                r#"<ol data-list-type="decimal"><li>BBB</li></ol>"#,
                r#"<ol data-list-type="decimal"><li>CCC</li></ol>"#,
                "</li></ol>"
            )
        );
    }

    #[test]
    fn list_id_change_at_same_level_starts_sibling_list() {
        assert_eq!(
            fold(&[(0, "1", "A"), (0, "2", "B")]),
            concat!(
                r#"<ol data-list-type="decimal"><li>A</li></ol>"#,
                r#"<ol data-list-type="decimal"><li>B</li></ol>"#
            )
        );
    }

    #[test]
    fn continuation_joins_previous_item() {
        let ctx = empty_context();
        let mut builder = ListBuilder::new(&ctx);
        builder.push_item(0, Some("1"), Node::Raw("A".into()));
        builder.push_continuation(Node::Raw("B".into()));
        builder.push_item(0, Some("1"), Node::Raw("C".into()));
        let html: String = builder.finish().iter().map(Element::to_html).collect();
        assert_eq!(
            html,
            r#"<ol data-list-type="decimal"><li>A<br />B</li><li>C</li></ol>"#
        );
    }
}

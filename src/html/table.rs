use std::collections::HashSet;

use roxmltree::NodeId;

use crate::docx::classify::is_li;
use crate::docx::{ConversionContext, collect_block_nodes};
use crate::error::Result;
use crate::namespace::Namespaces;

use super::element::{Element, Node, push_joined};
use super::inline::paragraph_content;
use super::list::build_lists;
use super::mark_visited;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VMerge {
    Restart,
    Continue,
}

fn v_merge(tc: roxmltree::Node, ns: &Namespaces) -> Option<VMerge> {
    let merge = ns.w(tc, "tcPr").and_then(|pr| ns.w(pr, "vMerge"))?;
    match ns.attr(merge, "w", "val") {
        Some("restart") => Some(VMerge::Restart),
        _ => Some(VMerge::Continue),
    }
}

fn grid_span(tc: roxmltree::Node, ns: &Namespaces) -> u32 {
    ns.w(tc, "tcPr")
        .and_then(|pr| ns.w_val(pr, "gridSpan"))
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&span| span > 0)
        .unwrap_or(1)
}

fn rows<'a>(table: roxmltree::Node<'a, 'a>, ns: &Namespaces) -> Vec<Vec<roxmltree::Node<'a, 'a>>> {
    collect_block_nodes(table, ns)
        .into_iter()
        .filter(|n| ns.is_w(*n, "tr"))
        .map(|tr| {
            collect_block_nodes(tr, ns)
                .into_iter()
                .filter(|n| ns.is_w(*n, "tc"))
                .collect()
        })
        .collect()
}

/// Cell starting at grid column `column`, if one does.
fn cell_at<'a>(
    cells: &[roxmltree::Node<'a, 'a>],
    column: u32,
    ns: &Namespaces,
) -> Option<roxmltree::Node<'a, 'a>> {
    let mut current: u32 = 0;
    for &tc in cells {
        if current == column {
            return Some(tc);
        }
        current = current.saturating_add(grid_span(tc, ns));
    }
    None
}

/// Row span of every merge-restart cell, in row-major order.
fn row_spans(rows: &[Vec<roxmltree::Node>], ns: &Namespaces) -> Vec<u32> {
    let mut spans = Vec::new();
    for (row_index, cells) in rows.iter().enumerate() {
        let mut column: u32 = 0;
        for &tc in cells {
            if v_merge(tc, ns) == Some(VMerge::Restart) {
                let mut span = 1;
                for below in &rows[row_index + 1..] {
                    match cell_at(below, column, ns).and_then(|c| v_merge(c, ns)) {
                        Some(VMerge::Continue) => span += 1,
                        _ => break,
                    }
                }
                spans.push(span);
            }
            column = column.saturating_add(grid_span(tc, ns));
        }
    }
    spans
}

fn cell_fragments(
    tc: roxmltree::Node,
    ctx: &ConversionContext,
    visited: &mut HashSet<NodeId>,
) -> Result<Vec<Node>> {
    let ns = &ctx.ns;
    let mut fragments = Vec::new();
    for child in collect_block_nodes(tc, ns) {
        // Lists consume the siblings that follow their first item.
        if visited.contains(&child.id()) {
            continue;
        }
        if is_li(child, ctx) {
            for list in build_lists(child, ctx, visited)? {
                fragments.push(list.into());
            }
        } else if ns.is_w(child, "tbl") {
            fragments.push(build_table(child, ctx, visited)?.into());
        } else if ns.is_w(child, "tcPr") {
            continue;
        } else if let Some(content) = paragraph_content(child, ctx, true)? {
            fragments.push(Node::Raw(content));
        }
    }
    Ok(fragments)
}

/// Render a `w:tbl` with its row and column spans. Every node of the
/// table is marked visited.
pub(crate) fn build_table(
    table: roxmltree::Node,
    ctx: &ConversionContext,
    visited: &mut HashSet<NodeId>,
) -> Result<Element> {
    let ns = &ctx.ns;
    let rows = rows(table, ns);
    let mut spans = row_spans(&rows, ns).into_iter();

    let mut table_el = Element::new("table");
    for cells in &rows {
        let mut tr = Element::new("tr");
        for &tc in cells {
            let merge = v_merge(tc, ns);
            if merge == Some(VMerge::Continue) {
                continue;
            }
            let mut td = Element::new("td");
            push_joined(&mut td, cell_fragments(tc, ctx, visited)?);

            let colspan = grid_span(tc, ns);
            if colspan > 1 {
                td.set_attribute("colspan", colspan.to_string());
            }
            if merge == Some(VMerge::Restart)
                && let Some(rowspan) = spans.next()
            {
                td.set_attribute("rowspan", rowspan.to_string());
            }
            tr.push(td);
        }
        table_el.push(tr);
    }

    mark_visited(table, visited);
    Ok(table_el)
}

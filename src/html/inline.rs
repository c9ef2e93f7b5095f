//! Inline content of paragraphs: runs, hyperlinks and images.

use std::path::Path;

use crate::docx::ConversionContext;
use crate::docx::classify::{
    has_text, heading, is_bold, is_italic, is_underlined, whole_line_styled,
};
use crate::docx::image_id;
use crate::error::{Error, Result};
use crate::media;

use super::element::Element;

/// Styling already conveyed by the surrounding element.
#[derive(Clone, Copy, Debug, Default)]
struct Strip {
    bold: bool,
    italic: bool,
}

impl Strip {
    const ALL: Strip = Strip {
        bold: true,
        italic: true,
    };
}

/// WML containers whose children are rendered in place.
const TRANSPARENT_WRAPPERS: &[&str] = &["ins", "smartTag", "moveTo", "fldSimple", "customXml"];

/// Tags the renderer accepts as a paragraph-like root.
const CONTENT_ROOTS: &[&str] = &["p", "ins", "smartTag", "hyperlink"];

/// Paragraph and run children that are never rendered, even with text inside.
const NEVER_RENDERED: &[&str] = &[
    "pPr",
    "rPr",
    "del",
    "moveFrom",
    "instrText",
    "delText",
    "delInstrText",
    "object",
];

/// Render the inline content of a paragraph-like node.
///
/// Returns `None` for nodes that do not carry inline content at all. When
/// the paragraph is a heading (and not inside a table cell), bold and italic
/// markup that covers the whole line is left out since the heading tag
/// already conveys it.
pub(crate) fn paragraph_content(
    node: roxmltree::Node,
    ctx: &ConversionContext,
    in_cell: bool,
) -> Result<Option<String>> {
    let is_root = ctx
        .ns
        .w_name(node)
        .is_some_and(|name| CONTENT_ROOTS.contains(&name));
    if !is_root {
        return Ok(None);
    }

    let mut strip = Strip::default();
    if !in_cell && heading(node, ctx).is_some() {
        let (bold, italic) = whole_line_styled(node, &ctx.ns);
        strip = Strip { bold, italic };
    }
    render_container(node, ctx, strip).map(Some)
}

fn render_container(
    node: roxmltree::Node,
    ctx: &ConversionContext,
    strip: Strip,
) -> Result<String> {
    let ns = &ctx.ns;
    let mut out = String::new();
    for child in node.children().filter(|n| n.is_element()) {
        // Math, markup-compatibility and other foreign elements are skipped.
        let Some(name) = ns.w_name(child) else {
            continue;
        };
        match name {
            "r" => out.push_str(&render_run(child, ctx, strip)?),
            "hyperlink" => out.push_str(&render_hyperlink(child, ctx)?),
            "sdt" => {
                if let Some(content) = ns.w(child, "sdtContent") {
                    out.push_str(&render_container(content, ctx, strip)?);
                }
            }
            _ if TRANSPARENT_WRAPPERS.contains(&name) => {
                out.push_str(&render_container(child, ctx, strip)?);
            }
            _ if NEVER_RENDERED.contains(&name) => {}
            _ if has_text(child) => {
                return Err(Error::UnsupportedContentTag(format!("w:{name}")));
            }
            _ => {}
        }
    }
    Ok(out)
}

fn render_run(r: roxmltree::Node, ctx: &ConversionContext, strip: Strip) -> Result<String> {
    let ns = &ctx.ns;
    let bold = !strip.bold && (is_bold(r, ns) || is_underlined(r, ns));
    let italic = !strip.italic && is_italic(r, ns);

    let mut out = String::new();
    for child in r.children().filter(|n| n.is_element()) {
        let Some(name) = ns.w_name(child) else {
            continue;
        };
        match name {
            "t" => {
                let text = child.text().unwrap_or_default();
                if text.is_empty() {
                    continue;
                }
                let mut html = html_escape::encode_text(text).into_owned();
                if bold {
                    html = format!("<strong>{html}</strong>");
                }
                if italic {
                    html = format!("<em>{html}</em>");
                }
                out.push_str(&html);
            }
            "br" => out.push_str("<br />"),
            "drawing" | "pict" => out.push_str(&render_image(child, ctx)),
            _ if NEVER_RENDERED.contains(&name) => {}
            _ if has_text(child) => {
                return Err(Error::UnsupportedContentTag(format!(
                    "w:{name} is not a supported run child"
                )));
            }
            _ => {}
        }
    }
    Ok(out)
}

fn render_hyperlink(node: roxmltree::Node, ctx: &ConversionContext) -> Result<String> {
    let content = render_container(node, ctx, Strip::ALL)?;
    if content.trim().is_empty() {
        return Ok(String::new());
    }
    let Some(href) = ctx
        .ns
        .attr(node, "r", "id")
        .and_then(|id| ctx.relationships.get(id))
    else {
        return Ok(String::new());
    };
    Ok(Element::new("a")
        .with_attribute("href", href)
        .with_raw(content)
        .to_html())
}

fn render_image(node: roxmltree::Node, ctx: &ConversionContext) -> String {
    let Some(id) = image_id(node, &ctx.ns) else {
        return String::new();
    };
    let Some(target) = ctx.relationships.get(id) else {
        return String::new();
    };

    let size = ctx
        .image_sizes
        .get(id)
        .copied()
        .or_else(|| media::read_size(Path::new(target)));

    let mut img = Element::new("img").with_attribute("src", ctx.image_src(id));
    match size {
        Some(size) if !size.has_zero() => {
            img = img
                .with_attribute("height", size.height.to_string())
                .with_attribute("width", size.width.to_string());
        }
        _ => log::debug!("No usable size for image {id}, omitting dimensions"),
    }
    img.to_html()
}

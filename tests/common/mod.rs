#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use docxide_html::{ConvertOptions, build_context, render_html};

const NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:v="urn:schemas-microsoft-com:vml""#,
);

/// Full `word/document.xml` around `body`.
pub fn xml(body: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:document {NAMESPACES}><w:body>{body}</w:body></w:document>"#)
}

#[derive(Clone, Copy, Default)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

pub const PLAIN: RunStyle = RunStyle {
    bold: false,
    italic: false,
    underline: false,
};

pub const BOLD: RunStyle = RunStyle {
    bold: true,
    italic: false,
    underline: false,
};

pub const ITALIC: RunStyle = RunStyle {
    bold: false,
    italic: true,
    underline: false,
};

pub fn r_styled(text: &str, style: RunStyle) -> String {
    let mut rpr = String::new();
    if style.bold {
        rpr.push_str("<w:b/>");
    }
    if style.italic {
        rpr.push_str("<w:i/>");
    }
    if style.underline {
        rpr.push_str(r#"<w:u w:val="single"/>"#);
    }
    let rpr = if rpr.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{rpr}</w:rPr>")
    };
    format!(r#"<w:r>{rpr}<w:t xml:space="preserve">{text}</w:t></w:r>"#)
}

pub fn r_tag(text: &str) -> String {
    r_styled(text, PLAIN)
}

pub fn r_break() -> String {
    "<w:r><w:br/></w:r>".to_string()
}

pub fn p_runs(runs: &[String]) -> String {
    format!("<w:p>{}</w:p>", runs.concat())
}

pub fn p_tag(text: &str) -> String {
    p_runs(&[r_tag(text)])
}

pub fn p_styled(style_id: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{style_id}"/></w:pPr>{}</w:p>"#,
        r_tag(text)
    )
}

pub fn li_styled(text: &str, ilvl: u32, num_id: u32, style: RunStyle) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{ilvl}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr>{}</w:p>"#,
        r_styled(text, style)
    )
}

pub fn li(text: &str, ilvl: u32, num_id: u32) -> String {
    li_styled(text, ilvl, num_id, PLAIN)
}

pub fn hyperlink(r_id: &str, runs: &[String]) -> String {
    format!(r#"<w:hyperlink r:id="{r_id}">{}</w:hyperlink>"#, runs.concat())
}

pub fn insert_tag(runs: &[String]) -> String {
    format!(r#"<w:ins w:id="1" w:author="x">{}</w:ins>"#, runs.concat())
}

pub fn smart_tag(runs: &[String]) -> String {
    format!(r#"<w:smartTag w:element="x">{}</w:smartTag>"#, runs.concat())
}

pub fn sect_pr(content: &str) -> String {
    format!("<w:sectPr>{content}</w:sectPr>")
}

/// Cell with optional `w:tcPr` content.
pub fn tc(props: &str, content: &str) -> String {
    if props.is_empty() {
        format!("<w:tc>{content}</w:tc>")
    } else {
        format!("<w:tc><w:tcPr>{props}</w:tcPr>{content}</w:tc>")
    }
}

pub fn tr(cells: &[String]) -> String {
    format!("<w:tr>{}</w:tr>", cells.concat())
}

pub fn table(rows: &[String]) -> String {
    format!("<w:tbl><w:tblPr/>{}</w:tbl>", rows.concat())
}

/// Grid of single-paragraph cells.
pub fn simple_table(texts: &[&[&str]]) -> String {
    let rows: Vec<String> = texts
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|t| tc("", &p_tag(t))).collect();
            tr(&cells)
        })
        .collect();
    table(&rows)
}

/// Inline drawing whose picture transform declares `size` (in pixels).
pub fn drawing(r_id: &str, size: Option<(u32, u32)>) -> String {
    let xfrm = size
        .map(|(w, h)| {
            format!(
                r#"<a:xfrm><a:off x="0" y="0"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
                u64::from(w) * 9525,
                u64::from(h) * 9525
            )
        })
        .unwrap_or_default();
    format!(
        r#"<w:p><w:r><w:drawing><wp:inline><wp:docPr id="1" name="Picture 1"/><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="{r_id}"/></pic:blipFill><pic:spPr>{xfrm}</pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#
    )
}

pub fn pict(r_id: Option<&str>) -> String {
    let attr = r_id.map(|id| format!(r#" r:id="{id}""#)).unwrap_or_default();
    format!(
        r#"<w:p><w:r><w:pict><v:shape style="width:3pt;height:3pt"><v:imagedata{attr}/></v:shape></w:pict></w:r></w:p>"#
    )
}

pub fn numbering_xml(nums: &[(u32, &[(u32, &str)])]) -> String {
    let mut abstracts = String::new();
    let mut instances = String::new();
    for (i, (num_id, levels)) in nums.iter().enumerate() {
        let lvls: String = levels
            .iter()
            .map(|(ilvl, fmt)| {
                format!(r#"<w:lvl w:ilvl="{ilvl}"><w:start w:val="1"/><w:numFmt w:val="{fmt}"/></w:lvl>"#)
            })
            .collect();
        abstracts.push_str(&format!(
            r#"<w:abstractNum w:abstractNumId="{i}">{lvls}</w:abstractNum>"#
        ));
        instances.push_str(&format!(
            r#"<w:num w:numId="{num_id}"><w:abstractNumId w:val="{i}"/></w:num>"#
        ));
    }
    format!(r#"<w:numbering {NAMESPACES}>{abstracts}{instances}</w:numbering>"#)
}

pub fn style(id: &str, name: &str, size: Option<u32>, based_on: Option<&str>) -> String {
    let based_on = based_on
        .map(|b| format!(r#"<w:basedOn w:val="{b}"/>"#))
        .unwrap_or_default();
    let rpr = size
        .map(|s| format!(r#"<w:rPr><w:sz w:val="{s}"/></w:rPr>"#))
        .unwrap_or_default();
    format!(
        r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/>{based_on}{rpr}</w:style>"#
    )
}

pub fn styles_xml(styles: &[String]) -> String {
    format!(r#"<w:styles {NAMESPACES}>{}</w:styles>"#, styles.concat())
}

pub fn rels_xml(rels: &[(&str, &str)]) -> String {
    let entries: String = rels
        .iter()
        .map(|(id, target)| {
            format!(
                r#"<Relationship Id="{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{target}"/>"#
            )
        })
        .collect();
    format!(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{entries}</Relationships>"#
    )
}

/// The auxiliary parts handed to the renderer alongside `document.xml`.
#[derive(Default)]
pub struct Parts {
    pub numbering: Option<String>,
    pub styles: Option<String>,
    pub rels: Option<String>,
}

fn parse_part(xml: &Option<String>) -> Option<roxmltree::Document<'_>> {
    xml.as_deref()
        .map(|xml| roxmltree::Document::parse(xml).expect("auxiliary part"))
}

pub fn try_render_with(
    body: &str,
    parts: &Parts,
    options: &ConvertOptions,
) -> docxide_html::Result<String> {
    let document_xml = xml(body);
    let document = roxmltree::Document::parse(&document_xml).expect("document.xml");
    let numbering = parse_part(&parts.numbering);
    let styles = parse_part(&parts.styles);
    let rels = parse_part(&parts.rels);
    let ctx = build_context(
        &document,
        numbering.as_ref(),
        styles.as_ref(),
        rels.as_ref(),
        &HashMap::new(),
        options,
    );
    render_html(&document, &ctx)
}

pub fn render_with(body: &str, parts: &Parts) -> String {
    try_render_with(body, parts, &ConvertOptions::default()).expect("render")
}

pub fn render(body: &str) -> String {
    render_with(body, &Parts::default())
}

/// Strip the indentation and newlines of a readable expected-output literal.
pub fn compact(html: &str) -> String {
    html.lines().map(str::trim).collect()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(width, height)).expect("write png");
    path
}

/// Zip `parts` into an in-memory DOCX.
pub fn docx_bytes(parts: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in parts {
        zip.start_file(*name, options).expect("start zip entry");
        zip.write_all(data).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

pub fn write_docx(dir: &Path, name: &str, parts: &[(&str, Vec<u8>)]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, docx_bytes(parts)).expect("write docx");
    path
}

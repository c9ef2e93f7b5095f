use std::collections::{HashMap, HashSet};

use crate::model::{HeadingTag, ParsedStyle};
use crate::namespace::Namespaces;

use super::classify::{has_list_marker, natural_header};

/// Paragraph styles keyed by `w:styleId`.
#[derive(Clone, Debug, Default)]
pub struct StyleTable {
    styles: HashMap<String, ParsedStyle>,
}

impl StyleTable {
    pub fn get(&self, style_id: &str) -> Option<&ParsedStyle> {
        self.styles.get(style_id)
    }

    pub fn header(&self, style_id: &str) -> Option<HeadingTag> {
        self.styles.get(style_id).and_then(|s| s.header)
    }

    /// Effective font size of a style, following `basedOn` links until a size
    /// is found. Missing parents, self references and longer cycles all end
    /// the walk with `None`.
    pub fn font_size(&self, style_id: &str) -> Option<u32> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = self.styles.get(style_id)?;
        loop {
            if let Some(size) = current.font_size {
                return Some(size);
            }
            if !seen.insert(current.id.as_str()) {
                return None;
            }
            let parent = current.based_on.as_deref()?;
            if parent == current.id {
                return None;
            }
            current = self.styles.get(parent)?;
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.styles.len()
    }
}

impl FromIterator<ParsedStyle> for StyleTable {
    fn from_iter<I: IntoIterator<Item = ParsedStyle>>(iter: I) -> Self {
        Self {
            styles: iter.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }
}

pub(crate) fn parse_styles(xml: Option<&roxmltree::Document>) -> StyleTable {
    let Some(xml) = xml else {
        return StyleTable::default();
    };
    let ns = Namespaces::from_document(xml);

    let mut styles = HashMap::new();
    for style_node in xml.root_element().children() {
        if !ns.is_w(style_node, "style") {
            continue;
        }
        let Some(style_id) = ns.attr(style_node, "w", "styleId") else {
            continue;
        };
        let Some(name) = ns.w_val(style_node, "name") else {
            continue;
        };

        let font_size = ns
            .w(style_node, "rPr")
            .and_then(|rpr| ns.w_val(rpr, "sz"))
            .and_then(|v| v.parse::<u32>().ok());

        let based_on = ns.w_val(style_node, "basedOn").map(|s| s.to_string());

        styles.insert(
            style_id.to_string(),
            ParsedStyle {
                id: style_id.to_string(),
                header: HeadingTag::from_style_name(name),
                font_size,
                based_on,
            },
        );
    }

    log::debug!("Parsed {} paragraph styles", styles.len());
    StyleTable { styles }
}

/// Font size of a paragraph: the first run's explicit `w:sz`, else whatever
/// the paragraph style chain resolves to.
pub(crate) fn paragraph_font_size(
    p: roxmltree::Node,
    ns: &Namespaces,
    styles: &StyleTable,
) -> Option<u32> {
    if !ns.is_w(p, "p") {
        return None;
    }
    let explicit = ns
        .w(p, "r")
        .and_then(|r| ns.w(r, "rPr"))
        .and_then(|rpr| ns.w_val(rpr, "sz"));
    if let Some(sz) = explicit {
        return sz.parse().ok();
    }
    let style_id = ns.w(p, "pPr").and_then(|ppr| ns.w_val(ppr, "pStyle"))?;
    styles.font_size(style_id)
}

/// How often each font size is used by ordinary body paragraphs.
#[derive(Clone, Debug, Default)]
pub struct FontSizeHistogram {
    // Insertion order is kept so ties resolve to the first size seen.
    counts: Vec<(u32, usize)>,
}

impl FontSizeHistogram {
    pub(crate) fn record(&mut self, size: u32) {
        match self.counts.iter_mut().find(|(s, _)| *s == size) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((size, 1)),
        }
    }

    /// The most used size, taken to be the body text size.
    pub fn modal(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for &(size, count) in &self.counts {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((size, count));
            }
        }
        best.map(|(size, _)| size)
    }

    /// Any size larger than the body text size reads as a heading.
    pub fn heading_for(&self, size: u32) -> Option<HeadingTag> {
        let modal = self.modal()?;
        (size > modal).then_some(HeadingTag::H2)
    }
}

pub(crate) fn font_size_histogram(
    doc: &roxmltree::Document,
    ns: &Namespaces,
    styles: &StyleTable,
) -> FontSizeHistogram {
    let mut histogram = FontSizeHistogram::default();
    for p in doc.descendants().filter(|n| ns.is_w(*n, "p")) {
        if natural_header(p, ns, styles).is_some() || has_list_marker(p, ns) {
            continue;
        }
        if let Some(size) = paragraph_font_size(p, ns, styles) {
            histogram.record(size);
        }
    }
    histogram
}

use std::collections::HashMap;
use std::path::PathBuf;

use crate::media;
use crate::model::ImageSize;
use crate::namespace::Namespaces;

/// English Metric Units per screen pixel at 96 dpi.
pub const EMUS_PER_PIXEL: u64 = 9525;

/// Vector and metafile images browsers cannot show inline.
pub const IMAGE_EXTENSIONS_TO_SKIP: &[&str] = &["emf", "wmf", "svg"];

/// Relationship id to target: a hyperlink URL or a local image path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relationships {
    targets: HashMap<String, String>,
}

impl Relationships {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.targets.get(id).map(String::as_str)
    }

    pub(crate) fn insert(&mut self, id: impl Into<String>, target: impl Into<String>) {
        self.targets.insert(id.into(), target.into());
    }

    pub(crate) fn len(&self) -> usize {
        self.targets.len()
    }
}

fn has_skipped_extension(target: &str) -> bool {
    std::path::Path::new(target)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS_TO_SKIP.iter().any(|skip| e.eq_ignore_ascii_case(skip)))
}

/// Build the relationship table from `document.xml.rels`.
///
/// Targets that name an extracted media file are replaced by the path of
/// the (possibly normalized) file on disk.
pub(crate) fn parse_relationships(
    xml: Option<&roxmltree::Document>,
    media: &HashMap<String, PathBuf>,
    image_sizes: &HashMap<String, ImageSize>,
) -> Relationships {
    let mut rels = Relationships::default();
    let Some(xml) = xml else {
        return rels;
    };
    for node in xml.descendants().filter(|n| n.is_element()) {
        let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) else {
            continue;
        };
        if has_skipped_extension(target) {
            log::debug!("Skipping relationship {id}: unsupported image {target}");
            continue;
        }
        // Some writers use package-absolute targets ("/word/media/image1.png").
        let media_file = media
            .get(target)
            .or_else(|| target.strip_prefix("/word/").and_then(|t| media.get(t)));
        let resolved = match media_file {
            Some(path) => media::normalize_image(path, image_sizes.get(id).copied())
                .to_string_lossy()
                .into_owned(),
            None => target.to_string(),
        };
        rels.insert(id, resolved);
    }
    rels
}

/// Relationship id of the picture inside a `w:drawing` or `w:pict`.
pub fn image_id<'a>(node: roxmltree::Node<'a, 'a>, ns: &Namespaces) -> Option<&'a str> {
    if !(ns.is_w(node, "drawing") || ns.is_w(node, "pict")) {
        return None;
    }
    node.descendants().find_map(|el| {
        if let Some(id) = ns.attr(el, "r", "embed") {
            return Some(id);
        }
        if ns.is(el, "v", "imagedata") {
            return ns.attr(el, "r", "id");
        }
        None
    })
}

fn emu_to_px(value: Option<&str>) -> Option<u32> {
    let emu: u64 = value?.trim().parse().ok()?;
    u32::try_from(emu / EMUS_PER_PIXEL).ok()
}

fn extent_size(node: roxmltree::Node) -> Option<ImageSize> {
    Some(ImageSize::new(
        emu_to_px(node.attribute("cx"))?,
        emu_to_px(node.attribute("cy"))?,
    ))
}

/// Declared pixel size of every drawing, keyed by image relationship id.
///
/// The shape transform (`a:xfrm/a:ext`) wins over the inline extent
/// (`wp:extent`).
pub(crate) fn image_sizes(
    doc: &roxmltree::Document,
    ns: &Namespaces,
) -> HashMap<String, ImageSize> {
    let mut sizes = HashMap::new();
    for drawing in doc.descendants().filter(|n| ns.is_w(*n, "drawing")) {
        let Some(id) = image_id(drawing, ns) else {
            continue;
        };
        let from_xfrm = drawing
            .descendants()
            .filter(|n| ns.is(*n, "a", "xfrm"))
            .find_map(|xfrm| ns.child(xfrm, "a", "ext").and_then(extent_size));
        let size = from_xfrm.or_else(|| {
            ns.descendant(drawing, "wp", "extent")
                .and_then(extent_size)
        });
        if let Some(size) = size {
            sizes.insert(id.to_string(), size);
        }
    }
    sizes
}

//! Document metadata: everything read once per document before rendering.

pub mod classify;
mod numbering;
mod relationships;
mod styles;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ConvertOptions;
use crate::media;
use crate::model::ImageSize;
use crate::namespace::Namespaces;

pub use numbering::NumberingTable;
pub use relationships::{EMUS_PER_PIXEL, IMAGE_EXTENSIONS_TO_SKIP, Relationships, image_id};
pub use styles::{FontSizeHistogram, StyleTable};

pub(crate) use numbering::parse_numbering;
pub(crate) use relationships::{image_sizes, parse_relationships};
pub(crate) use styles::{font_size_histogram, parse_styles};

/// Produces the `src` attribute of an image from its relationship id.
pub type ImageHandler = Arc<dyn Fn(&str, &Relationships) -> String + Send + Sync>;

/// Read-only lookup tables shared by every renderer for one document.
pub struct ConversionContext {
    pub(crate) ns: Namespaces,
    pub(crate) styles: StyleTable,
    pub(crate) numbering: NumberingTable,
    pub(crate) relationships: Relationships,
    pub(crate) font_sizes: FontSizeHistogram,
    pub(crate) image_sizes: HashMap<String, ImageSize>,
    pub(crate) image_handler: ImageHandler,
    pub(crate) detect_font_size: bool,
}

impl ConversionContext {
    /// `src` for an image relationship, as chosen by the image handler.
    pub(crate) fn image_src(&self, image_id: &str) -> String {
        (self.image_handler)(image_id, &self.relationships)
    }
}

/// Build the conversion context for one document.
///
/// `media` maps package-relative media names (`media/image1.png`) to the
/// files they were extracted to. Images referenced through it are
/// normalized on disk as a side effect.
pub fn build_context(
    document: &roxmltree::Document,
    numbering: Option<&roxmltree::Document>,
    styles: Option<&roxmltree::Document>,
    relationships: Option<&roxmltree::Document>,
    media: &HashMap<String, PathBuf>,
    options: &ConvertOptions,
) -> ConversionContext {
    let ns = Namespaces::from_document(document);
    let numbering = parse_numbering(numbering);
    let styles = parse_styles(styles);
    let image_sizes = image_sizes(document, &ns);
    let relationships = parse_relationships(relationships, media, &image_sizes);
    let font_sizes = if options.detect_font_size {
        font_size_histogram(document, &ns, &styles)
    } else {
        FontSizeHistogram::default()
    };
    let image_handler: ImageHandler = match &options.image_handler {
        Some(handler) => Arc::clone(handler),
        None => Arc::new(media::default_image_handler),
    };

    log::debug!(
        "Context: {} styles, {} relationships, {} sized images",
        styles.len(),
        relationships.len(),
        image_sizes.len(),
    );

    ConversionContext {
        ns,
        styles,
        numbering,
        relationships,
        font_sizes,
        image_sizes,
        image_handler,
        detect_font_size: options.detect_font_size,
    }
}

/// Flatten SDT wrappers: descend into w:sdtContent and collect effective children.
pub(crate) fn collect_block_nodes<'a>(
    parent: roxmltree::Node<'a, 'a>,
    ns: &Namespaces,
) -> Vec<roxmltree::Node<'a, 'a>> {
    let mut nodes = Vec::new();
    for child in parent.children().filter(|n| n.is_element()) {
        if ns.is_w(child, "sdt") {
            if let Some(content) = ns.w(child, "sdtContent") {
                nodes.extend(collect_block_nodes(content, ns));
            }
        } else {
            nodes.push(child);
        }
    }
    nodes
}

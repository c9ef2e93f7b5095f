pub mod converters;
mod docx;
mod error;
mod html;
pub mod media;
mod model;
mod namespace;
pub mod package;

pub use docx::classify;
pub use docx::{
    ConversionContext, EMUS_PER_PIXEL, FontSizeHistogram, IMAGE_EXTENSIONS_TO_SKIP, ImageHandler,
    NumberingTable, Relationships, StyleTable, build_context,
};
pub use error::{Error, Result};
pub use html::{Element, Node, render_document, render_html};
pub use model::{DEFAULT_LIST_NUMBERING_STYLE, HeadingTag, ImageSize, ListKind, ParsedStyle};
pub use namespace::Namespaces;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Converts a non-DOCX input (second argument) into a DOCX file at the
/// first argument.
pub type Converter = Arc<dyn Fn(&Path, &Path) -> std::io::Result<()> + Send + Sync>;

/// Produces the result for an input whose conversion to DOCX failed.
pub type Fallback = Arc<dyn Fn(&Path) -> Result<String> + Send + Sync>;

/// Knobs for [`convert`].
#[derive(Clone, Default)]
pub struct ConvertOptions {
    /// Rewrites image relationship targets into `src` values. Defaults to
    /// the target path itself.
    pub image_handler: Option<ImageHandler>,
    /// Used for inputs that are not DOCX (or HTML).
    pub converter: Option<Converter>,
    /// Called when the converter did not produce a DOCX file.
    pub fallback: Option<Fallback>,
    /// Promote paragraphs set in a larger than usual font to `h2`.
    pub detect_font_size: bool,
    /// Where embedded media is extracted. Defaults to the input's directory.
    pub media_dir: Option<PathBuf>,
}

fn parse_part<'a>(name: &str, xml: Option<&'a str>) -> Option<roxmltree::Document<'a>> {
    let xml = xml?;
    match roxmltree::Document::parse(xml) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("Ignoring malformed {name}: {e}");
            None
        }
    }
}

/// Convert an opened package to HTML.
pub fn convert_package(pkg: &package::Package, options: &ConvertOptions) -> Result<String> {
    let document = roxmltree::Document::parse(&pkg.document)?;
    let numbering = parse_part(package::NUMBERING_PART, pkg.numbering.as_deref());
    let styles = parse_part(package::STYLES_PART, pkg.styles.as_deref());
    let relationships = parse_part(package::RELATIONSHIPS_PART, pkg.relationships.as_deref());

    let ctx = build_context(
        &document,
        numbering.as_ref(),
        styles.as_ref(),
        relationships.as_ref(),
        &pkg.media,
        options,
    );
    render_html(&document, &ctx)
}

fn media_dir_for(input: &Path, options: &ConvertOptions) -> PathBuf {
    options.media_dir.clone().unwrap_or_else(|| {
        input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    })
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Convert the document at `path` to an HTML fragment.
///
/// HTML input is returned as is. Anything other than DOCX is first turned
/// into a DOCX file next to the input by `options.converter`.
pub fn convert(path: &Path, options: &ConvertOptions) -> Result<String> {
    if has_extension(path, "html") || has_extension(path, "htm") {
        return Ok(std::fs::read_to_string(path)?);
    }

    let docx_path = if has_extension(path, "docx") {
        path.to_path_buf()
    } else {
        let Some(converter) = &options.converter else {
            return Err(Error::NotNativeFormat);
        };
        let docx_path = converters::replace_ext(path, "docx");
        if let Err(e) = converter(&docx_path, path) {
            log::warn!("Converter failed on {}: {e}", path.display());
        }
        if !docx_path.is_file() {
            return match &options.fallback {
                Some(fallback) => fallback(path),
                None => Err(Error::ConversionFailed),
            };
        }
        docx_path
    };

    let pkg = package::open(&docx_path, &media_dir_for(&docx_path, options))?;
    convert_package(&pkg, options)
}

pub fn convert_docx_to_html(input: &Path, output: &Path) -> Result<()> {
    convert_docx_to_html_with(input, output, &ConvertOptions::default())
}

pub fn convert_docx_to_html_with(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<()> {
    let t0 = Instant::now();

    let pkg = package::open(input, &media_dir_for(input, options))?;
    let t_parse = t0.elapsed();

    let html = convert_package(&pkg, options)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &html).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        html.len(),
    );

    Ok(())
}

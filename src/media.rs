//! Raster image helpers: probing, normalization and the default `src` handler.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use image::ImageReader;
use image::imageops::FilterType;

use crate::docx::Relationships;
use crate::model::ImageSize;

/// Legacy raster formats that browsers do not reliably display; these are
/// re-encoded as GIF.
const CONVERT_TO_GIF: &[&str] = &["bmp", "dib", "tif", "tiff"];

/// Default image handler: the relationship target itself.
pub fn default_image_handler(image_id: &str, rels: &Relationships) -> String {
    rels.get(image_id).unwrap_or_default().to_string()
}

/// Pixel size of the image file at `path`, read from its header.
pub fn read_size(path: &Path) -> Option<ImageSize> {
    let (width, height) = ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    Some(ImageSize::new(width, height))
}

/// Bring an extracted image in line with the document: resize it to the
/// declared size and re-encode legacy formats as GIF.
///
/// Returns the path of the file to reference, which is `path` itself
/// whenever nothing had to change or anything failed.
pub fn normalize_image(path: &Path, size: Option<ImageSize>) -> PathBuf {
    if size.is_some_and(ImageSize::has_zero) {
        return path.to_path_buf();
    }
    match try_normalize(path, size) {
        Ok(normalized) => normalized,
        Err(e) => {
            log::debug!("Keeping {} as-is: {e}", path.display());
            path.to_path_buf()
        }
    }
}

fn try_normalize(path: &Path, size: Option<ImageSize>) -> image::ImageResult<PathBuf> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let Some(mut format) = reader.format() else {
        return Ok(path.to_path_buf());
    };
    let mut img = reader.decode()?;
    let mut changed = false;

    if let Some(size) = size
        && (img.width(), img.height()) != (size.width, size.height)
    {
        img = img.resize_exact(size.width, size.height, FilterType::Lanczos3);
        changed = true;
    }

    let mut out = path.to_path_buf();
    let is_legacy = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| CONVERT_TO_GIF.contains(&e.to_ascii_lowercase().as_str()));
    if is_legacy {
        format = ImageFormat::Gif;
        out.set_extension("gif");
        changed = true;
    }

    if changed {
        img.save_with_format(&out, format)?;
        log::debug!("Normalized image {} -> {}", path.display(), out.display());
    }
    Ok(out)
}

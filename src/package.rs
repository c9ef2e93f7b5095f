//! DOCX container access: the XML parts we render from and the embedded media.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const NUMBERING_PART: &str = "word/numbering.xml";
pub const STYLES_PART: &str = "word/styles.xml";
pub const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";
const MEDIA_PREFIX: &str = "word/media/";

/// Raw parts of a DOCX package plus the media files extracted from it.
#[derive(Debug, Default)]
pub struct Package {
    pub document: String,
    pub numbering: Option<String>,
    pub styles: Option<String>,
    pub relationships: Option<String>,
    /// `media/image1.png` (path relative to `word/`) to extracted file.
    pub media: HashMap<String, PathBuf>,
}

fn read_zip_text<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Option<String> {
    let mut content = String::new();
    zip.by_name(name).ok()?.read_to_string(&mut content).ok()?;
    Some(content)
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })
}

/// Open the package at `path`, extracting `word/media/*` below `media_dir`.
pub fn open(path: &Path, media_dir: &Path) -> Result<Package> {
    let file = open_file(path)?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|_| Error::MalformedContainer("file is not a ZIP archive".into()))?;
    read_package(&mut zip, media_dir)
}

pub(crate) fn read_package<R: Read + Seek>(
    zip: &mut zip::ZipArchive<R>,
    media_dir: &Path,
) -> Result<Package> {
    let document = read_zip_text(zip, DOCUMENT_PART).ok_or_else(|| {
        Error::MalformedContainer("missing word/document.xml (is this a DOCX file?)".into())
    })?;

    Ok(Package {
        document,
        numbering: read_zip_text(zip, NUMBERING_PART),
        styles: read_zip_text(zip, STYLES_PART),
        relationships: read_zip_text(zip, RELATIONSHIPS_PART),
        media: extract_media(zip, media_dir)?,
    })
}

fn extract_media<R: Read + Seek>(
    zip: &mut zip::ZipArchive<R>,
    media_dir: &Path,
) -> Result<HashMap<String, PathBuf>> {
    let mut media = HashMap::new();
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| Error::MalformedContainer(e.to_string()))?;
        let name = entry.name().to_string();
        if !name.starts_with(MEDIA_PREFIX) || entry.is_dir() {
            continue;
        }
        // Entries that would escape the media directory are ignored.
        let Some(relative) = entry.enclosed_name() else {
            log::warn!("Skipping media entry with unsafe path: {name}");
            continue;
        };
        let target = media_dir.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        std::io::copy(&mut entry, &mut out)?;
        media.insert(name["word/".len()..].to_string(), target);
    }
    log::debug!("Extracted {} media files to {}", media.len(), media_dir.display());
    Ok(media)
}

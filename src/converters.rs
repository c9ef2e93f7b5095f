//! Converters from other document formats to DOCX.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// `path` with its extension replaced; a leading dot on `ext` is optional.
///
/// `one/two/three.four.DOC` with `html` gives `one/two/three.four.html`.
pub fn replace_ext(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext.trim_start_matches('.'))
}

/// Convert `input_path` to DOCX at `docx_path` with AbiWord.
///
/// A non-zero exit is only logged: the caller decides what a missing output
/// file means.
pub fn abiword(docx_path: &Path, input_path: &Path) -> io::Result<()> {
    let status = Command::new("abiword")
        .arg("--to=docx")
        .arg("--to-name")
        .arg(docx_path)
        .arg(input_path)
        .status()?;
    if !status.success() {
        log::warn!("abiword exited with {status} converting {}", input_path.display());
    }
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{foundation::error::IdmarkResult, intake::upload::DocumentKind};

/// Base name used when the original name has none.
pub const FALLBACK_BASE_NAME: &str = "document";
/// Extension used for PDFs and for images whose name has no extension.
pub const FALLBACK_EXTENSION: &str = "png";
/// Inserted between the base name and the extension.
pub const NAME_SUFFIX: &str = "_watermarked";

/// A finished watermark ready to be saved.
#[derive(Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name, see [`download_file_name`].
    pub file_name: String,
    /// PNG-encoded image bytes.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("file_name", &self.file_name)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// File name offered for the watermarked version of `original`.
///
/// `passport.pdf` becomes `passport_watermarked.png`; `id.jpg` becomes `id_watermarked.jpg`;
/// `scan` becomes `scan_watermarked.png`.
pub fn download_file_name(original: &str, kind: DocumentKind) -> String {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, Some(ext)),
        Some((stem, _)) => (stem, None),
        None => (name, None),
    };

    let base = match (kind, ext) {
        (DocumentKind::Pdf, None) => FALLBACK_BASE_NAME,
        _ if stem.trim().is_empty() => FALLBACK_BASE_NAME,
        _ => stem,
    };
    let ext = match kind {
        DocumentKind::Pdf => FALLBACK_EXTENSION,
        DocumentKind::Image => ext.unwrap_or(FALLBACK_EXTENSION),
    };
    format!("{base}{NAME_SUFFIX}.{ext}")
}

/// Write `download` into `dir`, creating the directory if needed.
pub fn write_download(dir: &Path, download: &Download) -> IdmarkResult<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output dir '{}'", dir.display()))?;
    let path = dir.join(&download.file_name);
    std::fs::write(&path, &download.bytes)
        .with_context(|| format!("write '{}'", path.display()))?;
    tracing::info!(path = %path.display(), bytes = download.bytes.len(), "saved watermarked copy");
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/output/naming.rs"]
mod tests;

use std::path::Path;

use crate::foundation::error::{IdmarkError, IdmarkResult};

/// Largest accepted input, in bytes (20 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// MIME type of PDF documents.
pub const PDF_MIME: &str = "application/pdf";
/// MIME type of SVG images.
pub const SVG_MIME: &str = "image/svg+xml";

/// How an accepted document reaches the compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Any `image/*` type, decoded directly.
    Image,
    /// A PDF whose first page is rasterized.
    Pdf,
}

/// A user-selected file: name, declared type and contents.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name as selected.
    pub name: String,
    /// Declared MIME type.
    pub mime: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    /// Size of the contents in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Classify a declared MIME type. Parameters and case are ignored.
pub fn classify_mime(mime: &str) -> IdmarkResult<DocumentKind> {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence == PDF_MIME {
        return Ok(DocumentKind::Pdf);
    }
    match essence.split_once('/') {
        Some(("image", sub)) if !sub.is_empty() => Ok(DocumentKind::Image),
        _ => Err(IdmarkError::unsupported(mime.trim())),
    }
}

/// Check type, then size, of a prospective upload.
pub fn validate_upload(mime: &str, size: u64) -> IdmarkResult<DocumentKind> {
    let kind = classify_mime(mime)?;
    if size > MAX_UPLOAD_BYTES {
        return Err(IdmarkError::FileTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(kind)
}

/// Infer a MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(PDF_MIME.to_string()),
        "svg" => Some(SVG_MIME.to_string()),
        _ => image::ImageFormat::from_extension(&ext).map(|f| f.to_mime_type().to_string()),
    }
}

/// Read a file from disk after validating its declared type and size.
///
/// When `mime` is `None` it is inferred from the extension; an unknown extension is
/// `application/octet-stream` and therefore rejected.
pub fn read_upload(path: &Path, mime: Option<&str>) -> IdmarkResult<Upload> {
    let mime = mime
        .map(str::to_string)
        .or_else(|| mime_for_path(path))
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let meta = std::fs::metadata(path).map_err(|e| {
        IdmarkError::file_read(format!("failed to stat '{}': {e}", path.display()))
    })?;
    validate_upload(&mime, meta.len())?;

    let bytes = std::fs::read(path).map_err(|e| {
        IdmarkError::file_read(format!("failed to read '{}': {e}", path.display()))
    })?;
    // The file may have grown since it was stat'ed.
    validate_upload(&mime, bytes.len() as u64)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::debug!(name = %name, mime = %mime, size = bytes.len(), "read upload");
    Ok(Upload { name, mime, bytes })
}

#[cfg(test)]
#[path = "../../tests/unit/intake/upload.rs"]
mod tests;

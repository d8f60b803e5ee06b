use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::error::{IdmarkError, IdmarkResult};

/// Families tried, in order, when the database has no mapping for generic sans-serif.
const SANS_FALLBACK_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial",
    "Roboto",
    "Open Sans",
];

/// A single font face backing the watermark text.
#[derive(Clone)]
pub struct ResolvedFont {
    /// Raw font file bytes (may be a collection).
    pub bytes: Arc<Vec<u8>>,
    /// Face index within `bytes`.
    pub index: u32,
    /// Family name reported by the font database.
    pub family: String,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .finish()
    }
}

impl ResolvedFont {
    /// Load the first face of an explicit font file.
    pub fn from_file(path: &Path) -> IdmarkResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            IdmarkError::render(format!("failed to read font '{}': {e}", path.display()))
        })?;
        let mut db = usvg::fontdb::Database::new();
        db.load_font_data(bytes.clone());
        let face = db.faces().next().ok_or_else(|| {
            IdmarkError::render(format!("no font face found in '{}'", path.display()))
        })?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        Ok(Self {
            bytes: Arc::new(bytes),
            index: face.index,
            family,
        })
    }

    /// Find a bold sans-serif face among system fonts and `extra_dirs`.
    ///
    /// Returns `None` when no font at all is available.
    pub fn discover(extra_dirs: &[PathBuf]) -> Option<Self> {
        let db = build_fontdb(extra_dirs);
        let id = query_sans_bold(&db)?;
        let face = db.face(id)?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
        tracing::debug!(family = %family, index, "resolved watermark font");
        Some(Self {
            bytes: Arc::new(bytes),
            index,
            family,
        })
    }
}

/// Font database with system fonts plus any fonts found directly in `extra_dirs`.
pub(crate) fn build_fontdb(extra_dirs: &[PathBuf]) -> usvg::fontdb::Database {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in extra_dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    db
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}

fn query_sans_bold(db: &usvg::fontdb::Database) -> Option<usvg::fontdb::ID> {
    if let Some(id) = query_bold(db, &[usvg::fontdb::Family::SansSerif]) {
        return Some(id);
    }
    for name in SANS_FALLBACK_FAMILIES {
        if let Some(id) = query_bold(db, &[usvg::fontdb::Family::Name(name)]) {
            return Some(id);
        }
    }
    db.faces().next().map(|f| f.id)
}

fn query_bold(
    db: &usvg::fontdb::Database,
    families: &[usvg::fontdb::Family<'_>],
) -> Option<usvg::fontdb::ID> {
    db.query(&usvg::fontdb::Query {
        families,
        weight: usvg::fontdb::Weight::BOLD,
        ..Default::default()
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;

use std::io::Read;

use anyhow::Context as _;

use crate::foundation::error::IdmarkResult;

/// Text drawn when the configured text is empty or blank.
pub const DEFAULT_TEXT: &str = "CONFIDENTIAL";
/// Fill opacity of the watermark text.
pub const OPACITY: f32 = 0.35;
/// Straight RGB fill color of the watermark text (neutral gray).
pub const COLOR_RGB: [u8; 3] = [128, 128, 128];
/// Smallest font size in pixels, regardless of image size.
pub const MIN_FONT_SIZE_PX: f32 = 12.0;
/// `min(width, height)` is divided by this to derive the font size.
pub const FONT_SIZE_DIVISOR: f32 = 25.0;

/// What to stamp on a document.
///
/// Only the text is configurable. Color, opacity, weight and family are fixed.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WatermarkSpec {
    /// Requested text; blank falls back to [`DEFAULT_TEXT`].
    #[serde(default)]
    pub text: String,
}

impl WatermarkSpec {
    /// Spec with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a spec from JSON, e.g. `{"text": "COPY FOR BANK XYZ"}`.
    pub fn from_json_reader(reader: impl Read) -> IdmarkResult<Self> {
        let spec = serde_json::from_reader(reader).context("parse watermark spec JSON")?;
        Ok(spec)
    }

    /// Text actually drawn: trimmed, or [`DEFAULT_TEXT`] when nothing remains.
    pub fn effective_text(&self) -> &str {
        match self.text.trim() {
            "" => DEFAULT_TEXT,
            t => t,
        }
    }

    /// Fill color as straight RGBA8, alpha derived from [`OPACITY`].
    pub fn fill_rgba8(&self) -> [u8; 4] {
        let [r, g, b] = COLOR_RGB;
        [r, g, b, (OPACITY * 255.0).round() as u8]
    }
}

/// Font size in pixels for a `width x height` surface: `max(12, min(w, h) / 25)`.
pub fn font_size_px(width: u32, height: u32) -> f32 {
    let short_side = width.min(height) as f32;
    (short_side / FONT_SIZE_DIVISOR).max(MIN_FONT_SIZE_PX)
}

#[cfg(test)]
#[path = "../../tests/unit/watermark/spec.rs"]
mod tests;

use std::sync::Arc;

use crate::{
    foundation::{
        bitmap::Bitmap,
        error::{IdmarkError, IdmarkResult},
    },
    intake::decode::PageRasterizer,
};

/// Renders the first page of a PDF with hayro, a pure-Rust PDF interpreter.
///
/// One PDF point maps to `scale` pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfRasterizer;

impl PageRasterizer for PdfRasterizer {
    fn rasterize_first_page(&self, pdf: &[u8], scale: f32) -> IdmarkResult<Bitmap> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(IdmarkError::decode("PDF render scale must be finite and > 0"));
        }

        let pdf = hayro::Pdf::new(Arc::new(pdf.to_vec()))
            .map_err(|e| IdmarkError::decode(format!("parse PDF: {e:?}")))?;
        let pages = pdf.pages();
        let page = pages
            .first()
            .ok_or_else(|| IdmarkError::decode("PDF has no pages"))?;

        let settings = hayro::RenderSettings {
            x_scale: scale,
            y_scale: scale,
            ..Default::default()
        };
        let pixmap = hayro::render(page, &hayro::InterpreterSettings::default(), &settings);
        let bitmap = Bitmap::from_premul_rgba8(
            u32::from(pixmap.width()),
            u32::from(pixmap.height()),
            pixmap.data_as_u8_slice().to_vec(),
        )?;
        tracing::debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            scale,
            "rasterized PDF page 1"
        );
        Ok(bitmap)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/intake/pdf.rs"]
mod tests;

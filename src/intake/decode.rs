use std::sync::Arc;

use crate::{
    foundation::{
        bitmap::Bitmap,
        error::{IdmarkError, IdmarkResult},
    },
    intake::upload::{DocumentKind, SVG_MIME, Upload, classify_mime},
    text::font::build_fontdb,
};

/// Scale at which the first PDF page is rasterized.
pub const PDF_RENDER_SCALE: f32 = 2.0;

const MAX_SVG_DIM: u32 = 16_384;

/// Turns the first page of a PDF into a bitmap.
///
/// [`builtin_rasterizer`] returns the one this build ships with; embedders may supply their own.
pub trait PageRasterizer {
    /// Rasterize page 1 of `pdf` at `scale` times its natural size.
    fn rasterize_first_page(&self, pdf: &[u8], scale: f32) -> IdmarkResult<Bitmap>;
}

/// Rasterizer for builds without PDF support; every call fails with a decode error.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPdfRasterizer;

impl PageRasterizer for NoPdfRasterizer {
    fn rasterize_first_page(&self, _pdf: &[u8], _scale: f32) -> IdmarkResult<Bitmap> {
        Err(IdmarkError::decode("no PDF rasterizer is available"))
    }
}

/// The PDF rasterizer this build ships with: hayro with the `pdf` feature, otherwise
/// [`NoPdfRasterizer`].
pub fn builtin_rasterizer() -> &'static dyn PageRasterizer {
    #[cfg(feature = "pdf")]
    {
        &crate::intake::pdf::PdfRasterizer
    }
    #[cfg(not(feature = "pdf"))]
    {
        &NoPdfRasterizer
    }
}

/// Decode encoded raster image bytes into a premultiplied bitmap.
pub fn decode_image(bytes: &[u8]) -> IdmarkResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| IdmarkError::decode(format!("decode image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Parse SVG bytes and rasterize them at their intrinsic size.
pub fn rasterize_svg(bytes: &[u8]) -> IdmarkResult<Bitmap> {
    let opts = usvg::Options {
        fontdb: Arc::new(build_fontdb(&[])),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| IdmarkError::decode(format!("parse svg tree: {e}")))?;

    let size = tree.size();
    let to_px = |v: f32| -> IdmarkResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(IdmarkError::decode("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    };
    let (width, height) = (to_px(size.width())?, to_px(size.height())?);
    if width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(IdmarkError::decode(format!(
            "svg raster size too large: {width}x{height} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| IdmarkError::decode("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Bitmap::from_premul_rgba8(width, height, pixmap.take())
}

/// Decode an accepted upload into the bitmap the compositor works on.
#[tracing::instrument(skip(upload, rasterizer), fields(name = %upload.name, mime = %upload.mime))]
pub fn load_document(upload: &Upload, rasterizer: &dyn PageRasterizer) -> IdmarkResult<Bitmap> {
    let bitmap = match classify_mime(&upload.mime)? {
        DocumentKind::Pdf => rasterizer
            .rasterize_first_page(&upload.bytes, PDF_RENDER_SCALE)
            .map_err(|e| match e {
                IdmarkError::Decode(_) => e,
                other => IdmarkError::decode(format!("render PDF page 1: {other}")),
            })?,
        DocumentKind::Image if is_svg(&upload.mime) => rasterize_svg(&upload.bytes)?,
        DocumentKind::Image => decode_image(&upload.bytes)?,
    };
    tracing::info!(
        width = bitmap.width(),
        height = bitmap.height(),
        "document decoded"
    );
    Ok(bitmap)
}

fn is_svg(mime: &str) -> bool {
    mime.split(';')
        .next()
        .is_some_and(|m| m.trim().eq_ignore_ascii_case(SVG_MIME))
}

#[cfg(test)]
#[path = "../../tests/unit/intake/decode.rs"]
mod tests;

use std::io::Cursor;

use crate::foundation::{
    bitmap::Bitmap,
    error::{IdmarkError, IdmarkResult},
};

/// Serialize a bitmap as a straight-alpha RGBA8 PNG.
pub fn encode_png(bitmap: &Bitmap) -> IdmarkResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(
        bitmap.width(),
        bitmap.height(),
        bitmap.to_straight_rgba8(),
    )
    .ok_or_else(|| IdmarkError::render("invalid rgba buffer size"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| IdmarkError::render(format!("encode png: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;

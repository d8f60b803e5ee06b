use crate::foundation::error::{IdmarkError, IdmarkResult};

/// A rectangular raster in row-major premultiplied RGBA8.
///
/// Bitmaps are plain values: the compositor borrows its source and always returns a freshly
/// allocated bitmap, so a source is never modified in place.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba8_premul: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes_len", &self.rgba8_premul.len())
            .finish()
    }
}

impl Bitmap {
    /// Wrap premultiplied RGBA8 bytes. The byte length must be `width * height * 4`.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> IdmarkResult<Self> {
        if rgba8_premul.len() != byte_len(width, height) {
            return Err(IdmarkError::decode(format!(
                "bitmap byte length {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul,
        })
    }

    /// Wrap straight (non-premultiplied) RGBA8 bytes, premultiplying them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> IdmarkResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul_rgba8(width, height, rgba8)
    }

    /// A bitmap filled with one straight RGBA8 color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut px = rgba;
        premultiply_rgba8_in_place(&mut px);
        let rgba8_premul = px
            .iter()
            .copied()
            .cycle()
            .take(byte_len(width, height))
            .collect();
        Self {
            width,
            height,
            rgba8_premul,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied pixel bytes.
    pub fn as_premul_bytes(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied RGBA of the pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy out straight RGBA8 bytes, suitable for encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/bitmap.rs"]
mod tests;

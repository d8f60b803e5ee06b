//! Placement geometry for the tiled watermark.
//!
//! Tiles are laid out on an axis-aligned grid inside a frame that is centered on the surface
//! and rotated by -45°, which turns rows of text into diagonals. The grid spans the full surface
//! diagonal in both directions so every corner is covered after rotation.

use kurbo::{Affine, Point, Vec2};

/// Fraction of the measured text width used as the nominal row period along the diagonal.
pub const DENSITY_FACTOR: f64 = 0.7;
/// Lower bound on the number of rows across the diagonal.
pub const MIN_ROWS: f64 = 5.0;
/// Horizontal tile period as a multiple of the row period.
pub const COLUMN_SPACING: f64 = 2.5;
/// Rotation of the tiling frame, in radians.
pub const ROTATION_RAD: f64 = -std::f64::consts::FRAC_PI_4;

/// Tiling of one surface for one measured text width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TilePlan {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Length of the surface diagonal in pixels.
    pub diagonal: f64,
    /// Measured text width the plan was derived from.
    pub text_width: f64,
    /// Nominal repetitions along the diagonal before the [`MIN_ROWS`] floor.
    pub repetitions: f64,
    /// Distance between rows in the rotated frame.
    pub row_step: f64,
    /// Distance between tiles within a row in the rotated frame.
    pub column_step: f64,
    /// Number of rows.
    pub rows: usize,
    /// Number of tiles per row.
    pub columns: usize,
}

impl TilePlan {
    /// Plan the tiling of a `width x height` surface for text measuring `text_width` pixels.
    ///
    /// A non-finite or zero `text_width` is treated as one repetition per pixel of diagonal,
    /// which keeps every step finite.
    pub fn new(width: u32, height: u32, text_width: f64) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        let diagonal = (w * w + h * h).sqrt();

        let repetitions = if text_width.is_finite() && text_width > f64::EPSILON {
            (diagonal / (text_width * DENSITY_FACTOR)).ceil()
        } else {
            diagonal.ceil()
        };
        let row_step = diagonal / repetitions.max(MIN_ROWS);
        let column_step = row_step * COLUMN_SPACING;

        Self {
            width,
            height,
            diagonal,
            text_width,
            repetitions,
            row_step,
            column_step,
            rows: span_count(diagonal, row_step),
            columns: span_count(diagonal, column_step),
        }
    }

    /// Maps rotated-frame coordinates to surface coordinates.
    pub fn frame(&self) -> Affine {
        let center = Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0);
        Affine::translate(center) * Affine::rotate(ROTATION_RAD)
    }

    /// Total number of text placements.
    pub fn tile_count(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    /// Tile centers in the rotated frame, row by row.
    pub fn centers(&self) -> impl Iterator<Item = Point> + '_ {
        let half = self.diagonal / 2.0;
        (0..self.rows).flat_map(move |r| {
            let y = -half + (r as f64) * self.row_step;
            (0..self.columns).map(move |c| Point::new(-half + (c as f64) * self.column_step, y))
        })
    }
}

// Number of positions `-span/2 + i * step` strictly below `span/2`.
fn span_count(span: f64, step: f64) -> usize {
    if !(span.is_finite() && step.is_finite()) || span <= 0.0 || step <= 0.0 {
        return 0;
    }
    (span / step - 1e-9).ceil().max(0.0) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/watermark/tiling.rs"]
mod tests;

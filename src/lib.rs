//! idmark stamps a tiled, semi-transparent text watermark across identity-document images.
//!
//! Everything happens locally; documents are never sent anywhere.
//!
//! # Pipeline overview
//!
//! 1. **Intake**: a file name, declared MIME type and bytes (`Upload`) are validated
//!    (`image/*` or `application/pdf`, at most 20 MiB).
//! 2. **Decode**: images are decoded, SVGs rasterized, and the first page of a PDF is
//!    rasterized at 2x by a [`PageRasterizer`] (hayro with the default `pdf` feature).
//! 3. **Composite**: [`Compositor::composite`] renders the text along -45° diagonals into a
//!    transparent CPU layer, blends it over a copy of the source, then encodes PNG.
//! 4. **Save**: [`download_file_name`] names the result `<base>_watermarked.<ext>`.
//!
//! [`Session`] strings these steps together as an explicit state machine.
//!
//! # Invariants
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Same size out as in**: the output is never cropped or scaled.
//! - **Non-cumulative**: compositing always starts from the untouched source bitmap.
//! - **Premultiplied RGBA8** internally; PNG output is straight alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;
mod intake;
mod output;
mod render;
mod session;
mod text;
mod watermark;

pub use config::{ENV_FONT, ENV_FONT_DIRS, Settings};
pub use foundation::bitmap::Bitmap;
pub use foundation::error::{IdmarkError, IdmarkResult};
pub use intake::decode::{
    NoPdfRasterizer, PDF_RENDER_SCALE, PageRasterizer, builtin_rasterizer, decode_image,
    load_document, rasterize_svg,
};
#[cfg(feature = "pdf")]
pub use intake::pdf::PdfRasterizer;
pub use intake::upload::{
    DocumentKind, MAX_UPLOAD_BYTES, PDF_MIME, SVG_MIME, Upload, classify_mime, mime_for_path,
    read_upload, validate_upload,
};
pub use output::{Download, download_file_name, write_download};
pub use render::cpu::{Compositor, MAX_SURFACE_DIM, Measurement, OutputBitmap};
pub use render::encode::encode_png;
pub use session::{Document, LoadTicket, Session, SessionState};
pub use text::font::ResolvedFont;
pub use text::layout::{MeasuredText, TextBrushRgba8, TextLayoutEngine};
pub use watermark::spec::{
    COLOR_RGB, DEFAULT_TEXT, FONT_SIZE_DIVISOR, MIN_FONT_SIZE_PX, OPACITY, WatermarkSpec,
    font_size_px,
};
pub use watermark::tiling::{COLUMN_SPACING, DENSITY_FACTOR, MIN_ROWS, ROTATION_RAD, TilePlan};

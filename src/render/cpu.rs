use kurbo::{Affine, Vec2};

use crate::{
    config::Settings,
    foundation::{
        bitmap::Bitmap,
        error::{IdmarkError, IdmarkResult},
    },
    render::{composite::over_in_place, encode::encode_png},
    text::{
        font::ResolvedFont,
        layout::{MeasuredText, TextBrushRgba8, TextLayoutEngine},
    },
    watermark::{
        spec::{WatermarkSpec, font_size_px},
        tiling::TilePlan,
    },
};

/// Largest accepted surface edge in pixels.
pub const MAX_SURFACE_DIM: u32 = 16_384;

/// Resolved text metrics and tiling for one surface size.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Measurement {
    /// Text that is drawn.
    pub text: String,
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Measured advance width of `text`; 0 when no font is available.
    pub text_width: f32,
    /// Family of the font in use, if any.
    pub font_family: Option<String>,
    /// Placement of the text tiles.
    pub plan: TilePlan,
}

/// Result of compositing: the raster plus its PNG serialization.
#[derive(Clone, Debug)]
pub struct OutputBitmap {
    bitmap: Bitmap,
    png: Vec<u8>,
    measurement: Measurement,
}

impl OutputBitmap {
    /// The composited raster, same size as the source.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// PNG encoding of [`Self::bitmap`].
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Metrics the watermark was drawn with.
    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Give up the PNG bytes and keep the raster.
    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }
}

struct WatermarkFont {
    resolved: ResolvedFont,
    font: vello_cpu::peniko::FontData,
}

/// Draws tiled text watermarks onto bitmaps on the CPU.
///
/// The compositor keeps font and shaping caches between calls but no image state: every call
/// renders from the given source into a new surface.
pub struct Compositor {
    font: Option<WatermarkFont>,
    text_engine: TextLayoutEngine,
}

impl Compositor {
    /// Compositor drawing with `font`; `None` draws no text.
    pub fn new(font: Option<ResolvedFont>) -> Self {
        let font = font.map(|resolved| {
            let bytes = resolved.bytes.as_ref().clone();
            let font = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(bytes),
                resolved.index,
            );
            WatermarkFont { resolved, font }
        });
        Self {
            font,
            text_engine: TextLayoutEngine::new(),
        }
    }

    /// Compositor using the configured font file, or a discovered bold sans-serif face.
    pub fn from_settings(settings: &Settings) -> IdmarkResult<Self> {
        let font = match &settings.font_file {
            Some(path) => Some(ResolvedFont::from_file(path)?),
            None => ResolvedFont::discover(&settings.font_dirs),
        };
        if font.is_none() {
            tracing::warn!("no usable font found; watermark text will not be drawn");
        }
        Ok(Self::new(font))
    }

    /// Family name of the font in use.
    pub fn font_family(&self) -> Option<&str> {
        self.font.as_ref().map(|f| f.resolved.family.as_str())
    }

    /// Resolve text, font size, text width and tiling for a `width x height` surface.
    pub fn measure(
        &mut self,
        width: u32,
        height: u32,
        spec: &WatermarkSpec,
    ) -> IdmarkResult<Measurement> {
        let (measurement, _) = self.shape(width, height, spec)?;
        Ok(measurement)
    }

    /// Copy `source` onto a new surface and tile `spec`'s text diagonally across it.
    ///
    /// The text is rendered into its own transparent layer and blended over a copy of the
    /// source, so opaque source pixels stay opaque. Fails only when a surface of the source's
    /// size cannot be allocated.
    #[tracing::instrument(skip(self, source, spec), fields(width = source.width(), height = source.height()))]
    pub fn composite(
        &mut self,
        source: &Bitmap,
        spec: &WatermarkSpec,
    ) -> IdmarkResult<OutputBitmap> {
        let (w, h) = surface_dims(source)?;

        let (measurement, shaped) = self.shape(source.width(), source.height(), spec)?;
        tracing::debug!(
            font_size_px = measurement.font_size_px,
            text_width = measurement.text_width,
            rows = measurement.plan.rows,
            columns = measurement.plan.columns,
            "watermark geometry"
        );

        let mut rgba8_premul = source.as_premul_bytes().to_vec();
        match (&self.font, shaped) {
            (Some(font), Some(text)) if text.width > 0.0 => {
                let layer = render_text_layer(w, h, &measurement.plan, &text, &font.font);
                over_in_place(&mut rgba8_premul, layer.data_as_u8_slice())?;
            }
            _ => tracing::warn!(
                text = %measurement.text,
                "watermark text has no measurable width; output is the unmodified source"
            ),
        }

        let bitmap = Bitmap::from_premul_rgba8(source.width(), source.height(), rgba8_premul)
            .map_err(|e| IdmarkError::render(e.to_string()))?;
        let png = encode_png(&bitmap)?;

        tracing::info!(tiles = measurement.plan.tile_count(), "watermark applied");
        Ok(OutputBitmap {
            bitmap,
            png,
            measurement,
        })
    }

    fn shape(
        &mut self,
        width: u32,
        height: u32,
        spec: &WatermarkSpec,
    ) -> IdmarkResult<(Measurement, Option<MeasuredText>)> {
        let text = spec.effective_text();
        let font_size = font_size_px(width, height);
        let brush = TextBrushRgba8::from(spec.fill_rgba8());

        let shaped = match &self.font {
            Some(font) => Some(
                self.text_engine
                    .layout_line(text, &font.resolved, font_size, brush)?,
            ),
            None => None,
        };
        let text_width = shaped.as_ref().map_or(0.0, |t| t.width);

        let measurement = Measurement {
            text: text.to_string(),
            font_size_px: font_size,
            text_width,
            font_family: self.font_family().map(str::to_string),
            plan: TilePlan::new(width, height, f64::from(text_width)),
        };
        Ok((measurement, shaped))
    }
}

fn render_text_layer(
    w: u16,
    h: u16,
    plan: &TilePlan,
    text: &MeasuredText,
    font: &vello_cpu::peniko::FontData,
) -> vello_cpu::Pixmap {
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    draw_tiles(&mut ctx, plan, text, font);
    ctx.flush();

    let mut layer = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut layer);
    layer
}

fn draw_tiles(
    ctx: &mut vello_cpu::RenderContext,
    plan: &TilePlan,
    text: &MeasuredText,
    font: &vello_cpu::peniko::FontData,
) {
    let frame = plan.frame();
    // Anchor each layout at its horizontal center and vertical middle.
    let anchor = Vec2::new(f64::from(text.width) / 2.0, f64::from(text.height) / 2.0);

    for center in plan.centers() {
        let transform = frame * Affine::translate(center.to_vec2() - anchor);
        ctx.set_transform(affine_to_cpu(transform));

        for line in text.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn surface_dims(source: &Bitmap) -> IdmarkResult<(u16, u16)> {
    if source.is_empty() {
        return Err(IdmarkError::render(format!(
            "cannot allocate a {}x{} surface",
            source.width(),
            source.height()
        )));
    }
    if source.width() > MAX_SURFACE_DIM || source.height() > MAX_SURFACE_DIM {
        return Err(IdmarkError::render(format!(
            "surface size too large: {}x{} (max {MAX_SURFACE_DIM}x{MAX_SURFACE_DIM})",
            source.width(),
            source.height()
        )));
    }
    let w: u16 = source
        .width()
        .try_into()
        .map_err(|_| IdmarkError::render("surface width exceeds u16"))?;
    let h: u16 = source
        .height()
        .try_into()
        .map_err(|_| IdmarkError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

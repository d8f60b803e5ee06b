use std::sync::Arc;

use crate::{
    foundation::error::{IdmarkError, IdmarkResult},
    text::font::ResolvedFont,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<[u8; 4]> for TextBrushRgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// A shaped single-line layout and its extent in pixels.
pub struct MeasuredText {
    /// Shaped layout; glyph positions are relative to the layout's top-left corner.
    pub layout: parley::Layout<TextBrushRgba8>,
    /// Advance width of the line.
    pub width: f32,
    /// Line height.
    pub height: f32,
}

/// Shapes watermark text with Parley, registering each font once.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: Vec<(Arc<Vec<u8>>, String)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: Vec::new(),
        }
    }

    /// Shape `text` as one unbroken bold line at `size_px`.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> IdmarkResult<MeasuredText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(IdmarkError::render("text size_px must be finite and > 0"));
        }

        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let width = layout.width();
        let height = layout.height();
        Ok(MeasuredText {
            layout,
            width,
            height,
        })
    }

    fn family_for(&mut self, font: &ResolvedFont) -> IdmarkResult<String> {
        if let Some((_, name)) = self
            .registered
            .iter()
            .find(|(bytes, _)| Arc::ptr_eq(bytes, &font.bytes))
        {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = family_with_face(
            families
                .iter()
                .map(|(id, fonts)| (*id, fonts.iter().map(|f| f.index()))),
            font.index,
        )
        .ok_or_else(|| {
            IdmarkError::render(format!(
                "no font family registered for face {} of the font bytes",
                font.index
            ))
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| IdmarkError::render("registered font family has no name"))?
            .to_string();
        tracing::debug!(family = %family_name, "registered font with text layout");
        self.registered
            .push((Arc::clone(&font.bytes), family_name.clone()));
        Ok(family_name)
    }
}

/// The family holding face `index` of a font collection.
fn family_with_face<F, I>(families: impl IntoIterator<Item = (F, I)>, index: u32) -> Option<F>
where
    I: IntoIterator<Item = u32>,
{
    families
        .into_iter()
        .find_map(|(family, faces)| faces.into_iter().any(|i| i == index).then_some(family))
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;

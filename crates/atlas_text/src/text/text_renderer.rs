//! Direct text rendering
//!
//! Renders a whole string into its own bitmap without going through an
//! atlas. Meant for one-off strings that are not worth batching.

use std::sync::Arc;

use super::{FontDescriptor, FontError, FontResult, RenderedText, TextureStore};
use crate::assets::ImageData;

/// Bounding box of a string rendered on one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextDimensions {
    /// Sum of advances, rounded up
    pub width: u32,
    /// Tallest extent, never less than the pixel size
    pub height: u32,
    /// Offset from the top edge to the baseline (largest top bearing)
    pub baseline: f32,
}

impl TextDimensions {
    /// Measure `text` in `font`
    ///
    /// Characters without glyphs contribute nothing.
    pub fn measure(font: &FontDescriptor, text: &str) -> Self {
        let typeface = font.typeface();
        let px = font.pixel_size();

        let mut width = 0.0f32;
        let mut top = 0.0f32;
        let mut depth = 0.0f32;
        for ch in text.chars() {
            let Some(metrics) = typeface.glyph_metrics(ch, px) else {
                continue;
            };
            width += metrics.advance_width;
            top = top.max(metrics.top_bearing());
            depth = depth.max(metrics.depth());
        }

        let baseline = top.ceil();
        Self {
            width: width.ceil() as u32,
            height: px.ceil().max(baseline + depth.ceil()) as u32,
            baseline,
        }
    }
}

/// Renders strings straight into standalone textures
pub struct TextRenderer {
    store: Arc<dyn TextureStore>,
}

impl TextRenderer {
    /// Create a renderer that uploads to `store`
    pub fn new(store: Arc<dyn TextureStore>) -> Self {
        Self { store }
    }

    /// Render `text` into a new pixel buffer
    ///
    /// The buffer is exactly [`TextDimensions::measure`] in size, filled with
    /// the background color. Returns `None` (and logs) if a glyph fails to
    /// rasterize, so one bad string cannot take a frame down.
    pub fn render_image(font: &FontDescriptor, text: &str) -> Option<ImageData> {
        let dimensions = TextDimensions::measure(font, text);
        let typeface = font.typeface();
        let px = font.pixel_size();
        let foreground = font.foreground();

        let mut image = ImageData::solid_color(dimensions.width, dimensions.height, font.background());
        let mut pen_x = 0.0f32;

        for ch in text.chars() {
            if typeface.glyph_metrics(ch, px).is_none() {
                continue;
            }
            let bitmap = match typeface.rasterize(ch, px) {
                Ok(bitmap) => bitmap,
                Err(e) => {
                    log::warn!("Failed to draw {:?}: {}", text, e);
                    return None;
                }
            };

            let metrics = bitmap.metrics;
            let origin_x = pen_x.round() as i64 + i64::from(metrics.xmin);
            let top_y = (dimensions.baseline - metrics.top_bearing()) as i64;
            let glyph_width = metrics.width as usize;

            for (row, line) in bitmap.coverage.chunks(glyph_width.max(1)).enumerate() {
                for (col, &coverage) in line.iter().enumerate() {
                    image.blend_coverage(origin_x + col as i64, top_y + row as i64, foreground, coverage);
                }
            }
            pen_x += metrics.advance_width;
        }

        Some(image)
    }

    /// Render `text` and upload it as a texture
    ///
    /// Returns `Ok(None)` when there is nothing to draw or drawing failed.
    pub fn render(&self, font: &FontDescriptor, text: &str) -> FontResult<Option<RenderedText>> {
        let Some(image) = Self::render_image(font, text) else {
            return Ok(None);
        };
        if image.is_empty() {
            log::debug!("Nothing to render for {:?}", text);
            return Ok(None);
        }

        let handle = self
            .store
            .upload(&image)
            .map_err(|e| FontError::TextureUpload(e.to_string()))?;

        Ok(Some(RenderedText::new(
            handle,
            image.width() as f32,
            image.height() as f32,
            Arc::clone(&self.store),
        )))
    }
}

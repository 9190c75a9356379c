//! Typeface handles
//!
//! A [`Typeface`] owns a parsed font program and answers the metric and
//! rasterization queries the atlas builder and the direct renderer need.
//! [`FontdueTypeface`] implements it with the `fontdue` rasterizer.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use fontdue::{Font, FontSettings};

use super::{FontError, FontResult};
use crate::assets::FontSource;

/// Metrics of one glyph at one pixel size
///
/// `xmin`/`ymin` locate the bottom-left corner of the glyph bitmap relative
/// to the pen position on the baseline, with +Y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal distance to move the pen after this glyph
    pub advance_width: f32,
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Left side bearing
    pub xmin: i32,
    /// Offset from the baseline to the bottom of the bitmap
    pub ymin: i32,
}

impl GlyphMetrics {
    /// Distance from the baseline up to the top of the visible ink
    pub fn top_bearing(&self) -> f32 {
        (self.ymin + self.height as i32) as f32
    }

    /// Distance the ink reaches below the baseline (zero if it does not)
    pub fn depth(&self) -> f32 {
        (-self.ymin).max(0) as f32
    }
}

/// Vertical metrics of a face at one pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Height above the baseline
    pub ascent: f32,
    /// Depth below the baseline (negative)
    pub descent: f32,
    /// Extra gap between lines recommended by the font
    pub line_gap: f32,
    /// Baseline-to-baseline distance
    pub line_height: f32,
}

/// Coverage bitmap of one rasterized glyph
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    /// Placement metrics
    pub metrics: GlyphMetrics,
    /// Row-major 8-bit coverage, `width * height` bytes
    pub coverage: Vec<u8>,
}

/// A parsed font program
pub trait Typeface: Send + Sync + fmt::Debug {
    /// Hash of the font program bytes; equal bytes give equal fingerprints
    fn fingerprint(&self) -> u64;

    /// Glyph index for `ch`, `None` when the font does not cover it
    fn glyph_index(&self, ch: char) -> Option<u16>;

    /// Unhinted metrics for `ch` at `px` pixels per em
    ///
    /// `None` when the glyph has no usable bounds; callers treat such
    /// characters as zero-size.
    fn glyph_metrics(&self, ch: char, px: f32) -> Option<GlyphMetrics>;

    /// Vertical metrics at `px` pixels per em
    fn line_metrics(&self, px: f32) -> LineMetrics;

    /// Rasterize `ch` at `px` pixels per em
    fn rasterize(&self, ch: char, px: f32) -> FontResult<GlyphBitmap>;
}

/// Typeface backed by `fontdue`
///
/// `fontdue` never hints outlines, so metrics stay stable across sizes.
pub struct FontdueTypeface {
    font: Font,
    fingerprint: u64,
}

impl FontdueTypeface {
    /// Parse a TrueType/OpenType font program
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use atlas_text::text::FontdueTypeface;
    /// let font_bytes = std::fs::read("resources/fonts/default.ttf")?;
    /// let typeface = FontdueTypeface::from_bytes(&font_bytes)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_bytes(font_data: &[u8]) -> FontResult<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| FontError::Load(format!("fontdue error: {}", e)))?;

        let mut hasher = DefaultHasher::new();
        font_data.hash(&mut hasher);
        let fingerprint = hasher.finish();

        log::info!(
            "Loaded font with {} glyphs ({} bytes, fingerprint {:016x})",
            font.glyph_count(),
            font_data.len(),
            fingerprint
        );

        Ok(Self { font, fingerprint })
    }

    /// Fetch bytes for `locator` from `source` and parse them
    pub fn from_source(source: &dyn FontSource, locator: &str) -> FontResult<Self> {
        let bytes = source.load(locator)?;
        Self::from_bytes(&bytes).map_err(|e| match e {
            FontError::Load(reason) => FontError::Load(format!("{}: {}", locator, reason)),
            other => other,
        })
    }

    /// Underlying fontdue font
    pub fn font(&self) -> &Font {
        &self.font
    }
}

impl fmt::Debug for FontdueTypeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontdueTypeface")
            .field("glyphs", &self.font.glyph_count())
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint))
            .finish()
    }
}

impl Typeface for FontdueTypeface {
    fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    fn glyph_index(&self, ch: char) -> Option<u16> {
        // Index 0 is .notdef
        match self.font.lookup_glyph_index(ch) {
            0 => None,
            index => Some(index),
        }
    }

    fn glyph_metrics(&self, ch: char, px: f32) -> Option<GlyphMetrics> {
        self.glyph_index(ch)?;
        let metrics = self.font.metrics(ch, px);
        Some(convert_metrics(&metrics))
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        match self.font.horizontal_line_metrics(px) {
            Some(lm) => LineMetrics {
                ascent: lm.ascent,
                descent: lm.descent,
                line_gap: lm.line_gap,
                line_height: lm.new_line_size,
            },
            None => {
                log::debug!("Font has no horizontal line metrics, estimating from {}px", px);
                LineMetrics {
                    ascent: px * 0.8,
                    descent: -px * 0.2,
                    line_gap: 0.0,
                    line_height: px,
                }
            }
        }
    }

    fn rasterize(&self, ch: char, px: f32) -> FontResult<GlyphBitmap> {
        if self.glyph_index(ch).is_none() {
            return Err(FontError::Rasterize(ch, "font has no glyph".to_string()));
        }
        let (metrics, coverage) = self.font.rasterize(ch, px);
        if coverage.len() != metrics.width * metrics.height {
            return Err(FontError::Rasterize(
                ch,
                format!("bitmap size {} does not match {}x{}", coverage.len(), metrics.width, metrics.height),
            ));
        }
        Ok(GlyphBitmap {
            metrics: convert_metrics(&metrics),
            coverage,
        })
    }
}

fn convert_metrics(metrics: &fontdue::Metrics) -> GlyphMetrics {
    GlyphMetrics {
        advance_width: metrics.advance_width,
        width: metrics.width as u32,
        height: metrics.height as u32,
        xmin: metrics.xmin,
        ymin: metrics.ymin,
    }
}

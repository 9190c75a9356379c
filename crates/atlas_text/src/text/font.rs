//! Font descriptors
//!
//! A descriptor is one visual style of a typeface: point size, colors and
//! the characters its atlas should hold. A descriptor that exists is valid;
//! bad sizes are rejected when it is built.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::{FontError, FontResult, Typeface};

/// Fully transparent black, the default for both colors
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Points are defined at 72 per inch
const POINTS_PER_INCH: f32 = 72.0;

/// A typeface at a specific size and color
#[derive(Clone)]
pub struct FontDescriptor {
    typeface: Arc<dyn Typeface>,
    size: f32,
    dpi: f32,
    foreground: [u8; 4],
    background: [u8; 4],
    letters: Option<Arc<[char]>>,
}

/// Characters of `letters` with duplicates dropped, first occurrence order kept
pub fn unique_chars(letters: &str) -> Arc<[char]> {
    let mut seen = HashSet::new();
    letters.chars().filter(|ch| seen.insert(*ch)).collect()
}

impl FontDescriptor {
    /// Create a descriptor with default colors, 72 DPI and the default character set
    pub fn new(typeface: Arc<dyn Typeface>, size: f32) -> FontResult<Self> {
        Self::builder(typeface, size).build()
    }

    /// Start building a descriptor
    ///
    /// # Examples
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use atlas_text::text::{FontDescriptor, FontdueTypeface};
    /// # let typeface = Arc::new(FontdueTypeface::from_bytes(&[])?);
    /// let font = FontDescriptor::builder(typeface, 24.0)
    ///     .foreground([255, 255, 255, 255])
    ///     .letters("0123456789")
    ///     .dpi(96.0)
    ///     .build()?;
    /// # Ok::<(), atlas_text::text::FontError>(())
    /// ```
    pub fn builder(typeface: Arc<dyn Typeface>, size: f32) -> FontDescriptorBuilder {
        FontDescriptorBuilder {
            typeface,
            size,
            dpi: POINTS_PER_INCH,
            foreground: TRANSPARENT,
            background: TRANSPARENT,
            letters: None,
        }
    }

    /// Typeface this descriptor renders with
    pub fn typeface(&self) -> &Arc<dyn Typeface> {
        &self.typeface
    }

    /// Size in points
    pub fn size(&self) -> f32 {
        self.size
    }

    /// DPI used for point-to-pixel conversion
    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Size in device pixels per em
    pub fn pixel_size(&self) -> f32 {
        self.size * self.dpi / POINTS_PER_INCH
    }

    /// Glyph color (RGBA)
    pub fn foreground(&self) -> [u8; 4] {
        self.foreground
    }

    /// Fill color behind glyphs (RGBA)
    pub fn background(&self) -> [u8; 4] {
        self.background
    }

    /// Explicit character set, if one was given, without duplicates
    pub fn letters(&self) -> Option<&[char]> {
        self.letters.as_deref()
    }

    /// Characters the atlas for this font should contain
    ///
    /// The explicit set when present, `default_letters` otherwise. Both are
    /// shared, so resolving the set never copies it.
    pub fn character_set(&self, default_letters: &Arc<[char]>) -> Arc<[char]> {
        match &self.letters {
            Some(letters) => Arc::clone(letters),
            None => Arc::clone(default_letters),
        }
    }
}

impl fmt::Debug for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontDescriptor")
            .field("typeface", &self.typeface)
            .field("size", &self.size)
            .field("dpi", &self.dpi)
            .field("foreground", &self.foreground)
            .field("background", &self.background)
            .field("letters", &self.letters)
            .finish()
    }
}

/// Builder for [`FontDescriptor`]
#[must_use]
pub struct FontDescriptorBuilder {
    typeface: Arc<dyn Typeface>,
    size: f32,
    dpi: f32,
    foreground: [u8; 4],
    background: [u8; 4],
    letters: Option<String>,
}

impl FontDescriptorBuilder {
    /// Set the glyph color
    pub fn foreground(mut self, color: [u8; 4]) -> Self {
        self.foreground = color;
        self
    }

    /// Set the fill color behind glyphs
    pub fn background(mut self, color: [u8; 4]) -> Self {
        self.background = color;
        self
    }

    /// Restrict the atlas to these characters
    pub fn letters(mut self, letters: impl Into<String>) -> Self {
        self.letters = Some(letters.into());
        self
    }

    /// Set the DPI, usually from [`crate::config::TextConfig::dpi`]
    pub fn dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Validate and build
    ///
    /// Fails with [`FontError::InvalidSize`] for a size that is not a
    /// positive finite number, and [`FontError::InvalidDpi`] likewise.
    pub fn build(self) -> FontResult<FontDescriptor> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(FontError::InvalidSize(self.size));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(FontError::InvalidDpi(self.dpi));
        }
        Ok(FontDescriptor {
            typeface: self.typeface,
            size: self.size,
            dpi: self.dpi,
            foreground: self.foreground,
            background: self.background,
            letters: self.letters.as_deref().map(unique_chars),
        })
    }
}

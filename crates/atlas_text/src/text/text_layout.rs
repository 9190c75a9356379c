//! Text layout engine
//!
//! Walks a string once against a built [`FontAtlas`] and records every glyph
//! position and every line break. Width and height are projections of that
//! one record, so they can never disagree about where lines break.
//!
//! # Word wrap
//!
//! Breaks only happen at spaces. At each space the engine measures the whole
//! following word (up to the next space or newline) and breaks if the space
//! plus that word would pass the maximum width. The space that triggers a
//! break is consumed by it and not drawn.
//!
//! # Coordinate System
//!
//! - Origin (0, 0) is the top-left corner of the first line
//! - +X axis points right, +Y axis points down

use std::sync::Arc;

use nalgebra::Vector2;

use super::{AtlasCache, AtlasText, FontAtlas, FontDescriptor, FontResult, GlyphRegion};

/// A string with the font and spacing it is drawn with
///
/// Holds no layout state; every query lays the text out again.
#[derive(Debug, Clone)]
pub struct Text {
    font: Arc<FontDescriptor>,
    content: String,
    line_spacing: f32,
    letter_spacing: f32,
    word_wrap: bool,
    max_width: f32,
    right_to_left: bool,
}

impl Text {
    /// Create unwrapped text with no extra spacing
    pub fn new(font: Arc<FontDescriptor>, content: impl Into<String>) -> Self {
        Self {
            font,
            content: content.into(),
            line_spacing: 0.0,
            letter_spacing: 0.0,
            word_wrap: false,
            max_width: 0.0,
            right_to_left: false,
        }
    }

    /// Extra space between lines, relative to line height
    #[must_use]
    pub fn line_spacing(mut self, factor: f32) -> Self {
        self.line_spacing = factor;
        self
    }

    /// Extra space after each character, relative to the font's pixel size
    #[must_use]
    pub fn letter_spacing(mut self, factor: f32) -> Self {
        self.letter_spacing = factor;
        self
    }

    /// Enable word wrap at `max_width` pixels
    #[must_use]
    pub fn word_wrap(mut self, max_width: f32) -> Self {
        self.word_wrap = true;
        self.max_width = max_width;
        self
    }

    /// Lay glyphs out right to left (experimental)
    ///
    /// Only mirrors glyph positions around the line origin. Measurements
    /// are unaffected and no bidirectional reordering happens.
    #[must_use]
    pub fn right_to_left(mut self, enabled: bool) -> Self {
        self.right_to_left = enabled;
        self
    }

    /// Replace the string
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// The string being drawn
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Font the text is drawn with
    pub fn font(&self) -> &Arc<FontDescriptor> {
        &self.font
    }

    /// Spacing and wrap settings in the form the layout engine takes
    pub fn options(&self) -> LayoutOptions {
        LayoutOptions {
            size: self.font.pixel_size(),
            line_spacing: self.line_spacing,
            letter_spacing: self.letter_spacing,
            word_wrap: self.word_wrap,
            max_width: self.max_width,
            right_to_left: self.right_to_left,
        }
    }

    /// Lay out against the cached atlas for this text's font
    pub fn layout(&self, cache: &AtlasCache) -> FontResult<TextLayout> {
        let atlas = cache.get_or_build(&self.font)?;
        Ok(TextLayout::new(&atlas, &self.content, &self.options()))
    }

    /// Width of the widest line
    pub fn width(&self, cache: &AtlasCache) -> FontResult<f32> {
        Ok(self.layout(cache)?.width())
    }

    /// Sum of all line heights
    pub fn height(&self, cache: &AtlasCache) -> FontResult<f32> {
        Ok(self.layout(cache)?.height())
    }

    /// Bind to the cached atlas as a drawable surface
    pub fn drawable(&self, cache: &AtlasCache) -> FontResult<AtlasText> {
        let atlas = cache.get_or_build(&self.font)?;
        Ok(AtlasText::new(atlas, self.clone()))
    }
}

/// Inputs of the layout pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutOptions {
    /// Font size in pixels, the unit of letter spacing
    pub size: f32,
    /// Extra line height factor
    pub line_spacing: f32,
    /// Extra advance factor, multiplied by `size`
    pub letter_spacing: f32,
    /// Break lines at spaces when they would pass `max_width`
    pub word_wrap: bool,
    /// Wrap width in pixels
    pub max_width: f32,
    /// Mirror glyph positions
    pub right_to_left: bool,
}

/// Why a line ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    /// An explicit `\n`
    Newline,
    /// A space where the next word would not fit
    Wrap,
    /// The string ended
    EndOfText,
}

/// One laid-out line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLine {
    /// Index of the first glyph of the line in [`TextLayout::glyphs`]
    pub start: usize,
    /// One past the last glyph of the line
    pub end: usize,
    /// Top edge of the line
    pub y: f32,
    /// Sum of glyph advances
    pub width: f32,
    /// Tallest glyph, scaled by line spacing
    pub height: f32,
    /// How the line ended
    pub ending: LineBreak,
}

/// A glyph placed by the layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    /// Character drawn
    pub ch: char,
    /// Top-left corner of the glyph cell
    pub position: Vector2<f32>,
    /// Horizontal space the glyph takes, letter spacing included
    pub advance: f32,
    /// Index of the line holding the glyph
    pub line: usize,
    /// Atlas cell to sample
    pub region: GlyphRegion,
}

/// Result of laying out a string
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    glyphs: Vec<PositionedGlyph>,
    lines: Vec<TextLine>,
    width: f32,
    height: f32,
}

impl TextLayout {
    /// Lay out `content` against `atlas`
    pub fn new(atlas: &FontAtlas, content: &str, options: &LayoutOptions) -> Self {
        let spacing = options.size * options.letter_spacing;
        // Characters the atlas lacks have zero width but still take spacing
        let advance_of = |ch: char| atlas.glyph_width(ch) + spacing;

        let runes: Vec<char> = content.chars().collect();
        let mut pass = LinePass::new(atlas.line_height() * (1.0 + options.line_spacing));

        for (index, &ch) in runes.iter().enumerate() {
            if options.word_wrap && ch == ' ' {
                let next_word: f32 = runes[index + 1..]
                    .iter()
                    .take_while(|&&next| next != ' ' && next != '\n')
                    .map(|&next| advance_of(next))
                    .sum();
                if options.max_width < pass.line_width + advance_of(ch) + next_word {
                    pass.close_line(LineBreak::Wrap);
                    continue;
                }
            }

            if ch == '\n' {
                pass.close_line(LineBreak::Newline);
                continue;
            }
            if ch < ' ' {
                continue;
            }

            let Some(region) = atlas.glyph(ch).copied() else {
                log::trace!("Character {:?} not in atlas, laid out as empty", ch);
                pass.line_width += spacing;
                continue;
            };
            let advance = advance_of(ch);
            let x = if options.right_to_left {
                -(pass.line_width + advance)
            } else {
                pass.line_width
            };

            pass.glyphs.push(PositionedGlyph {
                ch,
                position: Vector2::new(x, pass.total_height),
                advance,
                line: pass.lines.len(),
                region,
            });
            pass.line_width += advance;
            pass.tallest = pass.tallest.max(region.height() * (1.0 + options.line_spacing));
        }

        pass.finish()
    }

    /// Placed glyphs in string order
    pub fn glyphs(&self) -> &[PositionedGlyph] {
        &self.glyphs
    }

    /// Lines in order
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Glyphs of one line
    pub fn line_glyphs(&self, line: usize) -> &[PositionedGlyph] {
        match self.lines.get(line) {
            Some(l) => &self.glyphs[l.start..l.end],
            None => &[],
        }
    }

    /// Width of the widest line
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Total height of all lines
    pub fn height(&self) -> f32 {
        self.height
    }
}

/// Running state of the single layout pass
struct LinePass {
    glyphs: Vec<PositionedGlyph>,
    lines: Vec<TextLine>,
    line_start: usize,
    line_width: f32,
    greatest_width: f32,
    tallest: f32,
    total_height: f32,
    empty_line_height: f32,
}

impl LinePass {
    fn new(empty_line_height: f32) -> Self {
        Self {
            glyphs: Vec::new(),
            lines: Vec::new(),
            line_start: 0,
            line_width: 0.0,
            greatest_width: 0.0,
            tallest: 0.0,
            total_height: 0.0,
            empty_line_height,
        }
    }

    fn close_line(&mut self, ending: LineBreak) {
        // A closed line always takes vertical space, even with no glyphs
        let height = if self.tallest > 0.0 { self.tallest } else { self.empty_line_height };
        self.push_line(height, ending);
        self.total_height += height;
        self.tallest = 0.0;
    }

    fn push_line(&mut self, height: f32, ending: LineBreak) {
        self.greatest_width = self.greatest_width.max(self.line_width);
        self.lines.push(TextLine {
            start: self.line_start,
            end: self.glyphs.len(),
            y: self.total_height,
            width: self.line_width,
            height,
            ending,
        });
        self.line_start = self.glyphs.len();
        self.line_width = 0.0;
    }

    fn finish(mut self) -> TextLayout {
        // The last line has no terminating break and contributes only its glyphs
        if self.glyphs.len() > self.line_start || self.line_width > 0.0 {
            let tallest = self.tallest;
            self.push_line(tallest, LineBreak::EndOfText);
        }
        TextLayout {
            width: self.greatest_width.max(self.line_width),
            height: self.total_height + self.tallest,
            glyphs: self.glyphs,
            lines: self.lines,
        }
    }
}

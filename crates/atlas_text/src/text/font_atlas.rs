//! Font atlas system for text rendering
//!
//! [`AtlasBuilder`] rasterizes a character set once and packs the glyphs
//! left-to-right into rows of a single bitmap. The resulting [`FontAtlas`]
//! keeps only the placement table and the texture handle; the pixels live
//! in the texture store.
//!
//! Every row has the same height, derived from the face's line height rather
//! than from the glyphs placed in it.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector2;

use super::{FontDescriptor, FontError, FontResult, TextureHandle, TextureStore};
use crate::assets::ImageData;
use crate::config::TextConfig;

/// Where a glyph sits in the atlas, in atlas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphRegion {
    /// Top-left corner of the glyph cell
    pub position: Vector2<f32>,
    /// Cell size: advance width by row height
    pub size: Vector2<f32>,
}

impl GlyphRegion {
    /// Cell width, which is also the glyph's layout advance
    pub fn width(&self) -> f32 {
        self.size.x
    }

    /// Cell height
    pub fn height(&self) -> f32 {
        self.size.y
    }
}

/// Packing result: placements and atlas dimensions, before any pixels exist
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasPlan {
    /// Placement of every packed character
    pub regions: HashMap<char, GlyphRegion>,
    /// Packed characters in input order
    pub order: Vec<char>,
    /// Characters skipped because the face has no bounds for them
    pub missing: Vec<char>,
    /// Total atlas width in pixels
    pub width: f32,
    /// Total atlas height in pixels
    pub height: f32,
    /// Height of every row, line buffer included
    pub row_pitch: f32,
    /// Offset from a row's top edge to its baseline
    pub baseline: f32,
    /// Pixel size the plan was made for
    pub pixel_size: f32,
}

impl AtlasPlan {
    /// Number of rows in the atlas
    pub fn rows(&self) -> usize {
        if self.row_pitch > 0.0 {
            (self.height / self.row_pitch).round() as usize
        } else {
            0
        }
    }
}

/// Packed glyph atlas for one font descriptor
///
/// Immutable once built; shared between draws through [`super::AtlasCache`].
#[derive(Debug, Clone)]
pub struct FontAtlas {
    /// Handle to GPU texture atlas (`None` for an empty atlas)
    texture: Option<TextureHandle>,
    /// Glyph placement lookup
    regions: HashMap<char, GlyphRegion>,
    /// Atlas texture dimensions
    width: f32,
    height: f32,
    row_pitch: f32,
    pixel_size: f32,
}

impl FontAtlas {
    /// Assemble an atlas from a plan and the texture holding its pixels
    pub fn from_plan(plan: AtlasPlan, texture: Option<TextureHandle>) -> Self {
        Self {
            texture,
            regions: plan.regions,
            width: plan.width,
            height: plan.height,
            row_pitch: plan.row_pitch,
            pixel_size: plan.pixel_size,
        }
    }

    /// Get the GPU texture handle for this atlas
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Total atlas width in pixels
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Total atlas height in pixels
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Row height, used as the height of lines that hold no glyphs
    pub fn line_height(&self) -> f32 {
        self.row_pitch
    }

    /// Pixel size the glyphs were rasterized at
    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    /// Get placement for a character
    pub fn glyph(&self, ch: char) -> Option<&GlyphRegion> {
        self.regions.get(&ch)
    }

    /// Advance width of `ch`, zero when the atlas lacks it
    pub fn glyph_width(&self, ch: char) -> f32 {
        self.regions.get(&ch).map_or(0.0, GlyphRegion::width)
    }

    /// Cell height of `ch`, zero when the atlas lacks it
    pub fn glyph_height(&self, ch: char) -> f32 {
        self.regions.get(&ch).map_or(0.0, GlyphRegion::height)
    }

    /// Whether `ch` was packed
    pub fn contains(&self, ch: char) -> bool {
        self.regions.contains_key(&ch)
    }

    /// Number of packed glyphs
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True for an atlas built from an empty character set
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Packed characters, in no particular order
    pub fn characters(&self) -> impl Iterator<Item = char> + '_ {
        self.regions.keys().copied()
    }

    /// Normalized (0.0-1.0) texture coordinates of `ch`: top-left and bottom-right
    pub fn uv(&self, ch: char) -> Option<(Vector2<f32>, Vector2<f32>)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let region = self.regions.get(&ch)?;
        let scale = Vector2::new(1.0 / self.width, 1.0 / self.height);
        let min = region.position.component_mul(&scale);
        let max = (region.position + region.size).component_mul(&scale);
        Some((min, max))
    }

    /// Printable characters of `text` this atlas cannot draw, deduplicated
    pub fn missing(&self, text: &str) -> Vec<char> {
        let mut seen = HashSet::new();
        text.chars()
            .filter(|&ch| ch >= ' ' && !self.regions.contains_key(&ch))
            .filter(|&ch| seen.insert(ch))
            .collect()
    }
}

/// Rasterizes character sets into packed atlases
#[derive(Debug, Clone)]
pub struct AtlasBuilder {
    max_row_width: f32,
    padding: f32,
    strict_coverage: bool,
}

impl AtlasBuilder {
    /// Create a builder using the packing settings of `config`
    pub fn new(config: &TextConfig) -> Self {
        Self {
            max_row_width: config.max_row_width,
            padding: config.glyph_padding,
            strict_coverage: config.strict_coverage,
        }
    }

    /// Build an atlas for `font` holding `characters` and upload it to `store`
    ///
    /// An empty character set produces an empty atlas without a texture.
    pub fn build(
        &self,
        font: &FontDescriptor,
        characters: &[char],
        store: &dyn TextureStore,
    ) -> FontResult<FontAtlas> {
        let plan = self.plan(font, characters)?;
        if plan.order.is_empty() {
            log::debug!("Atlas for {:?} holds no glyphs, skipping upload", font);
            return Ok(FontAtlas::from_plan(plan, None));
        }

        let image = self.rasterize(font, &plan);
        let handle = store
            .upload(&image)
            .map_err(|e| FontError::AtlasCreation(e.to_string()))?;

        log::info!(
            "Font atlas built: {}x{}, {} glyphs in {} rows at {}px, texture {:?}",
            plan.width,
            plan.height,
            plan.order.len(),
            plan.rows(),
            plan.pixel_size,
            handle
        );

        Ok(FontAtlas::from_plan(plan, Some(handle)))
    }

    /// Pack `characters` without rasterizing anything
    ///
    /// Characters the face has no bounds for are skipped and take no space.
    /// With strict coverage enabled they fail the plan instead.
    pub fn plan(&self, font: &FontDescriptor, characters: &[char]) -> FontResult<AtlasPlan> {
        let typeface = font.typeface();
        let pixel_size = font.pixel_size();
        let line = typeface.line_metrics(pixel_size);

        let row_height = line.line_height.ceil() + 2.0;
        let row_pitch = row_height + row_height / 2.0;
        let baseline = line.ascent.ceil().min(row_height);

        let mut regions = HashMap::with_capacity(characters.len());
        let mut order = Vec::with_capacity(characters.len());
        let mut missing = Vec::new();

        let mut current_x = 0.0f32;
        let mut current_y = 0.0f32;
        let mut total_width = 0.0f32;
        let mut total_height = 0.0f32;

        let last = characters.len().saturating_sub(1);
        for (index, &ch) in characters.iter().enumerate() {
            if regions.contains_key(&ch) {
                continue;
            }
            let Some(metrics) = typeface.glyph_metrics(ch, pixel_size) else {
                log::debug!("No glyph bounds for {:?}, leaving it out of the atlas", ch);
                missing.push(ch);
                continue;
            };

            current_x += self.padding;
            let advance = metrics.advance_width.ceil();
            regions.insert(
                ch,
                GlyphRegion {
                    position: Vector2::new(current_x, current_y),
                    size: Vector2::new(advance, row_pitch),
                },
            );
            order.push(ch);
            current_x += advance + self.padding;
            total_width = total_width.max(current_x);

            if current_x > self.max_row_width || index >= last {
                current_x = 0.0;
                current_y += row_pitch;
                total_height += row_pitch;
            }
        }

        // The last character was skipped while its row still held glyphs
        if current_x > 0.0 {
            total_height += row_pitch;
        }

        if self.strict_coverage && !missing.is_empty() {
            return Err(FontError::MissingGlyphs(missing));
        }

        Ok(AtlasPlan {
            regions,
            order,
            missing,
            width: total_width,
            height: total_height,
            row_pitch,
            baseline,
            pixel_size,
        })
    }

    /// Draw the glyphs of `plan` into a new pixel buffer
    ///
    /// The buffer is filled with the background color and each glyph is
    /// blended on in the foreground color. A glyph that fails to rasterize
    /// leaves its cell blank.
    pub fn rasterize(&self, font: &FontDescriptor, plan: &AtlasPlan) -> ImageData {
        let width = plan.width.ceil() as u32;
        let height = plan.height.ceil() as u32;
        let mut image = ImageData::solid_color(width, height, font.background());
        let foreground = font.foreground();

        for &ch in &plan.order {
            let Some(region) = plan.regions.get(&ch) else {
                continue;
            };
            let bitmap = match font.typeface().rasterize(ch, plan.pixel_size) {
                Ok(bitmap) => bitmap,
                Err(e) => {
                    log::warn!("{}", e);
                    continue;
                }
            };

            let metrics = bitmap.metrics;
            let origin_x = region.position.x as i64 + i64::from(metrics.xmin);
            let top_y = (region.position.y + plan.baseline - metrics.top_bearing()) as i64;
            let glyph_width = metrics.width as usize;

            for (row, line) in bitmap.coverage.chunks(glyph_width.max(1)).enumerate() {
                for (col, &coverage) in line.iter().enumerate() {
                    image.blend_coverage(origin_x + col as i64, top_y + row as i64, foreground, coverage);
                }
            }
        }

        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::test_support::{FixedTypeface, ADVANCE, INK_HEIGHT, INK_WIDTH};
    use crate::text::{MemoryTextureStore, Typeface};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn font_with(typeface: FixedTypeface) -> FontDescriptor {
        let typeface: Arc<dyn Typeface> = Arc::new(typeface);
        FontDescriptor::builder(typeface, 10.0)
            .foreground(WHITE)
            .background(BLACK)
            .build()
            .unwrap()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_three_glyphs_fit_one_row() {
        let font = font_with(FixedTypeface::new());
        let builder = AtlasBuilder::new(&TextConfig::default());
        let plan = builder.plan(&font, &chars("abc")).unwrap();

        // 10px padding on both sides of each 6px glyph
        assert_relative_eq!(plan.width, 3.0 * (6.0 + 20.0));
        // Line height 10 -> row 12 plus half again as buffer
        assert_relative_eq!(plan.row_pitch, 18.0);
        assert_relative_eq!(plan.height, 18.0);
        assert_eq!(plan.rows(), 1);

        assert_eq!(plan.regions[&'a'].position, Vector2::new(10.0, 0.0));
        assert_eq!(plan.regions[&'b'].position, Vector2::new(36.0, 0.0));
        assert_eq!(plan.regions[&'c'].position, Vector2::new(62.0, 0.0));
        assert_relative_eq!(plan.regions[&'c'].width(), ADVANCE);
    }

    #[test]
    fn test_rows_break_past_max_width() {
        let font = font_with(FixedTypeface::new());
        let config = TextConfig { max_row_width: 60.0, ..TextConfig::default() };
        let plan = AtlasBuilder::new(&config).plan(&font, &chars("abcdefg")).unwrap();

        // Each glyph takes 26px; the row closes once the cursor passes 60
        // (after the third glyph at x = 78)
        assert_eq!(plan.regions[&'c'].position.y, 0.0);
        assert_eq!(plan.regions[&'d'].position, Vector2::new(10.0, 18.0));
        assert_eq!(plan.regions[&'g'].position, Vector2::new(10.0, 36.0));
        assert_eq!(plan.rows(), 3);
        assert_relative_eq!(plan.height, 3.0 * plan.row_pitch);
        assert!(plan.width <= config.max_row_width + ADVANCE + 2.0 * config.glyph_padding);
    }

    #[test]
    fn test_row_pitch_rounds_fractional_line_height() {
        let font = font_with(FixedTypeface::new().line_height(13.2));
        let plan = AtlasBuilder::new(&TextConfig::default()).plan(&font, &chars("ab")).unwrap();

        // ceil(13.2) + 2 = 16, plus half again
        assert_relative_eq!(plan.row_pitch, 24.0);
        assert_relative_eq!(plan.height, 24.0);
        assert_relative_eq!(plan.regions[&'b'].height(), 24.0);
    }

    #[test]
    fn test_width_bound_with_default_row_limit() {
        let font = font_with(FixedTypeface::new());
        let config = TextConfig::default();
        let plan = AtlasBuilder::new(&config).plan(&font, &chars(&config.default_letters)).unwrap();

        assert_eq!(plan.order.len(), 95);
        assert!(plan.width <= config.max_row_width + ADVANCE + 2.0 * config.glyph_padding);
        assert_relative_eq!(plan.height, plan.rows() as f32 * plan.row_pitch);
        assert!(plan.rows() > 1);
    }

    #[test]
    fn test_skips_glyphs_without_bounds() {
        let font = font_with(FixedTypeface::new().without("b"));
        let plan = AtlasBuilder::new(&TextConfig::default()).plan(&font, &chars("abc")).unwrap();

        assert!(plan.regions.contains_key(&'a'));
        assert!(!plan.regions.contains_key(&'b'));
        assert!(plan.regions.contains_key(&'c'));
        assert_eq!(plan.missing, vec!['b']);
        assert_relative_eq!(plan.width, 2.0 * 26.0);
    }

    #[test]
    fn test_trailing_skipped_glyph_still_closes_row() {
        let font = font_with(FixedTypeface::new().without("z"));
        let plan = AtlasBuilder::new(&TextConfig::default()).plan(&font, &chars("az")).unwrap();
        assert_eq!(plan.rows(), 1);
        assert_relative_eq!(plan.height, plan.row_pitch);
    }

    #[test]
    fn test_strict_coverage_fails() {
        let font = font_with(FixedTypeface::new().without("xy"));
        let config = TextConfig { strict_coverage: true, ..TextConfig::default() };
        let result = AtlasBuilder::new(&config).plan(&font, &chars("axy"));
        match result {
            Err(FontError::MissingGlyphs(missing)) => assert_eq!(missing, vec!['x', 'y']),
            other => panic!("expected missing glyphs, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicates_packed_once() {
        let font = font_with(FixedTypeface::new());
        let plan = AtlasBuilder::new(&TextConfig::default()).plan(&font, &chars("aab")).unwrap();
        assert_eq!(plan.order, vec!['a', 'b']);
        assert_relative_eq!(plan.width, 52.0);
    }

    #[test]
    fn test_empty_character_set() {
        let font = font_with(FixedTypeface::new());
        let store = MemoryTextureStore::new();
        let atlas = AtlasBuilder::new(&TextConfig::default()).build(&font, &[], &store).unwrap();

        assert!(atlas.is_empty());
        assert_eq!(atlas.width(), 0.0);
        assert_eq!(atlas.height(), 0.0);
        assert_eq!(atlas.texture(), None);
        assert_eq!(atlas.glyph_width('a'), 0.0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_build_uploads_rasterized_pixels() {
        let font = font_with(FixedTypeface::new());
        let store = MemoryTextureStore::new();
        let atlas = AtlasBuilder::new(&TextConfig::default())
            .build(&font, &chars("ab"), &store)
            .unwrap();

        let handle = atlas.texture().unwrap();
        let image = store.image(handle).unwrap();
        assert_eq!(image.width(), 52);
        assert_eq!(image.height(), 18);

        // Ascent 8 puts the baseline 8px below the row top; the 7px block sits on it
        let region = atlas.glyph('a').unwrap();
        let x = region.position.x as u32;
        assert_eq!(image.pixel(x, 1), Some(WHITE));
        assert_eq!(image.pixel(x + INK_WIDTH - 1, INK_HEIGHT), Some(WHITE));
        assert_eq!(image.pixel(x, 0), Some(BLACK));
        assert_eq!(image.pixel(x + INK_WIDTH, 1), Some(BLACK));
        assert_eq!(image.pixel(0, 17), Some(BLACK));
    }

    #[test]
    fn test_broken_glyph_keeps_its_cell() {
        let font = font_with(FixedTypeface::new().broken("b"));
        let store = MemoryTextureStore::new();
        let atlas = AtlasBuilder::new(&TextConfig::default())
            .build(&font, &chars("ab"), &store)
            .unwrap();

        assert!(atlas.contains('b'));
        let image = store.image(atlas.texture().unwrap()).unwrap();
        let region = atlas.glyph('b').unwrap();
        assert_eq!(image.pixel(region.position.x as u32, 4), Some(BLACK));
    }

    #[test]
    fn test_upload_failure_is_reported() {
        let font = font_with(FixedTypeface::new());
        let store = MemoryTextureStore::with_max_dimension(16);
        let result = AtlasBuilder::new(&TextConfig::default()).build(&font, &chars("abc"), &store);
        assert!(matches!(result, Err(FontError::AtlasCreation(_))));
    }

    #[test]
    fn test_uv_and_missing() {
        let font = font_with(FixedTypeface::new());
        let store = MemoryTextureStore::new();
        let atlas = AtlasBuilder::new(&TextConfig::default())
            .build(&font, &chars("ab"), &store)
            .unwrap();

        let (min, max) = atlas.uv('b').unwrap();
        assert_relative_eq!(min.x, 36.0 / 52.0);
        assert_relative_eq!(min.y, 0.0);
        assert_relative_eq!(max.x, 42.0 / 52.0);
        assert_relative_eq!(max.y, 1.0);
        assert!(atlas.uv('q').is_none());

        assert_eq!(atlas.missing("abcab\nd"), vec!['c', 'd']);
    }
}

//! Text rendering system
//!
//! Typeface loading, glyph atlas generation and caching, word-wrapped text
//! layout, and the direct single-string rendering path.
//!
//! # Architecture
//!
//! - [`Typeface`]: Parsed font program with metric and rasterization queries
//! - [`FontDescriptor`]: Typeface plus size, colors and character set
//! - [`AtlasBuilder`]: Rasterizes a character set into one packed bitmap
//! - [`AtlasCache`]: Builds each distinct atlas once and shares it
//! - [`TextLayout`]: Line breaks and glyph positions for a [`Text`]
//! - [`TextRenderer`]: Renders a whole string into its own texture
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use atlas_text::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("resources/fonts/default.ttf")?;
//! let typeface = Arc::new(FontdueTypeface::from_bytes(&bytes)?);
//! let font = Arc::new(FontDescriptor::new(typeface, 18.0)?);
//!
//! let cache = AtlasCache::new(TextConfig::default(), Arc::new(MemoryTextureStore::new()))?;
//! let text = Text::new(font, "Hello\nWorld").line_spacing(0.25);
//! let layout = text.layout(&cache)?;
//! for glyph in layout.glyphs() {
//!     println!("{} at {:?}", glyph.ch, glyph.position);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod typeface;
mod font;
pub mod texture_store;
pub mod font_atlas;
mod atlas_cache;
pub mod text_layout;
mod text_renderer;
mod drawable;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{FontError, FontResult};
pub use typeface::{FontdueTypeface, GlyphBitmap, GlyphMetrics, LineMetrics, Typeface};
pub use font::{unique_chars, FontDescriptor, FontDescriptorBuilder, TRANSPARENT};
pub use texture_store::{MemoryTextureStore, TextureError, TextureHandle, TextureStore};
pub use font_atlas::{AtlasBuilder, AtlasPlan, FontAtlas, GlyphRegion};
pub use atlas_cache::{AtlasCache, AtlasKey};
pub use text_layout::{LineBreak, LayoutOptions, PositionedGlyph, Text, TextLayout, TextLine};
pub use text_renderer::{TextDimensions, TextRenderer};
pub use drawable::{AtlasText, Drawable, RenderedText};

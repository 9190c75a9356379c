//! # Atlas Text
//!
//! Text rendering support for a real-time 2D renderer: a typeface and a point
//! size are turned into one packed glyph atlas, and strings are laid out
//! against that atlas without re-rasterizing glyphs every frame.
//!
//! ## Features
//!
//! - **Glyph Atlas**: Rasterizes a character set once into a row-packed bitmap
//! - **Atlas Cache**: Builds at most one atlas per font style, shared across draws
//! - **Word Wrap**: Greedy line breaking that looks ahead past the next space
//! - **Direct Rendering**: Unbatched path that renders one string into its own bitmap
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use atlas_text::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TextConfig::default();
//!     let source = FileFontSource::new("resources/fonts");
//!     let typeface = Arc::new(FontdueTypeface::from_source(&source, "default.ttf")?);
//!     let font = FontDescriptor::builder(typeface, 24.0)
//!         .foreground([255, 255, 255, 255])
//!         .dpi(config.dpi)
//!         .build()?;
//!
//!     let cache = AtlasCache::new(config, Arc::new(MemoryTextureStore::new()))?;
//!     let text = Text::new(Arc::new(font), "Hello world").word_wrap(200.0);
//!     let layout = text.layout(&cache)?;
//!     println!("{}x{} in {} lines", layout.width(), layout.height(), layout.lines().len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod text;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assets::{FileFontSource, FontSource, ImageData, MemoryFontSource},
        config::{Config, ConfigError, TextConfig},
        text::{
            AtlasCache, AtlasBuilder, Drawable, FontAtlas, FontDescriptor, FontError,
            FontResult, FontdueTypeface, MemoryTextureStore, Text, TextLayout, TextRenderer,
            TextureHandle, TextureStore, Typeface,
        },
    };
}

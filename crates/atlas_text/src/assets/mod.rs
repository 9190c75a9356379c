//! Asset management for the text pipeline
//!
//! Pixel buffers handed to the texture store and the sources font programs
//! are read from.

pub mod image_data;
pub mod font_source;

pub use image_data::ImageData;
pub use font_source::{FileFontSource, FontSource, MemoryFontSource};

use thiserror::Error;

/// Asset saving errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// Asset could not be encoded or written
    #[error("Failed to save asset: {0}")]
    SaveFailed(String),
}

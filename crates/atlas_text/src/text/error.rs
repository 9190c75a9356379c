//! Font and text pipeline errors

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to parse font data
    #[error("Failed to load font: {0}")]
    Load(String),

    /// Reading font data failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No font is registered under the locator
    #[error("Unknown font: {0}")]
    UnknownFont(String),

    /// Point size is zero, negative or not a number
    #[error("Font size must be > 0, got {0}")]
    InvalidSize(f32),

    /// DPI is zero, negative or not a number
    #[error("DPI must be > 0, got {0}")]
    InvalidDpi(f32),

    /// Failed to rasterize a specific glyph character
    #[error("Failed to rasterize glyph '{0}': {1}")]
    Rasterize(char, String),

    /// Failed to create or upload the atlas texture
    #[error("Failed to create atlas texture: {0}")]
    AtlasCreation(String),

    /// Failed to upload a directly rendered string
    #[error("Failed to upload text texture: {0}")]
    TextureUpload(String),

    /// Strict coverage was requested and some characters have no glyph
    #[error("Font has no glyphs for {0:?}")]
    MissingGlyphs(Vec<char>),
}

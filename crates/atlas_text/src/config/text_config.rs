//! Text pipeline configuration

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// First code point of the default character set (space)
const ASCII_START: u32 = 32;
/// Last code point of the default character set (tilde)
const ASCII_END: u32 = 126;

/// # Text Configuration
///
/// Parameters shared by every font created through one pipeline: the DPI used
/// to turn point sizes into pixels, the atlas packing limits and the
/// character set rasterized when a font does not name its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Dots per inch used to convert point sizes to device pixels
    pub dpi: f32,
    /// Row width in pixels after which the atlas starts a new row
    pub max_row_width: f32,
    /// Horizontal padding in pixels placed before and after every glyph
    pub glyph_padding: f32,
    /// Characters rasterized for fonts without an explicit character set
    pub default_letters: String,
    /// Fail atlas builds when a requested character has no glyph
    pub strict_coverage: bool,
}

impl TextConfig {
    /// Printable ASCII, space through tilde
    pub fn printable_ascii() -> String {
        (ASCII_START..=ASCII_END).filter_map(char::from_u32).collect()
    }

    /// Check that all values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(ConfigError::Invalid {
                field: "dpi",
                reason: format!("must be positive, got {}", self.dpi),
            });
        }
        if !(self.max_row_width.is_finite() && self.max_row_width > 0.0) {
            return Err(ConfigError::Invalid {
                field: "max_row_width",
                reason: format!("must be positive, got {}", self.max_row_width),
            });
        }
        if !(self.glyph_padding.is_finite() && self.glyph_padding >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "glyph_padding",
                reason: format!("must not be negative, got {}", self.glyph_padding),
            });
        }
        Ok(())
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            dpi: 72.0,
            max_row_width: 1024.0,
            glyph_padding: 10.0,
            default_letters: Self::printable_ascii(),
            strict_coverage: false,
        }
    }
}

impl Config for TextConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TextConfig::default();
        assert_eq!(config.dpi, 72.0);
        assert_eq!(config.max_row_width, 1024.0);
        assert_eq!(config.glyph_padding, 10.0);
        assert_eq!(config.default_letters.chars().count(), 95);
        assert!(config.default_letters.starts_with(' '));
        assert!(config.default_letters.ends_with('~'));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_override() {
        let config = TextConfig::from_str_with_format(
            "dpi = 96.0\nstrict_coverage = true\n",
            "text.toml",
        )
        .unwrap();
        assert_eq!(config.dpi, 96.0);
        assert!(config.strict_coverage);
        // Unspecified fields fall back to defaults
        assert_eq!(config.max_row_width, 1024.0);
    }

    #[test]
    fn test_ron_parse() {
        let config = TextConfig::from_str_with_format(
            "(glyph_padding: 4.0, default_letters: \"abc\")",
            "text.ron",
        )
        .unwrap();
        assert_eq!(config.glyph_padding, 4.0);
        assert_eq!(config.default_letters, "abc");
    }

    #[test]
    fn test_unsupported_format() {
        let result = TextConfig::from_str_with_format("{}", "text.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validate_rejects_bad_dpi() {
        let config = TextConfig { dpi: 0.0, ..TextConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "dpi", .. })));
    }

    #[test]
    fn test_save_and_load_round_trip_on_disk() {
        let path = std::env::temp_dir().join(format!("atlas_text_config_{}.toml", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let config = TextConfig { dpi: 144.0, ..TextConfig::default() };
        config.save_to_file(&path).unwrap();
        let loaded = TextConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}

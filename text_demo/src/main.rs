//! Text atlas demo
//!
//! Loads a font file, builds its glyph atlas, lays out a string with word
//! wrap and writes both the atlas and a directly rendered copy of the string
//! to PNG files for inspection.
//!
//! ```text
//! text_demo <FONT> [--size PX] [--text TEXT] [--max-width PX]
//! ```
//!
//! Settings are read from `text.toml` in the working directory when present.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use atlas_text::foundation::logging;
use atlas_text::prelude::*;
use clap::{value_parser, Arg, Command};

const DEFAULT_TEXT: &str = "The quick brown fox jumps over the lazy dog.\nPack my box with five dozen liquor jugs.";
const CONFIG_PATH: &str = "text.toml";

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("font path '{0}' has no file name")]
    FontPath(PathBuf),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] atlas_text::assets::AssetError),
}

fn cli() -> Command {
    Command::new("text_demo")
        .about("Builds a glyph atlas for a font and lays out a string against it")
        .arg(
            Arg::new("font")
                .value_name("FONT")
                .help("TrueType or OpenType font file")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .value_name("POINTS")
                .help("Font size in points")
                .default_value("24")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("String to lay out")
                .default_value(DEFAULT_TEXT),
        )
        .arg(
            Arg::new("max-width")
                .short('w')
                .long("max-width")
                .value_name("PIXELS")
                .help("Word wrap width")
                .default_value("320")
                .value_parser(value_parser!(f32)),
        )
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), DemoError> {
    let matches = cli().get_matches();

    let font_path = matches.get_one::<PathBuf>("font").cloned().unwrap_or_default();
    let size = matches.get_one::<f32>("size").copied().unwrap_or(24.0);
    let content = matches.get_one::<String>("text").map_or(DEFAULT_TEXT, String::as_str);
    let max_width = matches.get_one::<f32>("max-width").copied().unwrap_or(320.0);

    let config = if Path::new(CONFIG_PATH).exists() {
        log::info!("Loading settings from {}", CONFIG_PATH);
        TextConfig::load_from_file(CONFIG_PATH)?
    } else {
        TextConfig::default()
    };

    let root = font_path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let locator = font_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| DemoError::FontPath(font_path.clone()))?;
    let source = FileFontSource::new(root);
    let typeface = Arc::new(FontdueTypeface::from_source(&source, &locator)?);

    let font = Arc::new(
        FontDescriptor::builder(typeface, size)
            .foreground([255, 255, 255, 255])
            .background([0, 0, 0, 255])
            .dpi(config.dpi)
            .build()?,
    );

    let store = Arc::new(MemoryTextureStore::new());
    let cache = AtlasCache::new(config, store.clone())?;

    let text = Text::new(Arc::clone(&font), content)
        .word_wrap(max_width)
        .line_spacing(0.1);
    let layout = text.layout(&cache)?;

    log::info!(
        "Laid out {} glyphs in {} lines, {}x{}",
        layout.glyphs().len(),
        layout.lines().len(),
        layout.width(),
        layout.height()
    );
    for (index, line) in layout.lines().iter().enumerate() {
        let line_text: String = layout.line_glyphs(index).iter().map(|g| g.ch).collect();
        println!("{:>3} {:>7.1} {:?} ({:?})", index, line.width, line_text, line.ending);
    }

    let atlas = cache.get_or_build(&font)?;
    let missing = atlas.missing(content);
    if !missing.is_empty() {
        log::warn!("Atlas has no glyphs for {:?}", missing);
    }
    if let Some(image) = atlas.texture().and_then(|handle| store.image(handle)) {
        image.save_png("atlas.png")?;
    }

    match TextRenderer::render_image(&font, content.lines().next().unwrap_or_default()) {
        Some(image) if !image.is_empty() => image.save_png("text.png")?,
        _ => log::warn!("Nothing rendered for the first line"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults_apply_to_optional_args() {
        let matches = cli().try_get_matches_from(["text_demo", "fonts/mono.ttf"]).unwrap();
        assert_eq!(matches.get_one::<PathBuf>("font"), Some(&PathBuf::from("fonts/mono.ttf")));
        assert_eq!(matches.get_one::<f32>("size"), Some(&24.0));
        assert_eq!(matches.get_one::<f32>("max-width"), Some(&320.0));
        assert_eq!(matches.get_one::<String>("text").map(String::as_str), Some(DEFAULT_TEXT));
    }

    #[test]
    fn test_options_are_parsed() {
        let matches = cli()
            .try_get_matches_from(["text_demo", "a.ttf", "--size", "12.5", "-t", "hi", "-w", "90"])
            .unwrap();
        assert_eq!(matches.get_one::<f32>("size"), Some(&12.5));
        assert_eq!(matches.get_one::<String>("text").map(String::as_str), Some("hi"));
        assert_eq!(matches.get_one::<f32>("max-width"), Some(&90.0));
    }

    #[test]
    fn test_help_and_bad_input_do_not_reach_font_loading() {
        let help = cli().try_get_matches_from(["text_demo", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);

        let missing = cli().try_get_matches_from(["text_demo"]).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MissingRequiredArgument);

        let bad_size = cli().try_get_matches_from(["text_demo", "a.ttf", "--size", "big"]).unwrap_err();
        assert_eq!(bad_size.kind(), ErrorKind::ValueValidation);
    }
}

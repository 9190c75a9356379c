//! Font program sources
//!
//! A [`FontSource`] resolves a string locator to raw font bytes. Parsing the
//! bytes into a typeface happens in [`crate::text::typeface`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::text::{FontError, FontResult};

/// Supplies raw font-program bytes for a locator
pub trait FontSource: Send + Sync {
    /// Fetch the bytes for `locator`
    ///
    /// Fails with [`FontError::UnknownFont`] when the locator cannot be resolved.
    fn load(&self, locator: &str) -> FontResult<Arc<[u8]>>;
}

/// Reads font files relative to a root directory
#[derive(Debug, Clone)]
pub struct FileFontSource {
    root: PathBuf,
}

impl FileFontSource {
    /// Create a source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory locators are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FontSource for FileFontSource {
    fn load(&self, locator: &str) -> FontResult<Arc<[u8]>> {
        let path = self.root.join(locator);
        log::debug!("Reading font from {:?}", path);

        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes.into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FontError::UnknownFont(path.display().to_string()))
            }
            Err(e) => Err(FontError::Io(e)),
        }
    }
}

/// Font bytes registered ahead of time under a name
///
/// Useful for fonts embedded with `include_bytes!` or fetched during a
/// preload phase.
#[derive(Debug, Default)]
pub struct MemoryFontSource {
    fonts: RwLock<HashMap<String, Arc<[u8]>>>,
}

impl MemoryFontSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes under `name`, replacing any previous entry
    pub fn insert(&self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        let name = name.into();
        log::debug!("Registered font '{}'", name);
        self.fonts
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name, bytes.into());
    }

    /// Check whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.fonts
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains_key(name)
    }
}

impl FontSource for MemoryFontSource {
    fn load(&self, locator: &str) -> FontResult<Arc<[u8]>> {
        self.fonts
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(locator)
            .cloned()
            .ok_or_else(|| FontError::UnknownFont(locator.to_string()))
    }
}

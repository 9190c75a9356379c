//! Atlas cache for building each distinct atlas once
//!
//! Atlases are keyed by value: the typeface fingerprint, size, DPI, colors
//! and character set. Two descriptors that agree on all of those share one
//! atlas even if they are separate objects.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use super::{unique_chars, AtlasBuilder, FontAtlas, FontDescriptor, FontResult, TextureStore};
use crate::config::{ConfigError, TextConfig};

/// Value identity of an atlas
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtlasKey {
    fingerprint: u64,
    size_bits: u32,
    dpi_bits: u32,
    foreground: [u8; 4],
    background: [u8; 4],
    letters: Arc<[char]>,
}

impl AtlasKey {
    /// Key for `font`, falling back to `default_letters` for its character set
    pub fn new(font: &FontDescriptor, default_letters: &Arc<[char]>) -> Self {
        Self {
            fingerprint: font.typeface().fingerprint(),
            size_bits: font.size().to_bits(),
            dpi_bits: font.dpi().to_bits(),
            foreground: font.foreground(),
            background: font.background(),
            letters: font.character_set(default_letters),
        }
    }

    /// Characters the atlas for this key holds
    pub fn letters(&self) -> &[char] {
        &self.letters
    }
}

/// One cache entry; `build_lock` serializes builds of the same key
#[derive(Default)]
struct Slot {
    atlas: OnceLock<Arc<FontAtlas>>,
    build_lock: Mutex<()>,
}

/// Thread-safe atlas cache
///
/// Concurrent requests for a key that has not been built yet wait for a
/// single build and all receive the same atlas. Requests for different
/// keys build in parallel. Built atlases are kept until [`AtlasCache::clear`].
pub struct AtlasCache {
    config: TextConfig,
    default_letters: Arc<[char]>,
    builder: AtlasBuilder,
    store: Arc<dyn TextureStore>,
    slots: RwLock<HashMap<AtlasKey, Arc<Slot>>>,
    builds: AtomicUsize,
}

impl AtlasCache {
    /// Create an empty cache that uploads atlases to `store`
    ///
    /// Fails when `config` does not pass [`TextConfig::validate`].
    pub fn new(config: TextConfig, store: Arc<dyn TextureStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            default_letters: unique_chars(&config.default_letters),
            builder: AtlasBuilder::new(&config),
            config,
            store,
            slots: RwLock::new(HashMap::new()),
            builds: AtomicUsize::new(0),
        })
    }

    /// Configuration atlases are built with
    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Texture store atlases are uploaded to
    pub fn store(&self) -> &Arc<dyn TextureStore> {
        &self.store
    }

    /// Get the atlas for `font`, building it on first use
    ///
    /// A failed build is not cached; the next request tries again.
    pub fn get_or_build(&self, font: &FontDescriptor) -> FontResult<Arc<FontAtlas>> {
        let key = AtlasKey::new(font, &self.default_letters);

        loop {
            let slot = self.slot(&key);
            if let Some(atlas) = slot.atlas.get() {
                log::trace!("Atlas cache hit for {:?}", font);
                return Ok(Arc::clone(atlas));
            }

            let _building = slot.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
            // The slot was dropped by a failed build or a clear while we waited
            if !self.is_current(&key, &slot) {
                continue;
            }
            // Another caller may have finished the build while we waited
            if let Some(atlas) = slot.atlas.get() {
                return Ok(Arc::clone(atlas));
            }

            log::debug!("Atlas cache miss, building {} glyphs for {:?}", key.letters.len(), font);
            let atlas = match self.builder.build(font, &key.letters, self.store.as_ref()) {
                Ok(atlas) => Arc::new(atlas),
                Err(e) => {
                    self.retire(&key, &slot);
                    return Err(e);
                }
            };
            self.builds.fetch_add(1, Ordering::SeqCst);

            return Ok(Arc::clone(slot.atlas.get_or_init(|| atlas)));
        }
    }

    /// Get an already built atlas without building
    pub fn get(&self, font: &FontDescriptor) -> Option<Arc<FontAtlas>> {
        let key = AtlasKey::new(font, &self.default_letters);
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&key)?.atlas.get().cloned()
    }

    /// Number of built atlases
    pub fn len(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.atlas.get().is_some()).count()
    }

    /// Check if no atlas has been built
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of atlas builds performed
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Drop every cached atlas and release their textures
    ///
    /// Builds already running finish first and have their textures released
    /// too. Atlases still held by callers stay usable for layout, but their
    /// texture handles are no longer valid.
    pub fn clear(&self) {
        let drained: Vec<Arc<Slot>> = {
            let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
            slots.drain().map(|(_, slot)| slot).collect()
        };

        let mut released = 0;
        for slot in drained {
            let _building = slot.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(handle) = slot.atlas.get().and_then(|atlas| atlas.texture()) {
                self.store.release(handle);
                released += 1;
            }
        }
        log::info!("Cleared atlas cache, released {} textures", released);
    }

    fn slot(&self, key: &AtlasKey) -> Arc<Slot> {
        {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get(key) {
                return Arc::clone(slot);
            }
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    fn is_current(&self, key: &AtlasKey, slot: &Arc<Slot>) -> bool {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    fn retire(&self, key: &AtlasKey, slot: &Arc<Slot>) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(key);
        }
    }
}

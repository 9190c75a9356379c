//! Texture store seam
//!
//! The text pipeline never talks to the GPU directly. Finished pixel buffers
//! go to a [`TextureStore`], which hands back an opaque [`TextureHandle`]
//! that the rendering system binds later.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::assets::ImageData;

/// Handle for a GPU texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Texture store errors
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The store refused the image
    #[error("Texture upload rejected: {0}")]
    Rejected(String),
}

/// Accepts pixel buffers and owns the resulting textures
pub trait TextureStore: Send + Sync {
    /// Upload `image` and return a handle to it
    fn upload(&self, image: &ImageData) -> Result<TextureHandle, TextureError>;

    /// Free a texture; unknown handles are ignored
    fn release(&self, handle: TextureHandle);
}

/// Information about a stored texture
#[derive(Debug, Clone)]
struct TextureInfo {
    image: ImageData,
}

#[derive(Debug, Default)]
struct StoreState {
    textures: HashMap<TextureHandle, TextureInfo>,
    next_handle: u32,
    uploads: usize,
}

/// Texture store that keeps images in main memory
///
/// Serves headless tools and tests, and doubles as a staging area for
/// backends that upload in batches.
#[derive(Debug)]
pub struct MemoryTextureStore {
    state: Mutex<StoreState>,
    max_dimension: Option<u32>,
}

impl MemoryTextureStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_handle: 1, // Start from 1, reserve 0 for "no texture"
                ..StoreState::default()
            }),
            max_dimension: None,
        }
    }

    /// Create a store that rejects images wider or taller than `max_dimension`
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: Some(max_dimension),
            ..Self::new()
        }
    }

    /// Copy of a stored image
    pub fn image(&self, handle: TextureHandle) -> Option<ImageData> {
        self.lock().textures.get(&handle).map(|info| info.image.clone())
    }

    /// Number of live textures
    pub fn len(&self) -> usize {
        self.lock().textures.len()
    }

    /// True when no textures are live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of successful uploads, including released textures
    pub fn upload_count(&self) -> usize {
        self.lock().uploads
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for MemoryTextureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureStore for MemoryTextureStore {
    fn upload(&self, image: &ImageData) -> Result<TextureHandle, TextureError> {
        if image.is_empty() {
            return Err(TextureError::Rejected("image has no pixels".to_string()));
        }
        if let Some(max) = self.max_dimension {
            if image.width() > max || image.height() > max {
                return Err(TextureError::Rejected(format!(
                    "{}x{} exceeds maximum dimension {}",
                    image.width(),
                    image.height(),
                    max
                )));
            }
        }

        let mut state = self.lock();
        let handle = TextureHandle(state.next_handle);
        state.next_handle += 1;
        state.uploads += 1;
        state.textures.insert(handle, TextureInfo { image: image.clone() });

        log::debug!("Stored {}x{} texture as {:?}", image.width(), image.height(), handle);
        Ok(handle)
    }

    fn release(&self, handle: TextureHandle) {
        if self.lock().textures.remove(&handle).is_some() {
            log::debug!("Released texture {:?}", handle);
        }
    }
}

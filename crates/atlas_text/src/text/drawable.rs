//! Draw surface contract between text and the rendering system
//!
//! Atlas-backed text exposes no texture of its own: the rendering system
//! draws one quad per glyph from the shared atlas instead. Directly
//! rendered text owns exactly one texture.

use std::sync::Arc;

use super::{FontAtlas, Text, TextLayout, TextureHandle, TextureStore};

/// Something the rendering system can draw
pub trait Drawable {
    /// Texture covering the whole surface, if there is one
    fn texture(&self) -> Option<TextureHandle>;

    /// Width in pixels
    fn width(&self) -> f32;

    /// Height in pixels
    fn height(&self) -> f32;

    /// Normalized texture rectangle: (min u, min v, max u, max v)
    fn view(&self) -> (f32, f32, f32, f32);

    /// Release resources owned by this surface
    fn close(&mut self);
}

/// Text bound to the atlas it is laid out against
#[derive(Debug, Clone)]
pub struct AtlasText {
    atlas: Arc<FontAtlas>,
    text: Text,
}

impl AtlasText {
    /// Bind `text` to `atlas`
    pub fn new(atlas: Arc<FontAtlas>, text: Text) -> Self {
        Self { atlas, text }
    }

    /// Atlas glyph quads are sampled from
    pub fn atlas(&self) -> &Arc<FontAtlas> {
        &self.atlas
    }

    /// Bound text
    pub fn text(&self) -> &Text {
        &self.text
    }

    /// Mutable access, e.g. to change the string between frames
    pub fn text_mut(&mut self) -> &mut Text {
        &mut self.text
    }

    /// Lay out the current string
    pub fn layout(&self) -> TextLayout {
        TextLayout::new(&self.atlas, self.text.content(), &self.text.options())
    }
}

impl Drawable for AtlasText {
    fn texture(&self) -> Option<TextureHandle> {
        None
    }

    fn width(&self) -> f32 {
        self.layout().width()
    }

    fn height(&self) -> f32 {
        self.layout().height()
    }

    fn view(&self) -> (f32, f32, f32, f32) {
        (0.0, 0.0, 1.0, 1.0)
    }

    // The atlas outlives any one text
    fn close(&mut self) {}
}

/// A string rendered into its own texture
pub struct RenderedText {
    texture: Option<TextureHandle>,
    width: f32,
    height: f32,
    store: Arc<dyn TextureStore>,
}

impl RenderedText {
    /// Wrap an uploaded texture
    pub fn new(texture: TextureHandle, width: f32, height: f32, store: Arc<dyn TextureStore>) -> Self {
        Self {
            texture: Some(texture),
            width,
            height,
            store,
        }
    }
}

impl Drawable for RenderedText {
    fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn view(&self) -> (f32, f32, f32, f32) {
        (0.0, 0.0, 1.0, 1.0)
    }

    fn close(&mut self) {
        if let Some(handle) = self.texture.take() {
            self.store.release(handle);
        }
    }
}

impl Drop for RenderedText {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextConfig;
    use crate::text::test_support::{FixedTypeface, ADVANCE};
    use crate::text::{AtlasCache, FontDescriptor, MemoryTextureStore, TextRenderer};

    #[test]
    fn test_atlas_text_surface() {
        let cache = AtlasCache::new(TextConfig::default(), Arc::new(MemoryTextureStore::new())).unwrap();
        let font = Arc::new(FontDescriptor::new(FixedTypeface::shared(), 10.0).unwrap());
        let mut drawable = Text::new(font, "abc").drawable(&cache).unwrap();

        assert_eq!(drawable.texture(), None);
        assert_eq!(drawable.view(), (0.0, 0.0, 1.0, 1.0));
        assert_eq!(drawable.width(), 3.0 * ADVANCE);

        // Width follows the string without rebuilding the atlas
        drawable.text_mut().set_content("abcd");
        assert_eq!(drawable.width(), 4.0 * ADVANCE);
        assert_eq!(cache.builds(), 1);

        drawable.close();
        assert!(drawable.atlas().contains('a'));
    }

    #[test]
    fn test_mixed_surfaces_behind_trait_objects() {
        let store = Arc::new(MemoryTextureStore::new());
        let cache = AtlasCache::new(TextConfig::default(), store.clone()).unwrap();
        let font = Arc::new(FontDescriptor::new(FixedTypeface::shared(), 10.0).unwrap());

        let atlas_backed = Text::new(Arc::clone(&font), "a\nb").drawable(&cache).unwrap();
        let rendered = TextRenderer::new(store.clone()).render(&font, "ab").unwrap().unwrap();
        let surfaces: Vec<Box<dyn Drawable>> = vec![Box::new(atlas_backed), Box::new(rendered)];

        assert_eq!(surfaces[0].height(), 36.0);
        assert!(surfaces[0].texture().is_none());
        assert!(surfaces[1].texture().is_some());
    }

    #[test]
    fn test_rendered_text_released_on_drop() {
        let store = Arc::new(MemoryTextureStore::new());
        let handle = store.upload(&crate::assets::ImageData::solid_color(2, 2, [0; 4])).unwrap();
        {
            let rendered = RenderedText::new(handle, 2.0, 2.0, store.clone());
            assert_eq!(rendered.texture(), Some(handle));
        }
        assert!(store.is_empty());
    }
}

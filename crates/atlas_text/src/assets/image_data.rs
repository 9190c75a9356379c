//! RGBA pixel buffers produced by the rasterizer
//!
//! Atlas bitmaps and directly rendered strings are both stored as straight
//! (non-premultiplied) RGBA8 images before they are handed to a texture store.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::assets::AssetError;

/// Pixel data ready for GPU upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    image: RgbaImage,
}

impl ImageData {
    /// Create an image filled with one color
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(color)),
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// True when the image has no pixels
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    /// Raw RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Read one pixel, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.image.width() && y < self.image.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Blend `color` over the pixel at (x, y) using an 8-bit coverage value
    ///
    /// Writes outside the image are clipped.
    pub fn blend_coverage(&mut self, x: i64, y: i64, color: [u8; 4], coverage: u8) {
        if coverage == 0 || x < 0 || y < 0 {
            return;
        }
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }

        let dst = self.image.get_pixel_mut(x, y);
        let src_alpha = f32::from(coverage) / 255.0 * f32::from(color[3]) / 255.0;
        let dst_alpha = f32::from(dst.0[3]) / 255.0;
        let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

        if out_alpha <= 0.0 {
            // Fully transparent result; keep color channels from the source
            dst.0 = [color[0], color[1], color[2], 0];
            return;
        }

        for channel in 0..3 {
            let src = f32::from(color[channel]);
            let back = f32::from(dst.0[channel]);
            let value = (src * src_alpha + back * dst_alpha * (1.0 - src_alpha)) / out_alpha;
            dst.0[channel] = value.round().clamp(0.0, 255.0) as u8;
        }
        dst.0[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Save to a PNG file, mainly for inspecting atlases while debugging
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), AssetError> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| AssetError::SaveFailed(format!("{}: {}", path.display(), e)))?;
        log::info!("Saved {}x{} image to {:?}", self.width(), self.height(), path);
        Ok(())
    }
}

//! CPU-side RGBA rasters that back every screen, wall and menu item.
//!
//! A [`RasterTexture`] is what the procedural generators write into. The
//! renderer samples it by uploading the pixels to a GPU [`Texture`](super::texture::Texture)
//! whenever the raster's [`revision`](RasterTexture::revision) changed since
//! the last upload, which replaces an explicit "needs update" flag.

use std::{cell::RefCell, rc::Rc};

use image::{Rgba, RgbaImage};

/// A raster shared between its owning surface, the renderer and any animation
/// task that redraws it. Everything runs on the event-loop thread.
pub type SharedRaster = Rc<RefCell<RasterTexture>>;

#[derive(Clone, Debug)]
pub struct RasterTexture {
    image: RgbaImage,
    revision: u64,
}

impl RasterTexture {
    /// Fully transparent raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width.max(1), height.max(1)))
    }

    /// Raster filled with one opaque colour given as `0xRRGGBB`.
    pub fn filled(width: u32, height: u32, hex: u32) -> Self {
        let [r, g, b] = hex_to_rgb(hex);
        Self::from_image(RgbaImage::from_pixel(
            width.max(1),
            height.max(1),
            Rgba([r, g, b, 255]),
        ))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image, revision: 0 }
    }

    pub fn into_shared(self) -> SharedRaster {
        Rc::new(RefCell::new(self))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Mutable access for in-place redraws. Callers must [`touch`](Self::touch)
    /// afterwards so the renderer picks the change up.
    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Replace the whole image, e.g. when swapping highlight variants.
    pub fn replace(&mut self, other: RasterTexture) {
        self.image = other.image;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Tightly packed RGBA8 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }
}

pub fn hex_to_rgb(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

/// `0xRRGGBB` to float channels in `[0, 1]`, no colour space conversion.
pub fn hex_to_f32(hex: u32) -> [f32; 3] {
    let [r, g, b] = hex_to_rgb(hex);
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

/// `0xRRGGBB` as sRGB to linear float colour, which is what the shaders mix.
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_f32(hex).map(|c| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}

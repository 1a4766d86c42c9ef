//! Bitmap text for screen textures.
//!
//! Glyphs come from the 8x8 `font8x8` set and are scaled by whole pixels in
//! each axis, which keeps the blocky CRT look at every size. Text is first
//! rasterised into a coverage mask so the same glyph run can be drawn as a
//! fill, a blurred glow or an offset drop shadow.

use font8x8::legacy::BASIC_LEGACY;
use image::{GrayImage, Luma, RgbaImage};

use crate::procedural::canvas::{self, Paint};

const GLYPH_SIZE: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    pub scale_x: u32,
    pub scale_y: u32,
    pub align: Align,
}

impl TextStyle {
    pub const fn new(scale: u32, align: Align) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            align,
        }
    }

    pub fn advance(&self) -> u32 {
        GLYPH_SIZE * self.scale_x
    }

    pub fn line_height(&self) -> u32 {
        GLYPH_SIZE * self.scale_y
    }

    pub fn measure(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.advance()
    }
}

/// Extra effect drawn underneath the text fill.
#[derive(Clone, Copy, Debug)]
pub enum Effect {
    None,
    /// Canvas-style `shadowBlur` around the glyphs themselves.
    Glow { paint: Paint, blur: f32 },
    /// Blurred copy offset by `(dx, dy)`.
    Shadow { paint: Paint, blur: f32, dx: i32, dy: i32 },
}

fn glyph(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

/// Coverage mask of `text`, padded by `pad` pixels on every side.
pub fn text_mask(text: &str, style: &TextStyle, pad: u32) -> GrayImage {
    let width = style.measure(text) + pad * 2;
    let height = style.line_height() + pad * 2;
    let mut mask = GrayImage::new(width.max(1), height.max(1));
    for (col, ch) in text.chars().enumerate() {
        let origin_x = pad + col as u32 * style.advance();
        for (row, bits) in glyph(ch).iter().enumerate() {
            for bit in 0..GLYPH_SIZE {
                if (bits >> bit) & 0x01 == 0 {
                    continue;
                }
                let x = origin_x + bit * style.scale_x;
                let y = pad + row as u32 * style.scale_y;
                for sy in 0..style.scale_y {
                    for sx in 0..style.scale_x {
                        mask.put_pixel(x + sx, y + sy, Luma([255]));
                    }
                }
            }
        }
    }
    mask
}

/// Draws `text` with its anchor at `x` (left edge or centre depending on the
/// alignment) and vertically centred on `middle_y`. Returns the left edge the
/// text was drawn at.
pub fn draw_text(
    img: &mut RgbaImage,
    text: &str,
    x: i32,
    middle_y: i32,
    style: &TextStyle,
    paint: Paint,
    effect: Effect,
) -> i32 {
    if text.is_empty() {
        return x;
    }
    let left = match style.align {
        Align::Left => x,
        Align::Center => x - style.measure(text) as i32 / 2,
    };
    let top = middle_y - style.line_height() as i32 / 2;

    match effect {
        Effect::None => {}
        Effect::Glow { paint, blur } => {
            let pad = (blur * 2.0).ceil() as u32;
            let glow = canvas::blur_mask(&text_mask(text, style, pad), blur / 2.0);
            canvas::composite_mask(img, &glow, left - pad as i32, top - pad as i32, paint);
        }
        Effect::Shadow { paint, blur, dx, dy } => {
            let pad = (blur * 2.0).ceil() as u32;
            let shadow = canvas::blur_mask(&text_mask(text, style, pad), blur / 2.0);
            canvas::composite_mask(
                img,
                &shadow,
                left - pad as i32 + dx,
                top - pad as i32 + dy,
                paint,
            );
        }
    }

    canvas::composite_mask(img, &text_mask(text, style, 0), left, top, paint);
    left
}

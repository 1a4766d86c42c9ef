//! Small 2D drawing toolkit on top of [`image::RgbaImage`].
//!
//! Covers what the screen generators need from a canvas: rectangles with
//! source-over blending, "screen" blending, linear gradients, ring strokes and
//! compositing a blurred coverage mask (glows and drop shadows).

use image::{GrayImage, Luma, Rgba, RgbaImage};

/// A colour with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Paint {
    pub const fn hex(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
            a: 1.0,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    fn lerp(self, other: Paint, t: f32) -> Paint {
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Paint {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Source-over compositing of `paint` scaled by `coverage` onto `dst`.
pub fn blend_over(dst: &mut Rgba<u8>, paint: Paint, coverage: f32) {
    let sa = (paint.a * coverage).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    let channel = |s: u8, d: u8| {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        channel(paint.r, dst[0]),
        channel(paint.g, dst[1]),
        channel(paint.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

/// "screen" compositing: `1 - (1 - src·a)(1 - dst)` per channel, alpha kept.
pub fn blend_screen(dst: &mut Rgba<u8>, paint: Paint) {
    let channel = |s: u8, d: u8| {
        let s = s as f32 / 255.0 * paint.a;
        let d = d as f32 / 255.0;
        ((1.0 - (1.0 - s) * (1.0 - d)) * 255.0).round().clamp(0.0, 255.0) as u8
    };
    dst[0] = channel(paint.r, dst[0]);
    dst[1] = channel(paint.g, dst[1]);
    dst[2] = channel(paint.b, dst[2]);
}

pub fn fill(img: &mut RgbaImage, hex: u32) {
    let p = Paint::hex(hex);
    for px in img.pixels_mut() {
        *px = Rgba([p.r, p.g, p.b, 255]);
    }
}

/// Blends a rectangle; coordinates may lie partially outside the image.
pub fn fill_rect(img: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, paint: Paint) {
    let (x0, x1) = clip_span(x, w, img.width());
    let (y0, y1) = clip_span(y, h, img.height());
    for py in y0..y1 {
        for px in x0..x1 {
            blend_over(img.get_pixel_mut(px, py), paint, 1.0);
        }
    }
}

/// Overwrites a rectangle without blending (cursor blocks, snapshots).
pub fn put_rect(img: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, hex: u32) {
    let p = Paint::hex(hex);
    let (x0, x1) = clip_span(x, w, img.width());
    let (y0, y1) = clip_span(y, h, img.height());
    for py in y0..y1 {
        for px in x0..x1 {
            img.put_pixel(px, py, Rgba([p.r, p.g, p.b, 255]));
        }
    }
}

/// Blends a one-pixel-high line of `paint` on every `step`-th row starting at
/// row 0; `alpha` is asked for each row so callers can randomise it.
pub fn scanlines(img: &mut RgbaImage, step: u32, paint: Paint, mut alpha: impl FnMut() -> f32) {
    let width = img.width();
    for y in (0..img.height()).step_by(step.max(1) as usize) {
        fill_rect(img, 0, y as i32, width, 1, paint.with_alpha(alpha()));
    }
}

/// Blends a left-to-right linear gradient over the whole image. `stops` are
/// `(offset, paint)` pairs with increasing offsets in `[0, 1]`.
pub fn horizontal_gradient(img: &mut RgbaImage, stops: &[(f32, Paint)]) {
    let Some(&(_, first)) = stops.first() else {
        return;
    };
    let width = img.width();
    let paints: Vec<Paint> = (0..width)
        .map(|x| sample_gradient(stops, first, (x as f32 + 0.5) / width as f32))
        .collect();
    for (x, _, px) in img.enumerate_pixels_mut() {
        blend_over(px, paints[x as usize], 1.0);
    }
}

fn sample_gradient(stops: &[(f32, Paint)], first: Paint, t: f32) -> Paint {
    let mut previous = (0.0, first);
    for &(offset, paint) in stops {
        if t <= offset {
            let span = offset - previous.0;
            if span <= f32::EPSILON {
                return paint;
            }
            return previous.1.lerp(paint, (t - previous.0) / span);
        }
        previous = (offset, paint);
    }
    previous.1
}

/// Anti-aliased circle outline centred on `(cx, cy)`.
pub fn stroke_ring(img: &mut RgbaImage, cx: f32, cy: f32, radius: f32, line_width: f32, paint: Paint) {
    let half = line_width / 2.0;
    let reach = radius + half + 1.0;
    let x0 = (cx - reach).floor().max(0.0) as u32;
    let y0 = (cy - reach).floor().max(0.0) as u32;
    let x1 = ((cx + reach).ceil() as u32).min(img.width());
    let y1 = ((cy + reach).ceil() as u32).min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let distance = ((dx * dx + dy * dy).sqrt() - radius).abs();
            let coverage = (half + 0.5 - distance).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend_over(img.get_pixel_mut(x, y), paint, coverage);
            }
        }
    }
}

/// Composites a coverage mask (0 = none, 255 = full) at `(dx, dy)` in `paint`.
pub fn composite_mask(img: &mut RgbaImage, mask: &GrayImage, dx: i32, dy: i32, paint: Paint) {
    for (mx, my, Luma([coverage])) in mask.enumerate_pixels() {
        if *coverage == 0 {
            continue;
        }
        let x = mx as i32 + dx;
        let y = my as i32 + dy;
        if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
            continue;
        }
        blend_over(img.get_pixel_mut(x as u32, y as u32), paint, *coverage as f32 / 255.0);
    }
}

/// Gaussian-blurred copy of a mask, `sigma` in pixels. Canvas `shadowBlur = b`
/// corresponds to roughly `sigma = b / 2`.
pub fn blur_mask(mask: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return mask.clone();
    }
    image::imageops::blur(mask, sigma)
}

fn clip_span(start: i32, len: u32, limit: u32) -> (u32, u32) {
    let begin = start.max(0) as i64;
    let end = (start as i64 + len as i64).min(limit as i64);
    if end <= begin {
        return (0, 0);
    }
    (begin as u32, end as u32)
}

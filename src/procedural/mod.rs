//! Procedural CRT screen textures.
//!
//! Every generator draws into a fresh [`RasterTexture`] and takes the random
//! source explicitly, so the scene can use a thread-local generator while tests
//! seed a [`rand::rngs::StdRng`]. Two kinds animate: static noise is
//! re-synthesised in place with [`fill_static`], and the mission readout blinks
//! a cursor through [`CursorBlink`]. Scheduling those redraws is the job of
//! [`crate::animation::Animator`].

pub mod canvas;
pub mod text;

use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::{
    data_structures::raster::RasterTexture,
    procedural::{
        canvas::Paint,
        text::{Align, Effect, TextStyle},
    },
};

/// Background used before any noise is written.
pub const BACKGROUND: u32 = 0x111111;

pub const STATIC_SIZE: u32 = 256;
pub const LOGO_SIZE: u32 = 256;
pub const MISSION_WIDTH: u32 = 512;
pub const MISSION_HEIGHT: u32 = 384;
pub const MENU_ITEM_WIDTH: u32 = 512;
pub const MENU_ITEM_HEIGHT: u32 = 64;

/// Per-pixel brightness jitter applied by [`noise_texture`].
pub const NOISE_JITTER: std::ops::Range<f32> = 0.85..1.15;

pub const MISSION_LINES: [&str; 13] = [
    "> MISSION DATA:",
    "> TARGET: CLASSIFIED",
    "> LOCATION: [REDACTED]",
    "> STATUS: PENDING AUTHORIZATION",
    "",
    "> TEAM ALPHA STANDING BY",
    "> SECURITY LEVEL: 5",
    "> CLEARANCE CODE: ********",
    "",
    "> LOADING ASSETS... 89%",
    "> WARNING: COMMS COMPROMISED",
    ">",
    "> ...CONNECTION SECURE...",
];

const MISSION_BACKGROUND: u32 = 0x001100;
const MISSION_TEXT: Paint = Paint::hex(0x33cc33);
const MISSION_MARGIN: i32 = 20;
const MISSION_FIRST_LINE: i32 = 30;
const MISSION_LINE_PITCH: i32 = 25;
const MISSION_STYLE: TextStyle = TextStyle {
    scale_x: 1,
    scale_y: 2,
    align: Align::Left,
};

/// Character cell the mission cursor blinks in.
pub const CURSOR_CELL: (u32, u32) = (9, 11);
pub const CURSOR_SIZE: (u32, u32) = (10, 16);
const CURSOR_COLOUR: u32 = 0x00ff00;

const MENU_TEXT_STYLE: TextStyle = TextStyle::new(4, Align::Left);
const MENU_TEXT_X: i32 = 20;
const LOGO_STYLE: TextStyle = TextStyle::new(4, Align::Center);

/// Every pixel is a uniformly chosen palette colour times a brightness jitter
/// in [`NOISE_JITTER`]. Palette entries are `0xRRGGBB`.
pub fn noise_texture<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32, palette: &[u32]) -> RasterTexture {
    let mut raster = RasterTexture::filled(width, height, BACKGROUND);
    if palette.is_empty() {
        return raster;
    }
    for px in raster.image_mut().pixels_mut() {
        let colour = palette[rng.gen_range(0..palette.len())];
        let jitter = rng.gen_range(NOISE_JITTER);
        let channel = |shift: u32| {
            let c = ((colour >> shift) & 0xff) as f32;
            (c * jitter).round().clamp(0.0, 255.0) as u8
        };
        *px = Rgba([channel(16), channel(8), channel(0), 255]);
    }
    raster
}

/// 256x256 flickering CRT static.
pub fn static_texture<R: Rng + ?Sized>(rng: &mut R) -> RasterTexture {
    let mut raster = RasterTexture::new(STATIC_SIZE, STATIC_SIZE);
    fill_static(rng, &mut raster);
    raster
}

/// Re-synthesises static noise in place and bumps the raster revision.
pub fn fill_static<R: Rng + ?Sized>(rng: &mut R, raster: &mut RasterTexture) {
    let img = raster.image_mut();
    let (width, height) = img.dimensions();

    for y in 0..height {
        let amplitude = rng.gen_range(0.3..1.0f32);
        for x in 0..width {
            let value = (rng.r#gen::<f32>() * 180.0 * amplitude).floor() as u8;
            img.put_pixel(x, y, Rgba([value, value, value, 255]));
        }
    }

    canvas::scanlines(img, 2, Paint::rgba(0, 0, 0, 0.3), || 0.3);

    // Chromatic separation: red lags one pixel to the right, blue one to the left.
    let source = img.clone();
    let last = width.saturating_sub(1);
    for (x, y, px) in img.enumerate_pixels_mut() {
        px[0] = source.get_pixel(x.saturating_sub(1), y)[0];
        px[2] = source.get_pixel((x + 1).min(last), y)[2];
        canvas::blend_screen(px, Paint::rgba(255, 0, 0, 0.03));
        canvas::blend_screen(px, Paint::rgba(0, 255, 0, 0.03));
        canvas::blend_screen(px, Paint::rgba(0, 0, 255, 0.03));
    }

    raster.touch();
}

/// Two-line "BLACK OPS" emblem inside a ring.
pub fn logo_texture() -> RasterTexture {
    let mut raster = RasterTexture::filled(LOGO_SIZE, LOGO_SIZE, 0x000000);
    let img = raster.image_mut();
    let centre = LOGO_SIZE as i32 / 2;
    let shadow = Effect::Shadow {
        paint: Paint::hex(0x000000),
        blur: 10.0,
        dx: 2,
        dy: 2,
    };
    text::draw_text(img, "BLACK", centre, centre - 20, &LOGO_STYLE, Paint::hex(0xff0000), shadow);
    text::draw_text(img, "OPS", centre, centre + 20, &LOGO_STYLE, Paint::hex(0xffffff), shadow);
    canvas::stroke_ring(img, centre as f32, centre as f32, 80.0, 3.0, Paint::hex(0x888888));
    raster
}

/// Green terminal readout. The blinking cursor is added by [`CursorBlink`].
pub fn mission_data_texture() -> RasterTexture {
    let mut raster = RasterTexture::filled(MISSION_WIDTH, MISSION_HEIGHT, MISSION_BACKGROUND);
    let img = raster.image_mut();
    for (row, line) in MISSION_LINES.iter().enumerate() {
        text::draw_text(
            img,
            line,
            MISSION_MARGIN,
            mission_baseline(row as u32) - MISSION_STYLE.line_height() as i32 / 2,
            &MISSION_STYLE,
            MISSION_TEXT,
            Effect::None,
        );
    }
    canvas::scanlines(img, 2, Paint::rgba(0, 255, 0, 0.1), || 0.1);
    raster
}

/// Glyphs of readout row `row` sit on this line.
fn mission_baseline(row: u32) -> i32 {
    MISSION_FIRST_LINE + row as i32 * MISSION_LINE_PITCH
}

/// Where the cursor for character cell (`col`, `row`) starts: the cell's
/// left edge on the row's baseline.
pub fn mission_cell_origin(col: u32, row: u32) -> (u32, u32) {
    let x = MISSION_MARGIN as u32 + col * MISSION_STYLE.advance();
    (x, mission_baseline(row) as u32)
}

/// Blinking block cursor over a fixed cell of the mission readout.
///
/// Turning the cursor on saves the pixels under it; turning it off writes the
/// snapshot back, so the readout underneath is never lost.
#[derive(Debug)]
pub struct CursorBlink {
    origin: (u32, u32),
    size: (u32, u32),
    snapshot: Option<RgbaImage>,
}

impl CursorBlink {
    pub fn new() -> Self {
        Self {
            origin: mission_cell_origin(CURSOR_CELL.0, CURSOR_CELL.1),
            size: CURSOR_SIZE,
            snapshot: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn origin(&self) -> (u32, u32) {
        self.origin
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn toggle(&mut self, raster: &mut RasterTexture) {
        let (x, y) = self.origin;
        let (w, h) = self.size;
        let img = raster.image_mut();
        match self.snapshot.take() {
            Some(saved) => {
                image::imageops::replace(img, &saved, x as i64, y as i64);
            }
            None => {
                self.snapshot = Some(image::imageops::crop_imm(&*img, x, y, w, h).to_image());
                canvas::put_rect(img, x as i32, y as i32, w, h, CURSOR_COLOUR);
            }
        }
        raster.touch();
    }
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self::new()
    }
}

/// One selectable menu row. The active variant gets a gradient band and a glow.
pub fn menu_item_texture<R: Rng + ?Sized>(rng: &mut R, label: &str, is_active: bool) -> RasterTexture {
    let mut raster = RasterTexture::new(MENU_ITEM_WIDTH, MENU_ITEM_HEIGHT);
    let img = raster.image_mut();

    if is_active {
        canvas::horizontal_gradient(
            img,
            &[
                (0.0, Paint::rgba(150, 150, 150, 0.3)),
                (0.5, Paint::rgba(200, 200, 200, 0.2)),
                (1.0, Paint::rgba(150, 150, 150, 0.1)),
            ],
        );
    }

    canvas::scanlines(img, 2, Paint::rgba(200, 200, 200, 0.0), || {
        rng.r#gen::<f32>() * 0.05
    });

    let middle = MENU_ITEM_HEIGHT as i32 / 2;
    if is_active {
        let white = Paint::hex(0xffffff);
        let glow = Effect::Glow {
            paint: white,
            blur: 12.0,
        };
        text::draw_text(img, label, MENU_TEXT_X, middle, &MENU_TEXT_STYLE, white, glow);
    } else {
        text::draw_text(
            img,
            label,
            MENU_TEXT_X,
            middle,
            &MENU_TEXT_STYLE,
            Paint::hex(0xaaaaaa),
            Effect::None,
        );
    }
    raster
}

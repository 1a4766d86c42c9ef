use crt_menu::{
    data_structures::raster::RasterTexture,
    procedural::{
        BACKGROUND, CURSOR_CELL, CursorBlink, LOGO_SIZE, MENU_ITEM_HEIGHT, MENU_ITEM_WIDTH,
        MISSION_HEIGHT, MISSION_WIDTH, STATIC_SIZE, fill_static, logo_texture, menu_item_texture,
        mission_cell_origin, mission_data_texture, noise_texture, static_texture,
    },
};

use crate::common::test_utils::seeded_rng;

mod common;

fn mean_luma(raster: &RasterTexture, rows: impl Iterator<Item = u32>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0.0;
    for y in rows {
        for x in 0..raster.width() {
            let px = raster.pixel(x, y);
            sum += (px[0] as f64 + px[1] as f64 + px[2] as f64) / 3.0;
            count += 1.0;
        }
    }
    sum / count
}

#[test]
fn noise_stays_within_the_jittered_palette() {
    let mut rng = seeded_rng(1);
    let raster = noise_texture(&mut rng, 64, 32, &[0x808080, 0x202020]);

    assert_eq!(raster.dimensions(), (64, 32));
    for px in raster.image().pixels() {
        assert_eq!(px[3], 255);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        let bright = (109..=148).contains(&px[0]);
        let dark = (27..=37).contains(&px[0]);
        assert!(bright || dark, "unexpected channel value {}", px[0]);
    }
}

#[test]
fn noise_without_palette_is_the_background() {
    let mut rng = seeded_rng(2);
    let raster = noise_texture(&mut rng, 8, 8, &[]);
    let expected = [0x11, 0x11, 0x11, 0xff];
    assert_eq!(BACKGROUND, 0x111111);
    assert!(raster.image().pixels().all(|px| px.0 == expected));
}

#[test]
fn noise_is_reproducible_with_the_same_seed() {
    let a = noise_texture(&mut seeded_rng(3), 16, 16, &[0x222222, 0x333333]);
    let b = noise_texture(&mut seeded_rng(3), 16, 16, &[0x222222, 0x333333]);
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn static_shifts_red_right_and_blue_left() {
    let raster = static_texture(&mut seeded_rng(11));
    let last = STATIC_SIZE - 1;

    for y in [0, 1, 100, last] {
        // Grey noise receives the same boost on every channel, so the shifted
        // channels equal the green channel of their source pixel.
        for x in 1..STATIC_SIZE {
            assert_eq!(raster.pixel(x, y)[0], raster.pixel(x - 1, y)[1], "red at ({}, {})", x, y);
        }
        for x in 0..last {
            assert_eq!(raster.pixel(x, y)[2], raster.pixel(x + 1, y)[1], "blue at ({}, {})", x, y);
        }
        // Edges clamp to their own column.
        assert_eq!(raster.pixel(0, y)[0], raster.pixel(0, y)[1]);
        assert_eq!(raster.pixel(last, y)[2], raster.pixel(last, y)[1]);
    }

    let fringed = (1..STATIC_SIZE)
        .filter(|&x| raster.pixel(x, 1)[0] != raster.pixel(x, 1)[1])
        .count();
    assert!(fringed > 0, "red channel never differs from green");
}

#[test]
fn static_is_opaque_with_darker_scanlines() {
    let mut rng = seeded_rng(4);
    let raster = static_texture(&mut rng);

    assert_eq!(raster.dimensions(), (STATIC_SIZE, STATIC_SIZE));
    assert!(raster.image().pixels().all(|px| px[3] == 255));

    let even = mean_luma(&raster, (0..STATIC_SIZE).step_by(2));
    let odd = mean_luma(&raster, (1..STATIC_SIZE).step_by(2));
    assert!(even < odd, "even rows {} should be darker than odd rows {}", even, odd);
}

#[test]
fn refilling_static_changes_pixels_and_bumps_the_revision() {
    let mut rng = seeded_rng(5);
    let mut raster = static_texture(&mut rng);
    let before = raster.as_bytes().to_vec();
    let revision = raster.revision();

    fill_static(&mut rng, &mut raster);

    assert_eq!(raster.revision(), revision + 1);
    assert_eq!(raster.dimensions(), (STATIC_SIZE, STATIC_SIZE));
    assert_ne!(raster.as_bytes(), before.as_slice());
}

#[test]
fn logo_has_a_grey_ring_and_red_lettering() {
    let raster = logo_texture();
    assert_eq!(raster.dimensions(), (LOGO_SIZE, LOGO_SIZE));

    // Top of the ring, straight above the centre.
    let ring = raster.pixel(LOGO_SIZE / 2, LOGO_SIZE / 2 - 80);
    assert_eq!(ring[0], ring[1]);
    assert_eq!(ring[1], ring[2]);
    assert!(ring[0] >= 120, "ring pixel too dark: {:?}", ring);

    let red = raster
        .image()
        .pixels()
        .any(|px| px[0] > 200 && px[1] < 50 && px[2] < 50);
    assert!(red);
    // Corners are outside both the ring and the text.
    assert_eq!(raster.pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn mission_readout_is_green_on_dark_green() {
    let raster = mission_data_texture();
    assert_eq!(raster.dimensions(), (MISSION_WIDTH, MISSION_HEIGHT));

    // Odd rows are untouched by the scanlines.
    assert_eq!(raster.pixel(MISSION_WIDTH - 7, MISSION_HEIGHT - 9).0, [0, 17, 0, 255]);

    let text = raster
        .image()
        .pixels()
        .filter(|px| px[1] > 150 && px[0] < px[1] && px[2] < px[1])
        .count();
    assert!(text > 100, "only {} text pixels", text);
}

#[test]
fn cursor_starts_on_the_baseline_of_its_cell() {
    assert_eq!(CURSOR_CELL, (9, 11));
    // Margin 20 plus nine 8 px cells; first baseline 30 plus eleven 25 px rows.
    assert_eq!(mission_cell_origin(9, 11), (92, 305));
    assert_eq!(CursorBlink::new().origin(), (92, 305));
    assert_eq!(CursorBlink::new().size(), (10, 16));
}

#[test]
fn cursor_blink_restores_the_readout() {
    let mut raster = mission_data_texture();
    let pristine = raster.image().clone();
    let mut cursor = CursorBlink::new();
    let (x, y) = cursor.origin();
    let (w, h) = cursor.size();

    cursor.toggle(&mut raster);
    assert!(cursor.is_visible());
    assert_eq!(raster.revision(), 1);
    assert_eq!(raster.pixel(x, y).0, [0, 255, 0, 255]);
    assert_eq!(raster.pixel(x + w - 1, y + h - 1).0, [0, 255, 0, 255]);

    cursor.toggle(&mut raster);
    assert!(!cursor.is_visible());
    assert_eq!(raster.revision(), 2);
    assert_eq!(raster.image(), &pristine);
}

#[test]
fn active_and_inactive_menu_rows_differ() {
    let inactive = menu_item_texture(&mut seeded_rng(6), "CAMPAIGN", false);
    let active = menu_item_texture(&mut seeded_rng(6), "CAMPAIGN", true);

    assert_eq!(inactive.dimensions(), (MENU_ITEM_WIDTH, MENU_ITEM_HEIGHT));
    assert_eq!(active.dimensions(), (MENU_ITEM_WIDTH, MENU_ITEM_HEIGHT));
    assert_ne!(inactive.as_bytes(), active.as_bytes());

    // The highlight band spans the whole row, the inactive row stays clear
    // away from its text.
    assert_eq!(inactive.pixel(MENU_ITEM_WIDTH - 1, 1)[3], 0);
    assert!(active.pixel(MENU_ITEM_WIDTH - 1, 1)[3] > 0);
}

#[test]
fn menu_rows_draw_their_label() {
    let raster = menu_item_texture(&mut seeded_rng(7), "ZOMBIES", false);
    let lit = raster
        .image()
        .pixels()
        .filter(|px| px[3] == 255 && px[0] == 0xaa)
        .count();
    assert!(lit > 0);
}

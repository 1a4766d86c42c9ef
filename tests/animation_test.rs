use std::{cell::Cell, rc::Rc};

use crt_menu::{
    animation::Animator,
    config::{SceneConfig, ScreenContent},
    procedural::STATIC_SIZE,
    scene::screen::{CURSOR_INTERVAL, STATIC_INTERVAL, Screen, ScreenOptions},
};
use instant::Duration;

use crate::common::test_utils::seeded_rng;

mod common;

fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let count = Rc::new(Cell::new(0));
    let step = {
        let count = count.clone();
        move || count.set(count.get() + 1)
    };
    (count, step)
}

#[test]
fn tasks_run_on_their_interval() {
    let mut animator = Animator::new();
    let (count, step) = counter();
    let _handle = animator.every("tick", Duration::from_millis(100), step);

    assert_eq!(animator.advance(Duration::from_millis(60)), 0);
    assert_eq!(count.get(), 0);
    // 120ms accumulated: one step, 20ms carried over.
    assert_eq!(animator.advance(Duration::from_millis(60)), 1);
    assert_eq!(count.get(), 1);
    assert_eq!(animator.advance(Duration::from_millis(80)), 1);
    assert_eq!(count.get(), 2);
    assert_eq!(animator.advance(Duration::from_millis(90)), 0);
    assert_eq!(count.get(), 2);
}

#[test]
fn long_stalls_do_not_burst() {
    let mut animator = Animator::new();
    let (count, step) = counter();
    let _handle = animator.every("tick", Duration::from_millis(100), step);

    assert_eq!(animator.advance(Duration::from_secs(2)), 1);
    assert_eq!(count.get(), 1);
    // The stall leaves no remainder beyond a fraction of an interval.
    assert_eq!(animator.advance(Duration::from_millis(50)), 0);
    assert_eq!(count.get(), 1);
}

#[test]
fn dropping_the_handle_stops_the_task() {
    let mut animator = Animator::new();
    let (count, step) = counter();
    let handle = animator.every("tick", Duration::from_millis(10), step);
    assert_eq!(handle.label(), "tick");

    animator.advance(Duration::from_millis(10));
    assert_eq!(count.get(), 1);
    assert_eq!(animator.active(), 1);

    drop(handle);
    assert_eq!(animator.active(), 0);
    assert_eq!(animator.advance(Duration::from_millis(100)), 0);
    assert_eq!(count.get(), 1);
}

#[test]
fn cancelling_one_task_keeps_the_others() {
    let mut animator = Animator::new();
    let (first, first_step) = counter();
    let (second, second_step) = counter();
    let first_handle = animator.every("first", Duration::from_millis(10), first_step);
    let _second_handle = animator.every("second", Duration::from_millis(10), second_step);

    first_handle.cancel();
    assert_eq!(animator.active(), 1);
    assert_eq!(animator.advance(Duration::from_millis(10)), 1);
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
}

#[test]
fn static_screens_regenerate_until_stopped() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(1);
    let mut screen = Screen::new(
        ScreenOptions::new(1.0, 0.75, ScreenContent::Static),
        &[],
        &mut animator,
        &mut rng,
    );
    assert!(screen.is_animated());
    assert_eq!(animator.active(), 1);

    let revision = screen.raster().borrow().revision();
    animator.advance(STATIC_INTERVAL);
    assert_eq!(screen.raster().borrow().revision(), revision + 1);

    screen.stop_animations();
    assert!(!screen.is_animated());
    assert_eq!(animator.active(), 0);
    animator.advance(STATIC_INTERVAL * 3);
    assert_eq!(screen.raster().borrow().revision(), revision + 1);
}

#[test]
fn dropping_a_screen_stops_its_animation() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(2);
    let screen = Screen::new(
        ScreenOptions::new(1.0, 0.75, ScreenContent::MissionData),
        &[],
        &mut animator,
        &mut rng,
    );
    let raster = screen.raster().clone();
    assert_eq!(animator.active(), 1);

    let revision = raster.borrow().revision();
    animator.advance(CURSOR_INTERVAL);
    assert_eq!(raster.borrow().revision(), revision + 1);

    drop(screen);
    assert_eq!(animator.active(), 0);
    animator.advance(CURSOR_INTERVAL);
    assert_eq!(raster.borrow().revision(), revision + 1);
}

#[test]
fn switching_content_replaces_the_animation() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(3);
    let mut screen = Screen::new(
        ScreenOptions::new(1.0, 0.75, ScreenContent::Static),
        &[],
        &mut animator,
        &mut rng,
    );

    screen.update_content(ScreenContent::Logo, None, &mut animator, &mut rng);
    assert!(!screen.is_animated());
    assert_eq!(animator.active(), 0);

    screen.update_content(ScreenContent::MissionData, None, &mut animator, &mut rng);
    assert!(screen.is_animated());
    assert_eq!(animator.active(), 1);
}

#[test]
fn logos_never_animate() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(4);
    let screen = Screen::new(
        ScreenOptions::new(1.0, 0.75, ScreenContent::Logo),
        &[],
        &mut animator,
        &mut rng,
    );
    assert!(!screen.is_animated());
    assert_eq!(animator.active(), 0);
    let revision = screen.raster().borrow().revision();
    animator.advance(STATIC_INTERVAL);
    assert_eq!(screen.raster().borrow().revision(), revision);
}

#[test]
fn menu_screens_flicker_behind_their_rows() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(5);
    let entries = SceneConfig::default().menu.entries;
    let screen = Screen::new(
        ScreenOptions::new(2.0, 1.5, ScreenContent::Menu),
        &entries,
        &mut animator,
        &mut rng,
    );
    assert!(screen.is_animated());
    assert_eq!(animator.active(), 1);
    assert_eq!(screen.raster().borrow().dimensions(), (STATIC_SIZE, STATIC_SIZE));

    let backdrop = screen.raster().borrow().revision();
    let rows: Vec<_> = screen
        .menu_items()
        .iter()
        .map(|item| item.texture.borrow().revision())
        .collect();
    animator.advance(STATIC_INTERVAL);
    assert_eq!(screen.raster().borrow().revision(), backdrop + 1);
    // Only the backdrop regenerates; the rows keep their textures.
    for (item, revision) in screen.menu_items().iter().zip(rows) {
        assert_eq!(item.texture.borrow().revision(), revision);
    }
}

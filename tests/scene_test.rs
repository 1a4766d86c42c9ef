use cgmath::{EuclideanSpace, Point3, Vector2};
use crt_menu::{
    animation::Animator,
    config::{MenuEntry, SceneConfig, ScreenContent, TvConfig},
    data_structures::surface::SurfaceId,
    effects::SELECT_TONE,
    interaction::{Highlight, InteractionResolver, SurfaceRegistry},
    pipelines::light::{LightUniform, MAX_POINT_LIGHTS},
    procedural::MENU_ITEM_WIDTH,
    render::look_colours,
    scene::{
        Look,
        lighting::{LightingRig, PointLight},
        menu::{MenuAssets, MenuScene},
        room::{Room, WallImages},
        screen::{MENU_ITEM_HEIGHT, Screen, ScreenOptions, default_emissive, menu_item_position},
        tv::CrtTv,
    },
};
use instant::Duration;

use crate::common::test_utils::{AimAt, RecordingEffects, approx_eq, seeded_rng};

mod common;

fn default_menu() -> Vec<MenuEntry> {
    SceneConfig::default().menu.entries
}

#[test]
fn menu_rows_are_stacked_down_the_screen() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(1);
    let screen = Screen::new(
        ScreenOptions::new(2.0, 1.5, ScreenContent::Menu),
        &default_menu(),
        &mut animator,
        &mut rng,
    );

    let items = screen.menu_items();
    assert_eq!(items.len(), 4);
    for (index, item) in items.iter().enumerate() {
        let [x, y, z] = menu_item_position(index);
        assert!(approx_eq(item.local.position.x, x));
        assert!(approx_eq(item.local.position.y, y));
        assert!(approx_eq(item.local.position.z, z));
        assert!(approx_eq(item.width, 1.7));
        assert_eq!(item.height, MENU_ITEM_HEIGHT);
    }
    assert!(approx_eq(items[0].local.position.y, 0.6));
    assert!(approx_eq(items[3].local.position.y, -0.15));
    assert_eq!(items[3].id, SurfaceId::new("github"));
    assert_eq!(items[3].link.as_deref(), Some("https://github.com/evanwmart"));
}

#[test]
fn only_menu_screens_get_rows() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(2);
    let screen = Screen::new(
        ScreenOptions::new(2.0, 1.5, ScreenContent::Logo),
        &default_menu(),
        &mut animator,
        &mut rng,
    );
    assert!(screen.menu_items().is_empty());
}

#[test]
fn emissive_tint_follows_the_content() {
    assert_eq!(default_emissive(ScreenContent::Static), 0xaaaaaa);
    assert_eq!(default_emissive(ScreenContent::Logo), 0xff0000);
    assert_eq!(default_emissive(ScreenContent::MissionData), 0x00ff00);
    assert_eq!(default_emissive(ScreenContent::Menu), 0xeeeeee);
    assert_eq!(default_emissive(ScreenContent::Custom), 0xeeeeee);

    let mut animator = Animator::new();
    let mut rng = seeded_rng(3);
    let mut screen = Screen::new(
        ScreenOptions::new(1.0, 1.0, ScreenContent::Logo),
        &[],
        &mut animator,
        &mut rng,
    );
    assert_eq!(screen.emissive(), 0xff0000);
    screen.update_content(ScreenContent::MissionData, None, &mut animator, &mut rng);
    assert_eq!(screen.emissive(), 0x00ff00);
}

#[test]
fn emissive_override_applies_to_menu_and_custom_content() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(4);
    let mut options = ScreenOptions::new(1.0, 1.0, ScreenContent::Menu);
    options.emissive = Some(0x123456);
    let mut screen = Screen::new(options, &[], &mut animator, &mut rng);
    assert_eq!(screen.emissive(), 0x123456);

    screen.update_content(ScreenContent::Static, None, &mut animator, &mut rng);
    assert_eq!(screen.emissive(), 0xaaaaaa);
    screen.update_content(ScreenContent::Menu, None, &mut animator, &mut rng);
    assert_eq!(screen.emissive(), 0x123456);
}

#[test]
fn custom_content_without_an_image_shows_static() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(5);
    let screen = Screen::new(
        ScreenOptions::new(1.0, 1.0, ScreenContent::Custom),
        &[],
        &mut animator,
        &mut rng,
    );
    assert_eq!(screen.content(), ScreenContent::Custom);
    assert!(screen.is_animated());
    assert_eq!(screen.raster().borrow().dimensions(), (256, 256));
}

#[test]
fn main_tv_registers_and_disposes_its_menu() {
    let config = SceneConfig::default();
    let mut animator = Animator::new();
    let mut rng = seeded_rng(6);
    let mut registry = SurfaceRegistry::new();
    let mut tv = CrtTv::new(&config.main_tv, None, &config.menu.entries, &mut animator, &mut rng);

    tv.register_menu(&mut registry).unwrap();
    assert_eq!(registry.len(), 4);
    let screen = tv.screen_transform();
    for (item, surface) in tv.menu_items().iter().zip(registry.iter()) {
        assert_eq!(item.id, surface.id);
        let expected = &screen * &item.local;
        assert!(approx_eq(surface.transform.position.x, expected.position.x));
        assert!(approx_eq(surface.transform.position.y, expected.position.y));
        assert!(approx_eq(surface.transform.position.z, expected.position.z));
    }
    // A second registration would duplicate ids.
    assert!(tv.register_menu(&mut registry).is_err());

    tv.dispose(&mut registry);
    assert!(registry.is_empty());
    assert!(!tv.screen().is_animated());
}

#[test]
fn screen_light_is_retinted_with_the_content() {
    let config = SceneConfig::default();
    let mut animator = Animator::new();
    let mut rng = seeded_rng(7);
    let mut tv = CrtTv::new(&config.main_tv, None, &[], &mut animator, &mut rng);
    assert_eq!(tv.screen_light().unwrap().colour, 0xaaaaaa);
    assert_eq!(tv.screen().emissive(), 0xaaaaaa);

    tv.update_screen(ScreenContent::MissionData, None, &mut animator, &mut rng);
    assert_eq!(tv.screen_light().unwrap().colour, 0x00aa00);
    assert_eq!(tv.screen().emissive(), 0x00ff00);

    tv.update_screen(ScreenContent::Logo, None, &mut animator, &mut rng);
    assert_eq!(tv.screen_light().unwrap().colour, 0xff0000);

    tv.update_screen_light(0x0000ff, Some(2.0));
    let light = tv.screen_light().unwrap();
    assert_eq!((light.colour, light.intensity), (0x0000ff, 2.0));
}

#[test]
fn sets_without_a_light_ignore_retints() {
    let config = SceneConfig::default();
    let unlit = &config.secondary_tvs[0];
    assert!(unlit.light.is_none());
    let mut animator = Animator::new();
    let mut rng = seeded_rng(8);
    let mut tv = CrtTv::new(unlit, None, &[], &mut animator, &mut rng);

    tv.update_screen(ScreenContent::Logo, None, &mut animator, &mut rng);
    tv.update_screen_light(0xffffff, Some(1.0));
    assert!(tv.screen_light().is_none());
    assert_eq!(tv.screen().content(), ScreenContent::Logo);
}

#[test]
fn black_screen_lights_do_not_override_the_tint() {
    let config = SceneConfig::default();
    let desktop = &config.secondary_tvs[1];
    assert_eq!(desktop.light.unwrap().colour.0, 0x000000);
    let mut animator = Animator::new();
    let mut rng = seeded_rng(9);
    let tv = CrtTv::new(desktop, None, &[], &mut animator, &mut rng);
    assert_eq!(tv.screen().emissive(), 0xeeeeee);

    let arch = &config.secondary_tvs[3];
    let tv = CrtTv::new(arch, None, &[], &mut animator, &mut rng);
    assert_eq!(tv.screen().emissive(), 0x010101);
}

#[test]
fn only_secondary_sets_have_glass() {
    let config = SceneConfig::default();
    let mut animator = Animator::new();
    let mut rng = seeded_rng(10);
    let main = CrtTv::new(&config.main_tv, None, &[], &mut animator, &mut rng);
    let secondary = CrtTv::new(&config.secondary_tvs[2], None, &[], &mut animator, &mut rng);

    assert!(!main.screen().has_glass());
    assert!(secondary.screen().has_glass());
    assert!(!main.props().iter().any(|prop| prop.name == "glass"));
    let glass: Vec<_> = secondary
        .props()
        .into_iter()
        .filter(|prop| prop.name == "glass")
        .collect();
    assert_eq!(glass.len(), 1);
    assert!(glass[0].look.transparent);
    assert!(approx_eq(glass[0].look.opacity, 0.1));
}

#[test]
fn menu_rows_are_drawn_unlit_after_the_opaque_props() {
    let config = SceneConfig::default();
    let mut animator = Animator::new();
    let mut rng = seeded_rng(11);
    let tv = CrtTv::new(&config.main_tv, None, &config.menu.entries, &mut animator, &mut rng);

    let rows: Vec<_> = tv
        .props()
        .into_iter()
        .filter(|prop| prop.name == "menu item")
        .collect();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| !row.look.lit && row.look.transparent));
    assert!(rows.iter().all(|row| row.look.raster().is_some()));
}

#[test]
fn room_has_its_lights_and_animated_wall_screens() {
    let mut animator = Animator::new();
    let mut rng = seeded_rng(12);
    let room = Room::new(WallImages::default(), &mut animator, &mut rng);

    assert_eq!(room.lights().len(), 3);
    assert_eq!(room.screens().count(), 2);
    assert!(room.screens().all(|screen| screen.content() == ScreenContent::MissionData));
    assert_eq!(animator.active(), 2);
    assert!(room.props().iter().any(|prop| prop.name == "floor"));
    assert_eq!(room.props().iter().filter(|prop| prop.name == "wall").count(), 6);
}

#[test]
fn light_uniform_keeps_at_most_the_supported_point_lights() {
    let rig = LightingRig::new(&mut seeded_rng(13));
    let fog = SceneConfig::default().fog;
    let lights: Vec<_> = (0..20)
        .map(|i| PointLight::new([i as f32, 0.0, 0.0], 0xffffff, 1.0, 5.0, 1.0))
        .collect();

    assert_eq!(LightUniform::new(&rig, &lights[..3], &fog).point_count(), 3);
    let full = LightUniform::new(&rig, &lights, &fog);
    assert_eq!(full.point_count(), MAX_POINT_LIGHTS);
    assert_eq!(full.points[MAX_POINT_LIGHTS - 1].position[0], (MAX_POINT_LIGHTS - 1) as f32);
}

#[test]
fn look_colours_are_linear() {
    let (tint, emissive) = look_colours(&Look::solid(0xffffff).translucent(0.5));
    assert_eq!(tint, [1.0, 1.0, 1.0, 0.5]);
    assert_eq!(emissive, [0.0, 0.0, 0.0, 0.0]);

    let (tint, emissive) = look_colours(&Look::solid(0x000000).with_emissive(0xff0000, 0.3));
    assert_eq!(tint, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(emissive, [1.0, 0.0, 0.0, 0.3]);

    let (grey, _) = look_colours(&Look::solid(0x808080));
    assert!(grey[0] > 0.2 && grey[0] < 0.25);
}

fn default_scene(seed: u64) -> (MenuScene, RecordingEffects) {
    let effects = RecordingEffects::default();
    let scene = MenuScene::new(
        SceneConfig::default(),
        MenuAssets::default(),
        Box::new(effects.clone()),
        seeded_rng(seed),
    )
    .unwrap();
    (scene, effects)
}

#[test]
fn default_scene_is_fully_assembled() {
    let (scene, _) = default_scene(14);

    assert_eq!(scene.tvs().len(), 6);
    assert_eq!(scene.registry().len(), 4);
    assert_eq!(scene.point_lights().len(), 10);
    assert_eq!(scene.light_uniform().point_count(), 10);
    // Menu backdrop, five static secondaries (two lack their image) and two
    // wall screens.
    assert_eq!(scene.active_animations(), 8);
    assert_eq!(scene.layout_revision(), 0);
    assert!(scene.props().len() > 50);
}

#[test]
fn advancing_the_scene_redraws_static() {
    let (mut scene, _) = default_scene(15);
    let raster = scene.tvs()[1].screen().raster().clone();
    let revision = raster.borrow().revision();

    assert_eq!(scene.advance(Duration::from_millis(50)), 0);
    assert!(scene.advance(Duration::from_millis(60)) >= 5);
    assert_eq!(raster.borrow().revision(), revision + 1);
}

#[test]
fn pointing_at_github_and_clicking_navigates() {
    let (mut scene, effects) = default_scene(16);
    let target = {
        let github = scene.registry().get(&SurfaceId::new("github")).unwrap();
        Point3::from_vec(github.transform.position)
    };
    let aim = AimAt {
        origin: Point3::from(scene.config().camera.rest_position),
        target,
    };

    assert!(scene.pointer_moved(Vector2::new(0.0, 0.0), &aim));
    assert_eq!(
        scene.resolver().highlight(),
        &Highlight::Highlighted(SurfaceId::new("github"))
    );

    let selection = scene.click(&aim).unwrap();
    assert_eq!(selection.label, "GITHUB");
    let log = effects.log.borrow();
    assert_eq!(log.tones, vec![SELECT_TONE]);
    assert_eq!(log.navigations, vec!["https://github.com/evanwmart".to_string()]);
    assert_eq!(log.last_description(), Some(Some("GITHUB")));
}

#[test]
fn screens_can_be_switched_and_removed() {
    let (mut scene, _) = default_scene(17);

    scene
        .update_screen(0, ScreenContent::MissionData, None)
        .unwrap();
    assert_eq!(scene.layout_revision(), 1);
    assert_eq!(scene.tvs()[0].screen().content(), ScreenContent::MissionData);
    assert_eq!(scene.tvs()[0].screen_light().unwrap().colour, 0x00aa00);
    assert!(scene.update_screen(42, ScreenContent::Logo, None).is_err());
    assert_eq!(scene.layout_revision(), 1);

    scene.remove_tv(0).unwrap();
    assert_eq!(scene.layout_revision(), 2);
    assert_eq!(scene.tvs().len(), 5);
    assert!(scene.registry().is_empty());
    assert_eq!(scene.point_lights().len(), 9);
    assert!(scene.remove_tv(5).is_err());
}

#[test]
fn a_secondary_set_can_show_the_menu_config() {
    let config = TvConfig {
        content: ScreenContent::Menu,
        ..TvConfig::default_secondaries()[0].clone()
    };
    let mut animator = Animator::new();
    let mut rng = seeded_rng(18);
    let tv = CrtTv::new(&config, None, &default_menu(), &mut animator, &mut rng);
    assert_eq!(tv.menu_items().len(), 4);
    assert!(tv.screen().is_animated());
}

fn row_is_active(scene: &MenuScene, id: &str) -> bool {
    let surface = scene.registry().get(&SurfaceId::new(id)).unwrap();
    surface.texture.borrow().pixel(MENU_ITEM_WIDTH - 12, 1)[3] > 0
}

fn active_rows(scene: &MenuScene) -> Vec<String> {
    scene
        .registry()
        .iter()
        .filter(|surface| row_is_active(scene, surface.id.as_str()))
        .map(|surface| surface.id.to_string())
        .collect()
}

#[test]
fn row_and_pointer_highlights_share_one_slot() {
    let (mut scene, effects) = default_scene(19);
    let github = {
        let surface = scene.registry().get(&SurfaceId::new("github")).unwrap();
        Point3::from_vec(surface.transform.position)
    };
    let aim = AimAt {
        origin: Point3::from(scene.config().camera.rest_position),
        target: github,
    };

    assert!(scene.highlight_menu_item(0, 0).unwrap());
    assert!(scene.resolver().highlight().is(&SurfaceId::new("campaign")));
    assert_eq!(active_rows(&scene), ["campaign"]);
    assert_eq!(effects.log.borrow().last_description(), Some(Some("CAMPAIGN")));

    assert!(scene.pointer_moved(Vector2::new(0.0, 0.0), &aim));
    assert!(scene.resolver().highlight().is(&SurfaceId::new("github")));
    assert_eq!(active_rows(&scene), ["github"]);

    assert!(scene.highlight_menu_item(0, 1).unwrap());
    assert!(scene.resolver().highlight().is(&SurfaceId::new("multiplayer")));
    assert_eq!(active_rows(&scene), ["multiplayer"]);

    // Already highlighted, out of range, and a set without a menu change nothing.
    assert!(!scene.highlight_menu_item(0, 1).unwrap());
    assert!(!scene.highlight_menu_item(0, 9).unwrap());
    assert!(!scene.highlight_menu_item(1, 0).unwrap());
    assert!(scene.highlight_menu_item(6, 0).is_err());
    assert_eq!(active_rows(&scene), ["multiplayer"]);
}

#[test]
fn resetting_a_sets_rows_goes_through_the_resolver() {
    let config = SceneConfig::default();
    let mut animator = Animator::new();
    let mut rng = seeded_rng(20);
    let mut registry = SurfaceRegistry::new();
    let mut effects = RecordingEffects::default();
    let mut resolver = InteractionResolver::new(seeded_rng(21));
    let main = CrtTv::new(&config.main_tv, None, &config.menu.entries, &mut animator, &mut rng);
    let other = CrtTv::new(&config.secondary_tvs[0], None, &[], &mut animator, &mut rng);
    main.register_menu(&mut registry).unwrap();

    assert!(!main.reset_menu_items(&mut resolver, &registry, &mut effects));
    assert!(main.highlight_menu_item(3, &mut resolver, &registry, &mut effects).unwrap());
    assert!(resolver.highlight().is(&SurfaceId::new("github")));

    // Rows of another set are not this set's to reset.
    assert!(!other.reset_menu_items(&mut resolver, &registry, &mut effects));
    assert!(resolver.highlight().is(&SurfaceId::new("github")));

    assert!(main.reset_menu_items(&mut resolver, &registry, &mut effects));
    assert_eq!(resolver.highlight(), &Highlight::None);
    assert!(!resolver.is_description_visible());
    assert_eq!(effects.log.borrow().last_description(), Some(None));
    let github = registry.get(&SurfaceId::new("github")).unwrap();
    assert_eq!(github.texture.borrow().pixel(MENU_ITEM_WIDTH - 12, 1)[3], 0);
}

#[test]
fn removing_the_menu_set_hides_the_description() {
    let (mut scene, effects) = default_scene(22);
    scene.highlight_menu_item(0, 2).unwrap();
    assert!(scene.resolver().is_description_visible());

    scene.remove_tv(0).unwrap();
    assert_eq!(scene.resolver().highlight(), &Highlight::None);
    assert!(!scene.resolver().is_description_visible());
    assert_eq!(effects.log.borrow().last_description(), Some(None));
}

use crt_menu::config::{Colour, SCENE_FILE, SceneConfig, ScreenContent, TvKind};

#[test]
fn defaults_describe_the_stock_scene() {
    let config = SceneConfig::default();
    config.validate().unwrap();

    assert_eq!(config.main_tv.kind, TvKind::Main);
    assert_eq!(config.main_tv.content, ScreenContent::Menu);
    assert_eq!(config.secondary_tvs.len(), 5);
    assert!(config.secondary_tvs.iter().all(|tv| tv.kind == TvKind::Secondary));

    let ids: Vec<_> = config.menu.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["campaign", "multiplayer", "zombies", "github"]);
    let github = &config.menu.entries[3];
    assert_eq!(github.link.as_deref(), Some("https://github.com/evanwmart"));
    assert!(config.menu.entries[..3].iter().all(|e| e.link.is_none()));

    let first = config.tvs().next().unwrap();
    assert_eq!(first, &config.main_tv);
    assert_eq!(config.tvs().count(), 6);
}

#[test]
fn partial_documents_override_only_what_they_name() {
    let config = SceneConfig::from_json(
        r##"{
            "background": "#102030",
            "fog": { "colour": 255 },
            "camera": { "fov_degrees": 60.0 },
            "menu": { "entries": [
                { "id": "play", "label": "PLAY" },
                { "id": "code", "label": "CODE", "link": "https://example.com" }
            ] }
        }"##,
    )
    .unwrap();

    assert_eq!(config.background, Colour(0x102030));
    assert_eq!(config.fog.colour, Colour(0x0000ff));
    assert_eq!(config.fog.density, 0.01);
    assert_eq!(config.camera.fov_degrees, 60.0);
    assert_eq!(config.camera.intro_millis, 4000);
    assert_eq!(config.menu.entries.len(), 2);
    assert_eq!(config.menu.entries[1].link.as_deref(), Some("https://example.com"));
    assert_eq!(config.main_tv, SceneConfig::default().main_tv);
    assert_eq!(config.secondary_tvs.len(), 5);
}

#[test]
fn secondary_sets_can_be_replaced() {
    let config = SceneConfig::from_json(
        r##"{
            "secondary_tvs": [
                { "kind": "secondary", "content": "logo", "position": [1.0, 0.0, -2.0] },
                { "kind": "secondary", "content": "mission_data",
                  "light": { "colour": "#00ff00", "intensity": 0.5 } }
            ]
        }"##,
    )
    .unwrap();

    assert_eq!(config.secondary_tvs.len(), 2);
    assert_eq!(config.secondary_tvs[0].content, ScreenContent::Logo);
    assert_eq!(config.secondary_tvs[0].position, [1.0, 0.0, -2.0]);
    let light = config.secondary_tvs[1].light.unwrap();
    assert_eq!(light.colour, Colour(0x00ff00));
    assert_eq!(light.intensity, 0.5);
}

#[test]
fn colours_serialise_as_hex_strings() {
    let json = serde_json::to_string(&Colour(0x0a0b0c)).unwrap();
    assert_eq!(json, r##""#0a0b0c""##);
}

#[test]
fn invalid_documents_are_rejected() {
    let cases = [
        (
            "duplicate menu ids",
            r#"{ "menu": { "entries": [
                { "id": "a", "label": "A" }, { "id": "a", "label": "B" }
            ] } }"#,
        ),
        (
            "empty label",
            r#"{ "menu": { "entries": [ { "id": "a", "label": "" } ] } }"#,
        ),
        ("zero width", r#"{ "main_tv": { "width": 0.0 } }"#),
        ("negative depth", r#"{ "main_tv": { "depth": -1.0 } }"#),
        (
            "custom content without image",
            r#"{ "main_tv": { "content": "custom" } }"#,
        ),
        ("malformed colour", r##"{ "background": "#zzzzzz" }"##),
        ("colour out of range", r#"{ "background": 16777216 }"#),
        (
            "two menu screens",
            r#"{ "secondary_tvs": [ { "kind": "secondary", "content": "menu" } ] }"#,
        ),
        ("bad fov", r#"{ "camera": { "fov_degrees": 180.0 } }"#),
        ("not json", "{ background"),
    ];
    for (name, json) in cases {
        assert!(SceneConfig::from_json(json).is_err(), "{} was accepted", name);
    }
}

#[tokio::test]
async fn missing_configuration_falls_back_to_defaults() {
    let config = SceneConfig::load("no-such-scene.json").await;
    assert_eq!(config, SceneConfig::default());
    assert_eq!(SCENE_FILE, "scene.json");
}

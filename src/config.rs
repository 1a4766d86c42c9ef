//! Scene configuration.
//!
//! Everything that shapes the menu scene is described by [`SceneConfig`] and
//! read from `scene.json` in the asset directory. Every struct is
//! `#[serde(default)]`, so a file only needs to name what it changes; the
//! defaults reproduce the stock scene. Colours are written either as numbers
//! or as `"#rrggbb"` strings.

use std::collections::HashSet;

use anyhow::{Context as _, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::resources::load_string;

pub const SCENE_FILE: &str = "scene.json";

/// `0xRRGGBB` colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColourRepr", into = "String")]
pub struct Colour(pub u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum ColourRepr {
    Number(u32),
    Text(String),
}

impl TryFrom<ColourRepr> for Colour {
    type Error = String;

    fn try_from(repr: ColourRepr) -> Result<Self, Self::Error> {
        let value = match repr {
            ColourRepr::Number(value) => value,
            ColourRepr::Text(text) => {
                let digits = text.trim_start_matches('#').trim_start_matches("0x");
                u32::from_str_radix(digits, 16)
                    .map_err(|e| format!("invalid colour '{}': {}", text, e))?
            }
        };
        if value > 0xffffff {
            return Err(format!("colour {:#x} does not fit in 24 bits", value));
        }
        Ok(Colour(value))
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        format!("#{:06x}", colour.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TvKind {
    #[default]
    Main,
    /// Secondary sets get a glass overlay in front of the screen.
    Secondary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenContent {
    #[default]
    Static,
    Logo,
    MissionData,
    Menu,
    /// An image from the asset directory, see [`TvConfig::texture`].
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenLight {
    pub colour: Colour,
    pub intensity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TvConfig {
    pub kind: TvKind,
    pub position: [f32; 3],
    /// XYZ Euler angles in radians.
    pub rotation: [f32; 3],
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub content: ScreenContent,
    pub texture: Option<String>,
    pub light: Option<ScreenLight>,
}

impl Default for TvConfig {
    fn default() -> Self {
        Self {
            kind: TvKind::Main,
            position: [-4.0, 0.8, -3.0],
            rotation: [0.0, 0.6, 0.0],
            width: 3.0,
            height: 2.3,
            depth: 1.8,
            content: ScreenContent::Menu,
            texture: None,
            light: Some(ScreenLight {
                colour: Colour(0xaaaaaa),
                intensity: 0.4,
            }),
        }
    }
}

impl TvConfig {
    fn secondary(
        position: [f32; 3],
        yaw: f32,
        size: (f32, f32),
        content: ScreenContent,
        texture: Option<&str>,
        light: Option<(u32, f32)>,
    ) -> Self {
        Self {
            kind: TvKind::Secondary,
            position,
            rotation: [0.0, yaw, 0.0],
            width: size.0,
            height: size.1,
            depth: 1.0,
            content,
            texture: texture.map(str::to_string),
            light: light.map(|(colour, intensity)| ScreenLight {
                colour: Colour(colour),
                intensity,
            }),
        }
    }

    pub fn default_secondaries() -> Vec<TvConfig> {
        use ScreenContent::{Custom, Static};
        vec![
            Self::secondary([1.8, 1.75, -3.5], -0.15, (1.1, 0.9), Static, None, None),
            Self::secondary(
                [1.5, 0.5, -3.5],
                -0.15,
                (1.8, 1.3),
                Custom,
                Some("desktop.png"),
                Some((0x000000, 0.001)),
            ),
            Self::secondary([3.4, 1.96, -2.5], -0.9, (1.8, 1.3), Static, None, None),
            Self::secondary(
                [3.4, 0.5, -2.5],
                -0.9,
                (1.8, 1.3),
                Custom,
                Some("arch.png"),
                Some((0x010101, 0.005)),
            ),
            Self::secondary([4.6, 0.5, -0.8], -1.2, (1.8, 1.3), Static, None, None),
        ]
    }

    fn validate(&self, name: &str) -> anyhow::Result<()> {
        for (what, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            ensure!(
                value.is_finite() && value > 0.0,
                "{}: {} must be positive, got {}",
                name,
                what,
                value
            );
        }
        if self.content == ScreenContent::Custom && self.texture.is_none() {
            bail!("{}: custom content needs a texture path", name);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl MenuEntry {
    pub fn new(id: &str, label: &str, link: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            link: link.map(str::to_string),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub entries: Vec<MenuEntry>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            entries: vec![
                MenuEntry::new("campaign", "CAMPAIGN", None),
                MenuEntry::new("multiplayer", "MULTIPLAYER", None),
                MenuEntry::new("zombies", "ZOMBIES", None),
                MenuEntry::new("github", "GITHUB", Some("https://github.com/evanwmart")),
            ],
        }
    }
}

impl MenuConfig {
    fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for (index, entry) in self.entries.iter().enumerate() {
            ensure!(!entry.id.is_empty(), "menu entry {} has an empty id", index);
            ensure!(
                !entry.label.is_empty(),
                "menu entry '{}' has an empty label",
                entry.id
            );
            ensure!(
                seen.insert(entry.id.as_str()),
                "duplicate menu id '{}'",
                entry.id
            );
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub start_position: [f32; 3],
    /// Radians, positive looks up.
    pub start_pitch: f32,
    pub rest_position: [f32; 3],
    pub rest_pitch: f32,
    pub intro_millis: u64,
    pub sway_limit_degrees: f32,
    /// Fraction of the remaining yaw covered per frame.
    pub sway_damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            start_position: [0.0, 1.2, 3.5],
            start_pitch: 0.2,
            rest_position: [0.0, 1.2, 3.0],
            rest_pitch: 0.0,
            intro_millis: 4000,
            sway_limit_degrees: 10.0,
            sway_damping: 0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    pub bloom_threshold: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub noise_intensity: f32,
    pub scanline_intensity: f32,
    pub scanline_count: f32,
    pub exposure: f32,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            bloom_threshold: 0.7,
            bloom_strength: 2.0,
            bloom_radius: 1.0,
            noise_intensity: 0.15,
            scanline_intensity: 0.008,
            scanline_count: 648.0,
            exposure: 2.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub colour: Colour,
    /// Exponential-squared density.
    pub density: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            colour: Colour(0x90fcf5),
            density: 0.01,
        }
    }
}

/// Images for the textured room walls. `None` uses procedural noise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub hall_texture: Option<String>,
    pub back_texture: Option<String>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            hall_texture: Some("hall-wall.jpg".to_string()),
            back_texture: Some("back-wall.jpg".to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub main_tv: TvConfig,
    pub secondary_tvs: Vec<TvConfig>,
    pub menu: MenuConfig,
    pub camera: CameraConfig,
    pub post: PostConfig,
    pub background: Colour,
    pub fog: FogConfig,
    pub room: RoomConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            main_tv: TvConfig::default(),
            secondary_tvs: TvConfig::default_secondaries(),
            menu: MenuConfig::default(),
            camera: CameraConfig::default(),
            post: PostConfig::default(),
            background: Colour(0x050505),
            fog: FogConfig::default(),
            room: RoomConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn tvs(&self) -> impl Iterator<Item = &TvConfig> {
        std::iter::once(&self.main_tv).chain(self.secondary_tvs.iter())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.main_tv.validate("main_tv")?;
        for (index, tv) in self.secondary_tvs.iter().enumerate() {
            tv.validate(&format!("secondary_tvs[{}]", index))?;
        }
        let menus = self
            .tvs()
            .filter(|tv| tv.content == ScreenContent::Menu)
            .count();
        ensure!(menus <= 1, "only one TV can show the menu, found {}", menus);
        self.menu.validate()?;

        let camera = &self.camera;
        ensure!(
            camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0,
            "camera fov must be within (0, 180) degrees, got {}",
            camera.fov_degrees
        );
        ensure!(
            camera.znear > 0.0 && camera.zfar > camera.znear,
            "camera clip planes must satisfy 0 < znear < zfar"
        );
        ensure!(
            camera.sway_damping > 0.0 && camera.sway_damping <= 1.0,
            "camera sway damping must be within (0, 1], got {}",
            camera.sway_damping
        );
        ensure!(
            camera.sway_limit_degrees >= 0.0,
            "camera sway limit cannot be negative"
        );
        ensure!(self.fog.density >= 0.0, "fog density cannot be negative");
        ensure!(
            self.post.exposure > 0.0,
            "tone mapping exposure must be positive"
        );
        Ok(())
    }

    /// Parses and validates a configuration document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: SceneConfig =
            serde_json::from_str(json).context("scene configuration is not valid JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `file_name` from the asset directory. A missing or invalid file
    /// is logged and replaced by the defaults.
    pub async fn load(file_name: &str) -> Self {
        let json = match load_string(file_name).await {
            Ok(json) => json,
            Err(e) => {
                log::warn!("No scene configuration at '{}' ({}), using defaults", file_name, e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded scene configuration from '{}'", file_name);
                config
            }
            Err(e) => {
                log::warn!("Ignoring scene configuration '{}': {:#}", file_name, e);
                Self::default()
            }
        }
    }
}

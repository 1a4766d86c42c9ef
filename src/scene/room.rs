//! The room around the TVs.

use std::f32::consts::{FRAC_PI_2, PI};

use rand::Rng;

use crate::{
    animation::Animator,
    config::ScreenContent,
    data_structures::{instance::Instance, raster::RasterTexture},
    procedural,
    scene::{
        Look, Prop,
        lighting::PointLight,
        screen::{Screen, ScreenOptions},
    },
};

pub const NOISE_SIZE: u32 = 256;
const WALL_NOISE: [u32; 2] = [0x222222, 0x333333];
const FLOOR_NOISE: [u32; 3] = [0x111111, 0x222222, 0x333333];
const PANEL_COLOUR: u32 = 0x060607;
const FLOOR_EQUIPMENT_COLOUR: u32 = 0x070707;

/// Decoded wall images. Missing images fall back to noise.
#[derive(Clone, Debug, Default)]
pub struct WallImages {
    pub hall: Option<RasterTexture>,
    pub back: Option<RasterTexture>,
}

struct Wall {
    size: [f32; 2],
    position: [f32; 3],
    rotation: [f32; 3],
    colour: u32,
}

impl Wall {
    const fn new(size: [f32; 2], position: [f32; 3], rotation: [f32; 3], colour: u32) -> Self {
        Self {
            size,
            position,
            rotation,
            colour,
        }
    }
}

#[derive(Debug)]
pub struct Room {
    props: Vec<Prop>,
    screens: Vec<(Screen, Instance)>,
    lights: Vec<PointLight>,
}

impl Room {
    pub fn new<R: Rng + ?Sized>(images: WallImages, animator: &mut Animator, rng: &mut R) -> Self {
        let mut props = Vec::new();

        let floor = procedural::noise_texture(rng, NOISE_SIZE, NOISE_SIZE, &FLOOR_NOISE);
        props.push(Prop::quad(
            "floor",
            Instance::from_euler_xyz([0.0, -3.0, -5.0], [-FRAC_PI_2, 0.0, 0.0]),
            30.0,
            90.0,
            Look::textured(0x080808, floor.into_shared()),
        ));

        let hall = images.hall.map(RasterTexture::into_shared);
        let back = images.back.map(RasterTexture::into_shared);
        let walls = [
            (Wall::new([20.0, 15.0], [-5.0, 0.0, -20.0], [0.0; 3], 0x040404), hall),
            (Wall::new([10.0, 5.0], [-5.0, 2.0, -19.0], [0.0; 3], 0x050505), None),
            (Wall::new([20.0, 15.0], [9.0, 0.0, -15.0], [0.0; 3], 0x020202), back.clone()),
            (Wall::new([20.0, 15.0], [-15.0, 0.0, -15.0], [0.0; 3], 0x030303), back),
            (Wall::new([30.0, 15.0], [-15.0, 0.0, -5.0], [0.0, FRAC_PI_2, 0.0], 0x111111), None),
            (Wall::new([30.0, 15.0], [15.0, 0.0, -5.0], [0.0, -FRAC_PI_2, 0.0], 0x111111), None),
        ];
        for (wall, image) in walls {
            let skin = image.unwrap_or_else(|| {
                procedural::noise_texture(rng, NOISE_SIZE, NOISE_SIZE, &WALL_NOISE).into_shared()
            });
            props.push(Prop::quad(
                "wall",
                Instance::from_euler_xyz(wall.position, wall.rotation),
                wall.size[0],
                wall.size[1],
                Look::textured(wall.colour, skin),
            ));
        }

        let ceiling = procedural::noise_texture(rng, NOISE_SIZE, NOISE_SIZE, &WALL_NOISE);
        props.push(Prop::quad(
            "ceiling",
            Instance::from_euler_xyz([0.0, 7.0, -5.0], [FRAC_PI_2, 0.0, 0.0]),
            30.0,
            30.0,
            Look::textured(0x050505, ceiling.into_shared()),
        ));

        for (position, size) in [
            ([0.0, -1.0, -14.0], [1.5, 1.0, 0.3]),
            ([-7.0, 4.0, -14.0], [3.0, 2.0, 0.8]),
        ] {
            props.push(Prop::cube(
                "equipment panel",
                Instance::from_euler_xyz(position, [0.0; 3]),
                size,
                Look::solid(PANEL_COLOUR),
            ));
        }
        for (position, size, yaw) in [([-4.0, -1.4, -3.0], 2.8, 0.6), ([3.0, -2.2, -2.0], 3.0, PI / 6.0)] {
            props.push(Prop::cube(
                "floor equipment",
                Instance::from_euler_xyz(position, [0.0, yaw, 0.0]),
                [size, size * 0.7, size * 0.9],
                Look::solid(FLOOR_EQUIPMENT_COLOUR),
            ));
        }

        let mut wall_screen = ScreenOptions::new(10.0, 3.0, ScreenContent::MissionData);
        wall_screen.emissive = Some(0xaaaaff);
        wall_screen.emissive_intensity = 0.9;
        let mut ceiling_screen = ScreenOptions::new(1.0, 1.0, ScreenContent::MissionData);
        ceiling_screen.emissive = Some(0xffffff);
        ceiling_screen.emissive_intensity = 1.0;
        let screens = vec![
            (
                Screen::new(wall_screen, &[], animator, rng),
                Instance::from_euler_xyz([5.0, 5.0, -14.9], [0.0; 3]),
            ),
            (
                Screen::new(ceiling_screen, &[], animator, rng),
                Instance::from_euler_xyz([-3.0, 6.8, -4.0], [FRAC_PI_2, 0.0, 0.0]),
            ),
        ];

        let lights = vec![
            PointLight::new([-5.0, 4.5, -19.0], 0xff0000, 10.0, 4.0, 1.0),
            PointLight::new([-5.0, 1.0, -19.0], 0xff0000, 8.0, 4.0, 1.0),
            PointLight::new([0.0, 1.0, -13.0], 0x90fcf5, 1.0, 20.0, 1.0),
        ];

        Self {
            props,
            screens,
            lights,
        }
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn screens(&self) -> impl Iterator<Item = &Screen> {
        self.screens.iter().map(|(screen, _)| screen)
    }

    pub fn props(&self) -> Vec<Prop> {
        let mut props = self.props.clone();
        for (screen, placement) in &self.screens {
            props.extend(screen.props(placement, placement));
        }
        props
    }
}

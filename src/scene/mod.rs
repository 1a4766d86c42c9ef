//! Scene assembly.
//!
//! The CRT room is described on the CPU as a flat list of [`Prop`]s (a unit
//! shape, its world transform and a [`Look`]) plus the lights of
//! [`lighting`]. Nothing here touches the GPU, so layouts and interaction
//! can be tested headless; [`crate::render::PropBatch`] uploads the props
//! and keeps their raster textures current.
//!
//! - [`screen`]: the picture area of a TV, its procedural content and menu rows
//! - [`tv`]: a whole CRT set around a screen
//! - [`room`]: floor, walls, ceiling, wall screens and equipment
//! - [`lighting`]: the light rig and the GPU light uniform
//! - [`menu`]: the menu scene flow tying everything to the event loop

pub mod lighting;
pub mod menu;
pub mod room;
pub mod screen;
pub mod tv;

use crate::data_structures::{instance::Instance, model::Shape, raster::SharedRaster};

/// What a prop's base colour is multiplied with.
#[derive(Clone, Debug, Default)]
pub enum Skin {
    #[default]
    Plain,
    Raster(SharedRaster),
}

/// Surface appearance of a prop.
#[derive(Clone, Debug)]
pub struct Look {
    /// `0xRRGGBB`, multiplied with the skin.
    pub colour: u32,
    pub opacity: f32,
    pub emissive: u32,
    pub emissive_intensity: f32,
    /// Unlit props show `skin * colour` as is.
    pub lit: bool,
    /// Drawn in the alpha-blended batch after everything opaque.
    pub transparent: bool,
    pub skin: Skin,
}

impl Look {
    /// Opaque, lit and untextured.
    pub fn solid(colour: u32) -> Self {
        Self {
            colour,
            opacity: 1.0,
            emissive: 0x000000,
            emissive_intensity: 0.0,
            lit: true,
            transparent: false,
            skin: Skin::Plain,
        }
    }

    pub fn textured(colour: u32, raster: SharedRaster) -> Self {
        Self {
            skin: Skin::Raster(raster),
            ..Self::solid(colour)
        }
    }

    pub fn with_emissive(self, emissive: u32, intensity: f32) -> Self {
        Self {
            emissive,
            emissive_intensity: intensity,
            ..self
        }
    }

    pub fn unlit(self) -> Self {
        Self { lit: false, ..self }
    }

    pub fn translucent(self, opacity: f32) -> Self {
        Self {
            opacity,
            transparent: true,
            ..self
        }
    }

    pub fn raster(&self) -> Option<&SharedRaster> {
        match &self.skin {
            Skin::Plain => None,
            Skin::Raster(raster) => Some(raster),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Prop {
    pub name: &'static str,
    pub shape: Shape,
    /// World transform; the scale stretches the unit shape.
    pub transform: Instance,
    pub look: Look,
}

impl Prop {
    pub fn quad(name: &'static str, transform: Instance, width: f32, height: f32, look: Look) -> Self {
        Self {
            name,
            shape: Shape::Quad,
            transform: transform.with_scale(width, height, 1.0),
            look,
        }
    }

    pub fn cube(name: &'static str, transform: Instance, size: [f32; 3], look: Look) -> Self {
        Self {
            name,
            shape: Shape::Cube,
            transform: transform.with_scale(size[0], size[1], size[2]),
            look,
        }
    }
}

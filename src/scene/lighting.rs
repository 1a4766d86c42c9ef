//! Light sources of the CRT room.

use cgmath::{InnerSpace, Vector3};
use rand::Rng;

/// Omni light with a finite range. `decay` is the distance falloff exponent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: [f32; 3],
    pub colour: u32,
    pub intensity: f32,
    /// Zero means unlimited.
    pub range: f32,
    pub decay: f32,
}

impl PointLight {
    pub fn new(position: [f32; 3], colour: u32, intensity: f32, range: f32, decay: f32) -> Self {
        Self {
            position,
            colour,
            intensity,
            range,
            decay,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub colour: u32,
    pub intensity: f32,
    pub range: f32,
    pub decay: f32,
    /// Half angle of the cone in radians.
    pub angle: f32,
    /// Fraction of the cone that fades out towards the edge.
    pub penumbra: f32,
}

impl SpotLight {
    pub fn direction(&self) -> Vector3<f32> {
        let from = Vector3::from(self.position);
        let to = Vector3::from(self.target);
        (to - from).normalize()
    }
}

/// Sky colour from above blending into ground colour from below.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    pub sky: u32,
    pub ground: u32,
    pub intensity: f32,
}

/// Parallel light shining from `position` towards the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: [f32; 3],
    pub colour: u32,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface towards the light.
    pub fn to_light(&self) -> Vector3<f32> {
        Vector3::from(self.position).normalize()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightingRig {
    pub ambient: (u32, f32),
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
    pub spot: SpotLight,
    pub points: Vec<PointLight>,
}

pub const RANDOM_POINT_LIGHTS: usize = 4;

impl LightingRig {
    /// The stock rig; the fill lights are scattered in front of the TVs.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let points = (0..RANDOM_POINT_LIGHTS)
            .map(|_| {
                let position = [
                    (rng.r#gen::<f32>() - 0.5) * 5.0,
                    1.0 + rng.r#gen::<f32>() * 3.0,
                    (rng.r#gen::<f32>() - 0.5) * 2.0 - 2.0,
                ];
                PointLight::new(position, 0xffffff, 1.2, 8.0, 2.0)
            })
            .collect();
        Self {
            ambient: (0xffffff, 0.5),
            hemisphere: HemisphereLight {
                sky: 0xaaaaaa,
                ground: 0x333333,
                intensity: 0.5,
            },
            directional: DirectionalLight {
                position: [5.0, 10.0, 5.0],
                colour: 0xffffff,
                intensity: 0.5,
            },
            spot: SpotLight {
                position: [0.0, 6.0, 3.0],
                target: [0.0, 3.0, 3.0],
                colour: 0xaaaaff,
                intensity: 8.0,
                range: 20.0,
                decay: 1.0,
                angle: std::f32::consts::PI / 10.0,
                penumbra: 0.3,
            },
            points,
        }
    }
}

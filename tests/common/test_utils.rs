#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use cgmath::{Deg, Point3, Vector2, Vector3};
use crt_menu::{
    camera::{Camera, Projection, Ray, RaySource},
    data_structures::{
        instance::Instance,
        raster::RasterTexture,
        surface::{InteractiveSurface, SurfaceId},
    },
    effects::{MenuEffects, Tone},
};
use rand::{SeedableRng, rngs::StdRng};

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Everything the resolver asked the outside world to do.
#[derive(Debug, Default)]
pub struct EffectLog {
    pub navigations: Vec<String>,
    pub tones: Vec<Tone>,
    pub descriptions: Vec<Option<String>>,
}

impl EffectLog {
    pub fn last_description(&self) -> Option<Option<&str>> {
        self.descriptions.last().map(|d| d.as_deref())
    }
}

/// Clones share one log, so a test can keep a handle while the scene owns
/// the boxed effects.
#[derive(Clone, Debug, Default)]
pub struct RecordingEffects {
    pub log: Rc<RefCell<EffectLog>>,
}

impl MenuEffects for RecordingEffects {
    fn navigate(&mut self, link: &str) {
        self.log.borrow_mut().navigations.push(link.to_string());
    }

    fn play_tone(&mut self, tone: &Tone) {
        self.log.borrow_mut().tones.push(*tone);
    }

    fn describe(&mut self, label: Option<&str>) {
        self.log
            .borrow_mut()
            .descriptions
            .push(label.map(str::to_string));
    }
}

/// Camera at the origin looking down `-Z` through a square 90 degree view, so
/// an NDC coordinate maps to the same offset at one unit of depth.
pub fn fixed_camera() -> (Camera, Projection) {
    (
        Camera::new((0.0, 0.0, 0.0), Deg(0.0), Deg(0.0)),
        Projection::new(100, 100, Deg(90.0), 0.1, 100.0),
    )
}

/// Ignores the pointer and always aims from `origin` at `target`.
pub struct AimAt {
    pub origin: Point3<f32>,
    pub target: Point3<f32>,
}

impl RaySource for AimAt {
    fn ray_through(&self, _ndc: Vector2<f32>) -> Ray {
        Ray::new(self.origin, self.target - self.origin)
    }
}

/// A surface facing `+Z` centred on `position`.
pub fn surface(
    id: &str,
    label: &str,
    link: Option<&str>,
    position: [f32; 3],
    width: f32,
    height: f32,
) -> InteractiveSurface {
    InteractiveSurface {
        id: SurfaceId::new(id),
        label: label.to_string(),
        link: link.map(str::to_string),
        transform: Instance::from(Vector3::from(position)),
        width,
        height,
        texture: RasterTexture::new(4, 4).into_shared(),
    }
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

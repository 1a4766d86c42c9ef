//! Object picking.
//!
//! Interactive surfaces are flat rectangles, so picking is done on the CPU:
//! the pointer ray is moved into each surface's local frame, intersected with
//! the `z = 0` plane and bounds-checked against the rectangle. The nearest
//! positive hit wins. No GPU round trip is needed, which keeps picking
//! synchronous on WASM too.

use cgmath::{EuclideanSpace, Point3};

use crate::{camera::Ray, data_structures::surface::InteractiveSurface};

/// Rays closer to parallel than this never hit.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A surface under the pointer.
#[derive(Clone, Copy, Debug)]
pub struct Hit<'a> {
    pub surface: &'a InteractiveSurface,
    /// Ray parameter, i.e. the distance along the unit ray direction.
    pub distance: f32,
    pub point: Point3<f32>,
}

/// Distance along `ray` to `surface`, if the ray crosses the rectangle in
/// front of its origin.
pub fn intersect_quad(ray: &Ray, surface: &InteractiveSurface) -> Option<f32> {
    let origin = surface.transform.world_to_local(ray.origin);
    let direction = surface.transform.world_to_local_direction(ray.direction);
    if direction.z.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -origin.z / direction.z;
    if !(t > 0.0) {
        return None;
    }
    let hit = origin.to_vec() + direction * t;
    let inside = hit.x.abs() <= surface.width / 2.0 && hit.y.abs() <= surface.height / 2.0;
    inside.then_some(t)
}

/// Nearest surface hit by `ray`; ties keep the earlier surface.
pub fn closest_hit<'a, I>(ray: &Ray, surfaces: I) -> Option<Hit<'a>>
where
    I: IntoIterator<Item = &'a InteractiveSurface>,
{
    surfaces
        .into_iter()
        .filter_map(|surface| {
            intersect_quad(ray, surface).map(|distance| Hit {
                surface,
                distance,
                point: ray.at(distance),
            })
        })
        .fold(None, |best: Option<Hit<'a>>, hit| match best {
            Some(best) if best.distance <= hit.distance => Some(best),
            _ => Some(hit),
        })
}

//! Pointer-interactive rectangles.

use std::fmt;

use crate::data_structures::{instance::Instance, raster::SharedRaster};

/// Stable identity of an interactive surface. Survives texture swaps.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A flat `width` x `height` rectangle centred on `transform`'s origin in its
/// local XY plane. `transform` carries no scale.
#[derive(Clone, Debug)]
pub struct InteractiveSurface {
    pub id: SurfaceId,
    pub label: String,
    pub link: Option<String>,
    pub transform: Instance,
    pub width: f32,
    pub height: f32,
    pub texture: SharedRaster,
}

//! Scene data structures: instances, meshes, rasters, surfaces and textures.
//!
//! - `instance` holds per-instance transformation and attribute data
//! - `model` contains the unit meshes, materials and the draw helper
//! - `raster` is the CPU pixel buffer behind every procedural texture
//! - `surface` describes the rectangles the pointer can interact with
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod instance;
pub mod model;
pub mod raster;
pub mod surface;
pub mod texture;

//! Render composition and pipeline batching.
//!
//! This module defines the [`Render`] enum, which flows use to tell the app
//! what to draw. The app sorts the [`Drawable`]s it contains into the opaque
//! and the alpha-blended batch and draws them in that order.
//!
//! [`PropBatch`] turns the CPU-side [`Prop`] list of a scene into GPU
//! resources: one instance buffer per (shape, texture) group and one material
//! per raster texture. Rasters stay shared with their screens; [`PropBatch::sync`]
//! re-uploads every raster whose revision moved since the last frame.

use std::{collections::HashMap, rc::Rc};

use cgmath::{EuclideanSpace, MetricSpace, Point3};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{Geometry, Material, Mesh, Shape},
        raster::{SharedRaster, hex_to_linear},
        texture::Texture,
    },
    scene::{Look, Prop},
};

/// One instanced draw: a unit mesh, the texture it samples and the instances.
pub struct Drawable<'a> {
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub instances: &'a wgpu::Buffer,
    pub amount: u32,
}

/// Specifies how a flow should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Opaque(Drawable)` renders a single opaque draw
/// - `Opaques(Vec<Drawable>)` renders a batch of opaque draws
/// - `Transparent(Drawable)` renders a single alpha-blended draw
/// - `Transparents(Vec<Drawable>)` renders alpha-blended draws in the given order
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
pub enum Render<'a> {
    None,
    Opaque(Drawable<'a>),
    Opaques(Vec<Drawable<'a>>),
    Transparent(Drawable<'a>),
    Transparents(Vec<Drawable<'a>>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(self, opaques: &mut Vec<Drawable<'a>>, trans: &mut Vec<Drawable<'a>>) {
        match self {
            Render::Opaque(drawable) => opaques.push(drawable),
            Render::Opaques(mut vec) => opaques.append(&mut vec),
            Render::Transparent(drawable) => trans.push(drawable),
            Render::Transparents(mut vec) => trans.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(opaques, trans)),
            Render::None => (),
        }
    }
}

/// `rgb + opacity` and `rgb + intensity` of a look, linearised.
pub fn look_colours(look: &Look) -> ([f32; 4], [f32; 4]) {
    let [r, g, b] = hex_to_linear(look.colour);
    let [er, eg, eb] = hex_to_linear(look.emissive);
    (
        [r, g, b, look.opacity],
        [er, eg, eb, look.emissive_intensity],
    )
}

/// A raster texture on the GPU and the raster revision it shows.
struct RasterSlot {
    raster: SharedRaster,
    material: Material,
    revision: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum MaterialKey {
    White,
    Raster(usize),
}

struct Group {
    shape: Shape,
    skin: MaterialKey,
    instances: wgpu::Buffer,
    amount: u32,
}

pub struct PropBatch {
    meshes: HashMap<Shape, Mesh>,
    white: Material,
    rasters: Vec<RasterSlot>,
    opaque: Vec<Group>,
    transparent: Vec<Group>,
}

impl std::fmt::Debug for PropBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropBatch")
            .field("rasters", &self.rasters.len())
            .field("opaque", &self.opaque.len())
            .field("transparent", &self.transparent.len())
            .finish()
    }
}

impl PropBatch {
    /// Uploads `props`. Transparent props are drawn one by one, farthest from
    /// `eye` first.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        props: &[Prop],
        eye: Point3<f32>,
    ) -> Self {
        let meshes = [Shape::Quad, Shape::Cube]
            .into_iter()
            .map(|shape| {
                let name = format!("{:?}", shape);
                (shape, Mesh::new(device, &name, &Geometry::of(shape)))
            })
            .collect();
        let white = Material::new(device, "white", Texture::white(device, queue), layout);

        let mut rasters: Vec<RasterSlot> = Vec::new();
        let mut skin_of = |look: &Look| -> MaterialKey {
            let Some(raster) = look.raster() else {
                return MaterialKey::White;
            };
            if let Some(index) = rasters.iter().position(|slot| Rc::ptr_eq(&slot.raster, raster)) {
                return MaterialKey::Raster(index);
            }
            let (texture, revision) = {
                let current = raster.borrow();
                (
                    Texture::from_raster(device, queue, &current, Some("raster")),
                    current.revision(),
                )
            };
            rasters.push(RasterSlot {
                raster: Rc::clone(raster),
                material: Material::new(device, "raster", texture, layout),
                revision,
            });
            MaterialKey::Raster(rasters.len() - 1)
        };

        let mut opaque_groups: Vec<(Shape, MaterialKey, Vec<InstanceRaw>)> = Vec::new();
        let mut transparent_props: Vec<(f32, Shape, MaterialKey, InstanceRaw)> = Vec::new();
        for prop in props {
            let skin = skin_of(&prop.look);
            let (tint, emissive) = look_colours(&prop.look);
            let raw = prop.transform.to_raw(tint, emissive, prop.look.lit);
            if prop.look.transparent {
                let centre = Point3::from_vec(prop.transform.position);
                transparent_props.push((centre.distance2(eye), prop.shape, skin, raw));
                continue;
            }
            match opaque_groups
                .iter_mut()
                .find(|(shape, group_skin, _)| *shape == prop.shape && *group_skin == skin)
            {
                Some((_, _, instances)) => instances.push(raw),
                None => opaque_groups.push((prop.shape, skin, vec![raw])),
            }
        }
        transparent_props.sort_by(|a, b| b.0.total_cmp(&a.0));

        let opaque = opaque_groups
            .into_iter()
            .map(|(shape, skin, instances)| mk_group(device, shape, skin, &instances))
            .collect();
        let transparent = transparent_props
            .into_iter()
            .map(|(_, shape, skin, raw)| mk_group(device, shape, skin, &[raw]))
            .collect();

        log::debug!(
            "Prop batch with {} props and {} raster textures",
            props.len(),
            rasters.len()
        );
        Self {
            meshes,
            white,
            rasters,
            opaque,
            transparent,
        }
    }

    /// Re-uploads rasters that changed. Returns how many were uploaded.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) -> usize {
        let mut uploads = 0;
        for slot in self.rasters.iter_mut() {
            let raster = slot.raster.borrow();
            if raster.revision() == slot.revision {
                continue;
            }
            if slot.material.texture.size() == raster.dimensions() {
                slot.material.texture.write_raster(queue, &raster);
            } else {
                let texture = Texture::from_raster(device, queue, &raster, Some("raster"));
                slot.material = Material::new(device, "raster", texture, layout);
            }
            slot.revision = raster.revision();
            uploads += 1;
        }
        uploads
    }

    fn drawable<'a>(&'a self, group: &'a Group) -> Option<Drawable<'a>> {
        let material = match group.skin {
            MaterialKey::White => &self.white,
            MaterialKey::Raster(index) => &self.rasters.get(index)?.material,
        };
        Some(Drawable {
            mesh: self.meshes.get(&group.shape)?,
            material,
            instances: &group.instances,
            amount: group.amount,
        })
    }

    pub fn render(&self) -> Render<'_> {
        let opaque = self.opaque.iter().filter_map(|g| self.drawable(g)).collect();
        let transparent = self.transparent.iter().filter_map(|g| self.drawable(g)).collect();
        Render::Composed(vec![Render::Opaques(opaque), Render::Transparents(transparent)])
    }
}

fn mk_group(device: &wgpu::Device, shape: Shape, skin: MaterialKey, instances: &[InstanceRaw]) -> Group {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Prop Instance Buffer"),
        contents: bytemuck::cast_slice(instances),
        usage: wgpu::BufferUsages::VERTEX,
    });
    Group {
        shape,
        skin,
        instances: buffer,
        amount: instances.len() as u32,
    }
}

use wgpu::util::DeviceExt;

use crate::{
    config::FogConfig,
    data_structures::raster::hex_to_linear,
    scene::lighting::{LightingRig, PointLight},
};

/// Point lights beyond this are dropped with a warning.
pub const MAX_POINT_LIGHTS: usize = 16;

pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(uniform: LightUniform, device: &wgpu::Device) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn set(&mut self, queue: &wgpu::Queue, uniform: LightUniform) {
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

impl std::fmt::Debug for LightResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightResources")
            .field("points", &self.uniform.counts[0])
            .finish()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    /// xyz position, w range (0 = unlimited).
    pub position: [f32; 4],
    /// rgb colour times intensity, w decay exponent.
    pub colour: [f32; 4],
}

/// Every light of the scene plus fog, packed into 16 byte rows the way
/// uniform buffers want them. Colours are linear and premultiplied by
/// their intensity.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub ambient: [f32; 4],
    pub sky: [f32; 4],
    pub ground: [f32; 4],
    /// xyz towards the light.
    pub directional_direction: [f32; 4],
    pub directional_colour: [f32; 4],
    /// xyz position, w range.
    pub spot_position: [f32; 4],
    /// xyz direction the cone points to, w decay.
    pub spot_direction: [f32; 4],
    pub spot_colour: [f32; 4],
    /// x cos of the outer angle, y cos of the inner angle.
    pub spot_cone: [f32; 4],
    /// rgb fog colour, w exp2 density.
    pub fog: [f32; 4],
    /// x number of valid `points`.
    pub counts: [u32; 4],
    pub points: [PointLightRaw; MAX_POINT_LIGHTS],
}

fn scaled(hex: u32, intensity: f32, w: f32) -> [f32; 4] {
    let [r, g, b] = hex_to_linear(hex);
    [r * intensity, g * intensity, b * intensity, w]
}

impl LightUniform {
    pub fn new<'a>(
        rig: &LightingRig,
        points: impl IntoIterator<Item = &'a PointLight>,
        fog: &FogConfig,
    ) -> Self {
        let (ambient, ambient_intensity) = rig.ambient;
        let to_light = rig.directional.to_light();
        let spot = &rig.spot;
        let spot_direction = spot.direction();
        let outer = spot.angle.cos();
        let inner = (spot.angle * (1.0 - spot.penumbra)).cos();
        let fog_colour = hex_to_linear(fog.colour.0);

        let mut uniform = Self {
            ambient: scaled(ambient, ambient_intensity, 0.0),
            sky: scaled(rig.hemisphere.sky, rig.hemisphere.intensity, 0.0),
            ground: scaled(rig.hemisphere.ground, rig.hemisphere.intensity, 0.0),
            directional_direction: [to_light.x, to_light.y, to_light.z, 0.0],
            directional_colour: scaled(rig.directional.colour, rig.directional.intensity, 0.0),
            spot_position: [spot.position[0], spot.position[1], spot.position[2], spot.range],
            spot_direction: [spot_direction.x, spot_direction.y, spot_direction.z, spot.decay],
            spot_colour: scaled(spot.colour, spot.intensity, 0.0),
            spot_cone: [outer, inner, 0.0, 0.0],
            fog: [fog_colour[0], fog_colour[1], fog_colour[2], fog.density],
            counts: [0; 4],
            points: [PointLightRaw::default(); MAX_POINT_LIGHTS],
        };

        let mut count = 0;
        for light in points {
            if count == MAX_POINT_LIGHTS {
                log::warn!("More than {} point lights, ignoring the rest", MAX_POINT_LIGHTS);
                break;
            }
            let [x, y, z] = light.position;
            uniform.points[count] = PointLightRaw {
                position: [x, y, z, light.range],
                colour: scaled(light.colour, light.intensity, light.decay),
            };
            count += 1;
        }
        uniform.counts[0] = count as u32;
        uniform
    }

    pub fn point_count(&self) -> usize {
        self.counts[0] as usize
    }
}

impl Default for PointLightRaw {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

//! Render pipelines.
//!
//! - `basic`: opaque props and the shared pipeline builder
//! - `transparent`: alpha-blended props
//! - `light`: the light uniform and its bind group
//! - `post`: offscreen HDR target and the CRT composite pass

pub mod basic;
pub mod light;
pub mod post;
pub mod transparent;

pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        material_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let layout = basic::mk_scene_layout(
            device,
            material_bind_group_layout,
            camera_bind_group_layout,
            light_bind_group_layout,
        );
        Self {
            basic: basic::mk_basic_pipeline(device, &layout),
            transparent: transparent::mk_transparent_pipeline(device, &layout),
        }
    }
}

impl std::fmt::Debug for Pipelines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pipelines")
    }
}

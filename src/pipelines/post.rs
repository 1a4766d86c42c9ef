//! The CRT look: the scene is rendered into an offscreen HDR target and
//! composited onto the surface by one full-screen pass doing bloom, film
//! grain with scanlines and ACES tone mapping.

use wgpu::util::DeviceExt;

use crate::{config::PostConfig, data_structures::texture::Texture, pipelines::basic::mk_render_pipeline};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PostUniform {
    pub bloom: [f32; 4],
    pub film: [f32; 4],
    pub tone: [f32; 4],
}

impl PostUniform {
    pub fn new(config: &PostConfig, size: [u32; 2]) -> Self {
        Self {
            bloom: [config.bloom_threshold, config.bloom_strength, config.bloom_radius, 0.0],
            film: [
                config.noise_intensity,
                config.scanline_intensity,
                config.scanline_count,
                0.0,
            ],
            tone: [config.exposure, size[0] as f32, size[1] as f32, 0.0],
        }
    }

    /// Seconds since start; animates the grain.
    pub fn set_time(&mut self, seconds: f32) {
        self.film[3] = seconds;
    }

    pub fn set_size(&mut self, size: [u32; 2]) {
        self.tone[1] = size[0] as f32;
        self.tone[2] = size[1] as f32;
    }
}

pub struct PostResources {
    pub uniform: PostUniform,
    pub buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group: wgpu::BindGroup,
    /// What the scene pass renders into.
    pub target: Texture,
    pub pipeline: wgpu::RenderPipeline,
}

impl std::fmt::Debug for PostResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostResources")
            .field("uniform", &self.uniform)
            .finish()
    }
}

impl PostResources {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        config: &PostConfig,
        size: [u32; 2],
    ) -> Self {
        let uniform = PostUniform::new(config, size);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Post Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("post_uniform_layout"),
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("post_uniform_bind_group"),
        });
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some("post_texture_layout"),
            });
        let target = Texture::create_hdr_target(device, size, "scene_colour");
        let texture_bind_group = mk_texture_bind_group(device, &texture_bind_group_layout, &target);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Post Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = mk_render_pipeline(
            device,
            &layout,
            surface_format,
            Some(wgpu::BlendState::REPLACE),
            None,
            &[],
            wgpu::ShaderModuleDescriptor {
                label: Some("Post Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("post.wgsl").into()),
            },
        );

        Self {
            uniform,
            buffer,
            uniform_bind_group,
            texture_bind_group_layout,
            texture_bind_group,
            target,
            pipeline,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, size: [u32; 2]) {
        self.target = Texture::create_hdr_target(device, size, "scene_colour");
        self.texture_bind_group =
            mk_texture_bind_group(device, &self.texture_bind_group_layout, &self.target);
        self.uniform.set_size(size);
    }

    pub fn configure(&mut self, config: &PostConfig) {
        let time = self.uniform.film[3];
        let size = [self.uniform.tone[1] as u32, self.uniform.tone[2] as u32];
        self.uniform = PostUniform::new(config, size);
        self.uniform.set_time(time);
    }

    pub fn update(&mut self, queue: &wgpu::Queue, seconds: f32) {
        self.uniform.set_time(seconds);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

fn mk_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    target: &Texture,
) -> wgpu::BindGroup {
    let sampler = target
        .sampler
        .clone()
        .unwrap_or_else(|| crate::data_structures::texture::create_default_sampler(device));
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&target.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
        label: Some("post_texture_bind_group"),
    })
}

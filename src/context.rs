use std::sync::Arc;

use anyhow::Context as _;
use instant::Instant;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, CameraRig, CameraUniform, Projection},
    config::SceneConfig,
    data_structures::{raster::hex_to_linear, texture},
    pipelines::{
        Pipelines,
        light::{LightResources, LightUniform},
        post::PostResources,
    },
    resources::material_layout,
    scene::lighting::LightingRig,
};

/// The GPU and window state shared by every flow.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub post: PostResources,
    pub material_layout: wgpu::BindGroupLayout,
    pub clear_colour: wgpu::Color,
    pub(crate) started: Instant,
}

/// What flow constructors get to build their GPU resources with.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub material_layout: wgpu::BindGroupLayout,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            material_layout: ctx.material_layout.clone(),
        }
    }
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let defaults = SceneConfig::default();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The post pass writes linear colour; an sRGB surface encodes it.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let rig = CameraRig::new(&defaults.camera);
        let camera = rig.start_pose();
        let projection = projection_for(&defaults, config.width, config.height);
        let camera = mk_camera_resources(&device, camera, rig, &projection);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        // Replaced by the scene's own rig once it initialises.
        let light_uniform = LightUniform::new(
            &LightingRig::new(&mut rand::thread_rng()),
            std::iter::empty(),
            &defaults.fog,
        );
        let light = LightResources::new(light_uniform, &device);

        let material_layout = material_layout(&device);
        let pipelines = Pipelines::new(
            &device,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );
        let post = PostResources::new(
            &device,
            surface_format,
            &defaults.post,
            [config.width, config.height],
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipelines,
            post,
            material_layout,
            clear_colour: clear_colour(defaults.background.0),
            started: Instant::now(),
        })
    }

    /// Applies the camera, post-processing and background of `config`.
    /// The camera restarts its intro.
    pub fn configure_scene(&mut self, config: &SceneConfig) {
        self.projection = projection_for(config, self.config.width, self.config.height);
        self.camera.rig = CameraRig::new(&config.camera);
        self.camera.camera = self.camera.rig.start_pose();
        self.camera
            .uniform
            .update_view_proj(&self.camera.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
        self.post.configure(&config.post);
        self.clear_colour = clear_colour(config.background.0);
    }

    pub fn size(&self) -> [u32; 2] {
        [self.config.width, self.config.height]
    }
}

fn projection_for(config: &SceneConfig, width: u32, height: u32) -> Projection {
    Projection::new(
        width,
        height,
        cgmath::Deg(config.camera.fov_degrees),
        config.camera.znear,
        config.camera.zfar,
    )
}

/// The scene target is linear, so the clear colour is too.
fn clear_colour(hex: u32) -> wgpu::Color {
    let [r, g, b] = hex_to_linear(hex);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

fn mk_camera_resources(
    device: &wgpu::Device,
    camera: Camera,
    rig: CameraRig,
    projection: &Projection,
) -> CameraResources {
    let mut camera_uniform = CameraUniform::new();
    camera_uniform.update_view_proj(&camera, projection);

    let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Camera Buffer"),
        contents: bytemuck::cast_slice(&[camera_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("camera_bind_group_layout"),
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: camera_buffer.as_entire_binding(),
        }],
        label: Some("camera_bind_group"),
    });

    CameraResources {
        camera,
        rig,
        uniform: camera_uniform,
        buffer: camera_buffer,
        bind_group,
        bind_group_layout,
    }
}

//! Flow control and application event loop.
//!
//! A "flow" is a scene that handles user input, updates its state and hands
//! the renderer what to draw each frame. The app owns the GPU [`Context`],
//! runs the winit event loop and forwards events to every flow.
//!
//! # Lifecycle Flow
//!
//! The event loop follows this pattern each frame:
//! 1. Forward window events; cursor moves become NDC pointer events and a
//!    left press becomes a click
//! 2. Advance the camera rig and upload the camera uniform
//! 3. Call `on_update` on every flow
//! 4. Collect every flow's [`Render`] and draw the opaque, then the
//!    alpha-blended batch into the offscreen HDR target
//! 5. Composite the target onto the surface with the post pass and present

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use cgmath::Vector2;
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    camera::pixel_to_ndc,
    context::{Context, InitContext},
    data_structures::{model::DrawModel, texture::Texture},
    render::{Drawable, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Output of the lifecycle hooks.
///
/// `Out::Configure` can be used to modify the Context during runtime, for
/// instance to change the clear colour.
///
/// `Empty` is the default output used when nothing needs to be handled.
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

/// A scene driven by the event loop.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created
/// 2. `on_window_events()` is called for each winit window event
/// 3. `on_pointer_moved()` and `on_click()` are called for pointer input
/// 4. `on_update()` is called every frame
/// 5. `on_render()` is called each frame and specifies how to render `self`
pub trait GraphicsFlow<S> {
    /// The only place with mutable access to the Context.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out;

    /// Called every frame with the wall-clock time since the last one.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out;

    /// `ndc` is in `[-1, 1]²` with `+y` pointing up.
    fn on_pointer_moved(&mut self, ctx: &Context, state: &mut S, ndc: Vector2<f32>) -> Out;

    /// Left button pressed at the last pointer position.
    fn on_click(&mut self, ctx: &Context, state: &mut S) -> Out;

    fn on_window_events(&mut self, _ctx: &Context, _state: &mut S, _event: &WindowEvent) -> Out {
        Out::Empty
    }

    fn on_render(&self) -> Render<'_>;
}

impl<State> Debug for dyn GraphicsFlow<State> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// A flow constructor takes an `InitContext` and asynchronously returns a
/// boxed `GraphicsFlow`, so flows can load their assets first. A failing
/// constructor aborts the start of the app.
pub type FlowConstructor<S> = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S>>>>>>,
>;

/// Application state bundle: GPU context, app state, and surface status.
#[derive(Debug)]
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
}

impl<State: Default> AppState<State> {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        Ok(Self {
            ctx,
            state: State::default(),
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture =
                Texture::create_depth_texture(&self.ctx.device, [width, height], "depth_texture");
            self.ctx.post.resize(&self.ctx.device, [width, height]);
        }
    }

    /// Moves the camera and uploads the per-frame uniforms.
    fn advance(&mut self, dt: Duration) {
        let ctx = &mut self.ctx;
        ctx.camera.rig.update(&mut ctx.camera.camera, dt);
        ctx.camera
            .uniform
            .update_view_proj(&ctx.camera.camera, &ctx.projection);
        ctx.queue.write_buffer(
            &ctx.camera.buffer,
            0,
            bytemuck::cast_slice(&[ctx.camera.uniform]),
        );
        let seconds = ctx.started.elapsed().as_secs_f32();
        ctx.post.update(&ctx.queue, seconds);
    }

    fn render(
        &mut self,
        graphics_flows: &[Box<dyn GraphicsFlow<State>>],
    ) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.ctx.post.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut opaques: Vec<Drawable> = Vec::new();
            let mut trans: Vec<Drawable> = Vec::new();
            graphics_flows
                .iter()
                .for_each(|flow| flow.on_render().set_pipelines(&mut opaques, &mut trans));

            render_pass.set_pipeline(&self.ctx.pipelines.basic);
            draw_all(&mut render_pass, &self.ctx, &opaques);
            render_pass.set_pipeline(&self.ctx.pipelines.transparent);
            draw_all(&mut render_pass, &self.ctx, &trans);
        }
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Post Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.ctx.post.draw(&mut render_pass);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn draw_all<'a>(render_pass: &mut wgpu::RenderPass<'a>, ctx: &'a Context, drawables: &[Drawable<'a>]) {
    for drawable in drawables {
        if drawable.amount == 0 {
            log::warn!("Skipping a draw of '{}' with zero instances", drawable.mesh.name);
            continue;
        }
        render_pass.set_vertex_buffer(1, drawable.instances.slice(..));
        render_pass.draw_mesh_instanced(
            drawable.mesh,
            drawable.material,
            0..drawable.amount,
            &ctx.camera.bind_group,
            &ctx.light.bind_group,
        );
    }
}

pub struct App<State: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<State>>,
    state: Option<AppState<State>>,
    graphics_flows: Vec<Box<dyn GraphicsFlow<State>>>,
    constructors: Option<Vec<FlowConstructor<State>>>,
    last_time: Instant,
}

impl<State: 'static + Default> App<State> {
    fn new(
        event_loop: &EventLoop<FlowEvent<State>>,
        constructors: Vec<FlowConstructor<State>>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
        })
    }

    fn start(&mut self, mut app_state: AppState<State>, flows: Vec<Box<dyn GraphicsFlow<State>>>) {
        self.graphics_flows = flows;
        let size = app_state.ctx.window.inner_size();
        app_state.resize(size.width, size.height);
        for flow in self.graphics_flows.iter_mut() {
            let out = flow.on_init(&mut app_state.ctx, &mut app_state.state);
            handle_flow_output(&mut app_state.ctx, out);
        }
        app_state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(app_state);
    }
}

pub(crate) enum FlowEvent<State: 'static> {
    #[allow(dead_code)]
    Initialized {
        state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State>>>,
    },
    #[allow(dead_code)]
    Failed(String),
}

impl<State> Debug for FlowEvent<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, flows } => {
                f.debug_struct("Initialized").field("flows", flows).finish()
            }
            Self::Failed(reason) => f.debug_tuple("Failed").field(reason).finish(),
        }
    }
}

impl<State: 'static + Default> ApplicationHandler<FlowEvent<State>> for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructors) = self.constructors.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("CRT menu");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = wgpu::web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes = window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => log::warn!("No #{} element, letting winit create a canvas", CANVAS_ID),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create the window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let init_future = async move {
            let app_state = AppState::new(window).await?;
            let flow_futures: Vec<_> = constructors
                .into_iter()
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows = futures::future::join_all(flow_futures)
                .await
                .into_iter()
                .collect::<anyhow::Result<Vec<_>>>()?;
            anyhow::Ok((app_state, flows))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok((app_state, flows)) => self.start(app_state, flows),
                Err(e) => {
                    log::error!("App initialization failed: {:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok((state, flows)) => FlowEvent::Initialized { state, flows },
                    Err(e) => FlowEvent::Failed(format!("{:#}", e)),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("The event loop closed before initialization finished");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<State>) {
        match event {
            FlowEvent::Initialized { state, flows } => self.start(state, flows),
            FlowEvent::Failed(reason) => {
                log::error!("App initialization failed: {}", reason);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        for flow in self.graphics_flows.iter_mut() {
            let out = flow.on_window_events(&state.ctx, &mut state.state, &event);
            handle_flow_output(&mut state.ctx, out);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => {
                let ndc = pixel_to_ndc(
                    position.x,
                    position.y,
                    state.ctx.config.width,
                    state.ctx.config.height,
                );
                state.ctx.camera.rig.follow_pointer(ndc.x);
                for flow in self.graphics_flows.iter_mut() {
                    let out = flow.on_pointer_moved(&state.ctx, &mut state.state, ndc);
                    handle_flow_output(&mut state.ctx, out);
                }
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } if button_state.is_pressed() => {
                for flow in self.graphics_flows.iter_mut() {
                    let out = flow.on_click(&state.ctx, &mut state.state);
                    handle_flow_output(&mut state.ctx, out);
                }
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state.advance(dt);
                for flow in self.graphics_flows.iter_mut() {
                    let out = flow.on_update(&state.ctx, &mut state.state, dt);
                    handle_flow_output(&mut state.ctx, out);
                }

                match state.render(&self.graphics_flows) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

fn handle_flow_output(ctx: &mut Context, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

/// Opens the window and runs `constructors` until the window closes.
pub fn run<State: 'static + Default>(constructors: Vec<FlowConstructor<State>>) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info)?;
    }

    let event_loop: EventLoop<FlowEvent<State>> = EventLoop::with_user_event().build()?;
    let mut app: App<State> = App::new(&event_loop, constructors)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}


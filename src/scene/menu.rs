//! The menu scene.
//!
//! [`MenuScene`] is everything the menu needs apart from the GPU: the TVs,
//! the room, the light rig, the surface registry with its resolver and the
//! animator driving the screen textures. [`MenuFlow`] wraps it for the event
//! loop and keeps a [`PropBatch`] in step with it.

use cgmath::{Point3, Vector2};
use instant::Duration;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    animation::Animator,
    camera::{CameraView, RaySource},
    config::{SCENE_FILE, SceneConfig, ScreenContent},
    context::{Context, InitContext},
    data_structures::raster::RasterTexture,
    effects::{MenuEffects, platform_effects},
    flow::{FlowConstructor, GraphicsFlow, Out},
    interaction::{InteractionResolver, Selection, SurfaceRegistry},
    pipelines::light::LightUniform,
    render::{PropBatch, Render},
    resources::load_raster,
    scene::{
        Prop,
        lighting::{LightingRig, PointLight},
        room::{Room, WallImages},
        tv::CrtTv,
    },
};

/// Decoded images the scene starts with.
#[derive(Clone, Debug, Default)]
pub struct MenuAssets {
    /// One slot per TV, main set first.
    pub custom: Vec<Option<RasterTexture>>,
    pub walls: WallImages,
}

impl MenuAssets {
    /// Loads every image `config` names. Images that fail to load are logged
    /// and left out.
    pub async fn load(config: &SceneConfig) -> Self {
        let mut custom = Vec::new();
        for tv in config.tvs() {
            let image = match (tv.content, &tv.texture) {
                (ScreenContent::Custom, Some(file)) => load_optional(file).await,
                _ => None,
            };
            custom.push(image);
        }
        let walls = WallImages {
            hall: match &config.room.hall_texture {
                Some(file) => load_optional(file).await,
                None => None,
            },
            back: match &config.room.back_texture {
                Some(file) => load_optional(file).await,
                None => None,
            },
        };
        Self { custom, walls }
    }
}

async fn load_optional(file: &str) -> Option<RasterTexture> {
    match load_raster(file).await {
        Ok(raster) => Some(raster),
        Err(e) => {
            log::warn!("Could not load texture '{}': {:#}", file, e);
            None
        }
    }
}

pub struct MenuScene {
    config: SceneConfig,
    animator: Animator,
    registry: SurfaceRegistry,
    resolver: InteractionResolver,
    effects: Box<dyn MenuEffects>,
    tvs: Vec<CrtTv>,
    room: Room,
    rig: LightingRig,
    rng: StdRng,
    /// Bumped whenever props or lights change beyond their textures.
    layout_revision: u64,
}

impl std::fmt::Debug for MenuScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuScene")
            .field("tvs", &self.tvs.len())
            .field("surfaces", &self.registry.len())
            .field("animations", &self.animator.active())
            .field("highlight", self.resolver.highlight())
            .finish()
    }
}

impl MenuScene {
    pub fn new(
        config: SceneConfig,
        assets: MenuAssets,
        effects: Box<dyn MenuEffects>,
        mut rng: StdRng,
    ) -> anyhow::Result<Self> {
        let mut animator = Animator::new();
        let mut registry = SurfaceRegistry::new();
        let rig = LightingRig::new(&mut rng);

        let mut custom = assets.custom.into_iter();
        let mut tvs = Vec::new();
        for tv_config in config.tvs() {
            let image = custom.next().flatten();
            let tv = CrtTv::new(tv_config, image, &config.menu.entries, &mut animator, &mut rng);
            tv.register_menu(&mut registry)?;
            tvs.push(tv);
        }
        let room = Room::new(assets.walls, &mut animator, &mut rng);
        let resolver = InteractionResolver::new(StdRng::seed_from_u64(rng.r#gen()));

        log::info!(
            "Menu scene with {} TVs, {} menu items and {} animations",
            tvs.len(),
            registry.len(),
            animator.active()
        );
        Ok(Self {
            config,
            animator,
            registry,
            resolver,
            effects,
            tvs,
            room,
            rig,
            rng,
            layout_revision: 0,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn tvs(&self) -> &[CrtTv] {
        &self.tvs
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &InteractionResolver {
        &self.resolver
    }

    pub fn active_animations(&self) -> usize {
        self.animator.active()
    }

    pub fn layout_revision(&self) -> u64 {
        self.layout_revision
    }

    /// Every prop of the scene: TVs first, then the room.
    pub fn props(&self) -> Vec<Prop> {
        let mut props: Vec<Prop> = self.tvs.iter().flat_map(CrtTv::props).collect();
        props.extend(self.room.props());
        props
    }

    /// Rig fill lights, room lights, then the TV screen lights.
    pub fn point_lights(&self) -> Vec<PointLight> {
        self.rig
            .points
            .iter()
            .chain(self.room.lights())
            .chain(self.tvs.iter().filter_map(CrtTv::screen_light))
            .copied()
            .collect()
    }

    pub fn light_uniform(&self) -> LightUniform {
        LightUniform::new(&self.rig, &self.point_lights(), &self.config.fog)
    }

    /// Runs the texture animations that are due.
    pub fn advance(&mut self, dt: Duration) -> usize {
        self.animator.advance(dt)
    }

    /// Returns whether the highlight changed.
    pub fn pointer_moved<S: RaySource + ?Sized>(&mut self, ndc: Vector2<f32>, rays: &S) -> bool {
        self.resolver
            .on_pointer_move(ndc, rays, &self.registry, self.effects.as_mut())
    }

    pub fn click<S: RaySource + ?Sized>(&mut self, rays: &S) -> Option<Selection> {
        self.resolver
            .on_click(rays, &self.registry, self.effects.as_mut())
    }

    /// Highlights row `row` of TV `tv`'s menu as a hover would.
    pub fn highlight_menu_item(&mut self, tv: usize, row: usize) -> anyhow::Result<bool> {
        let Some(set) = self.tvs.get(tv) else {
            anyhow::bail!("no TV at index {}", tv);
        };
        set.highlight_menu_item(row, &mut self.resolver, &self.registry, self.effects.as_mut())
    }

    /// Switches what TV `index` shows; the main set is 0.
    pub fn update_screen(
        &mut self,
        index: usize,
        content: ScreenContent,
        custom: Option<RasterTexture>,
    ) -> anyhow::Result<()> {
        let count = self.tvs.len();
        let Some(tv) = self.tvs.get_mut(index) else {
            anyhow::bail!("no TV at index {} (the scene has {})", index, count);
        };
        tv.update_screen(content, custom, &mut self.animator, &mut self.rng);
        self.layout_revision += 1;
        Ok(())
    }

    /// Removes TV `index` with its menu rows and animations.
    pub fn remove_tv(&mut self, index: usize) -> anyhow::Result<()> {
        anyhow::ensure!(index < self.tvs.len(), "no TV at index {}", index);
        let mut tv = self.tvs.remove(index);
        tv.dispose(&mut self.registry);
        self.resolver.reset(&self.registry, self.effects.as_mut());
        self.layout_revision += 1;
        Ok(())
    }
}

/// [`MenuScene`] on the GPU.
pub struct MenuFlow {
    scene: MenuScene,
    batch: PropBatch,
    uploaded_revision: u64,
}

impl MenuFlow {
    pub fn new(scene: MenuScene, init: &InitContext) -> Self {
        let batch = PropBatch::new(
            &init.device,
            &init.queue,
            &init.material_layout,
            &scene.props(),
            rest_eye(scene.config()),
        );
        let uploaded_revision = scene.layout_revision();
        Self {
            scene,
            batch,
            uploaded_revision,
        }
    }
}

fn rest_eye(config: &SceneConfig) -> Point3<f32> {
    Point3::from(config.camera.rest_position)
}

impl GraphicsFlow<()> for MenuFlow {
    fn on_init(&mut self, ctx: &mut Context, _state: &mut ()) -> Out {
        ctx.configure_scene(self.scene.config());
        let uniform = self.scene.light_uniform();
        ctx.light.set(&ctx.queue, uniform);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _state: &mut (), dt: Duration) -> Out {
        self.scene.advance(dt);
        if self.uploaded_revision != self.scene.layout_revision() {
            self.batch = PropBatch::new(
                &ctx.device,
                &ctx.queue,
                &ctx.material_layout,
                &self.scene.props(),
                rest_eye(self.scene.config()),
            );
            self.uploaded_revision = self.scene.layout_revision();
            let uniform = self.scene.light_uniform();
            return Out::Configure(Box::new(move |ctx| ctx.light.set(&ctx.queue, uniform)));
        }
        self.batch.sync(&ctx.device, &ctx.queue, &ctx.material_layout);
        Out::Empty
    }

    fn on_pointer_moved(&mut self, ctx: &Context, _state: &mut (), ndc: Vector2<f32>) -> Out {
        let view = CameraView {
            camera: &ctx.camera.camera,
            projection: &ctx.projection,
        };
        self.scene.pointer_moved(ndc, &view);
        Out::Empty
    }

    fn on_click(&mut self, ctx: &Context, _state: &mut ()) -> Out {
        let view = CameraView {
            camera: &ctx.camera.camera,
            projection: &ctx.projection,
        };
        if let Some(selection) = self.scene.click(&view) {
            log::debug!("Menu selection: {:?}", selection);
        }
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        self.batch.render()
    }
}

/// Loads `scene.json` and its images, then builds the menu flow.
pub fn menu_flow() -> FlowConstructor<()> {
    Box::new(|init: InitContext| {
        Box::pin(async move {
            let config = SceneConfig::load(SCENE_FILE).await;
            let assets = MenuAssets::load(&config).await;
            let scene = MenuScene::new(config, assets, platform_effects(), StdRng::from_entropy())?;
            let flow: Box<dyn GraphicsFlow<()>> = Box::new(MenuFlow::new(scene, &init));
            Ok(flow)
        })
    })
}

//! A CRT television: box body, bezels, controls, a [`Screen`] and the point
//! light the screen casts into the room.

use cgmath::{Point3, Transform, Vector3};
use rand::Rng;

use crate::{
    animation::Animator,
    config::{MenuEntry, ScreenContent, TvConfig, TvKind},
    data_structures::{instance::Instance, raster::RasterTexture},
    effects::MenuEffects,
    interaction::{InteractionResolver, SurfaceRegistry},
    scene::{
        Look, Prop,
        lighting::PointLight,
        screen::{MenuItem, Screen, ScreenOptions},
    },
};

const BODY_COLOUR: u32 = 0x010101;
const BEZEL_COLOUR: u32 = 0x000000;
const BEZEL_THICKNESS: f32 = 0.02;
const BUTTON_COLOUR: u32 = 0x444444;
const INDICATOR_COLOUR: u32 = 0x00ff00;

const SCREEN_WIDTH_RATIO: f32 = 0.8;
const SCREEN_HEIGHT_RATIO: f32 = 0.75;
const SCREEN_OFFSET: f32 = 0.01;
const GLASS_OFFSET: f32 = 0.02;
const LIGHT_OFFSET: f32 = 0.05;
const SCREEN_LIGHT_RANGE: f32 = 5.0;

#[derive(Debug)]
pub struct CrtTv {
    kind: TvKind,
    body: Instance,
    size: [f32; 3],
    screen: Screen,
    screen_light: Option<PointLight>,
}

impl CrtTv {
    /// Builds the set described by `config`. `custom` is the decoded image for
    /// custom content; `menu` the rows shown if this is the menu TV.
    pub fn new<R: Rng + ?Sized>(
        config: &TvConfig,
        custom: Option<RasterTexture>,
        menu: &[MenuEntry],
        animator: &mut Animator,
        rng: &mut R,
    ) -> Self {
        let body = Instance::from_euler_xyz(config.position, config.rotation);
        let mut options = ScreenOptions::new(
            config.width * SCREEN_WIDTH_RATIO,
            config.height * SCREEN_HEIGHT_RATIO,
            config.content,
        );
        options.custom = custom;
        options.glass = config.kind == TvKind::Secondary;
        // Black counts as "no colour" for the emissive tint.
        options.emissive = config
            .light
            .map(|light| light.colour.0)
            .filter(|&colour| colour != 0);

        let screen = Screen::new(options, menu, animator, rng);
        let screen_light = config.light.map(|light| {
            let local = [0.0, 0.0, config.depth / 2.0 + LIGHT_OFFSET];
            let world = body.to_matrix().transform_point(Point3::from(local));
            PointLight::new(
                world.into(),
                light.colour.0,
                light.intensity,
                SCREEN_LIGHT_RANGE,
                1.0,
            )
        });

        Self {
            kind: config.kind,
            body,
            size: [config.width, config.height, config.depth],
            screen,
            screen_light,
        }
    }

    pub fn kind(&self) -> TvKind {
        self.kind
    }

    pub fn body(&self) -> &Instance {
        &self.body
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_light(&self) -> Option<&PointLight> {
        self.screen_light.as_ref()
    }

    /// World transform of the screen quad.
    pub fn screen_transform(&self) -> Instance {
        self.front(SCREEN_OFFSET)
    }

    fn front(&self, offset: f32) -> Instance {
        &self.body * &Instance::from(Vector3::new(0.0, 0.0, self.size[2] / 2.0 + offset))
    }

    pub fn menu_items(&self) -> &[MenuItem] {
        self.screen.menu_items()
    }

    /// Registers every menu row with `registry` at its world placement.
    pub fn register_menu(&self, registry: &mut SurfaceRegistry) -> anyhow::Result<()> {
        let screen = self.screen_transform();
        for item in self.menu_items() {
            registry.register(item.to_surface(&screen))?;
        }
        Ok(())
    }

    /// Highlights menu row `index` through `resolver`, replacing whatever it
    /// had highlighted. Out of range is ignored. Returns whether the
    /// highlight changed.
    pub fn highlight_menu_item<E: MenuEffects + ?Sized>(
        &self,
        index: usize,
        resolver: &mut InteractionResolver,
        registry: &SurfaceRegistry,
        effects: &mut E,
    ) -> anyhow::Result<bool> {
        match self.menu_items().get(index) {
            Some(item) => resolver.highlight_id(&item.id, registry, effects),
            None => Ok(false),
        }
    }

    /// Clears the highlight if it sits on one of this set's rows.
    pub fn reset_menu_items<E: MenuEffects + ?Sized>(
        &self,
        resolver: &mut InteractionResolver,
        registry: &SurfaceRegistry,
        effects: &mut E,
    ) -> bool {
        let owned = resolver
            .highlight()
            .id()
            .is_some_and(|id| self.menu_items().iter().any(|item| &item.id == id));
        owned && resolver.reset(registry, effects)
    }

    /// Switches the screen content and retints the screen light to match.
    pub fn update_screen<R: Rng + ?Sized>(
        &mut self,
        content: ScreenContent,
        custom: Option<RasterTexture>,
        animator: &mut Animator,
        rng: &mut R,
    ) {
        self.screen.update_content(content, custom, animator, rng);
        let colour = match content {
            ScreenContent::Static => Some(0xaaaaaa),
            ScreenContent::Logo => Some(0xff0000),
            ScreenContent::MissionData => Some(0x00aa00),
            ScreenContent::Menu | ScreenContent::Custom => None,
        };
        if let Some(colour) = colour {
            self.update_screen_light(colour, None);
        }
    }

    /// Ignored for sets without a screen light.
    pub fn update_screen_light(&mut self, colour: u32, intensity: Option<f32>) {
        let Some(light) = self.screen_light.as_mut() else {
            return;
        };
        light.colour = colour;
        if let Some(intensity) = intensity {
            light.intensity = intensity;
        }
    }

    pub fn props(&self) -> Vec<Prop> {
        let [width, height, depth] = self.size;
        let part = |x: f32, y: f32, z: f32| &self.body * &Instance::from(Vector3::new(x, y, z));
        let bezel_z = depth / 2.0 - BEZEL_THICKNESS / 2.0;
        let bezel = Look::solid(BEZEL_COLOUR);

        let mut props = vec![
            Prop::cube("tv body", self.body.clone(), self.size, Look::solid(BODY_COLOUR)),
            Prop::cube(
                "bezel",
                part(0.0, height / 2.0 - BEZEL_THICKNESS / 2.0, bezel_z),
                [width, BEZEL_THICKNESS, BEZEL_THICKNESS],
                bezel.clone(),
            ),
            Prop::cube(
                "bezel",
                part(0.0, -height / 2.0 + BEZEL_THICKNESS / 2.0, bezel_z),
                [width, BEZEL_THICKNESS, BEZEL_THICKNESS],
                bezel.clone(),
            ),
            Prop::cube(
                "bezel",
                part(-width / 2.0 + BEZEL_THICKNESS / 2.0, 0.0, bezel_z),
                [BEZEL_THICKNESS, height - BEZEL_THICKNESS * 2.0, BEZEL_THICKNESS],
                bezel.clone(),
            ),
            Prop::cube(
                "bezel",
                part(width / 2.0 - BEZEL_THICKNESS / 2.0, 0.0, bezel_z),
                [BEZEL_THICKNESS, height - BEZEL_THICKNESS * 2.0, BEZEL_THICKNESS],
                bezel,
            ),
            Prop::cube(
                "power button",
                part(width / 2.0 + 0.02, 0.0, 0.0),
                [0.06, 0.06, 0.02],
                Look::solid(BUTTON_COLOUR),
            ),
            Prop::quad(
                "power indicator",
                part(width * 0.45, -height * 0.45, depth / 2.0 + 0.005),
                0.02,
                0.02,
                Look::solid(INDICATOR_COLOUR).unlit(),
            ),
        ];
        props.extend(
            self.screen
                .props(&self.screen_transform(), &self.front(GLASS_OFFSET)),
        );
        props
    }

    /// Stops the screen animations and unregisters the menu rows.
    pub fn dispose(&mut self, registry: &mut SurfaceRegistry) {
        self.screen.stop_animations();
        for item in self.screen.menu_items() {
            registry.remove(&item.id);
        }
    }
}

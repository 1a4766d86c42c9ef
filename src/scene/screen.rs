//! The picture area of a CRT.
//!
//! A [`Screen`] owns one shared raster for its content. Switching content
//! redraws that raster in place, so the renderer keeps sampling the same
//! texture slot. Menu rows float over regenerating static. Animated content
//! (static noise, the mission cursor) runs as an [`Animator`] task whose
//! handle the screen holds; replacing the content or calling
//! [`Screen::stop_animations`] drops it.

use std::rc::Rc;

use instant::Duration;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    animation::{AnimationHandle, Animator},
    config::{MenuEntry, ScreenContent},
    data_structures::{
        instance::Instance,
        raster::{RasterTexture, SharedRaster},
        surface::{InteractiveSurface, SurfaceId},
    },
    procedural::{self, CursorBlink},
    scene::{Look, Prop},
};

pub const STATIC_INTERVAL: Duration = Duration::from_millis(100);
pub const CURSOR_INTERVAL: Duration = Duration::from_millis(500);

/// Base colour the screen texture is multiplied with.
const SCREEN_COLOUR: u32 = 0x111111;
const GLASS_SCALE: f32 = 1.02;
const GLASS_OPACITY: f32 = 0.1;

pub const MENU_ITEM_HEIGHT: f32 = 0.2;
pub const MENU_ITEM_WIDTH_RATIO: f32 = 0.85;
const MENU_TOP: f32 = 0.6;
const MENU_PITCH: f32 = 0.25;
const MENU_OFFSET: f32 = 0.02;

/// Emissive tint a screen uses for `content` when nothing overrides it.
pub fn default_emissive(content: ScreenContent) -> u32 {
    match content {
        ScreenContent::Static => 0xaaaaaa,
        ScreenContent::Logo => 0xff0000,
        ScreenContent::MissionData => 0x00ff00,
        ScreenContent::Menu | ScreenContent::Custom => 0xeeeeee,
    }
}

/// Centre of menu row `index` in screen-local space.
pub fn menu_item_position(index: usize) -> [f32; 3] {
    [0.0, MENU_TOP - index as f32 * MENU_PITCH, MENU_OFFSET]
}

#[derive(Clone, Debug)]
pub struct ScreenOptions {
    pub width: f32,
    pub height: f32,
    pub content: ScreenContent,
    /// Decoded image for [`ScreenContent::Custom`].
    pub custom: Option<RasterTexture>,
    pub emissive: Option<u32>,
    pub emissive_intensity: f32,
    pub glass: bool,
}

impl ScreenOptions {
    pub fn new(width: f32, height: f32, content: ScreenContent) -> Self {
        Self {
            width,
            height,
            content,
            custom: None,
            emissive: None,
            emissive_intensity: 0.1,
            glass: false,
        }
    }
}

/// One selectable row of a menu screen, positioned in screen-local space.
#[derive(Clone, Debug)]
pub struct MenuItem {
    pub id: SurfaceId,
    pub label: String,
    pub link: Option<String>,
    pub local: Instance,
    pub width: f32,
    pub height: f32,
    pub texture: SharedRaster,
}

impl MenuItem {
    /// The interactive surface for this row once the screen sits at `screen`.
    pub fn to_surface(&self, screen: &Instance) -> InteractiveSurface {
        InteractiveSurface {
            id: self.id.clone(),
            label: self.label.clone(),
            link: self.link.clone(),
            transform: screen * &self.local,
            width: self.width,
            height: self.height,
            texture: Rc::clone(&self.texture),
        }
    }
}

#[derive(Debug)]
pub struct Screen {
    width: f32,
    height: f32,
    content: ScreenContent,
    raster: SharedRaster,
    emissive: u32,
    emissive_override: Option<u32>,
    emissive_intensity: f32,
    glass: bool,
    menu_items: Vec<MenuItem>,
    animation: Option<AnimationHandle>,
}

impl Screen {
    /// `menu` supplies the rows for [`ScreenContent::Menu`] and is ignored
    /// otherwise.
    pub fn new<R: Rng + ?Sized>(
        options: ScreenOptions,
        menu: &[MenuEntry],
        animator: &mut Animator,
        rng: &mut R,
    ) -> Self {
        let ScreenOptions {
            width,
            height,
            content,
            custom,
            emissive,
            emissive_intensity,
            glass,
        } = options;
        let mut screen = Self {
            width,
            height,
            content,
            raster: RasterTexture::new(1, 1).into_shared(),
            emissive: emissive.unwrap_or_else(|| default_emissive(content)),
            emissive_override: emissive,
            emissive_intensity,
            glass,
            menu_items: Vec::new(),
            animation: None,
        };
        screen.show(content, custom, animator, rng);
        if content == ScreenContent::Menu {
            screen.menu_items = Self::build_menu(width, menu, rng);
        }
        screen
    }

    fn build_menu<R: Rng + ?Sized>(width: f32, entries: &[MenuEntry], rng: &mut R) -> Vec<MenuItem> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| MenuItem {
                id: SurfaceId::new(entry.id.as_str()),
                label: entry.label.clone(),
                link: entry.link.clone(),
                local: Instance::from(cgmath::Vector3::from(menu_item_position(index))),
                width: width * MENU_ITEM_WIDTH_RATIO,
                height: MENU_ITEM_HEIGHT,
                texture: procedural::menu_item_texture(rng, &entry.label, false).into_shared(),
            })
            .collect()
    }

    /// Draws `content` into the screen raster and starts its animation.
    fn show<R: Rng + ?Sized>(
        &mut self,
        content: ScreenContent,
        custom: Option<RasterTexture>,
        animator: &mut Animator,
        rng: &mut R,
    ) {
        self.stop_animations();
        self.content = content;
        let (raster, shows_static) = match (content, custom) {
            (ScreenContent::Custom, Some(image)) => (image, false),
            (ScreenContent::Custom, None) => {
                log::warn!("Custom screen content without an image, showing static");
                (procedural::static_texture(rng), true)
            }
            (ScreenContent::Static | ScreenContent::Menu, _) => {
                (procedural::static_texture(rng), true)
            }
            (ScreenContent::Logo, _) => (procedural::logo_texture(), false),
            (ScreenContent::MissionData, _) => (procedural::mission_data_texture(), false),
        };
        self.raster.borrow_mut().replace(raster);

        if shows_static {
            let target = Rc::downgrade(&self.raster);
            let mut noise = StdRng::seed_from_u64(rng.r#gen());
            self.animation = Some(animator.every("static", STATIC_INTERVAL, move || {
                if let Some(raster) = target.upgrade() {
                    procedural::fill_static(&mut noise, &mut raster.borrow_mut());
                }
            }));
        } else if content == ScreenContent::MissionData {
            let target = Rc::downgrade(&self.raster);
            let mut blink = CursorBlink::new();
            self.animation = Some(animator.every("cursor", CURSOR_INTERVAL, move || {
                if let Some(raster) = target.upgrade() {
                    blink.toggle(&mut raster.borrow_mut());
                }
            }));
        }
    }

    /// Swaps the content. The emissive tint follows the new content unless
    /// the content has no tint of its own and an override was configured.
    pub fn update_content<R: Rng + ?Sized>(
        &mut self,
        content: ScreenContent,
        custom: Option<RasterTexture>,
        animator: &mut Animator,
        rng: &mut R,
    ) {
        self.show(content, custom, animator, rng);
        self.emissive = match content {
            ScreenContent::Static | ScreenContent::Logo | ScreenContent::MissionData => {
                default_emissive(content)
            }
            ScreenContent::Menu | ScreenContent::Custom => {
                self.emissive_override.unwrap_or_else(|| default_emissive(content))
            }
        };
        log::debug!("Screen now shows {:?}", content);
    }

    pub fn stop_animations(&mut self) {
        if let Some(handle) = self.animation.take() {
            handle.cancel();
        }
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    pub fn content(&self) -> ScreenContent {
        self.content
    }

    pub fn raster(&self) -> &SharedRaster {
        &self.raster
    }

    pub fn emissive(&self) -> u32 {
        self.emissive
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn has_glass(&self) -> bool {
        self.glass
    }

    pub fn menu_items(&self) -> &[MenuItem] {
        &self.menu_items
    }

    /// Screen quad, optional glass and menu rows with the screen placed at
    /// `screen` and the glass at `glass`.
    pub fn props(&self, screen: &Instance, glass: &Instance) -> Vec<Prop> {
        let mut props = vec![Prop::quad(
            "screen",
            screen.clone(),
            self.width,
            self.height,
            Look::textured(SCREEN_COLOUR, Rc::clone(&self.raster))
                .with_emissive(self.emissive, self.emissive_intensity),
        )];
        if self.glass {
            props.push(Prop::quad(
                "glass",
                glass.clone(),
                self.width * GLASS_SCALE,
                self.height * GLASS_SCALE,
                Look::solid(0xffffff).translucent(GLASS_OPACITY),
            ));
        }
        for item in &self.menu_items {
            let surface = item.to_surface(screen);
            props.push(Prop::quad(
                "menu item",
                surface.transform,
                surface.width,
                surface.height,
                Look::textured(0xffffff, surface.texture).unlit().translucent(1.0),
            ));
        }
        props
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        self.stop_animations();
    }
}


//! Pointer interaction with the menu.
//!
//! [`SurfaceRegistry`] holds the surfaces the pointer can interact with, in
//! registration order. [`InteractionResolver`] turns pointer moves and clicks
//! into highlight changes and selections: it casts a ray through the pointer,
//! takes the nearest hit and keeps an explicit [`Highlight`] so that at most
//! one surface is highlighted at a time. Side effects leave through
//! [`MenuEffects`].

use anyhow::bail;
use cgmath::Vector2;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    camera::RaySource,
    data_structures::surface::{InteractiveSurface, SurfaceId},
    effects::{MenuEffects, SELECT_TONE},
    pick::closest_hit,
    procedural::menu_item_texture,
};

#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: Vec<InteractiveSurface>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a surface. Ids must be unique within the registry.
    pub fn register(&mut self, surface: InteractiveSurface) -> anyhow::Result<()> {
        if self.get(&surface.id).is_some() {
            bail!("surface '{}' is already registered", surface.id);
        }
        log::debug!("Registered interactive surface '{}'", surface.id);
        self.surfaces.push(surface);
        Ok(())
    }

    pub fn get(&self, id: &SurfaceId) -> Option<&InteractiveSurface> {
        self.surfaces.iter().find(|surface| &surface.id == id)
    }

    pub fn remove(&mut self, id: &SurfaceId) -> Option<InteractiveSurface> {
        let index = self.surfaces.iter().position(|surface| &surface.id == id)?;
        Some(self.surfaces.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractiveSurface> {
        self.surfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Highlight {
    #[default]
    None,
    Highlighted(SurfaceId),
}

impl Highlight {
    pub fn id(&self) -> Option<&SurfaceId> {
        match self {
            Highlight::None => None,
            Highlight::Highlighted(id) => Some(id),
        }
    }

    pub fn is(&self, id: &SurfaceId) -> bool {
        self.id() == Some(id)
    }
}

/// What a click selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub id: SurfaceId,
    pub label: String,
    pub link: Option<String>,
}

#[derive(Debug)]
pub struct InteractionResolver {
    pointer: Option<Vector2<f32>>,
    highlight: Highlight,
    description_visible: bool,
    rng: StdRng,
}

impl Default for InteractionResolver {
    fn default() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl InteractionResolver {
    /// `rng` drives the scanline noise of regenerated menu textures.
    pub fn new(rng: StdRng) -> Self {
        Self {
            pointer: None,
            highlight: Highlight::None,
            description_visible: false,
            rng,
        }
    }

    pub fn pointer(&self) -> Option<Vector2<f32>> {
        self.pointer
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn is_description_visible(&self) -> bool {
        self.description_visible
    }

    /// Updates the highlight for a pointer at `ndc`. Returns whether the
    /// highlighted surface changed.
    pub fn on_pointer_move<S, E>(
        &mut self,
        ndc: Vector2<f32>,
        rays: &S,
        registry: &SurfaceRegistry,
        effects: &mut E,
    ) -> bool
    where
        S: RaySource + ?Sized,
        E: MenuEffects + ?Sized,
    {
        self.pointer = Some(ndc);
        self.drop_stale(registry);

        let ray = rays.ray_through(ndc);
        match closest_hit(&ray, registry.iter()) {
            Some(hit) => self.highlight_surface(hit.surface, registry, effects),
            None => self.clear(registry, effects),
        }
    }

    /// Highlights the surface `id` without a pointer event, the way a hover
    /// would. Returns whether the highlighted surface changed.
    pub fn highlight_id<E>(
        &mut self,
        id: &SurfaceId,
        registry: &SurfaceRegistry,
        effects: &mut E,
    ) -> anyhow::Result<bool>
    where
        E: MenuEffects + ?Sized,
    {
        self.drop_stale(registry);
        let Some(surface) = registry.get(id) else {
            bail!("no interactive surface '{}'", id);
        };
        Ok(self.highlight_surface(surface, registry, effects))
    }

    /// Selects whatever is under the last known pointer position.
    pub fn on_click<S, E>(
        &mut self,
        rays: &S,
        registry: &SurfaceRegistry,
        effects: &mut E,
    ) -> Option<Selection>
    where
        S: RaySource + ?Sized,
        E: MenuEffects + ?Sized,
    {
        let pointer = self.pointer?;
        let ray = rays.ray_through(pointer);
        let surface = closest_hit(&ray, registry.iter())?.surface;

        log::info!("Selected menu item: {}", surface.id);
        effects.play_tone(&SELECT_TONE);
        if let Some(link) = &surface.link {
            effects.navigate(link);
        }
        Some(Selection {
            id: surface.id.clone(),
            label: surface.label.clone(),
            link: surface.link.clone(),
        })
    }

    /// Clears the highlight and hides the description without a pointer
    /// event, e.g. when a TV is removed. Returns whether anything was
    /// highlighted.
    pub fn reset<E>(&mut self, registry: &SurfaceRegistry, effects: &mut E) -> bool
    where
        E: MenuEffects + ?Sized,
    {
        self.clear(registry, effects)
    }

    fn highlight_surface<E>(
        &mut self,
        surface: &InteractiveSurface,
        registry: &SurfaceRegistry,
        effects: &mut E,
    ) -> bool
    where
        E: MenuEffects + ?Sized,
    {
        if self.highlight.is(&surface.id) {
            return false;
        }
        self.unhighlight(registry);
        surface
            .texture
            .borrow_mut()
            .replace(menu_item_texture(&mut self.rng, &surface.label, true));
        self.highlight = Highlight::Highlighted(surface.id.clone());
        effects.describe(Some(&surface.label));
        self.description_visible = true;
        true
    }

    fn clear<E>(&mut self, registry: &SurfaceRegistry, effects: &mut E) -> bool
    where
        E: MenuEffects + ?Sized,
    {
        let changed = self.unhighlight(registry);
        if self.description_visible {
            effects.describe(None);
            self.description_visible = false;
        }
        changed
    }

    fn unhighlight(&mut self, registry: &SurfaceRegistry) -> bool {
        let Highlight::Highlighted(id) = std::mem::take(&mut self.highlight) else {
            return false;
        };
        if let Some(surface) = registry.get(&id) {
            surface
                .texture
                .borrow_mut()
                .replace(menu_item_texture(&mut self.rng, &surface.label, false));
        }
        true
    }

    fn drop_stale(&mut self, registry: &SurfaceRegistry) {
        if let Highlight::Highlighted(id) = &self.highlight {
            if registry.get(id).is_none() {
                log::debug!("Dropping highlight of removed surface '{}'", id);
                self.highlight = Highlight::None;
            }
        }
    }
}

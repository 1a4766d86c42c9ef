//! crt-menu
//!
//! A CRT-television themed 3D menu scene for native windows and the browser.
//! A dark room holds several CRT sets whose screens show procedurally drawn
//! textures (static noise, a logo, a mission readout, the menu itself). Menu
//! rows highlight under the pointer and navigate on click; the frame is
//! finished by a bloom, film grain and tone mapping pass.
//!
//! High-level modules
//! - `procedural`: CPU raster synthesis for every screen and wall texture
//! - `interaction`: surface registry and the pointer highlight/click resolver
//! - `animation`: periodic texture tasks bound to RAII handles
//! - `scene`: screens, TVs, the room, lights and the menu flow
//! - `config`: the validated `scene.json` model and its defaults
//! - `camera`: camera, projection, pointer rays and the intro/sway rig
//! - `effects`: navigation, sound and description overlay per platform
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: instances, unit meshes, rasters, textures, surfaces
//! - `flow`: high level flow control and the winit event loop
//! - `pick`: ray against rectangle intersection
//! - `pipelines`: scene, transparent and post-processing pipelines
//! - `resources`: asset loading from disk or over HTTP
//! - `render`: render composition and GPU batching of scene props
//!

pub mod animation;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod effects;
pub mod flow;
pub mod interaction;
pub mod pick;
pub mod pipelines;
pub mod procedural;
pub mod render;
pub mod resources;
pub mod scene;

pub use config::SceneConfig;
pub use scene::menu::{MenuFlow, MenuScene};

/// Runs the menu scene until its window is closed.
pub fn run() -> anyhow::Result<()> {
    flow::run::<()>(vec![scene::menu::menu_flow()])
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run().map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{:#}", e)))
}

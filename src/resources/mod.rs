//! Loading external files: `scene.json`, wall images and custom screen images.
//!
//! Natively files are read from `./assets/`; on the web they are fetched
//! relative to the page origin.

use anyhow::Context as _;

pub mod texture;

pub use texture::{load_raster, material_layout};

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("no page origin: {:?}", e))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.error_for_status()?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    };

    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    };

    Ok(data)
}

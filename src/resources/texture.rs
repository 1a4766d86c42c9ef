use anyhow::Context as _;

use crate::{data_structures::raster::RasterTexture, resources::load_binary};

/// Bind group layout of a [`Material`](crate::data_structures::model::Material):
/// colour map and its sampler.
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
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
        label: Some("material_bind_group_layout"),
    })
}

/// Decodes a PNG or JPEG asset into a raster.
pub async fn load_raster(file_name: &str) -> anyhow::Result<RasterTexture> {
    let data = load_binary(file_name).await?;
    decode_raster(&data).with_context(|| format!("decoding {}", file_name))
}

pub fn decode_raster(bytes: &[u8]) -> anyhow::Result<RasterTexture> {
    let image = image::load_from_memory(bytes)?;
    Ok(RasterTexture::from_image(image.to_rgba8()))
}

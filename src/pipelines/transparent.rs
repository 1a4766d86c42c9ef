use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::{mk_render_pipeline, scene_shader},
};

/// Alpha-blended variant of the scene pipeline for glass and menu rows.
///
/// Same shader and layout as the opaque pipeline; only the blend state
/// differs. Transparent batches are drawn after every opaque one.
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
) -> wgpu::RenderPipeline {
    mk_render_pipeline(
        device,
        layout,
        Texture::HDR_FORMAT,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        scene_shader(),
    )
}

use winit::dpi::PhysicalSize;

use crate::{
    config::RenderConfig,
    rendering::global_uniform::{GlobalUniform, GlobalUniformState},
};

/// Resources every pass binds or targets.
pub struct RenderCommon {
    pub surface_format: wgpu::TextureFormat,
    pub camera_uniform_buffer: wgpu::Buffer,
    pub global_uniform: GlobalUniform,
}

impl RenderCommon {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        config: &RenderConfig,
        size: PhysicalSize<u32>,
        camera_uniform_buffer: wgpu::Buffer,
    ) -> Self {
        let global_uniform =
            GlobalUniform::new(device, GlobalUniformState::new(config, size, 0.0));

        Self {
            surface_format,
            camera_uniform_buffer,
            global_uniform,
        }
    }
}

/// Prefers an sRGB format so linear shader output is encoded on write.
pub fn surface_configuration(
    surface: &wgpu::Surface,
    adapter: &wgpu::Adapter,
    size: PhysicalSize<u32>,
    vsync: bool,
) -> anyhow::Result<wgpu::SurfaceConfiguration> {
    let surface_caps = surface.get_capabilities(adapter);

    let format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first())
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

    let alpha_mode = surface_caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        },
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

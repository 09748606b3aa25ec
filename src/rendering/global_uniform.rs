use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::config::RenderConfig;

/// Per-frame values shared by every pass: the lights, the page backdrop and
/// the output resolution.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalUniformState {
    /// Linear RGB, intensity in w.
    pub ambient: [f32; 4],
    /// Unit vector pointing towards the light, intensity in w.
    pub sun_direction: [f32; 4],
    pub background: [f32; 4],
    pub resolution: [f32; 2],
    pub now: f32,
    _padding: f32,
}

impl GlobalUniformState {
    pub fn new(config: &RenderConfig, resolution: PhysicalSize<u32>, now: f32) -> Self {
        let sun = Vec3::from(config.sun_position).normalize_or(Vec3::Y);

        Self {
            ambient: [1.0, 1.0, 1.0, config.ambient_intensity],
            sun_direction: sun.extend(config.sun_intensity).to_array(),
            background: config.background().to_linear().extend(1.0).to_array(),
            resolution: [resolution.width as f32, resolution.height as f32],
            now,
            _padding: 0.0,
        }
    }
}

pub struct GlobalUniform {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl GlobalUniform {
    pub fn new(device: &wgpu::Device, initial_state: GlobalUniformState) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global uniform buffer"),
            contents: bytemuck::cast_slice(&[initial_state]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global uniform bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, state: GlobalUniformState) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[state]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn uniform_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUniformState>() % 16, 0);
    }

    #[test]
    fn sun_points_from_its_position() {
        let state =
            GlobalUniformState::new(&RenderConfig::default(), PhysicalSize::new(800, 600), 0.0);
        let component = 1.0 / 3.0_f32.sqrt();

        assert_relative_eq!(state.sun_direction[0], component, epsilon = 1e-6);
        assert_relative_eq!(state.sun_direction[1], component, epsilon = 1e-6);
        assert_eq!(state.sun_direction[3], 1.0);
        assert_eq!(state.ambient[3], 0.6);
        assert_eq!(state.resolution, [800.0, 600.0]);
    }
}

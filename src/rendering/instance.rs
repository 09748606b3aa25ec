use std::mem::size_of;

use glam::{Mat4, Vec4};
use id_arena::Arena;
use wgpu::BufferUsages;

use crate::{
    material_manager::{MaterialData, MaterialManager},
    rendering::render_model::RenderModel,
    scene_graph::{scene::Drawable, Scene},
};

/// Per-instance vertex data: transforms plus the flat material parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub model: Mat4,
    pub normal: Mat4,
    /// Linear base color with metalness in w.
    pub color_metalness: Vec4,
    /// Roughness in x, rest unused.
    pub params: Vec4,
}

impl Instance {
    pub fn new(drawable: &Drawable, material: &MaterialData) -> Self {
        Self {
            model: drawable.world_matrix,
            normal: drawable.normal_matrix,
            color_metalness: material.color.to_linear().extend(material.metalness),
            params: Vec4::new(material.roughness, 0.0, 0.0, 0.0),
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 10] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
        10 => Float32x4,
        11 => Float32x4,
    ];

    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub struct Instances {
    instances: Vec<Instance>,
}

impl Instances {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    pub fn add(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Uploads as many instances as fit and returns how many that was.
    pub fn write_to_buffer(&self, queue: &wgpu::Queue, instance_buffer: &InstanceBuffer) -> u32 {
        let count = self.instances.len().min(InstanceBuffer::MAX_INSTANCES);
        queue.write_buffer(
            instance_buffer.buffer(),
            0,
            bytemuck::cast_slice(&self.instances[..count]),
        );
        count as u32
    }

    pub fn should_render(&self) -> bool {
        !self.instances.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }
}

pub struct InstanceBuffer(wgpu::Buffer);

impl InstanceBuffer {
    pub const MAX_INSTANCES: usize = 128;

    pub fn new(device: &wgpu::Device, name: &str) -> Self {
        let label = format!("Instance buffer ({})", name);

        Self(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&label),
            size: (size_of::<Instance>() * Self::MAX_INSTANCES) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }))
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.0
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(1, self.buffer().slice(..));
    }
}

/// Rebuilds every render model's instance list from the scene's drawables.
pub fn gather_instances(
    scene: &Scene,
    materials: &MaterialManager,
    render_models: &mut Arena<RenderModel>,
) {
    for (_, render_model) in render_models.iter_mut() {
        render_model.instances.clear();
    }

    for drawable in scene.drawables() {
        let Some(render_model) = scene
            .get_model(drawable.model_id)
            .and_then(|model| model.render_model)
            .and_then(|id| render_models.get_mut(id))
        else {
            continue;
        };

        let Some(material) = materials.get(drawable.material_id) else {
            continue;
        };

        render_model.instances.add(Instance::new(&drawable, material));
    }

    for (_, render_model) in render_models.iter() {
        if render_model.instances.len() > InstanceBuffer::MAX_INSTANCES {
            log::warn!(
                "{} has {} instances, only {} are drawn",
                render_model.name,
                render_model.instances.len(),
                InstanceBuffer::MAX_INSTANCES
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chair::{build_chair, DEFAULT_UPHOLSTERY},
        color::Color,
    };

    #[test]
    fn instance_layout_matches_attributes() {
        assert_eq!(size_of::<Instance>(), 16 * 4 * 2 + 16 * 2);
        assert_eq!(Instance::ATTRIBUTES.len() * 16, size_of::<Instance>());
    }

    #[test]
    fn instances_carry_current_material_color() {
        let mut scene = Scene::new();
        let mut materials = MaterialManager::new();
        let chair = build_chair(&mut scene, &mut materials, DEFAULT_UPHOLSTERY);

        let blue = Color::from_hex(0x2575fc);
        for slot in chair.upholstery() {
            materials.set_color(slot, blue);
        }

        let seat = scene.get_object_by_name("Seat").unwrap();
        let seat_material = scene.get_object(seat).unwrap().material_id.unwrap();

        scene.late_update();
        let instance = scene
            .drawables()
            .find(|drawable| drawable.material_id == seat_material)
            .map(|drawable| Instance::new(&drawable, materials.get(seat_material).unwrap()))
            .unwrap();

        assert_eq!(instance.color_metalness.truncate(), blue.to_linear());
    }
}

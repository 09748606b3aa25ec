use id_arena::{Arena, Id};

use crate::color::Color;

#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
}

impl MaterialData {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            metalness: 0.0,
            roughness: 1.0,
        }
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }
}

pub type MaterialId = Id<MaterialData>;

/// Owns every material in the scene. Objects refer to materials by id, so a
/// write through one id is seen by every object sharing it.
pub struct MaterialManager {
    materials: Arena<MaterialData>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: Arena::new(),
        }
    }

    pub fn add_material(&mut self, material_data: MaterialData) -> MaterialId {
        self.materials.alloc(material_data)
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialData> {
        self.materials.get(id)
    }

    pub fn color(&self, id: MaterialId) -> Option<Color> {
        self.get(id).map(|material| material.color)
    }

    pub fn set_color(&mut self, id: MaterialId, color: Color) {
        match self.materials.get_mut(id) {
            Some(material) => material.color = color,
            None => log::warn!("set_color on unknown material {}", id.index()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_color_only_touches_addressed_material() {
        let mut manager = MaterialManager::new();
        let seat = manager.add_material(MaterialData::new("seat", Color::from_hex(0x6a11cb)));
        let frame = manager.add_material(
            MaterialData::new("frame", Color::from_hex(0x333333))
                .with_metalness(0.8)
                .with_roughness(0.2),
        );

        manager.set_color(seat, Color::from_hex(0x2575fc));

        assert_eq!(manager.color(seat), Some(Color::from_hex(0x2575fc)));
        assert_eq!(manager.color(frame), Some(Color::from_hex(0x333333)));
        assert_eq!(manager.get(frame).unwrap().metalness, 0.8);
    }
}

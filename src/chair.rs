//! Procedural office chair: a group node with seven primitive meshes.

use glam::Vec3;

use crate::{
    color::Color,
    material_manager::{MaterialData, MaterialId, MaterialManager},
    model::Model,
    scene_graph::{Object3D, ObjectId, Scene, SceneModel},
};

pub const DEFAULT_UPHOLSTERY: Color = Color::from_hex(0x6a11cb);

/// Handles the rest of the showcase needs after construction.
#[derive(Debug, Clone, Copy)]
pub struct ChairHandles {
    pub group: ObjectId,
    pub seat_material: MaterialId,
    pub backrest_material: MaterialId,
}

impl ChairHandles {
    /// The two material slots the customizer recolors.
    pub fn upholstery(&self) -> [MaterialId; 2] {
        [self.seat_material, self.backrest_material]
    }
}

pub fn build_chair(
    scene: &mut Scene,
    materials: &mut MaterialManager,
    upholstery: Color,
) -> ChairHandles {
    let frame_material = materials.add_material(
        MaterialData::new("Frame", Color::from_hex(0x333333))
            .with_metalness(0.8)
            .with_roughness(0.2),
    );
    let seat_material = materials
        .add_material(MaterialData::new("Seat", upholstery).with_roughness(0.4));
    let backrest_material = materials
        .add_material(MaterialData::new("Backrest", upholstery).with_roughness(0.4));
    let armrest_material = materials.add_material(
        MaterialData::new("Armrest", Color::from_hex(0x222222))
            .with_metalness(0.7)
            .with_roughness(0.3),
    );

    let group = scene.add_object(Object3D::group("Chair"));

    add_part(
        scene,
        group,
        Model::cylinder("Base", 0.8, 1.0, 0.2, 32),
        frame_material,
        &[("Base", Vec3::ZERO)],
    );
    add_part(
        scene,
        group,
        Model::cylinder("Pillar", 0.15, 0.2, 1.5, 16),
        frame_material,
        &[("Pillar", Vec3::new(0.0, 0.9, 0.0))],
    );
    add_part(
        scene,
        group,
        Model::cuboid("Seat", 1.8, 0.2, 1.5),
        seat_material,
        &[("Seat", Vec3::new(0.0, 1.7, 0.0))],
    );
    add_part(
        scene,
        group,
        Model::cuboid("Backrest", 1.6, 1.2, 0.15),
        backrest_material,
        &[("Backrest", Vec3::new(0.0, 2.5, -0.6))],
    );
    add_part(
        scene,
        group,
        Model::cuboid("Headrest", 0.8, 0.3, 0.1),
        backrest_material,
        &[("Headrest", Vec3::new(0.0, 3.1, -0.6))],
    );
    add_part(
        scene,
        group,
        Model::cuboid("Armrest", 0.15, 0.3, 1.0),
        armrest_material,
        &[
            ("Armrest Left", Vec3::new(-0.9, 1.9, 0.0)),
            ("Armrest Right", Vec3::new(0.9, 1.9, 0.0)),
        ],
    );

    log::debug!(
        "Built chair with {} parts and {} models",
        scene.objects.len() - 1,
        scene.models.len()
    );

    ChairHandles {
        group,
        seat_material,
        backrest_material,
    }
}

fn add_part(
    scene: &mut Scene,
    group: ObjectId,
    model: Model,
    material: MaterialId,
    parts: &[(&str, Vec3)],
) {
    let model_id = scene.add_model(SceneModel::new(model));
    for &(name, translation) in parts {
        scene.add_child(group, Object3D::mesh(name, model_id, material, translation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material_of(scene: &Scene, name: &str) -> MaterialId {
        let id = scene.get_object_by_name(name).unwrap();
        scene.get_object(id).unwrap().material_id.unwrap()
    }

    #[test]
    fn all_parts_hang_off_the_group() {
        let mut scene = Scene::new();
        let mut materials = MaterialManager::new();
        let chair = build_chair(&mut scene, &mut materials, DEFAULT_UPHOLSTERY);

        let group = scene.get_object(chair.group).unwrap();
        let names: Vec<_> = group.children(&scene).map(|o| o.name.as_str()).collect();

        assert_eq!(
            names,
            [
                "Base",
                "Pillar",
                "Seat",
                "Backrest",
                "Headrest",
                "Armrest Left",
                "Armrest Right"
            ]
        );
        assert!(group.model_id.is_none());
    }

    #[test]
    fn armrests_share_one_model() {
        let mut scene = Scene::new();
        let mut materials = MaterialManager::new();
        build_chair(&mut scene, &mut materials, DEFAULT_UPHOLSTERY);

        let model_of = |name| {
            let id = scene.get_object_by_name(name).unwrap();
            scene.get_object(id).unwrap().model_id.unwrap()
        };

        assert_eq!(model_of("Armrest Left"), model_of("Armrest Right"));
        assert_eq!(scene.models.len(), 6);
        assert_eq!(
            scene.get_model(model_of("Pillar")).map(SceneModel::name),
            Some("Pillar")
        );
    }

    #[test]
    fn upholstery_slots_are_shared_by_reference() {
        let mut scene = Scene::new();
        let mut materials = MaterialManager::new();
        let chair = build_chair(&mut scene, &mut materials, DEFAULT_UPHOLSTERY);

        assert_eq!(material_of(&scene, "Seat"), chair.seat_material);
        assert_eq!(material_of(&scene, "Backrest"), chair.backrest_material);
        assert_eq!(material_of(&scene, "Headrest"), chair.backrest_material);
        assert_eq!(material_of(&scene, "Base"), material_of(&scene, "Pillar"));

        for frame_part in ["Base", "Pillar", "Armrest Left", "Armrest Right"] {
            assert!(!chair.upholstery().contains(&material_of(&scene, frame_part)));
        }
    }

    #[test]
    fn parts_sit_at_fixed_offsets() {
        let mut scene = Scene::new();
        let mut materials = MaterialManager::new();
        build_chair(&mut scene, &mut materials, DEFAULT_UPHOLSTERY);
        scene.late_update();

        let position = |name| {
            let id = scene.get_object_by_name(name).unwrap();
            scene.get_object_transform(id).unwrap().translation()
        };

        assert_eq!(position("Seat"), Vec3::new(0.0, 1.7, 0.0));
        assert_eq!(position("Headrest"), Vec3::new(0.0, 3.1, -0.6));
        assert_eq!(position("Armrest Left"), Vec3::new(-0.9, 1.9, 0.0));
        assert_eq!(scene.drawables().count(), 7);
    }
}

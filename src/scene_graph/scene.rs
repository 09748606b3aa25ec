use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;

use crate::material_manager::MaterialId;
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
}

/// A mesh node ready to be drawn, with its world matrices resolved.
pub struct Drawable {
    pub model_id: SceneModelId,
    pub material_id: MaterialId,
    pub world_matrix: Mat4,
    pub normal_matrix: Mat4,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    /// Adds an object and attaches it to `parent` in one step.
    pub fn add_child(&mut self, parent: ObjectId, object: Object3D) -> ObjectId {
        let object_id = self.add_object(object);
        self.set_object_parent(object_id, Some(parent));
        object_id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn add_model(&mut self, model: SceneModel) -> SceneModelId {
        self.models.alloc(model)
    }

    pub fn get_model(&self, id: SceneModelId) -> Option<&SceneModel> {
        self.models.get(id)
    }

    /// Updates all object transforms in hierarchical order
    fn update_transforms(&self) {
        let root_objects = self
            .objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id);

        for root_id in root_objects {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY);
        }
    }

    fn update_object_transform_recursive(&self, object_id: ObjectId, parent_world_matrix: Mat4) {
        if let Some(object) = self.objects.get(object_id) {
            if object.transform.is_world_dirty() {
                let local_matrix = *object.transform.get_local_matrix();
                object
                    .transform
                    .set_world_matrix(parent_world_matrix * local_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix);
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|c| c.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
        }

        if let Some(new_parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
            new_parent.child_ids.push(child_id);
        }

        self.invalidate_object_hierarchy(child_id);
    }

    pub fn set_object_transform(
        &mut self,
        object_id: ObjectId,
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_transform(translation, rotation, scale);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }

    /// Mesh nodes with their current world matrices. Valid after `late_update`.
    pub fn drawables(&self) -> impl Iterator<Item = Drawable> + '_ {
        self.objects.iter().filter_map(|(_, object)| {
            Some(Drawable {
                model_id: object.model_id?,
                material_id: object.material_id?,
                world_matrix: *object.transform.get_world_matrix(),
                normal_matrix: *object.transform.get_inverse_transpose_world_matrix(),
            })
        })
    }

    pub fn early_update(&mut self) {
        for (_, object) in self.objects.iter() {
            object.transform.reset_flags();
        }
    }

    pub fn late_update(&mut self) {
        self.update_transforms();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn children_inherit_parent_transform() {
        let mut scene = Scene::new();
        let group = scene.add_object(Object3D::group("group"));
        let mut child = Object3D::group("child");
        child.transform.set_translation(Vec3::new(0.0, 1.7, 0.0));
        let child = scene.add_child(group, child);

        scene.set_object_transform(
            group,
            Vec3::new(0.0, 0.5, 0.0),
            Quat::IDENTITY,
            Vec3::splat(2.0),
        );
        scene.late_update();

        let world = *scene.get_object_transform(child).unwrap().get_world_matrix();
        let origin = world.transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin.y, 0.5 + 1.7 * 2.0, epsilon = 1e-5);
    }

    #[test]
    fn moving_the_group_refreshes_descendants() {
        let mut scene = Scene::new();
        let group = scene.add_object(Object3D::group("group"));
        let child = scene.add_child(group, Object3D::group("child"));
        scene.late_update();

        scene.early_update();
        assert!(!scene.get_object_transform(child).unwrap().has_changed());

        scene.set_object_transform(
            group,
            Vec3::X,
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::ONE,
        );
        scene.late_update();

        let transform = scene.get_object_transform(child).unwrap();
        assert!(transform.has_changed());
        assert_relative_eq!(
            transform.get_world_matrix().transform_point3(Vec3::ZERO).x,
            1.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn reparenting_moves_child_between_lists() {
        let mut scene = Scene::new();
        let a = scene.add_object(Object3D::group("a"));
        let b = scene.add_object(Object3D::group("b"));
        let child = scene.add_child(a, Object3D::group("child"));

        scene.set_object_parent(child, Some(b));

        assert!(scene.get_object(a).unwrap().child_ids.is_empty());
        assert_eq!(scene.get_object(b).unwrap().child_ids, vec![child]);
        assert_eq!(
            scene.get_object(child).unwrap().parent(&scene).unwrap().name,
            "b"
        );
        assert_eq!(scene.get_object_by_name("child"), Some(child));
    }
}

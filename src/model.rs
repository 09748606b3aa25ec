use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use itertools::Itertools;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Indexed triangle mesh, counter-clockwise winding when seen from outside.
pub struct Model {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Model {
    fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Axis-aligned box centered on the origin.
    pub fn cuboid(name: impl Into<String>, width: f32, height: f32, depth: f32) -> Self {
        let mut model = Self::empty(name);
        let half = Vec3::new(width, height, depth) * 0.5;

        // (normal, u, v) with u x v == normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        for (normal, u, v) in faces {
            let base = model.vertices.len() as u32;
            let center = normal * half;
            let u = u * half;
            let v = v * half;

            for corner in [-u - v, u - v, u + v, -u + v] {
                model.vertices.push(Vertex {
                    position: center + corner,
                    normal,
                });
            }

            model
                .indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        model
    }

    /// Capped, possibly tapered cylinder along the Y axis, centered on the origin.
    pub fn cylinder(
        name: impl Into<String>,
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> Self {
        let mut model = Self::empty(name);
        let segments = radial_segments.max(3);
        let half_height = height * 0.5;
        let slope = (radius_bottom - radius_top) / height;

        let angle = |i: u32| i as f32 / segments as f32 * TAU;

        // Side wall: a top and a bottom ring, with a duplicated seam column
        for i in 0..=segments {
            let (sin, cos) = angle(i).sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize();

            model.vertices.push(Vertex {
                position: Vec3::new(radius_top * sin, half_height, radius_top * cos),
                normal,
            });
            model.vertices.push(Vertex {
                position: Vec3::new(radius_bottom * sin, -half_height, radius_bottom * cos),
                normal,
            });
        }

        for i in 0..segments {
            let top = i * 2;
            let bottom = top + 1;
            let next_top = top + 2;
            let next_bottom = top + 3;

            model
                .indices
                .extend([top, bottom, next_top, bottom, next_bottom, next_top]);
        }

        model.push_cap(radius_top, half_height, segments, true);
        model.push_cap(radius_bottom, -half_height, segments, false);

        model
    }

    fn push_cap(&mut self, radius: f32, y: f32, segments: u32, top: bool) {
        let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
        let center = self.vertices.len() as u32;

        self.vertices.push(Vertex {
            position: Vec3::new(0.0, y, 0.0),
            normal,
        });

        for i in 0..=segments {
            let (sin, cos) = (i as f32 / segments as f32 * TAU).sin_cos();
            self.vertices.push(Vertex {
                position: Vec3::new(radius * sin, y, radius * cos),
                normal,
            });
        }

        for (a, b) in (center + 1..=center + 1 + segments).tuple_windows() {
            if top {
                self.indices.extend([center, a, b]);
            } else {
                self.indices.extend([center, b, a]);
            }
        }
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), vertex| (min.min(vertex.position), max.max(vertex.position)),
        )
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn face_normal(model: &Model, triangle: &[u32]) -> Vec3 {
        let a = model.vertices[triangle[0] as usize].position;
        let b = model.vertices[triangle[1] as usize].position;
        let c = model.vertices[triangle[2] as usize].position;
        (b - a).cross(c - a)
    }

    #[test]
    fn cuboid_has_expected_extents() {
        let model = Model::cuboid("seat", 1.8, 0.2, 1.5);
        let (min, max) = model.bounds();

        assert_eq!(model.vertices.len(), 24);
        assert_eq!(model.triangle_count(), 12);
        assert_relative_eq!(max.x - min.x, 1.8, epsilon = 1e-6);
        assert_relative_eq!(max.y - min.y, 0.2, epsilon = 1e-6);
        assert_relative_eq!(max.z - min.z, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn cuboid_winding_faces_outwards() {
        let model = Model::cuboid("box", 1.0, 2.0, 3.0);

        for triangle in model.indices.chunks(3) {
            let normal = model.vertices[triangle[0] as usize].normal;
            assert!(face_normal(&model, triangle).dot(normal) > 0.0);
        }
    }

    #[test]
    fn cylinder_tapers_between_radii() {
        let model = Model::cylinder("base", 0.8, 1.0, 0.2, 32);
        let (min, max) = model.bounds();

        assert_relative_eq!(max.y, 0.1, epsilon = 1e-6);
        assert_relative_eq!(min.y, -0.1, epsilon = 1e-6);
        assert_relative_eq!(max.z, 1.0, epsilon = 1e-5);

        let top_radius = model
            .vertices
            .iter()
            .filter(|v| v.position.y > 0.0)
            .map(|v| Vec2::new(v.position.x, v.position.z).length())
            .fold(0.0_f32, f32::max);
        assert!(top_radius <= 0.8 + 1e-5);

        // Side wall, then both caps
        assert_eq!(model.triangle_count(), 32 * 2 + 32 * 2);
    }

    #[test]
    fn cylinder_winding_faces_outwards() {
        let model = Model::cylinder("pillar", 0.15, 0.2, 1.5, 16);

        for triangle in model.indices.chunks(3) {
            let centroid = triangle
                .iter()
                .map(|&i| model.vertices[i as usize].position)
                .sum::<Vec3>()
                / 3.0;
            assert!(face_normal(&model, triangle).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn cylinder_clamps_segment_count() {
        let model = Model::cylinder("degenerate", 1.0, 1.0, 1.0, 0);
        assert_eq!(model.triangle_count(), 3 * 4);
    }
}

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::types::Material;

/// Local approximation of a contact surface used to mirror velocities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
    pub friction: f32,
    pub restitution: f32,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3, material: &Material) -> Self {
        Self {
            point,
            normal: normal.normalize_or(Vec3::Z),
            friction: material.friction,
            restitution: material.restitution,
        }
    }

    /// Combines several contact planes into one.
    ///
    /// Normals are summed and renormalized, points and coefficients averaged.
    /// Opposing normals that cancel out fall back to the first plane's normal.
    pub fn average(planes: &[Plane]) -> Option<Plane> {
        let first = planes.first()?;
        if planes.len() == 1 {
            return Some(*first);
        }

        let count = planes.len() as f32;
        let mut point = Vec3::ZERO;
        let mut normal = Vec3::ZERO;
        let mut friction = 0.0;
        let mut restitution = 0.0;
        for plane in planes {
            point += plane.point;
            normal += plane.normal;
            friction += plane.friction;
            restitution += plane.restitution;
        }

        Some(Plane {
            point: point / count,
            normal: normal.normalize_or(first.normal),
            friction: friction / count,
            restitution: restitution / count,
        })
    }

    /// Splits a vector into its normal and tangential parts.
    pub fn decompose(&self, v: Vec3) -> (Vec3, Vec3) {
        let normal_part = self.normal * v.dot(self.normal);
        (normal_part, v - normal_part)
    }

    /// Mirrors `v` about the plane, scaling the normal part by `restitution`
    /// and the tangential part by `tangent_scale`. Vectors already leaving the
    /// plane are returned unchanged.
    pub fn reflect(&self, v: Vec3, restitution: f32, tangent_scale: f32) -> Vec3 {
        if v.dot(self.normal) >= 0.0 {
            return v;
        }
        let (normal_part, tangent_part) = self.decompose(v);
        tangent_part * tangent_scale - normal_part * restitution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn floor_plane() -> Plane {
        Plane::new(Vec3::ZERO, Vec3::Z, &Material::default())
    }

    #[test]
    fn reflect_scales_normal_component() {
        let v = floor_plane().reflect(Vec3::new(1.0, 0.0, -10.0), 0.5, 1.0);
        assert_abs_diff_eq!(v.z, 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(v.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn reflect_leaves_separating_velocity() {
        let v = Vec3::new(0.0, 0.0, 3.0);
        assert_eq!(floor_plane().reflect(v, 0.5, 0.0), v);
    }

    #[test]
    fn average_of_corner_planes_bisects() {
        let material = Material::default();
        let a = Plane::new(Vec3::ZERO, Vec3::X, &material);
        let b = Plane::new(Vec3::ZERO, Vec3::Y, &material);
        let combined = Plane::average(&[a, b]).expect("two planes");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_abs_diff_eq!(combined.normal.x, expected.x, epsilon = 1e-6);
        assert_abs_diff_eq!(combined.normal.y, expected.y, epsilon = 1e-6);
        assert!(Plane::average(&[]).is_none());
    }
}

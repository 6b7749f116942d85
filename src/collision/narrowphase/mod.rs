//! Narrow phase: exact per-pair geometry for the supported shape pairs.
//!
//! The moving side is always a sphere or a cylinder and the target a box or a
//! cylinder. Intersection and distance are symmetric, so the reversed pairs
//! are answered by swapping the operands and flipping the separation.

pub mod cylinder_box;
pub mod cylinder_cylinder;
pub mod sphere_box;
pub mod sphere_cylinder;

use glam::Vec3;

use crate::core::{
    aabb::Aabb,
    shapes::{Cylinder, Shape, Sphere},
    types::ShapeKind,
};
use crate::utils::math::EPSILON;

/// A (mover, target) shape pair with a dedicated algorithm.
#[derive(Debug, Clone, Copy)]
pub enum ShapePair<'a> {
    SphereBox(&'a Sphere, &'a Aabb),
    SphereCylinder(&'a Sphere, &'a Cylinder),
    CylinderBox(&'a Cylinder, &'a Aabb),
    CylinderCylinder(&'a Cylinder, &'a Cylinder),
}

/// Whether a mover of kind `mover` can be resolved against `target`.
pub fn is_supported(mover: ShapeKind, target: ShapeKind) -> bool {
    matches!(
        (mover, target),
        (ShapeKind::Sphere, ShapeKind::Box)
            | (ShapeKind::Sphere, ShapeKind::Cylinder)
            | (ShapeKind::Cylinder, ShapeKind::Box)
            | (ShapeKind::Cylinder, ShapeKind::Cylinder)
    )
}

impl<'a> ShapePair<'a> {
    /// Pairs the mover with the target, or `None` if no algorithm exists.
    pub fn classify(mover: &'a Shape, target: &'a Shape) -> Option<Self> {
        match (mover, target) {
            (Shape::Sphere(s), Shape::Box(b)) => Some(ShapePair::SphereBox(s, b)),
            (Shape::Sphere(s), Shape::Cylinder(c)) => Some(ShapePair::SphereCylinder(s, c)),
            (Shape::Cylinder(c), Shape::Box(b)) => Some(ShapePair::CylinderBox(c, b)),
            (Shape::Cylinder(a), Shape::Cylinder(b)) => Some(ShapePair::CylinderCylinder(a, b)),
            _ => None,
        }
    }

    /// Like [`ShapePair::classify`] but also accepts the reversed order.
    /// The flag is true when the operands were swapped.
    pub fn classify_either(a: &'a Shape, b: &'a Shape) -> Option<(Self, bool)> {
        Self::classify(a, b)
            .map(|pair| (pair, false))
            .or_else(|| Self::classify(b, a).map(|pair| (pair, true)))
    }

    /// Signed separation from the mover toward the target.
    pub fn separation(&self) -> Vec3 {
        match *self {
            ShapePair::SphereBox(s, b) => sphere_box::separation(s, b),
            ShapePair::SphereCylinder(s, c) => sphere_cylinder::separation(s, c),
            ShapePair::CylinderBox(c, b) => cylinder_box::separation(c, b),
            ShapePair::CylinderCylinder(a, b) => cylinder_cylinder::separation(a, b),
        }
    }

    pub fn intersects(&self) -> bool {
        match *self {
            ShapePair::SphereBox(s, b) => sphere_box::intersects(s, b),
            ShapePair::SphereCylinder(s, c) => sphere_cylinder::intersects(s, c),
            ShapePair::CylinderBox(c, b) => cylinder_box::intersects(c, b),
            ShapePair::CylinderCylinder(a, b) => cylinder_cylinder::intersects(a, b),
        }
    }

    pub fn distance(&self) -> f32 {
        match *self {
            ShapePair::SphereBox(s, b) => sphere_box::distance(s, b),
            ShapePair::SphereCylinder(s, c) => sphere_cylinder::distance(s, c),
            ShapePair::CylinderBox(c, b) => cylinder_box::distance(c, b),
            ShapePair::CylinderCylinder(a, b) => cylinder_cylinder::distance(a, b),
        }
    }

    /// Forward time until first contact when the mover travels at `velocity`.
    pub fn time_to_contact(&self, velocity: Vec3, separation: Vec3) -> Option<f32> {
        match *self {
            ShapePair::SphereBox(s, _) => sphere_box::time_to_contact(s, velocity, separation),
            ShapePair::SphereCylinder(s, c) => {
                sphere_cylinder::time_to_contact(s, c, velocity, separation)
            }
            ShapePair::CylinderBox(c, _) => cylinder_box::time_to_contact(c, velocity, separation),
            ShapePair::CylinderCylinder(a, b) => {
                cylinder_cylinder::time_to_contact(a, b, velocity, separation)
            }
        }
    }

    /// Whether the mover is settled on top of the target.
    pub fn rests_on(
        &self,
        separation: Vec3,
        velocity: Vec3,
        tolerance: f32,
        settle_speed: f32,
    ) -> bool {
        match *self {
            ShapePair::SphereBox(s, _) => {
                sphere_box::rests_on(s, separation, velocity, tolerance, settle_speed)
            }
            ShapePair::SphereCylinder(s, _) => {
                sphere_cylinder::rests_on(s, separation, velocity, tolerance, settle_speed)
            }
            ShapePair::CylinderBox(c, b) => {
                cylinder_box::rests_on(c, b, velocity, tolerance, settle_speed)
            }
            ShapePair::CylinderCylinder(a, b) => {
                cylinder_cylinder::rests_on(a, b, velocity, tolerance, settle_speed)
            }
        }
    }
}

/// Time for a signed vertical `gap` to close at vertical speed `vz`.
/// Zero when the extents already meet.
pub(crate) fn vertical_contact_time(gap: f32, vz: f32) -> Option<f32> {
    if gap.abs() <= EPSILON {
        return Some(0.0);
    }
    if vz * gap <= 0.0 {
        return None;
    }
    Some(gap / vz)
}

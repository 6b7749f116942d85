use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{aabb::Aabb, types::ShapeKind};
use crate::utils::math::{with_z, xy, EPSILON};

/// Smallest radius or height a shape may have.
pub const MIN_EXTENT: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn bounding_box(&self) -> Aabb {
        Aabb::new(
            self.center - Vec3::splat(self.radius),
            self.center + Vec3::splat(self.radius),
        )
    }

    pub fn surface_point(&self, point: Vec3) -> Vec3 {
        let direction = (point - self.center).normalize_or(Vec3::Z);
        self.center + direction * self.radius
    }
}

/// Upright cylinder; `center` is the middle of its axis and `height` the full
/// length of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    pub center: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl Cylinder {
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.center.z - self.half_height()
    }

    pub fn top(&self) -> f32 {
        self.center.z + self.half_height()
    }

    pub fn bounding_box(&self) -> Aabb {
        let extent = Vec3::new(self.radius, self.radius, self.half_height());
        Aabb::new(self.center - extent, self.center + extent)
    }

    /// Closest point of the solid cylinder; points inside map to themselves.
    pub fn clamp_point(&self, point: Vec3) -> Vec3 {
        let offset = xy(point - self.center);
        let horizontal = if offset.length() > self.radius {
            offset.normalize_or_zero() * self.radius
        } else {
            offset
        };
        with_z(
            xy(self.center) + horizontal,
            point.z.clamp(self.bottom(), self.top()),
        )
    }

    pub fn surface_point(&self, point: Vec3) -> Vec3 {
        let offset = xy(point - self.center);
        let radial = offset.length();
        let inside = radial <= self.radius && point.z >= self.bottom() && point.z <= self.top();
        if !inside {
            return self.clamp_point(point);
        }

        let to_side = self.radius - radial;
        let to_top = self.top() - point.z;
        let to_bottom = point.z - self.bottom();
        if to_side <= to_top && to_side <= to_bottom {
            let direction = if radial > EPSILON { offset / radial } else { Vec2::X };
            with_z(xy(self.center) + direction * self.radius, point.z)
        } else if to_top <= to_bottom {
            Vec3::new(point.x, point.y, self.top())
        } else {
            Vec3::new(point.x, point.y, self.bottom())
        }
    }
}

/// Closest point on the surface of a box, including for interior points.
pub fn box_surface_point(bounds: &Aabb, point: Vec3) -> Vec3 {
    if !bounds.contains_point(point) {
        return bounds.clamp_point(point);
    }

    let mut best = point;
    let mut best_distance = f32::INFINITY;
    for axis in 0..3 {
        let to_min = point[axis] - bounds.min[axis];
        let to_max = bounds.max[axis] - point[axis];
        if to_min < best_distance {
            best_distance = to_min;
            best = point;
            best[axis] = bounds.min[axis];
        }
        if to_max < best_distance {
            best_distance = to_max;
            best = point;
            best[axis] = bounds.max[axis];
        }
    }
    best
}

/// Geometry of a collidable object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere(Sphere),
    Box(Aabb),
    Cylinder(Cylinder),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::Box(_) => ShapeKind::Box,
            Shape::Cylinder(_) => ShapeKind::Cylinder,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Sphere(sphere) => sphere.bounding_box(),
            Shape::Box(bounds) => *bounds,
            Shape::Cylinder(cylinder) => cylinder.bounding_box(),
        }
    }

    /// Reference point that moves with the object.
    pub fn position(&self) -> Vec3 {
        match self {
            Shape::Sphere(sphere) => sphere.center,
            Shape::Box(bounds) => bounds.center(),
            Shape::Cylinder(cylinder) => cylinder.center,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        let delta = position - self.position();
        self.translate(delta);
    }

    pub fn translate(&mut self, delta: Vec3) {
        match self {
            Shape::Sphere(sphere) => sphere.center += delta,
            Shape::Box(bounds) => *bounds = bounds.translated(delta),
            Shape::Cylinder(cylinder) => cylinder.center += delta,
        }
    }

    /// Full vertical size of the shape.
    pub fn vertical_extent(&self) -> f32 {
        match self {
            Shape::Sphere(sphere) => sphere.radius * 2.0,
            Shape::Box(bounds) => bounds.max.z - bounds.min.z,
            Shape::Cylinder(cylinder) => cylinder.height,
        }
    }

    /// Closest point of the solid shape; interior points map to themselves.
    pub fn clamp_point(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(sphere) => {
                let offset = point - sphere.center;
                if offset.length() <= sphere.radius {
                    point
                } else {
                    sphere.surface_point(point)
                }
            }
            Shape::Box(bounds) => bounds.clamp_point(point),
            Shape::Cylinder(cylinder) => cylinder.clamp_point(point),
        }
    }

    /// Closest point on the surface of the shape.
    pub fn surface_point(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(sphere) => sphere.surface_point(point),
            Shape::Box(bounds) => box_surface_point(bounds, point),
            Shape::Cylinder(cylinder) => cylinder.surface_point(point),
        }
    }

    /// Enforces positive extents, returning whether anything was changed.
    pub(crate) fn sanitize(&mut self) -> bool {
        match self {
            Shape::Sphere(sphere) => clamp_extent(&mut sphere.radius),
            Shape::Box(bounds) => {
                let mut changed = false;
                for axis in 0..3 {
                    if bounds.max[axis] - bounds.min[axis] < MIN_EXTENT {
                        bounds.max[axis] = bounds.min[axis] + MIN_EXTENT;
                        changed = true;
                    }
                }
                changed
            }
            Shape::Cylinder(cylinder) => {
                let radius = clamp_extent(&mut cylinder.radius);
                let height = clamp_extent(&mut cylinder.height);
                radius || height
            }
        }
    }
}

fn clamp_extent(value: &mut f32) -> bool {
    if !(*value >= MIN_EXTENT) {
        *value = MIN_EXTENT;
        true
    } else {
        false
    }
}

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box used for broad-phase bounds and static boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grows the box by `amount` on both sides of every axis.
    pub fn inflate(&self, amount: Vec3) -> Aabb {
        let amount = amount.abs();
        Aabb {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Closed-interval overlap test on all three axes.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// Closed-interval overlap test on the court footprint only.
    pub fn intersects_xy(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.cmple(other.min).all() && other.max.cmple(self.max).all()
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }

    /// Closest point inside the (solid) box.
    pub fn clamp_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_corners() {
        let aabb = Aabb::new(Vec3::new(1.0, -1.0, 5.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn xy_intersection_ignores_height() {
        let floor = Aabb::new(Vec3::new(-10.0, -10.0, 0.0), Vec3::new(10.0, 10.0, 1.0));
        let high = Aabb::new(Vec3::new(0.0, 0.0, 50.0), Vec3::new(1.0, 1.0, 51.0));
        assert!(floor.intersects_xy(&high));
        assert!(!floor.intersects(&high));
    }

    #[test]
    fn inflate_and_extend() {
        let mut aabb = Aabb::new(Vec3::ZERO, Vec3::ONE).inflate(Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(aabb.min.x, -2.0);
        assert_eq!(aabb.max.x, 3.0);
        aabb.extend(Vec3::new(0.0, 0.0, 9.0));
        assert_eq!(aabb.max.z, 9.0);
        assert!(Aabb::empty().is_empty());
    }
}

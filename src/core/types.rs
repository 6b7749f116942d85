use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::utils::allocator::ObjectId;

/// Shape tag of a collidable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Sphere,
    Box,
    Cylinder,
}

/// Gameplay role of an object on the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ObjectType {
    Ball,
    Player,
    Rim,
    Backboard,
    Floor,
    #[default]
    Other,
}

/// Material coefficients that affect collision response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Collision efficiency: fraction of normal velocity kept after a bounce.
    pub restitution: f32,
    pub friction: f32,
    /// Sound cue the driver plays when this object is involved in a collision.
    pub sound_id: Option<u32>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 1.0,
            friction: 0.0,
            sound_id: None,
        }
    }
}

impl Material {
    pub fn new(restitution: f32, friction: f32) -> Self {
        Self {
            restitution: restitution.clamp(0.0, 1.0),
            friction: friction.clamp(0.0, 1.0),
            sound_id: None,
        }
    }

    pub fn with_sound(mut self, sound_id: u32) -> Self {
        self.sound_id = Some(sound_id);
        self
    }

    pub fn ball() -> Self {
        Self::new(0.8, 0.05)
    }

    pub fn floor() -> Self {
        Self::new(0.9, 0.1)
    }

    pub fn rim() -> Self {
        Self::new(0.6, 0.1)
    }

    pub fn backboard() -> Self {
        Self::new(0.7, 0.05)
    }

    pub fn player() -> Self {
        Self::new(0.3, 0.2)
    }

    /// Restitution of a contact between two materials.
    pub fn combined_restitution(&self, other: &Material) -> f32 {
        self.restitution * other.restitution
    }

    /// Factor applied to tangential velocity when two materials rub.
    pub fn tangential_retention(&self, other: &Material) -> f32 {
        (1.0 - (self.friction + other.friction)).max(0.0)
    }
}

/// How an object travels during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Movement {
    #[default]
    Straight,
    /// Revolving around `pivot`, whose center was at `pivot_center` when the
    /// orbit started.
    Circular { pivot: ObjectId, pivot_center: Vec3 },
}

impl Movement {
    pub fn is_circular(&self) -> bool {
        matches!(self, Movement::Circular { .. })
    }

    pub fn pivot(&self) -> Option<ObjectId> {
        match self {
            Movement::Circular { pivot, .. } => Some(*pivot),
            Movement::Straight => None,
        }
    }
}

/// Per-object collision state, re-evaluated every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContactState {
    #[default]
    Free,
    Colliding,
    RestingOn(ObjectId),
    Orbiting(ObjectId),
}

/// Last known-good kinematic state of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub position: Vec3,
    pub velocity: Vec3,
    pub movement: Movement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_coefficients_are_clamped() {
        let material = Material::new(1.5, -0.2);
        assert_eq!(material.restitution, 1.0);
        assert_eq!(material.friction, 0.0);
    }

    #[test]
    fn combined_coefficients() {
        let ball = Material::new(0.8, 0.1);
        let floor = Material::new(0.5, 0.2);
        assert!((ball.combined_restitution(&floor) - 0.4).abs() < 1e-6);
        assert!((ball.tangential_retention(&floor) - 0.7).abs() < 1e-6);
        let sticky = Material::new(1.0, 0.9);
        assert_eq!(sticky.tangential_retention(&sticky), 0.0);
    }
}

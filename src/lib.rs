//! Court Physics – collision detection and response for a basketball court.
//!
//! Spheres (the ball), static boxes (floor, backboard, walls) and upright
//! cylinders (players, rim posts) are stepped in discrete ticks: a quadtree
//! broad phase, exact per-pair narrow phase, back-out and nudge position
//! correction, and a reflection-plane velocity response.

pub mod collision;
pub mod config;
pub mod core;
pub mod utils;
pub mod world;

pub use glam::{Vec2, Vec3};

pub use collision::{
    broadphase::{CollisionObjectTree, TreeError},
    resolve::{Intersection, TickContext},
    response::CollisionResponse,
};
pub use config::CollisionConfig;
pub use crate::core::{
    aabb::Aabb,
    object::CollisionObject,
    plane::Plane,
    player::PlayerTraits,
    shapes::{Cylinder, Shape, Sphere},
    types::{ContactState, Material, Movement, ObjectType, ShapeKind},
};
pub use utils::allocator::{Arena, ObjectId};
pub use world::{CollisionEvent, CourtWorld, TickEvents};

/// High-level convenience wrapper that owns a [`CourtWorld`].
pub struct CollisionEngine {
    world: CourtWorld,
}

impl Default for CollisionEngine {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

impl CollisionEngine {
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            world: CourtWorld::new(config),
        }
    }

    /// Adds an object to the court and returns its [`ObjectId`].
    pub fn add_object(&mut self, object: CollisionObject) -> ObjectId {
        self.world.add_object(object)
    }

    /// Advances the court by `ticks` ticks, collecting every tick's events.
    pub fn step(&mut self, ticks: u32) -> Vec<TickEvents> {
        (0..ticks).map(|_| self.world.step()).collect()
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&CollisionObject> {
        self.world.object(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut CollisionObject> {
        self.world.object_mut(id)
    }

    pub fn world(&self) -> &CourtWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut CourtWorld {
        &mut self.world
    }
}

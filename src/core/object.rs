use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};

use super::{
    aabb::Aabb,
    player::PlayerTraits,
    shapes::{Cylinder, Shape, Sphere},
    types::{ContactState, Material, Movement, ObjectType, ShapeKind, Snapshot},
};
use crate::utils::allocator::ObjectId;

/// One collidable primitive on the court.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionObject {
    /// Arena handle, assigned when the object is added to a world.
    pub id: ObjectId,
    /// Game-side identifier (player number, hoop index, ...).
    pub game_id: i32,
    pub description: String,
    pub object_type: ObjectType,
    pub shape: Shape,
    pub velocity: Vec3,
    pub material: Material,
    pub gravity_scale: f32,
    /// Excluded from position correction but still reported by intersection tests.
    pub ignore: bool,
    pub movement: Movement,
    pub(crate) contact_state: ContactState,
    pub(crate) snapshot: Option<Snapshot>,
    pub(crate) player: Option<PlayerTraits>,
}

impl CollisionObject {
    fn from_shape(mut shape: Shape) -> Self {
        if shape.sanitize() {
            warn!("Clamped non-positive extents of {:?} shape", shape.kind());
        }

        Self {
            id: ObjectId::default(),
            game_id: 0,
            description: String::new(),
            object_type: ObjectType::default(),
            shape,
            velocity: Vec3::ZERO,
            material: Material::default(),
            gravity_scale: 0.0,
            ignore: false,
            movement: Movement::Straight,
            contact_state: ContactState::Free,
            snapshot: None,
            player: None,
        }
    }

    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::from_shape(Shape::Sphere(Sphere { center, radius }))
    }

    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        Self::from_shape(Shape::Box(Aabb::new(min, max)))
    }

    pub fn cylinder(center: Vec3, radius: f32, height: f32) -> Self {
        Self::from_shape(Shape::Cylinder(Cylinder {
            center,
            radius,
            height,
        }))
    }

    pub fn player(center: Vec3, radius: f32, height: f32, traits: PlayerTraits) -> Self {
        let mut object = Self::cylinder(center, radius, height).with_object_type(ObjectType::Player);
        object.player = Some(traits);
        object
    }

    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    pub fn with_game_id(mut self, game_id: i32) -> Self {
        self.game_id = game_id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_object_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = object_type;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn with_ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn position(&self) -> Vec3 {
        self.shape.position()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.shape.set_position(position);
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.shape.translate(delta);
    }

    pub fn contact_state(&self) -> ContactState {
        self.contact_state
    }

    pub fn player_traits(&self) -> Option<&PlayerTraits> {
        self.player.as_ref()
    }

    pub fn is_player(&self) -> bool {
        self.player.is_some()
    }

    /// Boxes are static court geometry and never move.
    pub fn is_static(&self) -> bool {
        self.kind() == ShapeKind::Box
    }

    pub fn bounding_box(&self) -> Aabb {
        self.shape.bounding_box()
    }

    /// Bounding box grown by one tick of travel in every direction.
    pub fn big_bounding_box(&self) -> Aabb {
        self.bounding_box().inflate(self.velocity)
    }

    /// Closest point on this object's surface to `point`.
    pub fn find_nearest_point(&self, point: Vec3) -> Vec3 {
        self.shape.surface_point(point)
    }

    /// Records the current state as the last known-good one.
    pub fn save(&mut self) {
        self.snapshot = Some(Snapshot {
            position: self.position(),
            velocity: self.velocity,
            movement: self.movement,
        });
    }

    /// Rolls back to the last snapshot, if any, and stops the object.
    pub fn restore(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.set_position(snapshot.position);
            self.movement = snapshot.movement;
        }
        self.velocity = Vec3::ZERO;
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }
}

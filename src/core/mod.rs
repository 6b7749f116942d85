//! Core data types: shapes, bounding boxes, materials, and collision objects.

pub mod aabb;
pub mod object;
pub mod plane;
pub mod player;
pub mod shapes;
pub mod types;

pub use aabb::Aabb;
pub use object::CollisionObject;
pub use plane::Plane;
pub use player::PlayerTraits;
pub use shapes::{Cylinder, Shape, Sphere};
pub use types::{ContactState, Material, Movement, ObjectType, ShapeKind, Snapshot};

//! Collision pipeline: quadtree broad phase, per-pair narrow phase, position
//! correction, and velocity response.

pub mod broadphase;
pub mod containers;
pub mod narrowphase;
pub mod resolve;
pub mod response;

pub use broadphase::{CollisionNode, CollisionObjectTree, Quadrant, TreeError};
pub use containers::{ObjectStack, ObjectVector};
pub use narrowphase::ShapePair;
pub use resolve::{Intersection, TickContext};
pub use response::CollisionResponse;

//! Global configuration constants and tunables for the court collision engine.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default gravity applied per tick to objects with a non-zero gravity scale (Z-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, 0.0, -0.5];

/// Length of one simulation tick, in tick units.
pub const DEFAULT_TICK_LENGTH: f32 = 1.0;

/// Iteration cap for the back-out loop.
pub const MAX_BACK_OUT_ITERATIONS: u32 = 500;

/// Total time (in ticks) a single back-out may rewind before giving up.
pub const MAX_BACK_OUT_TIME: f32 = 2.0;

/// Detect-and-respond passes per mover per tick. Passes after the first only
/// run when moving by the leftover time caused a new overlap.
pub const DEFAULT_MAX_RESOLVE_PASSES: u32 = 4;

/// Increment used when no axis yields a positive clearance time.
pub const DEFAULT_BACK_OUT_STEP: f32 = 0.01;

/// Gap left between surfaces after back-out and nudge.
pub const DEFAULT_CONTACT_SKIN: f32 = 1.0e-3;

/// Fraction of an object's vertical extent that still counts as resting.
pub const DEFAULT_ON_OBJECT_TOLERANCE: f32 = 0.05;

/// Vertical speed below which an object settles onto what it touches.
pub const DEFAULT_SETTLE_SPEED: f32 = 1.0;

/// Rolling friction is applied once every this many ticks.
pub const DEFAULT_ROLL_FRICTION_INTERVAL: u64 = 4;

/// Perpendicular offset, as a fraction of the combined radii, that makes a
/// cylinder impact off-center.
pub const DEFAULT_ORBIT_OFFSET_RATIO: f32 = 0.1;

/// Maximum quadtree depth.
pub const DEFAULT_TREE_MAX_DEPTH: u32 = 10;

/// Target number of objects per quadtree leaf.
pub const DEFAULT_TREE_LEAF_CAPACITY: usize = 5;

/// Wall-clock budget for one tick, in milliseconds.
pub const DEFAULT_TICK_BUDGET_MS: f32 = 2.0;

/// Runtime tunables for a [`crate::world::CourtWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub gravity: Vec3,
    pub tick_length: f32,
    pub max_back_out_iterations: u32,
    pub max_back_out_time: f32,
    pub max_resolve_passes: u32,
    pub back_out_step: f32,
    pub contact_skin: f32,
    pub on_object_tolerance: f32,
    pub settle_speed: f32,
    pub roll_friction_interval: u64,
    pub orbit_offset_ratio: f32,
    pub tree_max_depth: u32,
    pub tree_leaf_capacity: usize,
    pub tick_budget_ms: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_slice(&DEFAULT_GRAVITY),
            tick_length: DEFAULT_TICK_LENGTH,
            max_back_out_iterations: MAX_BACK_OUT_ITERATIONS,
            max_back_out_time: MAX_BACK_OUT_TIME,
            max_resolve_passes: DEFAULT_MAX_RESOLVE_PASSES,
            back_out_step: DEFAULT_BACK_OUT_STEP,
            contact_skin: DEFAULT_CONTACT_SKIN,
            on_object_tolerance: DEFAULT_ON_OBJECT_TOLERANCE,
            settle_speed: DEFAULT_SETTLE_SPEED,
            roll_friction_interval: DEFAULT_ROLL_FRICTION_INTERVAL,
            orbit_offset_ratio: DEFAULT_ORBIT_OFFSET_RATIO,
            tree_max_depth: DEFAULT_TREE_MAX_DEPTH,
            tree_leaf_capacity: DEFAULT_TREE_LEAF_CAPACITY,
            tick_budget_ms: DEFAULT_TICK_BUDGET_MS,
        }
    }
}

impl CollisionConfig {
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_settle_speed(mut self, settle_speed: f32) -> Self {
        self.settle_speed = settle_speed;
        self
    }

    /// Surface gap under which two objects still count as touching.
    pub fn touch_tolerance(&self) -> f32 {
        self.contact_skin * 10.0
    }

    /// Rolling friction applies on ticks that are a multiple of the interval.
    pub fn is_roll_friction_tick(&self, tick: u64) -> bool {
        self.roll_friction_interval <= 1 || tick % self.roll_friction_interval == 0
    }
}

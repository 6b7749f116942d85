//! Player specialization of the upright cylinder: shot-block reach and catch probing.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{object::CollisionObject, shapes::Shape};

/// Default extra reach used by the catch probe.
pub const DEFAULT_CATCH_HEIGHT: f32 = 10.0;

/// Blocking and catching parameters of a player cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTraits {
    /// Height currently added on top of the player's base height.
    pub block_height: f32,
    pub max_block_height: f32,
    /// Number of ticks the block takes to reach its maximum.
    pub block_time: u32,
    pub catch_height: f32,
}

impl Default for PlayerTraits {
    fn default() -> Self {
        Self {
            block_height: 0.0,
            max_block_height: 0.0,
            block_time: 1,
            catch_height: DEFAULT_CATCH_HEIGHT,
        }
    }
}

impl PlayerTraits {
    pub fn with_catch_height(mut self, catch_height: f32) -> Self {
        self.catch_height = catch_height;
        self
    }

    fn block_increment(&self) -> f32 {
        self.max_block_height / self.block_time.max(1) as f32
    }

    pub fn is_blocking(&self) -> bool {
        self.block_height > 0.0
    }
}

impl CollisionObject {
    /// Starts a jump-block animation reaching `height` extra units over `ticks` ticks.
    pub fn start_blocking(&mut self, height: f32, ticks: u32) {
        let Some(traits) = self.player.as_mut() else {
            warn!("start_blocking called on non-player object {:?}", self.id);
            return;
        };
        traits.max_block_height = height.max(0.0);
        traits.block_time = ticks.max(1);
        let increment = traits.block_increment();
        self.change_block_height(increment);
    }

    /// Advances the block animation by one tick: the reach grows while the
    /// player rises or hangs and shrinks while it falls, staying within
    /// `[0, max_block_height]`.
    pub fn hold_blocking(&mut self) {
        let Some(traits) = self.player.as_ref() else {
            return;
        };
        let increment = traits.block_increment();
        let delta = if self.velocity.z < 0.0 {
            -increment
        } else {
            increment
        };
        self.change_block_height(delta);
    }

    /// Drops whatever reach the block added.
    pub fn end_blocking(&mut self) {
        let Some(traits) = self.player.as_ref() else {
            return;
        };
        let current = traits.block_height;
        self.change_block_height(-current);
    }

    pub fn block_height(&self) -> f32 {
        self.player.map_or(0.0, |traits| traits.block_height)
    }

    /// Whether the player's raised catch reach touches `ball`.
    ///
    /// The probe runs on a copy with the catch height added on top, so the
    /// player's real geometry is never disturbed.
    pub fn test_catch(&self, ball: &CollisionObject) -> bool {
        let Some(traits) = self.player.as_ref() else {
            return false;
        };
        let mut probe = self.clone();
        if let Shape::Cylinder(cylinder) = &mut probe.shape {
            cylinder.height += traits.catch_height;
            cylinder.center.z += traits.catch_height * 0.5;
        }
        probe.test_object_intersection(ball).overlapping
    }

    /// Grows the cylinder upward (feet stay put) by `delta`, clamped to the
    /// configured maximum bonus.
    fn change_block_height(&mut self, delta: f32) {
        let (Some(traits), Shape::Cylinder(cylinder)) = (self.player.as_mut(), &mut self.shape) else {
            return;
        };
        let target = (traits.block_height + delta).clamp(0.0, traits.max_block_height.max(0.0));
        let applied = target - traits.block_height;
        if applied == 0.0 {
            return;
        }
        traits.block_height = target;
        cylinder.height += applied;
        cylinder.center.z += applied * 0.5;
        debug!("player {:?} block height now {:.2}", self.id, target);
    }
}

//! Per-object detection and position correction: intersection tests,
//! directional validation, back-out and nudge.

use glam::Vec3;
use log::warn;

use super::narrowphase::ShapePair;
use crate::{
    config::CollisionConfig,
    core::{
        object::CollisionObject,
        types::{Movement, ObjectType},
    },
    utils::math::{xy, EPSILON},
};

/// Settings and tick number shared by every resolution call of a tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickContext {
    pub config: CollisionConfig,
    pub tick: u64,
}

impl TickContext {
    pub fn new(config: CollisionConfig, tick: u64) -> Self {
        Self { config, tick }
    }
}

/// Result of a narrow-phase intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub overlapping: bool,
    /// Signed separation of the target relative to the tested object. Always
    /// filled in, even when the pair does not overlap.
    pub separation: Vec3,
}

impl Intersection {
    pub const NONE: Intersection = Intersection {
        overlapping: false,
        separation: Vec3::ZERO,
    };
}

impl CollisionObject {
    /// Shortest surface-to-surface gap, zero when touching or overlapping.
    pub fn object_distance(&self, target: &CollisionObject) -> f32 {
        match ShapePair::classify_either(&self.shape, &target.shape) {
            Some((pair, _)) => pair.distance(),
            None => {
                self.warn_unsupported(target, "distance");
                f32::INFINITY
            }
        }
    }

    pub fn test_object_intersection(&self, target: &CollisionObject) -> Intersection {
        match ShapePair::classify_either(&self.shape, &target.shape) {
            Some((pair, swapped)) => {
                let separation = pair.separation();
                Intersection {
                    overlapping: pair.intersects(),
                    separation: if swapped { -separation } else { separation },
                }
            }
            None => {
                self.warn_unsupported(target, "intersection");
                Intersection::NONE
            }
        }
    }

    /// Rejects contacts this object is moving away from.
    pub fn validate_collision(&self, target: &CollisionObject, separation: Vec3) -> bool {
        if let Movement::Circular { pivot, .. } = self.movement {
            if pivot == target.id && xy(self.velocity).length() <= EPSILON {
                return self.velocity.z * separation.z > 0.0;
            }
        }

        let direction = if separation.length_squared() > EPSILON * EPSILON {
            separation
        } else {
            target.position() - self.position()
        };
        self.velocity.dot(direction) > 0.0
    }

    /// Whether touching `target` calls for a physical response rather than
    /// just being reported.
    pub fn is_collision_handled(&self, target: &CollisionObject) -> bool {
        if target.ignore {
            return false;
        }
        if self.object_type == ObjectType::Ball {
            if let Some(traits) = target.player_traits() {
                return traits.is_blocking();
            }
        }
        true
    }

    /// Whether this object is settled on top of `target`.
    pub fn is_on_object(
        &self,
        target: &CollisionObject,
        separation: Vec3,
        config: &CollisionConfig,
    ) -> bool {
        ShapePair::classify(&self.shape, &target.shape).is_some_and(|pair| {
            pair.rests_on(
                separation,
                self.velocity,
                config.on_object_tolerance,
                config.settle_speed,
            )
        })
    }

    /// Steps backward along its path until this object no longer overlaps
    /// `target`, adding the rewound time to `time_budget`.
    ///
    /// Gives up when the iteration cap is reached or the next step would
    /// rewind past `max_back_out_time`: the object is then restored to its
    /// last snapshot and stopped, and `false` is returned.
    pub fn back_out_of_object(
        &mut self,
        target: &CollisionObject,
        time_budget: &mut f32,
        ctx: &TickContext,
    ) -> bool {
        if self.ignore || target.ignore {
            return true;
        }
        if ShapePair::classify(&self.shape, &target.shape).is_none() {
            self.warn_unsupported(target, "back-out");
            return false;
        }
        if !self.overlaps(target) {
            return true;
        }
        if self.velocity.length() <= EPSILON {
            warn!(
                "Object {:?} overlaps {:?} without velocity; restoring",
                self.id, target.id
            );
            self.restore();
            return false;
        }

        let config = &ctx.config;
        let mut rewound = 0.0;
        for _ in 0..config.max_back_out_iterations {
            let step = self.back_out_increment(target, config);
            if rewound + step > config.max_back_out_time {
                rewound += step;
                break;
            }
            self.integrate(-step);
            rewound += step;

            if !self.overlaps(target) {
                *time_budget += rewound;
                return true;
            }
        }

        warn!(
            "Back-out of {:?} from {:?} did not converge after {:.3} ticks; restoring",
            self.id, target.id, rewound
        );
        self.restore();
        false
    }

    /// Moves forward to the exact moment of first contact with `target`,
    /// taking the travel time out of `time_budget`.
    ///
    /// Returns `false` when no contact time exists (separating motion,
    /// negative discriminant, zero speed).
    pub fn nudge_object(
        &mut self,
        target: &CollisionObject,
        time_budget: &mut f32,
        ctx: &TickContext,
    ) -> bool {
        if self.ignore || target.ignore {
            return true;
        }
        let speed = self.velocity.length();
        if speed <= EPSILON {
            return false;
        }

        let time = match ShapePair::classify(&self.shape, &target.shape) {
            Some(pair) => pair.time_to_contact(self.velocity, pair.separation()),
            None => {
                self.warn_unsupported(target, "nudge");
                return false;
            }
        };
        let Some(time) = time.filter(|t| t.is_finite()) else {
            return false;
        };

        let skin_time = ctx.config.contact_skin / speed;
        let time = (time - skin_time).max(0.0).min(time_budget.max(0.0));
        self.integrate(time);
        *time_budget -= time;
        true
    }

    pub(crate) fn overlaps(&self, target: &CollisionObject) -> bool {
        ShapePair::classify_either(&self.shape, &target.shape)
            .is_some_and(|(pair, _)| pair.intersects())
    }

    /// Time to rewind for the next back-out step: the smallest positive
    /// per-axis clearance time, preferring one that actually ends the overlap.
    fn back_out_increment(&self, target: &CollisionObject, config: &CollisionConfig) -> f32 {
        let mine = self.bounding_box();
        let theirs = target.bounding_box();

        let mut candidates = [f32::INFINITY; 3];
        for axis in 0..3 {
            let v = self.velocity[axis];
            if v.abs() <= EPSILON {
                continue;
            }
            let penetration = if v > 0.0 {
                mine.max[axis] - theirs.min[axis]
            } else {
                theirs.max[axis] - mine.min[axis]
            };
            if penetration > 0.0 {
                candidates[axis] = (penetration + config.contact_skin) / v.abs();
            }
        }
        candidates.sort_by(f32::total_cmp);

        let positive = candidates.iter().copied().filter(|t| t.is_finite() && *t > 0.0);
        let mut smallest = None;
        for time in positive {
            smallest.get_or_insert(time);
            let mut probe = self.shape;
            probe.translate(self.displacement(-time));
            let resolved = ShapePair::classify(&probe, &target.shape)
                .is_some_and(|pair| !pair.intersects());
            if resolved {
                return time;
            }
        }
        smallest.unwrap_or(config.back_out_step)
    }

    fn warn_unsupported(&self, target: &CollisionObject, operation: &str) {
        warn!(
            "Unsupported {} between {:?} {:?} and {:?} {:?}",
            operation,
            self.kind(),
            self.id,
            target.kind(),
            target.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Material;
    use approx::assert_abs_diff_eq;

    fn floor() -> CollisionObject {
        CollisionObject::cuboid(Vec3::new(-100.0, -100.0, 0.0), Vec3::new(100.0, 100.0, 10.0))
            .with_object_type(ObjectType::Floor)
    }

    #[test]
    fn separation_is_reported_without_overlap() {
        let ball = CollisionObject::sphere(Vec3::new(0.0, 0.0, 20.0), 3.0);
        let hit = ball.test_object_intersection(&floor());
        assert!(!hit.overlapping);
        assert_eq!(hit.separation, Vec3::new(0.0, 0.0, -10.0));
        assert_abs_diff_eq!(ball.object_distance(&floor()), 7.0, epsilon = 1e-5);
    }

    #[test]
    fn reversed_pair_flips_separation() {
        let ball = CollisionObject::sphere(Vec3::new(0.0, 0.0, 20.0), 3.0);
        let hit = floor().test_object_intersection(&ball);
        assert_eq!(hit.separation, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn unsupported_pair_is_neutral() {
        let a = floor();
        let b = floor();
        assert_eq!(a.test_object_intersection(&b), Intersection::NONE);
        assert_eq!(a.object_distance(&b), f32::INFINITY);
    }

    #[test]
    fn moving_away_is_not_a_collision() {
        let ball = CollisionObject::sphere(Vec3::new(0.0, 0.0, 12.0), 3.0)
            .with_velocity(Vec3::new(0.0, 0.0, 2.0));
        let hit = ball.test_object_intersection(&floor());
        assert!(hit.overlapping);
        assert!(!ball.validate_collision(&floor(), hit.separation));

        let falling = ball.clone().with_velocity(Vec3::new(0.0, 0.0, -2.0));
        assert!(falling.validate_collision(&floor(), hit.separation));
    }

    #[test]
    fn back_out_clears_overlap_and_charges_budget() {
        let mut ball = CollisionObject::sphere(Vec3::new(0.0, 0.0, 11.0), 3.0)
            .with_velocity(Vec3::new(1.0, 0.0, -4.0));
        ball.save();
        let mut budget = 0.0;
        assert!(ball.back_out_of_object(&floor(), &mut budget, &TickContext::default()));
        assert!(!ball.test_object_intersection(&floor()).overlapping);
        assert_abs_diff_eq!(budget, 0.5, epsilon = 1e-3);
    }

    #[test]
    fn back_out_without_velocity_restores() {
        let mut ball = CollisionObject::sphere(Vec3::new(0.0, 0.0, 20.0), 3.0);
        ball.save();
        ball.set_position(Vec3::new(0.0, 0.0, 11.0));
        let mut budget = 0.0;
        assert!(!ball.back_out_of_object(&floor(), &mut budget, &TickContext::default()));
        assert_eq!(ball.position(), Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(ball.velocity, Vec3::ZERO);
    }

    #[test]
    fn nudge_lands_on_contact() {
        let mut ball = CollisionObject::sphere(Vec3::new(0.0, 0.0, 15.0), 3.0)
            .with_velocity(Vec3::new(0.0, 0.0, -4.0));
        let mut budget = 1.0;
        assert!(ball.nudge_object(&floor(), &mut budget, &TickContext::default()));
        let gap = ball.object_distance(&floor());
        assert!(gap >= 0.0 && gap < 1e-2, "gap was {gap}");
        assert!(!ball.test_object_intersection(&floor()).overlapping);
        assert_abs_diff_eq!(budget, 0.5, epsilon = 1e-3);
    }

    #[test]
    fn nudge_without_contact_does_not_move() {
        let mut ball = CollisionObject::sphere(Vec3::new(0.0, 0.0, 15.0), 3.0)
            .with_velocity(Vec3::new(0.0, 0.0, 4.0));
        let mut budget = 1.0;
        assert!(!ball.nudge_object(&floor(), &mut budget, &TickContext::default()));
        assert_eq!(ball.position(), Vec3::new(0.0, 0.0, 15.0));
        assert_eq!(budget, 1.0);
    }

    #[test]
    fn ball_passes_through_idle_player_but_not_blocker() {
        use crate::core::player::PlayerTraits;
        let ball = CollisionObject::sphere(Vec3::ZERO, 1.0)
            .with_object_type(ObjectType::Ball)
            .with_material(Material::ball());
        let mut player = CollisionObject::player(Vec3::ZERO, 2.0, 10.0, PlayerTraits::default());
        assert!(!ball.is_collision_handled(&player));
        player.start_blocking(3.0, 3);
        assert!(ball.is_collision_handled(&player));
        assert!(!ball.is_collision_handled(&floor().with_ignore(true)));
    }
}

use glam::Vec3;
use log::{debug, warn};

use crate::{
    collision::{
        broadphase::{CollisionObjectTree, TreeError},
        containers::{ObjectStack, ObjectVector},
        narrowphase,
        resolve::TickContext,
    },
    config::CollisionConfig,
    core::{
        object::CollisionObject,
        types::{ContactState, Movement},
    },
    utils::{
        allocator::{Arena, ObjectId},
        logging::{warn_if_tick_budget_exceeded, ScopedTimer},
        profiling::{PhaseTimer, TickProfile},
    },
};

/// A contact reported to gameplay code (sound cues, catch logic, scoring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub object: ObjectId,
    pub target: ObjectId,
    /// Sound cue of the moving object's material.
    pub sound_id: Option<u32>,
}

/// Everything that touched during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    pub tick: u64,
    pub collisions: Vec<CollisionEvent>,
    pub rolling: Vec<CollisionEvent>,
}

impl TickEvents {
    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty() && self.rolling.is_empty()
    }

    /// Whether `object` hit `target` this tick.
    pub fn collided(&self, object: ObjectId, target: ObjectId) -> bool {
        self.collisions
            .iter()
            .any(|event| event.object == object && event.target == target)
    }

    /// Whether `object` rolled or rested on `target` this tick.
    pub fn rolled_on(&self, object: ObjectId, target: ObjectId) -> bool {
        self.rolling
            .iter()
            .any(|event| event.object == object && event.target == target)
    }
}

/// The court: every collidable object plus the per-tick driver.
pub struct CourtWorld {
    objects: Arena<CollisionObject>,
    tree: CollisionObjectTree,
    config: CollisionConfig,
    tick: u64,
    virtual_ball: Option<ObjectId>,
    profile: TickProfile,
}

impl Default for CourtWorld {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

impl CourtWorld {
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            objects: Arena::new(),
            tree: CollisionObjectTree::new(&config),
            config,
            tick: 0,
            virtual_ball: None,
            profile: TickProfile::default(),
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn profile(&self) -> &TickProfile {
        &self.profile
    }

    pub fn tree(&self) -> &CollisionObjectTree {
        &self.tree
    }

    pub fn add_object(&mut self, object: CollisionObject) -> ObjectId {
        let id = self.objects.insert(object);
        if let Some(stored) = self.objects.get_mut(id) {
            stored.id = id;
        }
        id
    }

    pub fn object(&self, id: ObjectId) -> Option<&CollisionObject> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut CollisionObject> {
        self.objects.get_mut(id)
    }

    pub fn objects(&self) -> &Arena<CollisionObject> {
        &self.objects
    }

    /// Marks the ball that catch probes are tested against.
    pub fn set_virtual_ball(&mut self, id: ObjectId) {
        self.virtual_ball = Some(id);
    }

    pub fn virtual_ball(&self) -> Option<ObjectId> {
        self.virtual_ball
    }

    /// Whether `player` could catch the virtual ball right now.
    pub fn test_catch(&self, player: ObjectId) -> bool {
        let Some(ball) = self.virtual_ball.and_then(|id| self.objects.get(id)) else {
            return false;
        };
        self.objects
            .get(player)
            .is_some_and(|player| player.test_catch(ball))
    }

    pub fn tree_error(&self) -> Option<&TreeError> {
        self.tree.error()
    }

    pub fn take_tree_error(&mut self) -> Option<TreeError> {
        self.tree.take_error()
    }

    /// Advances the court by one tick and reports what touched.
    pub fn step(&mut self) -> TickEvents {
        let total = ScopedTimer::new("court::step");
        let tick = self.tick;
        let ctx = TickContext::new(self.config, tick);
        let mut events = TickEvents {
            tick,
            ..TickEvents::default()
        };

        self.profile.reset();
        self.profile.object_count = self.objects.len();
        {
            let _phase = PhaseTimer::new(&mut self.profile.tree_build_time);
            let _timer = ScopedTimer::new("court::tree_build");
            self.tree.build(&self.objects);
        }

        let movers: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, object)| Self::is_mover(object))
            .map(|(id, _)| id)
            .collect();
        self.profile.mover_count = movers.len();

        let resolve = ScopedTimer::new("court::resolve");
        for id in movers {
            self.release_orbit(id);
            self.resolve_mover(id, &ctx, &mut events);
        }
        self.profile.resolve_time = resolve.elapsed();
        drop(resolve);

        self.profile.collision_count = events.collisions.len();
        self.profile.rolling_count = events.rolling.len();
        self.profile.total_tick_time = total.elapsed();
        self.profile.report(tick);
        warn_if_tick_budget_exceeded(tick, self.profile.total_tick_time, self.config.tick_budget_ms);

        self.tick += 1;
        events
    }

    fn is_mover(object: &CollisionObject) -> bool {
        !object.is_static()
            && (object.velocity != Vec3::ZERO
                || object.gravity_scale != 0.0
                || object.movement.is_circular())
    }

    /// Drops orbit mode once the object has left its pivot.
    fn release_orbit(&mut self, id: ObjectId) {
        let Some(object) = self.objects.get(id) else {
            return;
        };
        let Some(pivot) = object.movement.pivot() else {
            return;
        };
        let touching = self
            .objects
            .get(pivot)
            .is_some_and(|pivot| object.object_distance(pivot) <= self.config.touch_tolerance());
        if touching {
            return;
        }

        if let Some(object) = self.objects.get_mut(id) {
            debug!("{:?} leaves orbit around {:?}", id, pivot);
            object.movement = Movement::Straight;
            object.contact_state = ContactState::Free;
        }
    }

    fn resolve_mover(&mut self, id: ObjectId, ctx: &TickContext, events: &mut TickEvents) {
        let Some(mut mover) = self.objects.detach(id) else {
            return;
        };
        let dt = self.config.tick_length;

        mover.save();
        mover.velocity += self.config.gravity * mover.gravity_scale * dt;

        let candidates = match self.tree.query_object(&mover) {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!("Skipping {:?} this tick: {}", id, error);
                mover.restore();
                self.objects.reattach(id, mover);
                return;
            }
        };
        self.profile.candidate_count += candidates.len().saturating_sub(1);

        mover.integrate(dt);
        if mover.ignore {
            self.objects.reattach(id, mover);
            return;
        }

        let passes = self.config.max_resolve_passes.max(1);
        let mut collided = ObjectStack::new();
        for pass in 0..passes {
            collided.clear();
            let mut time_budget = 0.0;
            let mut reported = ObjectVector::new();
            for target_id in candidates.iter() {
                let Some(target) = self.objects.get(target_id) else {
                    continue;
                };
                if !narrowphase::is_supported(mover.kind(), target.kind()) {
                    continue;
                }

                let hit = mover.test_object_intersection(target);
                if !hit.overlapping || !mover.validate_collision(target, hit.separation) {
                    continue;
                }
                if !mover.is_collision_handled(target) {
                    reported.push(target_id);
                    continue;
                }

                if !mover.back_out_of_object(target, &mut time_budget, ctx) {
                    self.profile.back_out_failures += 1;
                    self.objects.reattach(id, mover);
                    return;
                }
                mover.nudge_object(target, &mut time_budget, ctx);
                collided.push(target_id);
            }

            let sound_id = mover.material.sound_id;
            for target_id in reported.iter() {
                record(
                    &mut events.collisions,
                    CollisionEvent {
                        object: id,
                        target: target_id,
                        sound_id,
                    },
                );
            }

            // Later passes only answer overlaps caused by the leftover motion.
            let contacts = if pass == 0 {
                self.contact_set(&mover, &candidates, &collided, ctx)
            } else {
                collided.iter().collect()
            };
            if contacts.is_empty() {
                if pass == 0 {
                    mover.contact_state = match mover.movement {
                        Movement::Circular { pivot, .. } => ContactState::Orbiting(pivot),
                        Movement::Straight => ContactState::Free,
                    };
                }
                break;
            }

            let targets: Vec<&CollisionObject> = contacts
                .iter()
                .filter_map(|target_id| self.objects.get(target_id))
                .collect();
            let advance = pass + 1 < passes;
            let response = mover.handle_collisions(&targets, &mut time_budget, advance, ctx);

            for target_id in contacts.iter() {
                let event = CollisionEvent {
                    object: id,
                    target: target_id,
                    sound_id,
                };
                if response.is_rolling_on(target_id) {
                    record(&mut events.rolling, event);
                } else {
                    record(&mut events.collisions, event);
                }
            }
            if !advance && time_budget > 0.0 {
                debug!("{:?} dropped {:.3} ticks after {} passes", id, time_budget, passes);
            }
        }
        self.objects.reattach(id, mover);
    }

    /// Objects collided with this tick plus handled objects the mover still
    /// touches and is moving into or resting on.
    fn contact_set(
        &self,
        mover: &CollisionObject,
        candidates: &ObjectVector,
        collided: &ObjectStack,
        ctx: &TickContext,
    ) -> ObjectVector {
        let mut contacts: ObjectVector = collided.iter().collect();
        for target_id in candidates.iter() {
            if contacts.contains(target_id) {
                continue;
            }
            let Some(target) = self.objects.get(target_id) else {
                continue;
            };
            if !narrowphase::is_supported(mover.kind(), target.kind())
                || !mover.is_collision_handled(target)
            {
                continue;
            }
            if mover.object_distance(target) > ctx.config.touch_tolerance() {
                continue;
            }

            let separation = mover.test_object_intersection(target).separation;
            if mover.validate_collision(target, separation)
                || mover.is_on_object(target, separation, &ctx.config)
            {
                contacts.push(target_id);
            }
        }
        contacts
    }
}

/// Adds `event` unless the same pair was already recorded this tick.
fn record(list: &mut Vec<CollisionEvent>, event: CollisionEvent) {
    if !list.contains(&event) {
        list.push(event);
    }
}

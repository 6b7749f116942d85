//! Velocity response to a set of simultaneous contacts, plus integration of
//! the time left in the tick.

use glam::{Vec2, Vec3};
use log::{debug, warn};

use super::{
    narrowphase::{cylinder_box::side_normal, ShapePair},
    resolve::TickContext,
};
use crate::{
    core::{
        object::CollisionObject,
        plane::Plane,
        shapes::{Cylinder, Shape},
        types::{ContactState, Movement},
    },
    utils::{
        allocator::ObjectId,
        math::{rotate_z, with_z, xy, EPSILON},
    },
};

/// Outcome of a response pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionResponse {
    /// Targets the object ended up resting or rolling on.
    pub rolling_on: Vec<ObjectId>,
    /// Number of contacts that took part in the response.
    pub contacts: usize,
}

impl CollisionResponse {
    pub fn is_rolling_on(&self, id: ObjectId) -> bool {
        self.rolling_on.contains(&id)
    }
}

impl CollisionObject {
    /// Responds to every target in `targets` at once.
    ///
    /// When `advance` is set the object is then moved by whatever remains of
    /// `time_budget`, which is consumed.
    pub fn handle_collisions(
        &mut self,
        targets: &[&CollisionObject],
        time_budget: &mut f32,
        advance: bool,
        ctx: &TickContext,
    ) -> CollisionResponse {
        let contacts: Vec<(&CollisionObject, Vec3)> = targets
            .iter()
            .filter(|target| self.can_respond_to(target))
            .map(|target| (*target, self.test_object_intersection(target).separation))
            .collect();
        self.respond(&contacts, time_budget, advance, ctx)
    }

    /// Single-contact form of [`CollisionObject::handle_collisions`] with a
    /// separation the caller already computed.
    pub fn handle_collision(
        &mut self,
        target: &CollisionObject,
        separation: Vec3,
        time_budget: &mut f32,
        advance: bool,
        ctx: &TickContext,
    ) -> CollisionResponse {
        if !self.can_respond_to(target) {
            return CollisionResponse::default();
        }
        self.respond(&[(target, separation)], time_budget, advance, ctx)
    }

    /// Moves the object for `dt` ticks along its current path: a straight
    /// line, or an arc around the orbit pivot.
    pub fn integrate(&mut self, dt: f32) {
        match self.movement {
            Movement::Straight => self.translate(self.velocity * dt),
            Movement::Circular { pivot_center, .. } => self.advance_orbit(pivot_center, dt, None),
        }
    }

    /// Offset [`CollisionObject::integrate`] would apply for `dt` ticks,
    /// without moving the object.
    pub(crate) fn displacement(&self, dt: f32) -> Vec3 {
        match self.movement {
            Movement::Straight => self.velocity * dt,
            Movement::Circular { pivot_center, .. } => {
                self.orbit_step(pivot_center, dt, None).0 - self.position()
            }
        }
    }

    fn can_respond_to(&self, target: &CollisionObject) -> bool {
        if ShapePair::classify(&self.shape, &target.shape).is_some() {
            return true;
        }
        warn!(
            "No response for {:?} {:?} against {:?} {:?}",
            self.kind(),
            self.id,
            target.kind(),
            target.id
        );
        false
    }

    fn respond(
        &mut self,
        contacts: &[(&CollisionObject, Vec3)],
        time_budget: &mut f32,
        advance: bool,
        ctx: &TickContext,
    ) -> CollisionResponse {
        let mut response = CollisionResponse {
            rolling_on: Vec::new(),
            contacts: contacts.len(),
        };

        match self.shape {
            Shape::Sphere(_) => self.respond_sphere(contacts, &mut response, ctx),
            Shape::Cylinder(cylinder) => {
                self.respond_cylinder(&cylinder, contacts, &mut response, ctx);
            }
            Shape::Box(_) => {
                warn!("Box {:?} cannot respond to collisions", self.id);
                return response;
            }
        }

        if advance {
            let pushed_out = self.orbit_clearance(contacts, ctx);
            match (self.movement, pushed_out) {
                (Movement::Circular { pivot_center, .. }, Some(clearance)) => {
                    self.advance_orbit(pivot_center, *time_budget, Some(clearance));
                }
                _ => self.integrate(*time_budget),
            }
            *time_budget = 0.0;
        }
        response
    }

    fn respond_sphere(
        &mut self,
        contacts: &[(&CollisionObject, Vec3)],
        response: &mut CollisionResponse,
        ctx: &TickContext,
    ) {
        let center = self.position();
        let mut planes = Vec::with_capacity(contacts.len());
        for (target, separation) in contacts {
            let normal = if separation.length() > EPSILON {
                -separation.normalize()
            } else {
                (-self.velocity).normalize_or(Vec3::Z)
            };
            planes.push(Plane::new(center + *separation, normal, &target.material));

            if self.is_on_object(target, *separation, &ctx.config) {
                response.rolling_on.push(target.id);
            }
        }

        let Some(plane) = Plane::average(&planes) else {
            return;
        };

        let restitution = self.material.restitution * plane.restitution;
        let already_resting = matches!(self.contact_state, ContactState::RestingOn(_));
        let tangent_scale = if already_resting && !ctx.config.is_roll_friction_tick(ctx.tick) {
            1.0
        } else {
            (1.0 - (self.material.friction + plane.friction)).max(0.0)
        };
        self.velocity = plane.reflect(self.velocity, restitution, tangent_scale);

        self.contact_state = match response.rolling_on.first() {
            Some(&support) => {
                self.velocity.z = 0.0;
                ContactState::RestingOn(support)
            }
            None => ContactState::Colliding,
        };
    }

    fn respond_cylinder(
        &mut self,
        cylinder: &Cylinder,
        contacts: &[(&CollisionObject, Vec3)],
        response: &mut CollisionResponse,
        ctx: &TickContext,
    ) {
        let mut side_contacts = Vec::new();
        for &(target, separation) in contacts {
            if self.is_on_object(target, separation, &ctx.config) {
                self.velocity.z = self.velocity.z.max(0.0);
                response.rolling_on.push(target.id);
                continue;
            }

            let reach = match target.shape {
                Shape::Cylinder(other) => cylinder.radius + other.radius,
                _ => cylinder.radius,
            };
            let footprints_overlap = xy(separation).length() < reach;
            if separation.z.abs() > EPSILON || footprints_overlap {
                if self.velocity.z * separation.z > 0.0 {
                    self.velocity.z = 0.0;
                }
                continue;
            }
            side_contacts.push((target, separation));
        }

        match side_contacts.as_slice() {
            [] => {}
            [(target, separation)] => self.respond_side_contact(cylinder, target, *separation, ctx),
            _ => {
                debug!(
                    "{:?} pinned between {} side contacts",
                    self.id,
                    side_contacts.len()
                );
                self.stop_horizontal();
            }
        }

        self.contact_state = match (self.movement, response.rolling_on.first()) {
            (Movement::Circular { pivot, .. }, _) => ContactState::Orbiting(pivot),
            (Movement::Straight, Some(&support)) => ContactState::RestingOn(support),
            (Movement::Straight, None) => ContactState::Colliding,
        };
    }

    fn respond_side_contact(
        &mut self,
        cylinder: &Cylinder,
        target: &CollisionObject,
        separation: Vec3,
        ctx: &TickContext,
    ) {
        if let Movement::Circular { pivot, .. } = self.movement {
            if pivot != target.id {
                self.stop_horizontal();
                return;
            }
        }

        match target.shape {
            Shape::Box(_) => {
                let normal = side_normal(separation);
                let into = self.velocity.dot(normal);
                if into < 0.0 {
                    self.velocity -= normal * into;
                }
            }
            Shape::Cylinder(other) => {
                let offset = xy(separation);
                let planar = xy(self.velocity);
                let speed = planar.length();
                let reach = cylinder.radius + other.radius;
                let across = if speed > EPSILON {
                    offset.perp_dot(planar / speed).abs()
                } else {
                    0.0
                };

                if speed > EPSILON && across >= ctx.config.orbit_offset_ratio * reach {
                    self.start_orbit(target.id, other.center);
                } else {
                    let direction = offset.normalize_or_zero();
                    let along = planar.dot(direction);
                    if along > 0.0 {
                        let remaining = planar - direction * along;
                        self.velocity = with_z(remaining, self.velocity.z);
                    }
                }
            }
            Shape::Sphere(_) => {}
        }
    }

    /// Switches to circular movement around `pivot`, keeping the horizontal
    /// speed and turning the velocity tangent to the pivot.
    fn start_orbit(&mut self, pivot: ObjectId, pivot_center: Vec3) {
        let radial = xy(self.position() - pivot_center);
        let planar = xy(self.velocity);
        let mut tangent = radial.perp().normalize_or_zero();
        if tangent.dot(planar) < 0.0 {
            tangent = -tangent;
        }
        self.velocity = with_z(tangent * planar.length(), self.velocity.z);

        if !self.movement.is_circular() {
            debug!("{:?} starts orbiting {:?}", self.id, pivot);
        }
        self.movement = Movement::Circular {
            pivot,
            pivot_center,
        };
    }

    /// Orbit radius to restore after the arc advance, when the pivot is among
    /// the contacts.
    fn orbit_clearance(&self, contacts: &[(&CollisionObject, Vec3)], ctx: &TickContext) -> Option<f32> {
        let pivot = self.movement.pivot()?;
        let Shape::Cylinder(cylinder) = self.shape else {
            return None;
        };
        contacts.iter().find_map(|(target, _)| match target.shape {
            Shape::Cylinder(other) if target.id == pivot => {
                Some(cylinder.radius + other.radius + ctx.config.contact_skin)
            }
            _ => None,
        })
    }

    /// Rotates the object about the vertical line through `pivot_center` by
    /// the arc it covers in `dt` ticks; vertical motion stays linear. With a
    /// `clearance`, any remaining penetration is pushed out radially.
    fn advance_orbit(&mut self, pivot_center: Vec3, dt: f32, clearance: Option<f32>) {
        let (position, velocity) = self.orbit_step(pivot_center, dt, clearance);
        self.set_position(position);
        self.velocity = velocity;
    }

    /// Position and velocity after `dt` ticks on the orbit around
    /// `pivot_center`. Negative `dt` runs the arc backward.
    fn orbit_step(&self, pivot_center: Vec3, dt: f32, clearance: Option<f32>) -> (Vec3, Vec3) {
        let position = self.position();
        let radial = xy(position - pivot_center);
        let planar = xy(self.velocity);
        let radius = radial.length().max(clearance.unwrap_or(0.0));
        if radius <= EPSILON {
            return (position + self.velocity * dt, self.velocity);
        }

        let direction = radial.perp_dot(planar).signum();
        let angle = direction * planar.length() * dt / radius;
        let mut rotated: Vec2 = xy(rotate_z(with_z(radial, 0.0), angle));
        if let Some(clearance) = clearance {
            if rotated.length() < clearance {
                rotated = rotated.normalize_or(Vec2::X) * clearance;
            }
        }

        (
            with_z(xy(pivot_center) + rotated, position.z + self.velocity.z * dt),
            rotate_z(self.velocity, angle),
        )
    }

    fn stop_horizontal(&mut self) {
        self.velocity.x = 0.0;
        self.velocity.y = 0.0;
        self.movement = Movement::Straight;
    }
}

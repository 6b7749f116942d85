//! Moving upright cylinder against another upright cylinder (player against player).

use glam::{Vec2, Vec3};

use super::vertical_contact_time;
use crate::core::shapes::Cylinder;
use crate::utils::math::{interval_gap, intervals_overlap, with_z, xy, EPSILON};

/// Horizontal center-to-center vector plus the signed vertical gap.
pub fn separation(mover: &Cylinder, target: &Cylinder) -> Vec3 {
    with_z(
        xy(target.center - mover.center),
        interval_gap(mover.bottom(), mover.top(), target.bottom(), target.top()),
    )
}

pub fn intersects(mover: &Cylinder, target: &Cylinder) -> bool {
    xy(target.center - mover.center).length() < mover.radius + target.radius
        && intervals_overlap(mover.bottom(), mover.top(), target.bottom(), target.top())
}

pub fn distance(mover: &Cylinder, target: &Cylinder) -> f32 {
    let sep = separation(mover, target);
    let horizontal = (xy(sep).length() - mover.radius - target.radius).max(0.0);
    (horizontal * horizontal + sep.z * sep.z).sqrt()
}

/// Time for a circle moving with `velocity` to come within `reach` of a point
/// at `offset`.
///
/// The offset is decomposed into a part along the direction of travel and a
/// part across it; the mover misses when the across part exceeds the reach.
pub fn horizontal_contact_time(offset: Vec2, velocity: Vec2, reach: f32) -> Option<f32> {
    if offset.length() < reach {
        return Some(0.0);
    }
    let speed = velocity.length();
    if speed <= EPSILON {
        return None;
    }

    let direction = velocity / speed;
    let along = offset.dot(direction);
    if along <= 0.0 {
        return None;
    }
    let across_sq = (offset.length_squared() - along * along).max(0.0);
    let reach_sq = reach * reach;
    if across_sq >= reach_sq {
        return None;
    }

    let travel = along - (reach_sq - across_sq).sqrt();
    Some(travel.max(0.0) / speed)
}

/// Time until the two cylinders touch: both the horizontal circles and the
/// vertical extents must meet, so the later of the two times wins.
pub fn time_to_contact(
    mover: &Cylinder,
    target: &Cylinder,
    velocity: Vec3,
    separation: Vec3,
) -> Option<f32> {
    let horizontal = horizontal_contact_time(
        xy(separation),
        xy(velocity),
        mover.radius + target.radius,
    )?;
    let vertical = vertical_contact_time(separation.z, velocity.z)?;
    Some(horizontal.max(vertical))
}

/// Whether the mover stands on top of the target.
pub fn rests_on(
    mover: &Cylinder,
    target: &Cylinder,
    velocity: Vec3,
    tolerance: f32,
    settle_speed: f32,
) -> bool {
    let gap = mover.bottom() - target.top();
    gap.abs() <= tolerance * mover.height
        && xy(target.center - mover.center).length() < mover.radius + target.radius
        && velocity.z.abs() < settle_speed
}

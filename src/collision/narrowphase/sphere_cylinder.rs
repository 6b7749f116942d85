//! Moving sphere against an upright cylinder (rim posts, blocking players).

use glam::Vec3;

use super::cylinder_cylinder::horizontal_contact_time;
use crate::core::shapes::{Cylinder, Sphere};
use crate::utils::math::{smallest_non_negative_root, xy, EPSILON};

/// Vector from the sphere center to the closest point of the solid cylinder.
pub fn separation(sphere: &Sphere, cylinder: &Cylinder) -> Vec3 {
    cylinder.clamp_point(sphere.center) - sphere.center
}

pub fn intersects(sphere: &Sphere, cylinder: &Cylinder) -> bool {
    separation(sphere, cylinder).length() < sphere.radius
}

pub fn distance(sphere: &Sphere, cylinder: &Cylinder) -> f32 {
    (separation(sphere, cylinder).length() - sphere.radius).max(0.0)
}

/// Time until the sphere first touches the cylinder.
///
/// Beside the cylinder the problem is a horizontal circle sweep, above or
/// below it a vertical approach to the cap, and anywhere else the sphere is
/// swept against the fixed closest rim point.
pub fn time_to_contact(
    sphere: &Sphere,
    cylinder: &Cylinder,
    velocity: Vec3,
    separation: Vec3,
) -> Option<f32> {
    let beside = separation.z.abs() <= EPSILON;
    let over_cap = xy(separation).length() <= EPSILON;

    if beside {
        let offset = xy(cylinder.center - sphere.center);
        horizontal_contact_time(offset, xy(velocity), sphere.radius + cylinder.radius)
    } else if over_cap {
        if velocity.z * separation.z <= 0.0 {
            return None;
        }
        let gap = (separation.z.abs() - sphere.radius).max(0.0);
        Some(gap / velocity.z.abs())
    } else {
        let a = velocity.length_squared();
        let b = -2.0 * separation.dot(velocity);
        let c = separation.length_squared() - sphere.radius * sphere.radius;
        smallest_non_negative_root(a, b, c)
    }
}

/// Whether the sphere sits on the cylinder's top cap.
pub fn rests_on(
    sphere: &Sphere,
    separation: Vec3,
    velocity: Vec3,
    tolerance: f32,
    settle_speed: f32,
) -> bool {
    let extent = sphere.radius * 2.0;
    let gap = -separation.z - sphere.radius;
    separation.z < 0.0
        && gap.abs() <= tolerance * extent
        && xy(separation).length() <= tolerance * extent
        && velocity.z.abs() < settle_speed
}

//! Moving sphere against a static axis-aligned box.

use glam::Vec3;

use crate::core::{aabb::Aabb, shapes::Sphere};
use crate::utils::math::{smallest_non_negative_root, xy, EPSILON};

/// Vector from the sphere center to the closest point of the solid box.
pub fn separation(sphere: &Sphere, bounds: &Aabb) -> Vec3 {
    bounds.clamp_point(sphere.center) - sphere.center
}

pub fn intersects(sphere: &Sphere, bounds: &Aabb) -> bool {
    separation(sphere, bounds).length() < sphere.radius
}

pub fn distance(sphere: &Sphere, bounds: &Aabb) -> f32 {
    (separation(sphere, bounds).length() - sphere.radius).max(0.0)
}

/// Time until the sphere surface first touches the box.
///
/// Only axes on which the center lies outside the box slab contribute; the
/// closest feature (face, edge or corner) is assumed fixed over the step,
/// which gives `|s - v t|^2 = r^2` over those axes.
pub fn time_to_contact(sphere: &Sphere, velocity: Vec3, separation: Vec3) -> Option<f32> {
    let mut a = 0.0;
    let mut b = 0.0;
    let mut c = 0.0;
    let mut active_axes = 0;
    for axis in 0..3 {
        if separation[axis].abs() <= EPSILON {
            continue;
        }
        active_axes += 1;
        a += velocity[axis] * velocity[axis];
        b -= 2.0 * separation[axis] * velocity[axis];
        c += separation[axis] * separation[axis];
    }
    if active_axes == 0 {
        return None;
    }
    c -= sphere.radius * sphere.radius;
    smallest_non_negative_root(a, b, c)
}

/// Whether the sphere sits on top of the box.
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn floor() -> Aabb {
        Aabb::new(Vec3::new(-100.0, -100.0, 0.0), Vec3::new(100.0, 100.0, 10.0))
    }

    #[test]
    fn separation_points_at_floor() {
        let ball = Sphere {
            center: Vec3::new(1.0, 2.0, 20.0),
            radius: 3.0,
        };
        assert_eq!(separation(&ball, &floor()), Vec3::new(0.0, 0.0, -10.0));
        assert_abs_diff_eq!(distance(&ball, &floor()), 7.0, epsilon = 1e-5);
        assert!(!intersects(&ball, &floor()));
    }

    #[test]
    fn falling_ball_contact_time() {
        let ball = Sphere {
            center: Vec3::new(0.0, 0.0, 20.0),
            radius: 3.0,
        };
        let sep = separation(&ball, &floor());
        let t = time_to_contact(&ball, Vec3::new(0.0, 0.0, -14.0), sep).expect("falling onto floor");
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn ball_moving_away_never_touches() {
        let ball = Sphere {
            center: Vec3::new(0.0, 0.0, 20.0),
            radius: 3.0,
        };
        let sep = separation(&ball, &floor());
        assert!(time_to_contact(&ball, Vec3::new(0.0, 0.0, 5.0), sep).is_none());
    }

    #[test]
    fn ball_on_floor_rests() {
        let ball = Sphere {
            center: Vec3::new(0.0, 0.0, 13.0),
            radius: 3.0,
        };
        let sep = separation(&ball, &floor());
        assert!(rests_on(&ball, sep, Vec3::new(2.0, 0.0, -0.5), 0.05, 1.0));
        assert!(!rests_on(&ball, sep, Vec3::new(0.0, 0.0, -4.0), 0.05, 1.0));
    }
}

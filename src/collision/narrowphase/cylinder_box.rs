//! Moving upright cylinder against a static box (floor, backboard, walls).

use glam::{Vec2, Vec3};

use super::vertical_contact_time;
use crate::core::{aabb::Aabb, shapes::Cylinder};
use crate::utils::math::{
    interval_gap, intervals_overlap, smallest_non_negative_root, with_z, xy, EPSILON,
};

/// Vector from the cylinder axis to the closest point of the box footprint.
fn footprint_offset(cylinder: &Cylinder, bounds: &Aabb) -> Vec2 {
    let axis = xy(cylinder.center);
    axis.clamp(xy(bounds.min), xy(bounds.max)) - axis
}

/// Signed depth of the vertical overlap, pointing toward the box: negative
/// when the cylinder has sunk into the box from above, positive when it has
/// pushed into it from below.
fn vertical_penetration(cylinder: &Cylinder, bounds: &Aabb) -> f32 {
    let from_above = bounds.max.z - cylinder.bottom();
    let from_below = cylinder.top() - bounds.min.z;
    if from_above <= from_below {
        -from_above
    } else {
        from_below
    }
}

/// Separation from the cylinder toward the box.
///
/// Apart, this is the footprint offset plus the signed vertical gap. When the
/// two overlap and the vertical overlap is the shallower one (always so with
/// the axis inside the footprint), it is the vertical penetration alone.
pub fn separation(cylinder: &Cylinder, bounds: &Aabb) -> Vec3 {
    let offset = footprint_offset(cylinder, bounds);
    let stacked = intervals_overlap(cylinder.bottom(), cylinder.top(), bounds.min.z, bounds.max.z);
    if stacked && offset.length() < cylinder.radius {
        let vertical = vertical_penetration(cylinder, bounds);
        let side_depth = cylinder.radius - offset.length();
        if offset.length() <= EPSILON || vertical.abs() < side_depth {
            return Vec3::new(0.0, 0.0, vertical);
        }
    }
    with_z(
        offset,
        interval_gap(cylinder.bottom(), cylinder.top(), bounds.min.z, bounds.max.z),
    )
}

pub fn intersects(cylinder: &Cylinder, bounds: &Aabb) -> bool {
    footprint_offset(cylinder, bounds).length() < cylinder.radius
        && intervals_overlap(cylinder.bottom(), cylinder.top(), bounds.min.z, bounds.max.z)
}

pub fn distance(cylinder: &Cylinder, bounds: &Aabb) -> f32 {
    let horizontal = (footprint_offset(cylinder, bounds).length() - cylinder.radius).max(0.0);
    let vertical = interval_gap(cylinder.bottom(), cylinder.top(), bounds.min.z, bounds.max.z);
    (horizontal * horizontal + vertical * vertical).sqrt()
}

/// Time until the cylinder touches the box.
///
/// The horizontal part is the quadratic `|d - v t|^2 = R^2` over the footprint
/// axes the axis lies outside of; the vertical part is linear. Contact needs
/// both, so the later time wins.
pub fn time_to_contact(cylinder: &Cylinder, velocity: Vec3, separation: Vec3) -> Option<f32> {
    let offset = xy(separation);
    let horizontal = if offset.length() < cylinder.radius {
        0.0
    } else {
        let planar = xy(velocity);
        let mut a = 0.0;
        let mut b = 0.0;
        let mut c = 0.0;
        for axis in 0..2 {
            if offset[axis].abs() <= EPSILON {
                continue;
            }
            a += planar[axis] * planar[axis];
            b -= 2.0 * offset[axis] * planar[axis];
            c += offset[axis] * offset[axis];
        }
        c -= cylinder.radius * cylinder.radius;
        smallest_non_negative_root(a, b, c)?
    };
    let vertical = vertical_contact_time(separation.z, velocity.z)?;
    Some(horizontal.max(vertical))
}

/// Whether the cylinder stands on top of the box.
pub fn rests_on(
    cylinder: &Cylinder,
    bounds: &Aabb,
    velocity: Vec3,
    tolerance: f32,
    settle_speed: f32,
) -> bool {
    let gap = cylinder.bottom() - bounds.max.z;
    gap.abs() <= tolerance * cylinder.height
        && footprint_offset(cylinder, bounds).length() < cylinder.radius
        && velocity.z.abs() < settle_speed
}

/// Outward horizontal normal of the box side facing the cylinder.
pub fn side_normal(separation: Vec3) -> Vec3 {
    let offset: Vec2 = -xy(separation);
    if offset.length() > EPSILON {
        with_z(offset.normalize(), 0.0)
    } else {
        Vec3::Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn wall() -> Aabb {
        Aabb::new(Vec3::new(10.0, -50.0, 0.0), Vec3::new(12.0, 50.0, 40.0))
    }

    fn player(x: f32) -> Cylinder {
        Cylinder {
            center: Vec3::new(x, 0.0, 10.0),
            radius: 2.0,
            height: 20.0,
        }
    }

    #[test]
    fn walking_into_wall() {
        let p = player(0.0);
        let sep = separation(&p, &wall());
        assert_eq!(sep, Vec3::new(10.0, 0.0, 0.0));
        assert!(!intersects(&p, &wall()));
        let t = time_to_contact(&p, Vec3::new(4.0, 0.0, 0.0), sep).expect("approaching wall");
        assert_abs_diff_eq!(t, 2.0, epsilon = 1e-5);
        assert_eq!(side_normal(sep), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn standing_on_floor() {
        let floor = Aabb::new(Vec3::new(-50.0, -50.0, -5.0), Vec3::new(50.0, 50.0, 0.0));
        let p = player(0.0);
        assert!(rests_on(&p, &floor, Vec3::new(3.0, 0.0, 0.0), 0.05, 1.0));
        assert!(!intersects(&p, &floor));
        assert_eq!(distance(&p, &floor), 0.0);
    }

    #[test]
    fn overlapping_footprint_and_height_intersects() {
        assert!(intersects(&player(9.0), &wall()));
        assert!(!intersects(&player(7.0), &wall()));
    }

    #[test]
    fn sunk_into_floor_separates_vertically() {
        let floor = Aabb::new(Vec3::new(-50.0, -50.0, -5.0), Vec3::new(50.0, 50.0, 0.0));
        let mut p = player(3.0);
        p.center.z = 9.5;
        assert!(intersects(&p, &floor));
        assert_eq!(separation(&p, &floor), Vec3::new(0.0, 0.0, -0.5));
        assert_eq!(distance(&p, &floor), 0.0);
    }

    #[test]
    fn shallow_side_overlap_stays_horizontal() {
        let sep = separation(&player(8.5), &wall());
        assert_abs_diff_eq!(sep.x, 1.5, epsilon = 1e-6);
        assert_eq!(sep.z, 0.0);
        assert_eq!(side_normal(sep), Vec3::new(-1.0, 0.0, 0.0));
    }
}

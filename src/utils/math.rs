//! Additional math helpers layered on top of `glam`.

use glam::{Vec2, Vec3};

/// Threshold below which lengths and speeds are treated as zero.
pub const EPSILON: f32 = 1e-6;

/// Smallest non-negative root of `a*t^2 + b*t + c = 0`.
///
/// Returns `None` for a negative discriminant or a degenerate equation. When
/// the smaller root is negative but the larger is not, the surfaces are
/// already touching and zero is returned.
pub fn smallest_non_negative_root(a: f32, b: f32, c: f32) -> Option<f32> {
    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return None;
        }
        let t = -c / b;
        return (t >= 0.0).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);
    let (low, high) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

    if low >= 0.0 {
        Some(low)
    } else if high >= 0.0 {
        Some(0.0)
    } else {
        None
    }
}

/// Horizontal (court floor) part of a vector.
#[inline]
pub fn xy(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Lifts a horizontal vector back into 3D with the given height.
#[inline]
pub fn with_z(v: Vec2, z: f32) -> Vec3 {
    Vec3::new(v.x, v.y, z)
}

/// Rotates a vector about the vertical axis.
pub fn rotate_z(v: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
}

/// Gap between the closed intervals `[a_min, a_max]` and `[b_min, b_max]`.
///
/// Positive when `b` lies above `a`, negative when it lies below, zero when
/// the intervals overlap or touch.
pub fn interval_gap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    if b_min > a_max {
        b_min - a_max
    } else if b_max < a_min {
        b_max - a_min
    } else {
        0.0
    }
}

/// Whether two open intervals share a segment of positive length.
#[inline]
pub fn intervals_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min < b_max && b_min < a_max
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn quadratic_returns_first_contact_time() {
        // (t - 1)(t - 3) = t^2 - 4t + 3
        let t = smallest_non_negative_root(1.0, -4.0, 3.0).expect("two positive roots");
        assert_abs_diff_eq!(t, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn quadratic_straddling_zero_means_already_touching() {
        let t = smallest_non_negative_root(1.0, 0.0, -4.0).expect("roots at -2 and 2");
        assert_eq!(t, 0.0);
    }

    #[test]
    fn quadratic_rejects_negative_discriminant() {
        assert!(smallest_non_negative_root(1.0, 0.0, 4.0).is_none());
        assert!(smallest_non_negative_root(0.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let rotated = rotate_z(Vec3::new(1.0, 0.0, 2.0), FRAC_PI_2);
        assert_abs_diff_eq!(rotated.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rotated.y, 1.0, epsilon = 1e-6);
        assert_eq!(rotated.z, 2.0);
    }

    #[test]
    fn interval_gap_is_signed() {
        assert_eq!(interval_gap(0.0, 1.0, 3.0, 4.0), 2.0);
        assert_eq!(interval_gap(0.0, 1.0, -4.0, -1.0), -1.0);
        assert_eq!(interval_gap(0.0, 1.0, 0.5, 4.0), 0.0);
        assert!(!intervals_overlap(0.0, 1.0, 1.0, 2.0));
    }
}

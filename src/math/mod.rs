mod aabb;
mod ray;

pub use aabb::Aabb;
pub use ray::Ray;

use nalgebra as na;

/// A 2D vector used for positions, points and directions
pub type Vector = na::Vector2<f32>;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Returns true if the two floating point values are approximately equal
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

/// Shorthand for `Vector::new`
#[inline]
pub fn vector(x: f32, y: f32) -> Vector {
    Vector::new(x, y)
}

/// Returns true if both components are finite numbers
#[inline]
pub fn is_finite(v: &Vector) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Rotates a vector counter-clockwise around the origin by `angle` radians
#[inline]
pub fn rotate(v: &Vector, angle: f32) -> Vector {
    na::Rotation2::new(angle) * v
}

/// The left-hand perpendicular of a vector, `(-y, x)`
#[inline]
pub fn perp(v: &Vector) -> Vector {
    Vector::new(-v.y, v.x)
}

/// Signed area of a closed contour, positive when counter-clockwise
pub fn signed_area(points: &[Vector]) -> f32 {
    let len = points.len();
    if len < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    for i in 0..len {
        let p = points[i];
        let q = points[(i + 1) % len];
        twice_area += p.perp(&q);
    }

    twice_area * 0.5
}

/// Area-weighted centroid of a closed contour.
///
/// Degenerate contours (fewer than 3 points or zero area) fall back to
/// the average of their points.
pub fn centroid(points: &[Vector]) -> Vector {
    if points.is_empty() {
        return Vector::zeros();
    }

    let area = signed_area(points);
    if approx_zero(area) {
        return points.iter().sum::<Vector>() / points.len() as f32;
    }

    let len = points.len();
    let mut c = Vector::zeros();
    for i in 0..len {
        let p = points[i];
        let q = points[(i + 1) % len];
        c += (p + q) * p.perp(&q);
    }

    c / (6.0 * area)
}

/// Squared distance between two points
#[inline]
pub fn distance_squared(a: &Vector, b: &Vector) -> f32 {
    (b - a).norm_squared()
}

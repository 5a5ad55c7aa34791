//! Separating axis tests between convex pieces.
//!
//! Every test projects both pieces onto a set of candidate axes. The pieces
//! overlap when no axis separates their projections; the axis with the
//! smallest overlap gives the penetration data. Touching counts as overlap.

use crate::math::{self, Vector, EPSILON};
use crate::shapes::Convex;

/// Penetration data of two overlapping convex pieces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Penetration depth, never negative
    pub overlap: f32,

    /// Unit direction from `a` into `b`
    pub overlap_n: Vector,

    /// `overlap_n * overlap`, subtracting it from `a` separates the pieces
    pub overlap_v: Vector,

    /// `a` is entirely inside `b`
    pub a_in_b: bool,

    /// `b` is entirely inside `a`
    pub b_in_a: bool,
}

/// Tests two convex pieces of any kind
pub fn test(a: &Convex, b: &Convex) -> Option<Contact> {
    match (*a, *b) {
        (Convex::Circle { .. }, Convex::Circle { .. }) => test_circle_circle(a, b),
        (Convex::Circle { .. }, Convex::Polygon { .. }) => test_circle_polygon(a, b),
        (Convex::Polygon { .. }, Convex::Circle { .. }) => test_polygon_circle(a, b),
        (Convex::Polygon { .. }, Convex::Polygon { .. }) => test_polygon_polygon(a, b),
    }
}

pub fn test_circle_circle(a: &Convex, b: &Convex) -> Option<Contact> {
    let axis = match (*a, *b) {
        (Convex::Circle { center: ca, .. }, Convex::Circle { center: cb, .. }) => {
            unit_or_x(cb - ca)
        }
        _ => return None,
    };
    run(a, b, &[axis])
}

pub fn test_circle_polygon(a: &Convex, b: &Convex) -> Option<Contact> {
    let mut axes = polygon_axes(b);
    axes.extend(vertex_axis(b, a));
    run(a, b, &axes)
}

pub fn test_polygon_circle(a: &Convex, b: &Convex) -> Option<Contact> {
    let mut axes = polygon_axes(a);
    axes.extend(vertex_axis(a, b));
    run(a, b, &axes)
}

pub fn test_polygon_polygon(a: &Convex, b: &Convex) -> Option<Contact> {
    let mut axes = polygon_axes(a);
    axes.extend(polygon_axes(b));

    if axes.is_empty() {
        // two single points
        return (math::distance_squared(&a.origin(), &b.origin()) < EPSILON * EPSILON).then(|| Contact {
            overlap: 0.0,
            overlap_n: Vector::x(),
            overlap_v: Vector::zeros(),
            a_in_b: true,
            b_in_a: true,
        });
    }

    run(a, b, &axes)
}

impl Convex<'_> {
    /// Position of the piece, the center for a circle
    fn origin(&self) -> Vector {
        match *self {
            Convex::Circle { center, .. } => center,
            Convex::Polygon { position, .. } => position,
        }
    }

    /// Projection of the piece onto a unit axis
    pub(crate) fn project(&self, axis: &Vector) -> (f32, f32) {
        match *self {
            Convex::Circle { center, radius } => {
                let c = center.dot(axis);
                (c - radius, c + radius)
            }
            Convex::Polygon { position, points } => {
                let offset = position.dot(axis);
                let (min, max) = points
                    .iter()
                    .map(|p| p.dot(axis))
                    .fold((f32::MAX, f32::MIN), |(min, max), d| (min.min(d), max.max(d)));
                (min + offset, max + offset)
            }
        }
    }
}

pub(crate) fn unit_or_x(v: Vector) -> Vector {
    let norm = v.norm();
    if norm > EPSILON {
        v / norm
    } else {
        Vector::x()
    }
}

/// Edge normals of a polygon; a segment also contributes its direction
fn polygon_axes(piece: &Convex) -> Vec<Vector> {
    let points = match *piece {
        Convex::Polygon { points, .. } => points,
        Convex::Circle { .. } => return Vec::new(),
    };

    match points.len() {
        0 | 1 => Vec::new(),
        2 => {
            let edge = points[1] - points[0];
            let norm = edge.norm();
            if norm <= EPSILON {
                return Vec::new();
            }
            let dir = edge / norm;
            vec![Vector::new(dir.y, -dir.x), dir]
        }
        len => (0..len)
            .filter_map(|i| {
                let edge = points[(i + 1) % len] - points[i];
                let norm = edge.norm();
                (norm > EPSILON).then(|| Vector::new(edge.y, -edge.x) / norm)
            })
            .collect(),
    }
}

/// Axis from the polygon vertex closest to the circle's center
fn vertex_axis(polygon: &Convex, circle: &Convex) -> Option<Vector> {
    let (position, points) = match *polygon {
        Convex::Polygon { position, points } => (position, points),
        Convex::Circle { .. } => return None,
    };
    let center = match *circle {
        Convex::Circle { center, .. } => center,
        Convex::Polygon { .. } => return None,
    };

    let closest = points
        .iter()
        .map(|p| position + p)
        .min_by(|p, q| {
            math::distance_squared(p, &center).total_cmp(&math::distance_squared(q, &center))
        })?;
    Some(unit_or_x(center - closest))
}

/// Runs the axis tests, keeping the axis of least overlap
fn run(a: &Convex, b: &Convex, axes: &[Vector]) -> Option<Contact> {
    let mut overlap = f32::MAX;
    let mut overlap_n = Vector::x();
    let mut a_in_b = true;
    let mut b_in_a = true;

    for axis in axes {
        let (a_min, a_max) = a.project(axis);
        let (b_min, b_max) = b.project(axis);

        if a_min > b_max || b_min > a_max {
            return None;
        }

        let axis_overlap = if a_min < b_min {
            a_in_b = false;
            if a_max < b_max {
                b_in_a = false;
                a_max - b_min
            } else {
                least_overlap(a_min, a_max, b_min, b_max)
            }
        } else {
            b_in_a = false;
            if a_max > b_max {
                a_in_b = false;
                a_min - b_max
            } else {
                least_overlap(a_min, a_max, b_min, b_max)
            }
        };

        if axis_overlap.abs() < overlap {
            overlap = axis_overlap.abs();
            overlap_n = if axis_overlap < 0.0 { -axis } else { *axis };
        }
    }

    if overlap == f32::MAX {
        return None;
    }

    Some(Contact {
        overlap,
        overlap_n,
        overlap_v: overlap_n * overlap,
        a_in_b,
        b_in_a,
    })
}

/// Containment case: push out through the nearer side
fn least_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    let option1 = a_max - b_min;
    let option2 = b_max - a_min;
    if option1 < option2 {
        option1
    } else {
        -option2
    }
}

use crate::math::{Vector, EPSILON};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A finite ray, the segment from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Ray {
    /// Origin of the ray
    pub start: Vector,

    /// Far end of the ray
    pub end: Vector,
}

impl Ray {
    /// Creates a new ray between two points
    #[inline]
    pub fn new(start: Vector, end: Vector) -> Self {
        Self { start, end }
    }

    /// Returns the unnormalized direction `end - start`
    #[inline]
    pub fn direction(&self) -> Vector {
        self.end - self.start
    }

    /// Returns the point at parameter `t`, where `t = 0` is `start` and `t = 1` is `end`
    #[inline]
    pub fn point_at(&self, t: f32) -> Vector {
        self.start + self.direction() * t
    }

    /// Returns the closest point on the segment to a given point
    pub fn closest_point(&self, point: Vector) -> Vector {
        let dir = self.direction();
        let len_sq = dir.norm_squared();
        if len_sq < EPSILON {
            return self.start;
        }

        let t = ((point - self.start).dot(&dir) / len_sq).clamp(0.0, 1.0);
        self.point_at(t)
    }

    /// Checks if a point lies on the segment
    #[inline]
    pub fn contains_point(&self, point: Vector) -> bool {
        (self.closest_point(point) - point).norm_squared() < EPSILON
    }

    /// Returns the points where the segment crosses a circle's boundary,
    /// nearest to `start` first
    pub fn intersect_circle(&self, center: Vector, radius: f32) -> Vec<Vector> {
        let dir = self.direction();
        let to_start = self.start - center;

        let a = dir.norm_squared();
        if a < EPSILON {
            return Vec::new();
        }
        let b = 2.0 * dir.dot(&to_start);
        let c = to_start.norm_squared() - radius * radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Vec::new();
        }

        let root = discriminant.sqrt();
        let t1 = (-b - root) / (2.0 * a);
        let t2 = (-b + root) / (2.0 * a);

        let mut points = Vec::with_capacity(2);
        for t in [t1, t2] {
            if (0.0..=1.0).contains(&t) {
                points.push(self.point_at(t));
            }
        }

        points
    }

    /// Returns the point where the segment meets the segment `a`-`b`.
    ///
    /// For collinear overlapping segments this is the shared point nearest to `start`.
    pub fn intersect_segment(&self, a: Vector, b: Vector) -> Option<Vector> {
        let r = self.direction();
        let s = b - a;
        let denom = r.perp(&s);
        let start_to_a = a - self.start;

        if denom.abs() < EPSILON {
            if start_to_a.perp(&r).abs() > EPSILON {
                // parallel, never meet
                return None;
            }

            let other = Ray::new(a, b);
            let candidates = [self.start, a, b];
            return candidates
                .into_iter()
                .filter(|p| self.contains_point(*p) && other.contains_point(*p))
                .min_by(|p, q| {
                    (p - self.start)
                        .norm_squared()
                        .total_cmp(&(q - self.start).norm_squared())
                });
        }

        let t = start_to_a.perp(&s) / denom;
        let u = start_to_a.perp(&r) / denom;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.point_at(t))
        } else {
            None
        }
    }

    /// Returns every point where the segment crosses the edges of a closed contour,
    /// with the contour points offset by `origin`.
    ///
    /// A single-point contour is hit when it lies on the segment.
    pub fn intersect_polygon(&self, origin: Vector, points: &[Vector]) -> Vec<Vector> {
        match points.len() {
            0 => Vec::new(),
            1 => {
                let point = origin + points[0];
                if self.contains_point(point) {
                    vec![point]
                } else {
                    Vec::new()
                }
            }
            2 => self
                .intersect_segment(origin + points[0], origin + points[1])
                .into_iter()
                .collect(),
            len => (0..len)
                .filter_map(|i| {
                    self.intersect_segment(origin + points[i], origin + points[(i + 1) % len])
                })
                .collect(),
        }
    }
}

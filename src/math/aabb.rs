use crate::math::Vector;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Axis-Aligned Bounding Box (AABB) used by the spatial index
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner of the AABB
    pub min: Vector,

    /// Maximum corner of the AABB
    pub max: Vector,
}

impl Aabb {
    /// Creates a new AABB from minimum and maximum points
    #[inline]
    pub fn new(min: Vector, max: Vector) -> Self {
        Self { min, max }
    }

    /// Creates an AABB from its four bounds
    #[inline]
    pub fn from_bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vector::new(min_x, min_y),
            max: Vector::new(max_x, max_y),
        }
    }

    /// Creates an AABB centered at a position with the given half extents
    #[inline]
    pub fn from_center_half_extents(center: Vector, half_extents: Vector) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Creates a zero-size AABB at a single point
    #[inline]
    pub fn from_point(point: Vector) -> Self {
        Self { min: point, max: point }
    }

    /// Creates an AABB from a set of points offset by `origin`
    pub fn from_points(origin: Vector, points: &[Vector]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut aabb = Self::from_point(origin + first);
        for point in rest {
            aabb.expand_to_include_point(origin + point);
        }

        Some(aabb)
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.max.y
    }

    /// Returns the center of the AABB
    #[inline]
    pub fn center(&self) -> Vector {
        (self.min + self.max) * 0.5
    }

    /// Returns the extents of the AABB in each dimension
    #[inline]
    pub fn extents(&self) -> Vector {
        self.max - self.min
    }

    /// Returns the area of the AABB
    #[inline]
    pub fn area(&self) -> f32 {
        let extents = self.extents();
        extents.x * extents.y
    }

    /// Returns the perimeter of the AABB, the cost metric of the dynamic tree
    #[inline]
    pub fn perimeter(&self) -> f32 {
        let extents = self.extents();
        2.0 * (extents.x + extents.y)
    }

    /// Checks that every bound is finite and min does not exceed max
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }

    /// Checks if this AABB contains a point
    #[inline]
    pub fn contains_point(&self, point: Vector) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// Checks if this AABB fully contains another AABB
    #[inline]
    pub fn contains_aabb(&self, other: &Self) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x &&
        self.min.y <= other.min.y && self.max.y >= other.max.y
    }

    /// Checks if this AABB intersects with another AABB (touching counts)
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Returns the union of this AABB with another
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Vector::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vector::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Expands this AABB to include a point
    #[inline]
    pub fn expand_to_include_point(&mut self, point: Vector) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Returns this AABB grown by a margin in all directions
    #[inline]
    pub fn expand(&self, margin: f32) -> Self {
        let margin_vec = Vector::new(margin, margin);
        Self {
            min: self.min - margin_vec,
            max: self.max + margin_vec,
        }
    }
}

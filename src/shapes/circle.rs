use crate::math::{Aabb, Vector};
use crate::shapes::Convex;

/// A circle centered on its position
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    position: Vector,

    /// Kept for the shared body interface, a circle looks the same at any angle
    angle: f32,

    radius: f32,

    /// Radius before scaling
    unscaled_radius: f32,

    scale: f32,
}

impl Circle {
    /// Creates a new circle
    pub fn new(position: Vector, radius: f32) -> Self {
        Self {
            position,
            angle: 0.0,
            radius,
            unscaled_radius: radius,
            scale: 1.0,
        }
    }

    #[inline]
    pub fn position(&self) -> Vector {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    /// The scaled radius
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn unscaled_radius(&self) -> f32 {
        self.unscaled_radius
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Scales the radius by `|scale|`
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.abs();
        self.radius = self.unscaled_radius * self.scale;
    }

    /// Replaces the radius, keeping the current scale
    pub fn set_radius(&mut self, radius: f32) {
        self.unscaled_radius = radius;
        self.radius = radius * self.scale;
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vector::new(self.radius, self.radius))
    }

    pub fn convex(&self) -> Convex<'_> {
        Convex::Circle {
            center: self.position,
            radius: self.radius,
        }
    }
}

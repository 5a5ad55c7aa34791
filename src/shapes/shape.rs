use crate::bodies::BodyKind;
use crate::math::{Aabb, Vector};
use crate::shapes::{Circle, Ellipse, Polygon};

/// Geometry of a body, one variant per body kind.
///
/// Points, boxes and lines are polygons with a fixed vertex layout; an
/// ellipse is a polygon regenerated from its radii.
#[derive(Debug, Clone)]
pub enum Shape {
    Point(Polygon),
    Circle(Circle),
    Polygon(Polygon),
    Box(Polygon),
    Line(Polygon),
    Ellipse(Ellipse),
}

/// A convex piece of a shape, as consumed by the separating axis test
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convex<'a> {
    Circle {
        center: Vector,
        radius: f32,
    },
    Polygon {
        position: Vector,
        /// Vertices relative to `position`, already rotated
        points: &'a [Vector],
    },
}

impl Shape {
    pub fn kind(&self) -> BodyKind {
        match self {
            Shape::Point(_) => BodyKind::Point,
            Shape::Circle(_) => BodyKind::Circle,
            Shape::Polygon(_) => BodyKind::Polygon,
            Shape::Box(_) => BodyKind::Box,
            Shape::Line(_) => BodyKind::Line,
            Shape::Ellipse(_) => BodyKind::Ellipse,
        }
    }

    /// The polygon backing every kind except circles
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Point(p) | Shape::Polygon(p) | Shape::Box(p) | Shape::Line(p) => Some(p),
            Shape::Ellipse(e) => Some(e.polygon()),
            Shape::Circle(_) => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(c) => Some(c),
            _ => None,
        }
    }

    pub fn position(&self) -> Vector {
        match self.view() {
            View::Circle(c) => c.position(),
            View::Polygon(p) => p.position(),
        }
    }

    pub fn set_position(&mut self, position: Vector) {
        match self.view_mut() {
            ViewMut::Circle(c) => c.set_position(position),
            ViewMut::Polygon(p) => p.set_position(position),
        }
    }

    pub fn angle(&self) -> f32 {
        match self.view() {
            View::Circle(c) => c.angle(),
            View::Polygon(p) => p.angle(),
        }
    }

    pub fn set_angle(&mut self, angle: f32) {
        match self.view_mut() {
            ViewMut::Circle(c) => c.set_angle(angle),
            ViewMut::Polygon(p) => p.set_angle(angle),
        }
    }

    /// Per-axis scale; a circle reports its single factor on both axes
    pub fn scale(&self) -> Vector {
        match self.view() {
            View::Circle(c) => Vector::new(c.scale(), c.scale()),
            View::Polygon(p) => p.scale(),
        }
    }

    /// Scales the shape; circles only use `x`
    pub fn set_scale(&mut self, x: f32, y: f32) {
        match self.view_mut() {
            ViewMut::Circle(c) => c.set_scale(x),
            ViewMut::Polygon(p) => p.set_scale(x, y),
        }
    }

    /// Rotates the local contour around the position; no-op for circles
    pub fn rotate_contour(&mut self, angle: f32) {
        match self {
            Shape::Circle(_) => {}
            Shape::Ellipse(e) => e.rotate(angle),
            Shape::Point(p) | Shape::Polygon(p) | Shape::Box(p) | Shape::Line(p) => p.rotate(angle),
        }
    }

    /// Shifts the local contour relative to the position; no-op for circles
    pub fn translate_contour(&mut self, offset: Vector) {
        match self {
            Shape::Circle(_) => {}
            Shape::Ellipse(e) => e.translate(offset),
            Shape::Point(p) | Shape::Polygon(p) | Shape::Box(p) | Shape::Line(p) => p.translate(offset),
        }
    }

    /// Tight bounding box in world space
    pub fn aabb(&self) -> Aabb {
        match self {
            Shape::Circle(c) => c.aabb(),
            Shape::Ellipse(e) => e.aabb(),
            Shape::Point(p) | Shape::Polygon(p) | Shape::Box(p) | Shape::Line(p) => p.aabb(),
        }
    }

    pub fn is_convex(&self) -> bool {
        match self {
            Shape::Polygon(p) => p.is_convex(),
            _ => true,
        }
    }

    /// Convex pieces covering the shape
    pub fn convex_parts(&self) -> Vec<Convex<'_>> {
        match self {
            Shape::Circle(c) => vec![c.convex()],
            Shape::Ellipse(e) => vec![e.convex()],
            Shape::Point(p) | Shape::Polygon(p) | Shape::Box(p) | Shape::Line(p) => p.convex_parts(),
        }
    }

    /// Centroid relative to the position
    pub fn centroid(&self) -> Vector {
        match self.view() {
            View::Circle(_) => Vector::zeros(),
            View::Polygon(p) => p.centroid(),
        }
    }

    fn view(&self) -> View<'_> {
        match self {
            Shape::Circle(c) => View::Circle(c),
            Shape::Ellipse(e) => View::Polygon(e.polygon()),
            Shape::Point(p) | Shape::Polygon(p) | Shape::Box(p) | Shape::Line(p) => View::Polygon(p),
        }
    }

    fn view_mut(&mut self) -> ViewMut<'_> {
        match self {
            Shape::Circle(c) => ViewMut::Circle(c),
            Shape::Ellipse(e) => ViewMut::Polygon(e.polygon_mut()),
            Shape::Point(p) | Shape::Polygon(p) | Shape::Box(p) | Shape::Line(p) => ViewMut::Polygon(p),
        }
    }
}

enum View<'a> {
    Circle(&'a Circle),
    Polygon(&'a Polygon),
}

enum ViewMut<'a> {
    Circle(&'a mut Circle),
    Polygon(&'a mut Polygon),
}

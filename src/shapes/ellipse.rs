use std::f32::consts::PI;

use crate::math::{self, Aabb, Vector, EPSILON};
use crate::shapes::{Convex, Polygon};

/// Fewest vertices an ellipse outline is approximated with
pub const MIN_ELLIPSE_VERTICES: usize = 8;

/// An axis-aligned ellipse approximated by a convex polygon.
///
/// The outline is regenerated whenever a radius or the step changes. Turns
/// and shifts of the local outline are kept apart from the radii and
/// replayed on every regeneration, before the scale.
#[derive(Debug, Clone)]
pub struct Ellipse {
    radius_x: f32,
    radius_y: f32,

    /// Target arc length between two outline vertices
    step: f32,

    /// Accumulated rotation of the local outline
    turn: f32,

    /// Accumulated unscaled shift of the local outline
    offset: Vector,

    polygon: Polygon,
}

impl Ellipse {
    /// Creates an ellipse; `step` defaults to the mean radius
    pub fn new(position: Vector, radius_x: f32, radius_y: f32, step: Option<f32>) -> Self {
        let step = step.unwrap_or((radius_x + radius_y) / 2.0);
        let points = outline(radius_x, radius_y, step);
        Self {
            radius_x,
            radius_y,
            step,
            turn: 0.0,
            offset: Vector::zeros(),
            polygon: Polygon::new_undecomposed(position, points),
        }
    }

    #[inline]
    pub fn radius_x(&self) -> f32 {
        self.radius_x
    }

    #[inline]
    pub fn radius_y(&self) -> f32 {
        self.radius_y
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn set_radius_x(&mut self, radius_x: f32) {
        self.radius_x = radius_x;
        self.regenerate();
    }

    pub fn set_radius_y(&mut self, radius_y: f32) {
        self.radius_y = radius_y;
        self.regenerate();
    }

    pub fn set_step(&mut self, step: f32) {
        self.step = step;
        self.regenerate();
    }

    /// Rotates the local outline around the position, unlike an angle
    pub fn rotate(&mut self, angle: f32) {
        self.turn += angle;
        self.offset = math::rotate(&self.offset, angle);
        self.regenerate();
    }

    /// Shifts the local outline; `offset` is in scaled units
    pub fn translate(&mut self, offset: Vector) {
        let scale = self.polygon.scale();
        if scale.x > EPSILON && scale.y > EPSILON {
            self.offset += offset.component_div(&scale);
        } else {
            self.offset += offset;
        }
        self.regenerate();
    }

    /// Number of outline vertices for the current radii and step
    pub fn vertex_count(&self) -> usize {
        vertex_count(self.radius_x, self.radius_y, self.step)
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn polygon_mut(&mut self) -> &mut Polygon {
        &mut self.polygon
    }

    pub fn aabb(&self) -> Aabb {
        self.polygon.aabb()
    }

    pub fn convex(&self) -> Convex<'_> {
        Convex::Polygon {
            position: self.polygon.position(),
            points: self.polygon.calc_points(),
        }
    }

    fn regenerate(&mut self) {
        let scale = self.polygon.scale();
        let (turn, offset) = (self.turn, self.offset);
        let points = outline(self.radius_x, self.radius_y, self.step)
            .into_iter()
            .map(|p| math::rotate(&p, turn) + offset)
            .collect();
        self.polygon.set_points(points);
        self.polygon.set_scale(scale.x, scale.y);
    }
}

fn vertex_count(radius_x: f32, radius_y: f32, step: f32) -> usize {
    let circumference = 2.0 * PI * radius_x.hypot(radius_y);
    let count = (circumference / step.max(1.0)).ceil();
    if count.is_finite() {
        (count as usize).max(MIN_ELLIPSE_VERTICES)
    } else {
        MIN_ELLIPSE_VERTICES
    }
}

fn outline(radius_x: f32, radius_y: f32, step: f32) -> Vec<Vector> {
    let count = vertex_count(radius_x, radius_y, step);
    (0..count)
        .map(|i| {
            let theta = 2.0 * PI * i as f32 / count as f32;
            Vector::new(radius_x * theta.cos(), radius_y * theta.sin())
        })
        .collect()
}

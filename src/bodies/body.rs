use std::f32::consts::PI;

use crate::bodies::{body_flags::BodyFlags, BodyKind, BodyOptions};
use crate::core::{BodyHandle, SystemRef};
use crate::error::CollisionError;
use crate::math::{self, Aabb, Vector};
use crate::shapes::{Circle, ConvexPolygon, Ellipse, Polygon, Shape};
use crate::Result;

/// Vertices used when sampling a circle outline for drawing
const CIRCLE_OUTLINE_VERTICES: usize = 32;

/// A collidable body: a shape plus the bookkeeping the collision system needs
#[derive(Debug, Clone)]
pub struct Body {
    /// The body's geometry
    shape: Shape,

    /// Margin around the AABB stored in the spatial index
    padding: f32,

    /// The body's flags
    flags: BodyFlags,

    /// Tight AABB of the current geometry
    aabb: Aabb,

    /// Offset the contour was shifted by when it got centered
    center_offset: Vector,

    /// Set while the body is resident in a system
    system: Option<SystemRef>,
}

impl Body {
    fn from_shape(shape: Shape) -> Self {
        let aabb = shape.aabb();
        Self {
            shape,
            padding: 0.0,
            flags: BodyFlags::empty(),
            aabb,
            center_offset: Vector::zeros(),
            system: None,
        }
    }

    /// Creates a point body
    pub fn new_point(position: Vector) -> Result<Self> {
        check_position(position)?;
        let polygon = Polygon::new_undecomposed(position, vec![Vector::zeros()]);
        Ok(Self::from_shape(Shape::Point(polygon)))
    }

    /// Creates a circle centered on `position`
    pub fn new_circle(position: Vector, radius: f32) -> Result<Self> {
        check_position(position)?;
        check_length("circle radius", radius)?;
        Ok(Self::from_shape(Shape::Circle(Circle::new(position, radius))))
    }

    /// Creates a polygon from a contour relative to `position`.
    ///
    /// Concave contours are split into convex pieces for narrow-phase tests.
    pub fn new_polygon(position: Vector, points: Vec<Vector>) -> Result<Self> {
        check_position(position)?;
        check_contour(&points)?;
        Ok(Self::from_shape(Shape::Polygon(Polygon::new(position, points))))
    }

    /// Creates a `width` by `height` box whose unrotated corner sits on `position`
    pub fn new_box(position: Vector, width: f32, height: f32) -> Result<Self> {
        check_position(position)?;
        let points = box_points(width, height)?;
        Ok(Self::from_shape(Shape::Box(Polygon::new_undecomposed(position, points))))
    }

    /// Creates a segment from `start` to `end`
    pub fn new_line(start: Vector, end: Vector) -> Result<Self> {
        check_position(start)?;
        check_position(end)?;
        if start == end {
            return Err(CollisionError::InvalidParameter(
                "Line endpoints must not coincide".to_string(),
            ));
        }

        let polygon = Polygon::new_undecomposed(start, vec![Vector::zeros(), end - start]);
        Ok(Self::from_shape(Shape::Line(polygon)))
    }

    /// Creates an ellipse centered on `position`.
    ///
    /// `step` is the target arc length between outline vertices and defaults
    /// to the mean radius.
    pub fn new_ellipse(position: Vector, radius_x: f32, radius_y: f32, step: Option<f32>) -> Result<Self> {
        check_position(position)?;
        check_radius("ellipse radius x", radius_x)?;
        check_radius("ellipse radius y", radius_y)?;
        if let Some(step) = step {
            check_radius("ellipse step", step)?;
        }

        let ellipse = Ellipse::new(position, radius_x, radius_y, step);
        Ok(Self::from_shape(Shape::Ellipse(ellipse)))
    }

    /// Applies factory options; padding is left alone when the options carry none
    pub fn with_options(mut self, options: &BodyOptions) -> Self {
        if options.angle != 0.0 {
            self.set_angle(options.angle);
        }
        self.set_static(options.is_static);
        self.set_trigger(options.is_trigger);
        if let Some(padding) = options.padding {
            self.set_padding(padding);
        }
        if options.centered {
            self.set_centered(true);
        }
        self
    }

    /// Returns the body's kind
    pub fn kind(&self) -> BodyKind {
        self.shape.kind()
    }

    /// Returns the body's geometry
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector {
        self.shape.position()
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector) {
        self.shape.set_position(position);
        self.update_aabb();
    }

    /// Returns the body's rotation in radians
    pub fn get_angle(&self) -> f32 {
        self.shape.angle()
    }

    /// Sets the body's rotation around its position
    pub fn set_angle(&mut self, angle: f32) {
        self.shape.set_angle(angle);
        self.update_aabb();
    }

    /// Rotates the body's local contour, keeping the angle
    pub fn rotate(&mut self, angle: f32) {
        self.shape.rotate_contour(angle);
        self.update_aabb();
    }

    /// Shifts the body's local contour relative to its position
    pub fn translate(&mut self, offset: Vector) {
        self.shape.translate_contour(offset);
        self.update_aabb();
    }

    /// Returns the per-axis scale
    pub fn get_scale(&self) -> Vector {
        self.shape.scale()
    }

    /// Scales the body by `|x|`, `|y|` from its unscaled geometry; circles use `x`
    pub fn set_scale(&mut self, x: f32, y: f32) {
        self.shape.set_scale(x, y);
        self.update_aabb();
    }

    /// Replaces the contour of a polygon body
    pub fn set_points(&mut self, points: Vec<Vector>) -> Result<()> {
        check_contour(&points)?;
        match &mut self.shape {
            Shape::Polygon(polygon) => polygon.set_points(points),
            _ => return Err(self.kind_mismatch("set_points")),
        }

        if self.is_centered() {
            self.center_offset = Vector::zeros();
            self.center_contour();
        }
        self.update_aabb();
        Ok(())
    }

    /// Resizes a box body, keeping its scale
    pub fn set_box_size(&mut self, width: f32, height: f32) -> Result<()> {
        let points = box_points(width, height)?;
        match &mut self.shape {
            Shape::Box(polygon) => {
                let scale = polygon.scale();
                polygon.set_points(points);
                polygon.set_scale(scale.x, scale.y);
            }
            _ => return Err(self.kind_mismatch("set_box_size")),
        }

        if self.is_centered() {
            self.center_offset = Vector::zeros();
            self.center_contour();
        }
        self.update_aabb();
        Ok(())
    }

    /// Replaces the unscaled radius of a circle body
    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        check_length("circle radius", radius)?;
        match &mut self.shape {
            Shape::Circle(circle) => circle.set_radius(radius),
            _ => return Err(self.kind_mismatch("set_radius")),
        }
        self.update_aabb();
        Ok(())
    }

    /// Replaces both radii of an ellipse body and regenerates its outline
    pub fn set_ellipse_radii(&mut self, radius_x: f32, radius_y: f32) -> Result<()> {
        check_radius("ellipse radius x", radius_x)?;
        check_radius("ellipse radius y", radius_y)?;
        match &mut self.shape {
            Shape::Ellipse(ellipse) => {
                ellipse.set_radius_x(radius_x);
                ellipse.set_radius_y(radius_y);
            }
            _ => return Err(self.kind_mismatch("set_ellipse_radii")),
        }
        self.update_aabb();
        Ok(())
    }

    /// Changes the outline step of an ellipse body
    pub fn set_ellipse_step(&mut self, step: f32) -> Result<()> {
        check_radius("ellipse step", step)?;
        match &mut self.shape {
            Shape::Ellipse(ellipse) => ellipse.set_step(step),
            _ => return Err(self.kind_mismatch("set_ellipse_step")),
        }
        self.update_aabb();
        Ok(())
    }

    /// Whether the contour has been shifted onto its centroid
    pub fn is_centered(&self) -> bool {
        self.flags.contains(BodyFlags::CENTERED)
    }

    /// Shifts a polygonal contour so its unrotated centroid sits on the
    /// position, or shifts it back.
    pub fn set_centered(&mut self, centered: bool) {
        if centered == self.is_centered() {
            return;
        }

        if centered {
            self.center_contour();
        } else {
            self.shape.translate_contour(self.center_offset);
            self.center_offset = Vector::zeros();
        }
        self.flags.set(BodyFlags::CENTERED, centered);
        self.update_aabb();
    }

    /// Centroid of the current geometry, relative to the position
    pub fn get_centroid(&self) -> Vector {
        self.shape.centroid()
    }

    /// False when a polygonal contour crosses itself
    pub fn is_simple(&self) -> bool {
        self.shape.as_polygon().map_or(true, Polygon::is_simple)
    }

    /// Whether the body can be tested as a single convex piece
    pub fn is_convex(&self) -> bool {
        self.shape.is_convex()
    }

    /// Convex pieces of a concave polygon, empty otherwise
    pub fn convex_polygons(&self) -> &[ConvexPolygon] {
        match &self.shape {
            Shape::Polygon(polygon) => polygon.convex_polygons(),
            _ => &[],
        }
    }

    /// World-space outline for drawing; circles are sampled
    pub fn outline(&self) -> Vec<Vector> {
        match &self.shape {
            Shape::Circle(circle) => (0..CIRCLE_OUTLINE_VERTICES)
                .map(|i| {
                    let theta = 2.0 * PI * i as f32 / CIRCLE_OUTLINE_VERTICES as f32;
                    circle.position() + Vector::new(theta.cos(), theta.sin()) * circle.radius()
                })
                .collect(),
            shape => shape.as_polygon().map(Polygon::world_points).unwrap_or_default(),
        }
    }

    /// Returns the cached tight AABB
    pub fn get_aabb(&self) -> Aabb {
        self.aabb
    }

    /// Returns the AABB stored in the spatial index
    pub fn get_padded_aabb(&self) -> Aabb {
        self.aabb.expand(self.padding)
    }

    /// Recomputes the cached AABB from the current geometry
    pub fn update_aabb(&mut self) {
        self.aabb = self.shape.aabb();
    }

    /// Returns the body's flags
    pub fn get_flags(&self) -> BodyFlags {
        self.flags
    }

    /// Checks if the body is static
    pub fn is_static(&self) -> bool {
        self.flags.contains(BodyFlags::STATIC)
    }

    pub fn set_static(&mut self, is_static: bool) {
        self.flags.set(BodyFlags::STATIC, is_static);
    }

    /// Checks if the body is a trigger
    pub fn is_trigger(&self) -> bool {
        self.flags.contains(BodyFlags::TRIGGER)
    }

    pub fn set_trigger(&mut self, is_trigger: bool) {
        self.flags.set(BodyFlags::TRIGGER, is_trigger);
    }

    pub fn get_padding(&self) -> f32 {
        self.padding
    }

    /// Sets the index padding; negative or non-finite values become 0
    pub fn set_padding(&mut self, padding: f32) {
        self.padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
    }

    /// The system the body is resident in, if any
    pub fn system_ref(&self) -> Option<SystemRef> {
        self.system
    }

    /// The body's handle inside its system, if resident
    pub fn handle(&self) -> Option<BodyHandle> {
        self.system.map(|r| r.handle)
    }

    pub(crate) fn set_system_ref(&mut self, system: Option<SystemRef>) {
        self.system = system;
    }

    /// Fails with `InvalidGeometry` when the cached AABB is not usable by the index
    pub(crate) fn validate(&self) -> Result<()> {
        if self.aabb.is_valid() && self.padding.is_finite() {
            Ok(())
        } else {
            Err(CollisionError::InvalidGeometry(format!(
                "{:?} body has a malformed bounding box {:?}",
                self.kind(),
                self.aabb
            )))
        }
    }

    fn center_contour(&mut self) {
        let Some(centroid) = self.shape.as_polygon().map(Polygon::centroid_without_rotation) else {
            return;
        };
        if !math::approx_zero(centroid.norm_squared()) {
            self.shape.translate_contour(-centroid);
            self.center_offset += centroid;
        }
    }

    fn kind_mismatch(&self, operation: &str) -> CollisionError {
        CollisionError::InvalidParameter(format!(
            "{} is not supported by {:?} bodies",
            operation,
            self.kind()
        ))
    }
}

fn check_position(position: Vector) -> Result<()> {
    if math::is_finite(&position) {
        Ok(())
    } else {
        Err(CollisionError::InvalidGeometry(format!(
            "Non-finite position {:?}",
            position
        )))
    }
}

/// Finite and non-negative
fn check_length(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CollisionError::InvalidParameter(format!(
            "{} must be finite and non-negative, got {}",
            name, value
        )))
    }
}

/// Finite and strictly positive
fn check_radius(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CollisionError::InvalidParameter(format!(
            "{} must be finite and positive, got {}",
            name, value
        )))
    }
}

fn check_contour(points: &[Vector]) -> Result<()> {
    if points.len() < 3 {
        return Err(CollisionError::InvalidParameter(format!(
            "Polygon needs at least 3 points, got {}",
            points.len()
        )));
    }
    if !points.iter().all(math::is_finite) {
        return Err(CollisionError::InvalidGeometry(
            "Polygon contour has non-finite points".to_string(),
        ));
    }
    Ok(())
}

fn box_points(width: f32, height: f32) -> Result<Vec<Vector>> {
    check_length("box width", width)?;
    check_length("box height", height)?;
    Ok(vec![
        Vector::new(0.0, 0.0),
        Vector::new(width, 0.0),
        Vector::new(width, height),
        Vector::new(0.0, height),
    ])
}

use crate::math::{self, Aabb, Vector, EPSILON};
use crate::shapes::decomposition::{is_simple, quick_decomp};
use crate::shapes::Convex;

/// One convex piece of a concave polygon.
///
/// `points` are relative to `position`, which always matches the parent's position.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    /// The parent's position
    pub position: Vector,

    /// Vertices of the piece, rotated with the parent
    pub points: Vec<Vector>,
}

/// A polygonal contour placed at a position and rotated around it.
///
/// Also backs points, boxes, lines and ellipses.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Reference point, vertices are relative to it
    position: Vector,

    /// Rotation around `position`, in radians
    angle: f32,

    /// Working vertices, scaled
    points: Vec<Vector>,

    /// Unscaled vertices, `points == points_backup * scale` component-wise
    points_backup: Vec<Vector>,

    /// Vertices rotated by `angle`, still relative to `position`
    calc_points: Vec<Vector>,

    /// Per-axis scale applied to the backup
    scale: Vector,

    /// Whether the contour gets split into convex pieces when concave
    decompose: bool,

    is_convex: bool,

    /// Convex pieces, empty when the contour is convex
    convex_polygons: Vec<ConvexPolygon>,
}

impl Polygon {
    /// Creates a polygon that is decomposed into convex pieces when concave
    pub fn new(position: Vector, points: Vec<Vector>) -> Self {
        Self::build(position, points, true)
    }

    /// Creates a polygon that is always treated as a single contour
    pub(crate) fn new_undecomposed(position: Vector, points: Vec<Vector>) -> Self {
        Self::build(position, points, false)
    }

    fn build(position: Vector, points: Vec<Vector>, decompose: bool) -> Self {
        let mut polygon = Self {
            position,
            angle: 0.0,
            points_backup: points.clone(),
            calc_points: Vec::with_capacity(points.len()),
            points,
            scale: Vector::new(1.0, 1.0),
            decompose,
            is_convex: true,
            convex_polygons: Vec::new(),
        };
        polygon.recalc();
        polygon
    }

    #[inline]
    pub fn position(&self) -> Vector {
        self.position
    }

    /// Moves the polygon, carrying its convex pieces along
    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
        for piece in &mut self.convex_polygons {
            piece.position = position;
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Sets the rotation around the position
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.recalc();
    }

    /// Local vertices, before rotation
    #[inline]
    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    /// Unscaled local vertices that `set_scale` replays
    #[inline]
    pub fn points_backup(&self) -> &[Vector] {
        &self.points_backup
    }

    /// Vertices after rotation, relative to the position
    #[inline]
    pub fn calc_points(&self) -> &[Vector] {
        &self.calc_points
    }

    /// Vertices in world space
    pub fn world_points(&self) -> Vec<Vector> {
        self.calc_points.iter().map(|p| self.position + p).collect()
    }

    #[inline]
    pub fn scale(&self) -> Vector {
        self.scale
    }

    /// Scales the unscaled vertices by `|x|`, `|y|`
    pub fn set_scale(&mut self, x: f32, y: f32) {
        self.scale = Vector::new(x.abs(), y.abs());
        let scale = self.scale;
        for (point, backup) in self.points.iter_mut().zip(&self.points_backup) {
            *point = backup.component_mul(&scale);
        }
        self.recalc();
    }

    /// Replaces the contour; the new points become the unscaled baseline
    pub fn set_points(&mut self, points: Vec<Vector>) {
        self.points_backup = points.clone();
        self.points = points;
        self.scale = Vector::new(1.0, 1.0);
        self.recalc();
    }

    /// Rotates the local vertices themselves, unlike `set_angle`
    pub fn rotate(&mut self, angle: f32) {
        for point in &mut self.points {
            *point = math::rotate(point, angle);
        }
        // a non-uniform scale does not commute with rotation, bake it in
        let uniform = math::approx_eq(self.scale.x, self.scale.y);
        self.rebase_backup(uniform);
        self.recalc();
    }

    /// Shifts the local vertices relative to the position
    pub fn translate(&mut self, offset: Vector) {
        for point in &mut self.points {
            *point += offset;
        }
        self.rebase_backup(true);
        self.recalc();
    }

    /// Whether the contour needed no more than one convex piece
    #[inline]
    pub fn is_convex(&self) -> bool {
        self.is_convex
    }

    #[inline]
    pub fn convex_polygons(&self) -> &[ConvexPolygon] {
        &self.convex_polygons
    }

    /// Centroid of the rotated contour, relative to the position
    pub fn centroid(&self) -> Vector {
        math::centroid(&self.calc_points)
    }

    /// Centroid of the contour as if it were not rotated
    pub fn centroid_without_rotation(&self) -> Vector {
        math::centroid(&self.points)
    }

    /// False for a self-crossing contour
    pub fn is_simple(&self) -> bool {
        is_simple(&self.calc_points)
    }

    /// Bounding box of the world-space vertices
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.position, &self.calc_points)
            .unwrap_or_else(|| Aabb::from_point(self.position))
    }

    /// The convex pieces to run narrow-phase tests on
    pub fn convex_parts(&self) -> Vec<Convex<'_>> {
        if self.is_convex {
            return vec![Convex::Polygon {
                position: self.position,
                points: &self.calc_points,
            }];
        }

        self.convex_polygons
            .iter()
            .map(|piece| Convex::Polygon {
                position: piece.position,
                points: &piece.points,
            })
            .collect()
    }

    fn rebase_backup(&mut self, keep_scale: bool) {
        if keep_scale && self.scale.x > EPSILON && self.scale.y > EPSILON {
            let scale = self.scale;
            self.points_backup = self.points.iter().map(|p| p.component_div(&scale)).collect();
        } else {
            self.points_backup = self.points.clone();
            self.scale = Vector::new(1.0, 1.0);
        }
    }

    fn recalc(&mut self) {
        let angle = self.angle;
        self.calc_points.clear();
        self.calc_points
            .extend(self.points.iter().map(|p| math::rotate(p, angle)));
        self.update_convex();
    }

    fn update_convex(&mut self) {
        if !self.decompose || self.calc_points.len() < 4 {
            self.is_convex = true;
            self.convex_polygons.clear();
            return;
        }

        let pieces = quick_decomp(&self.calc_points);
        if pieces.is_empty() {
            log::warn!(
                "polygon at ({}, {}) has a degenerate or self-crossing contour, testing it as one piece",
                self.position.x,
                self.position.y
            );
        }

        self.is_convex = pieces.len() <= 1;
        if self.is_convex {
            self.convex_polygons.clear();
            return;
        }

        self.convex_polygons.truncate(pieces.len());
        for (index, points) in pieces.into_iter().enumerate() {
            match self.convex_polygons.get_mut(index) {
                Some(piece) => {
                    piece.position = self.position;
                    piece.points = points;
                }
                None => self.convex_polygons.push(ConvexPolygon {
                    position: self.position,
                    points,
                }),
            }
        }
    }
}

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Kind of a body, determining the geometry it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum BodyKind {
    /// A single location, tested as a one-vertex polygon
    Point,

    /// A circle around the position
    Circle,

    /// An arbitrary contour, decomposed into convex pieces when concave
    Polygon,

    /// An axis-aligned rectangle anchored at its corner before rotation
    Box,

    /// A segment from the position to an end point
    Line,

    /// An ellipse approximated by a convex polygon
    Ellipse,
}

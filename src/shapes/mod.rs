pub mod decomposition;
mod polygon;
mod circle;
mod ellipse;
mod shape;

pub use self::polygon::{ConvexPolygon, Polygon};
pub use self::circle::Circle;
pub use self::ellipse::{Ellipse, MIN_ELLIPSE_VERTICES};
pub use self::shape::{Convex, Shape};

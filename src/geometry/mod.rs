pub use bounding_box::BoundingBox;
pub use line::Line;
pub use outline::{FlatOutline, Outline};
pub use path::{Path, Subpath};
pub use point::Point;
pub use quadratic_bezier::QuadraticBezierCurve;
pub use rect::{Rect, Size};
pub use transform::Transform;

mod bounding_box;
mod line;
mod outline;
mod path;
mod point;
mod quadratic_bezier;
mod rect;
mod transform;

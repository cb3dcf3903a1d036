//! Points in the flat map plane.

mod point;

pub use point::{CartesianPoint2d, NewCartesianPoint2d, Point2d};

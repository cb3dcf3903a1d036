//! Geometries in geographic coordinates (latitude and longitude) (see [`GeoPoint`]), their bounding rectangles
//! (see [`GeoRect`]) and conversion into the map plane (see [`Projection`]).

mod datum;
pub mod impls;
mod rect;
mod traits;

pub use datum::Datum;
pub use rect::GeoRect;
pub use traits::point::{wrap_lon, GeoPoint, NewGeoPoint};
pub use traits::projection::Projection;

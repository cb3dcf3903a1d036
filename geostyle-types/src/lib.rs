//! Geometric primitives used by `geostyle`.
//!
//! * [`geo`] module contains points in geographic coordinates ([`GeoPoint2d`](geo::impls::GeoPoint2d)),
//!   geographic bounding rectangles with date line awareness ([`GeoRect`](geo::GeoRect)) and projections
//!   between geographic and map-plane coordinates ([`Projection`](geo::Projection)).
//! * [`cartesian`] module contains points in the map plane.

pub mod cartesian;
pub mod error;
pub mod geo;

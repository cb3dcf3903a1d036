//! Implementations for the projections used by map renderers.
mod web_mercator;

pub use web_mercator::{NormalizedWebMercator, MAX_MERCATOR_LAT};

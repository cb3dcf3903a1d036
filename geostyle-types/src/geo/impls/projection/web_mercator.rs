use crate::cartesian::NewCartesianPoint2d;
use crate::geo::traits::point::NewGeoPoint;
use crate::geo::traits::projection::Projection;
use std::f64::consts::{FRAC_PI_4, PI};
use std::marker::PhantomData;

/// Maximum latitude representable by the Web Mercator projection. Points closer to the poles are clamped
/// to it by [`NormalizedWebMercator`].
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Web Mercator projection normalized to the unit square: `x` grows from `0` at -180° to `1` at 180°,
/// `y` grows from `0` at the north edge of the map to `1` at the south edge.
///
/// Latitudes are clamped to [`MAX_MERCATOR_LAT`], so poles are projected onto the map edges. Longitudes are not
/// wrapped in either direction: `x` values outside of `[0, 1]` correspond to longitudes beyond ±180°.
#[derive(Debug, Copy, Clone)]
pub struct NormalizedWebMercator<In, Out> {
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> NormalizedWebMercator<In, Out> {
    /// Creates a new projection.
    pub fn new() -> Self {
        Self {
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl<In, Out> Default for NormalizedWebMercator<In, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for NormalizedWebMercator<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let lat = input.lat().clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let x = input.lon() / 360.0 + 0.5;
        let y = 0.5 - (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln() / (2.0 * PI);

        if x.is_finite() && y.is_finite() {
            Some(Self::OutPoint::new(x, y.clamp(0.0, 1.0)))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let lon = (input.x() - 0.5) * 360.0;
        let lat = (PI * (1.0 - 2.0 * input.y())).sinh().atan().to_degrees();

        Some(Self::InPoint::latlon(lat, lon))
    }
}

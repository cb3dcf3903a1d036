use crate::geo::traits::point::{GeoPoint, NewGeoPoint};
use serde::{Deserialize, Serialize};

/// 2d point on the surface of a celestial body.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl GeoPoint2d {
    /// Returns a copy of the point moved by `delta` degrees of longitude.
    ///
    /// The result is not wrapped, so longitudes outside of `[-180, 180]` are possible. This is used to keep
    /// geometries crossing the antimeridian contiguous.
    pub fn shift_lon(&self, delta: f64) -> Self {
        Self {
            lat: self.lat,
            lon: self.lon + delta,
        }
    }
}

/// Creates a new GeoPoint2d from latitude and longitude values (in degrees).
///
/// ```
/// use geostyle_types::geo::GeoPoint;
/// use geostyle_types::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <$crate::geo::impls::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::latlon($lat, $lon)
    };
}

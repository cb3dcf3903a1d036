use crate::geo::datum::Datum;
use num_traits::{Float, NumCast, One};

/// Point on the surface of a celestial body, given by latitude and longitude in degrees.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }

    /// Great circle distance to the `other` point in meters, calculated on the sphere with the mean radius of the
    /// `datum`.
    ///
    /// Returns `None` if the radius of the datum cannot be represented by the numeric type of the point.
    fn distance(&self, other: &impl GeoPoint<Num = Self::Num>, datum: &Datum) -> Option<Self::Num> {
        let radius = <Self::Num as NumCast>::from(datum.mean_radius())?;
        let two = Self::Num::one() + Self::Num::one();

        let d_lat = (other.lat_rad() - self.lat_rad()) / two;
        let d_lon = (other.lon_rad() - self.lon_rad()) / two;
        let a = d_lat.sin().powi(2)
            + self.lat_rad().cos() * other.lat_rad().cos() * d_lon.sin().powi(2);

        Some(radius * two * a.sqrt().min(Self::Num::one()).asin())
    }
}

/// Geographic point that can be constructed from its coordinates.
pub trait NewGeoPoint<N: Float = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;

    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }

    /// Point reached by travelling `distance` meters from `self` along the great circle with the initial
    /// `azimuth` (radians, clockwise from north).
    ///
    /// The longitude of the result is wrapped into `[-180, 180)` range.
    fn destination(&self, azimuth: N, distance: N, datum: &Datum) -> Option<Self> {
        let radius = <N as NumCast>::from(datum.mean_radius())?;
        let ratio = distance / radius;

        let (sin_lat, cos_lat) = self.lat_rad().sin_cos();
        let (sin_ratio, cos_ratio) = ratio.sin_cos();

        let lat = (sin_lat * cos_ratio + cos_lat * sin_ratio * azimuth.cos()).asin();
        let lon = self.lon_rad()
            + (azimuth.sin() * sin_ratio * cos_lat).atan2(cos_ratio - sin_lat * lat.sin());

        Some(Self::latlon(lat.to_degrees(), wrap_lon(lon.to_degrees())))
    }
}

/// Wraps the longitude into `[-180, 180)` range.
pub fn wrap_lon<N: Float>(lon: N) -> N {
    let half_turn = <N as NumCast>::from(180.0).unwrap_or_else(N::nan);
    let turn = half_turn + half_turn;

    if lon >= -half_turn && lon < half_turn {
        return lon;
    }

    let wrapped = (lon + half_turn) % turn;
    if wrapped < N::zero() {
        wrapped + half_turn
    } else {
        wrapped - half_turn
    }
}

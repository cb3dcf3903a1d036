use crate::error::GeostyleTypesError;
use crate::geo::impls::GeoPoint2d;
use crate::geo::traits::point::{wrap_lon, GeoPoint, NewGeoPoint};
use serde::{Deserialize, Serialize};

/// Rectangle in geographic coordinates.
///
/// The rectangle spans from its `west` edge eastwards to its `east` edge. When `west > east` the rectangle
/// passes through the antimeridian (see [`GeoRect::crosses_date_line`]).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRect {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl GeoRect {
    /// Creates a new rectangle from its edges in degrees.
    ///
    /// Returns an error if the `south` edge is above the `north` one.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, GeostyleTypesError> {
        if south > north {
            return Err(GeostyleTypesError::Conversion(format!(
                "south edge {south} is above north edge {north}"
            )));
        }

        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Creates a rectangle from its top left and bottom right corners.
    pub fn from_corners(
        top_left: &impl GeoPoint<Num = f64>,
        bottom_right: &impl GeoPoint<Num = f64>,
    ) -> Result<Self, GeostyleTypesError> {
        Self::new(
            top_left.lon(),
            bottom_right.lat(),
            bottom_right.lon(),
            top_left.lat(),
        )
    }

    /// Bounding rectangle of a path.
    ///
    /// Consecutive points are connected by the shortest way in longitude, so a path going from 170° to -170° is
    /// considered to cross the antimeridian rather than to span 340 degrees. The resulting edges are wrapped into
    /// `[-180, 180)`. If the path spans 360 degrees or more in longitude, the rectangle covers all longitudes.
    ///
    /// Returns `None` for an empty path.
    pub fn from_path<'a, P: GeoPoint<Num = f64> + 'a>(
        points: impl IntoIterator<Item = &'a P>,
    ) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;

        let mut prev_lon = first.lon();
        let mut unwrapped_lon = first.lon();
        let mut min_lon = unwrapped_lon;
        let mut max_lon = unwrapped_lon;
        let mut south = first.lat();
        let mut north = first.lat();

        for point in points {
            let mut delta = point.lon() - prev_lon;
            if delta > 180.0 {
                delta -= 360.0;
            } else if delta < -180.0 {
                delta += 360.0;
            }

            unwrapped_lon += delta;
            prev_lon = point.lon();

            min_lon = min_lon.min(unwrapped_lon);
            max_lon = max_lon.max(unwrapped_lon);
            south = south.min(point.lat());
            north = north.max(point.lat());
        }

        if max_lon - min_lon >= 360.0 {
            return Some(Self {
                west: -180.0,
                south,
                east: 180.0,
                north,
            });
        }

        let west = wrap_lon(min_lon);
        let east = wrap_lon(max_lon);
        // A path ending exactly at 180 keeps the eastern edge instead of flipping to the other side.
        let east = if east < west && max_lon - min_lon > 0.0 && east == -180.0 {
            180.0
        } else {
            east
        };

        Some(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Western edge longitude.
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Eastern edge longitude.
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Southern edge latitude.
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Northern edge latitude.
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Returns true if the rectangle passes through the antimeridian, i.e. its west edge is to the east of its
    /// east edge.
    pub fn crosses_date_line(&self) -> bool {
        self.west > self.east
    }

    /// Top left corner.
    pub fn top_left(&self) -> GeoPoint2d {
        GeoPoint2d::latlon(self.north, self.west)
    }

    /// Top right corner.
    pub fn top_right(&self) -> GeoPoint2d {
        GeoPoint2d::latlon(self.north, self.east)
    }

    /// Bottom left corner.
    pub fn bottom_left(&self) -> GeoPoint2d {
        GeoPoint2d::latlon(self.south, self.west)
    }

    /// Bottom right corner.
    pub fn bottom_right(&self) -> GeoPoint2d {
        GeoPoint2d::latlon(self.south, self.east)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;
    use assert_matches::assert_matches;

    #[test]
    fn inverted_latitudes_are_rejected() {
        assert_matches!(
            GeoRect::new(0.0, 10.0, 10.0, 0.0),
            Err(GeostyleTypesError::Conversion(_))
        );
    }

    #[test]
    fn corners() {
        let rect = GeoRect::from_corners(&latlon!(10.0, 170.0), &latlon!(-10.0, -170.0)).unwrap();

        assert!(rect.crosses_date_line());
        assert_eq!(rect.bottom_left(), latlon!(-10.0, 170.0));
        assert_eq!(rect.top_right(), latlon!(10.0, -170.0));
    }

    #[test]
    fn path_without_crossing() {
        let path = [latlon!(0.0, 10.0), latlon!(5.0, 30.0), latlon!(-5.0, 20.0)];
        let rect = GeoRect::from_path(&path).unwrap();

        assert_eq!(rect, GeoRect::new(10.0, -5.0, 30.0, 5.0).unwrap());
        assert!(!rect.crosses_date_line());
    }

    #[test]
    fn path_crossing_date_line() {
        let path = [latlon!(0.0, 170.0), latlon!(1.0, -175.0), latlon!(2.0, -160.0)];
        let rect = GeoRect::from_path(&path).unwrap();

        assert_eq!(rect.west(), 170.0);
        assert_eq!(rect.east(), -160.0);
        assert!(rect.crosses_date_line());
    }

    #[test]
    fn path_around_the_globe() {
        let path = [
            latlon!(60.0, 0.0),
            latlon!(60.0, 120.0),
            latlon!(60.0, -120.0),
            latlon!(60.0, 0.0),
        ];
        let rect = GeoRect::from_path(&path).unwrap();

        assert_eq!(rect.west(), -180.0);
        assert_eq!(rect.east(), 180.0);
        assert!(!rect.crosses_date_line());
    }

    #[test]
    fn path_touching_antimeridian() {
        let path = [latlon!(0.0, 170.0), latlon!(0.0, 180.0)];
        let rect = GeoRect::from_path(&path).unwrap();

        assert_eq!(rect.east(), 180.0);
        assert!(!rect.crosses_date_line());
    }

    #[test]
    fn empty_path() {
        assert!(GeoRect::from_path::<GeoPoint2d>(&[]).is_none());
    }
}

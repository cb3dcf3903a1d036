//! Approximation of geodesic circles with polygons.

use geostyle_types::cartesian::{CartesianPoint2d, Point2d};
use geostyle_types::geo::impls::GeoPoint2d;
use geostyle_types::geo::{Datum, GeoPoint, NewGeoPoint, Projection};
use std::f64::consts::PI;

/// Number of points a circle boundary is approximated with.
pub const CIRCLE_SAMPLES: usize = 128;

/// Points of the boundary of the circle with the given `center` and `radius` in meters.
///
/// The first point lies to the north of the center, the rest follow clockwise with equal azimuth steps. Longitudes
/// are wrapped into `[-180, 180)`.
pub fn peripheral_points(center: &GeoPoint2d, radius: f64, samples: usize) -> Vec<GeoPoint2d> {
    (0..samples)
        .filter_map(|i| {
            let azimuth = 2.0 * PI * i as f64 / samples as f64;
            center.destination(azimuth, radius, &Datum::WGS84)
        })
        .collect()
}

/// Pole contained in a circle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pole {
    /// North pole.
    North,
    /// South pole.
    South,
}

impl Pole {
    fn point(&self) -> GeoPoint2d {
        match self {
            Pole::North => GeoPoint2d::latlon(90.0, 0.0),
            Pole::South => GeoPoint2d::latlon(-90.0, 0.0),
        }
    }
}

/// Returns the pole lying inside the circle, if any. If the circle contains both poles, the north one is returned.
pub fn contained_pole(center: &GeoPoint2d, radius: f64) -> Option<Pole> {
    [Pole::North, Pole::South].into_iter().find(|pole| {
        center
            .distance(&pole.point(), &Datum::WGS84)
            .is_some_and(|distance| distance < radius)
    })
}

/// Closed ring approximating the circle, ready to be used as a polygon ring.
///
/// When the circle contains a pole, its boundary crosses every meridian, and drawn in a flat projection it would
/// jump across the whole map. In that case the boundary is projected with the `projection` into the map plane, made
/// contiguous by moving points by whole map widths, and closed over the edge of the map where the pole is
/// projected. The result is then unprojected back into geographic coordinates. The projection is expected to map
/// longitudes linearly into `x` with the world width of `1`, like
/// [`NormalizedWebMercator`](geostyle_types::geo::impls::projection::NormalizedWebMercator).
pub fn circle_ring<P>(center: &GeoPoint2d, radius: f64, projection: &P) -> Vec<GeoPoint2d>
where
    P: Projection<InPoint = GeoPoint2d, OutPoint = Point2d> + ?Sized,
{
    let mut ring = peripheral_points(center, radius, CIRCLE_SAMPLES);

    if let Some(pole) = contained_pole(center, radius) {
        match wrap_around_pole(&ring, pole, projection) {
            Some(preserved) => ring = preserved,
            None => log::warn!(
                "Failed to preserve geometry of the circle containing the {pole:?} pole, center: {center:?}"
            ),
        }
    }

    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }

    ring
}

fn wrap_around_pole<P>(ring: &[GeoPoint2d], pole: Pole, projection: &P) -> Option<Vec<GeoPoint2d>>
where
    P: Projection<InPoint = GeoPoint2d, OutPoint = Point2d> + ?Sized,
{
    let projected = ring
        .iter()
        .map(|point| projection.project(point))
        .collect::<Option<Vec<Point2d>>>()?;

    let count = projected.len();
    let wraps: Vec<usize> = (1..=count)
        .map(|i| i % count)
        .filter(|&i| {
            let prev = &projected[(i + count - 1) % count];
            (projected[i].x() - prev.x()).abs() > 0.5
        })
        .collect();

    // A ring around one pole jumps across the map edge exactly once.
    let &[start] = wraps.as_slice() else {
        return None;
    };

    let mut contiguous: Vec<Point2d> = Vec::with_capacity(count + 2);
    for i in 0..count {
        let point = projected[(start + i) % count];
        let x = match contiguous.last() {
            Some(prev) => prev.x() + unwrap_dx(point.x() - prev.x()),
            None => point.x(),
        };
        contiguous.push(Point2d::new(x, point.y()));
    }

    let edge_y = match pole {
        Pole::North => 0.0,
        Pole::South => 1.0,
    };
    let first_x = contiguous.first()?.x();
    let last_x = contiguous.last()?.x();
    contiguous.push(Point2d::new(last_x, edge_y));
    contiguous.push(Point2d::new(first_x, edge_y));

    contiguous
        .iter()
        .map(|point| projection.unproject(point))
        .collect()
}

fn unwrap_dx(dx: f64) -> f64 {
    dx - dx.round()
}

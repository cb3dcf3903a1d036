//! Removing antimeridian ambiguity from paths.
//!
//! A renderer drawing in a flat projection connects consecutive points with straight lines, so a segment from
//! 170° to -170° is drawn across the whole world instead of through the antimeridian. To draw such paths by the
//! shortest way, longitudes of the points after the jump are moved by 360 degrees.

use geostyle_types::geo::impls::GeoPoint2d;
use geostyle_types::geo::GeoPoint;

/// Makes the path contiguous across the antimeridian.
///
/// If `crosses_date_line` is set, every point whose longitude differs from the previously emitted point by more than
/// 180 degrees is moved by the whole number of turns that brings it closest to that point, so consecutive points of
/// the result never differ by more than 180 degrees. Without the flag the points are copied as is.
///
/// If `closed` is set and the last point is not equal to the first one, the first point is appended at the end. The
/// appended point is not moved.
pub fn normalize_path(
    points: &[GeoPoint2d],
    crosses_date_line: bool,
    closed: bool,
) -> Vec<GeoPoint2d> {
    let mut normalized: Vec<GeoPoint2d> = Vec::with_capacity(points.len() + 1);

    for point in points {
        let next = match normalized.last() {
            Some(prev) if crosses_date_line && (point.lon() - prev.lon()).abs() > 180.0 => {
                let turns = ((point.lon() - prev.lon()) / 360.0).round();
                point.shift_lon(-360.0 * turns)
            }
            _ => *point,
        };

        normalized.push(next);
    }

    close_ring(&mut normalized, closed);
    normalized
}

fn close_ring(points: &mut Vec<GeoPoint2d>, closed: bool) {
    if !closed {
        return;
    }

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first != last {
            points.push(*first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostyle_types::latlon;

    fn path() -> Vec<GeoPoint2d> {
        vec![
            latlon!(0.0, 170.0),
            latlon!(5.0, -175.0),
            latlon!(10.0, -165.0),
            latlon!(5.0, 175.0),
        ]
    }

    #[test]
    fn identity_without_crossing() {
        let path = path();
        assert_eq!(normalize_path(&path, false, false), path);
    }

    #[test]
    fn closing_without_crossing() {
        let path = path();
        let normalized = normalize_path(&path, false, true);

        assert_eq!(normalized.len(), path.len() + 1);
        assert_eq!(&normalized[..path.len()], &path[..]);
        assert_eq!(normalized.last(), path.first());
    }

    #[test]
    fn crossing_path_is_contiguous() {
        let normalized = normalize_path(&path(), true, true);

        assert_eq!(
            normalized,
            vec![
                latlon!(0.0, 170.0),
                latlon!(5.0, 185.0),
                latlon!(10.0, 195.0),
                latlon!(5.0, 175.0),
                latlon!(0.0, 170.0),
            ]
        );

        for pair in normalized.windows(2) {
            assert!((pair[1].lon() - pair[0].lon()).abs() <= 180.0);
        }
    }

    #[test]
    fn crossing_paths_keep_neighbours_close() {
        let paths = [
            vec![170.0, -170.0, 5.0],
            vec![170.0, -170.0, 5.0, 100.0, -100.0],
            vec![-170.0, 170.0, -5.0],
            vec![179.0, -179.0, 179.0, -179.0],
            vec![160.0, -90.0, 0.0, 90.0, -160.0],
        ];

        for lons in paths {
            let path: Vec<_> = lons.iter().map(|&lon| latlon!(0.0, lon)).collect();
            let normalized = normalize_path(&path, true, false);

            assert_eq!(normalized.len(), path.len());
            for pair in normalized.windows(2) {
                assert!(
                    (pair[1].lon() - pair[0].lon()).abs() <= 180.0,
                    "{lons:?} -> {normalized:?}"
                );
            }
            for (out, point) in normalized.iter().zip(&path) {
                let turns = (out.lon() - point.lon()) / 360.0;
                assert_eq!(turns, turns.round());
                assert_eq!(out.lat(), point.lat());
            }
        }

        let normalized = normalize_path(
            &[latlon!(0.0, 170.0), latlon!(0.0, -170.0), latlon!(0.0, 5.0)],
            true,
            false,
        );
        assert_eq!(
            normalized,
            vec![latlon!(0.0, 170.0), latlon!(0.0, 190.0), latlon!(0.0, 365.0)]
        );
    }

    #[test]
    fn crossing_from_west() {
        let path = [latlon!(0.0, -170.0), latlon!(0.0, 170.0)];
        assert_eq!(
            normalize_path(&path, true, false),
            vec![latlon!(0.0, -170.0), latlon!(0.0, -190.0)]
        );
    }

    #[test]
    fn closing_is_idempotent() {
        let closed = normalize_path(&path(), false, true);
        assert_eq!(normalize_path(&closed, false, true), closed);

        let closed = normalize_path(&path(), true, true);
        assert_eq!(normalize_path(&closed, true, true), closed);
    }

    #[test]
    fn empty_path() {
        assert!(normalize_path(&[], true, true).is_empty());
    }
}

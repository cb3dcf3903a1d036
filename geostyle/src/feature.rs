//! Vector features built from overlay items. A feature is the geometry payload of a GeoJSON source in the style.

use crate::circle::circle_ring;
use crate::dateline::normalize_path;
use crate::error::GeostyleError;
use crate::item::{IdScheme, ItemKind, MapPolygon, MapPolyline, MapRectangle, OverlayItem};
use geojson::feature::Id;
use geojson::{JsonObject, Value};
use geostyle_types::cartesian::Point2d;
use geostyle_types::geo::impls::GeoPoint2d;
use geostyle_types::geo::{GeoPoint, GeoRect, Projection};

/// Sequence of coordinates: a ring or a path.
pub type Coordinates = Vec<GeoPoint2d>;
/// Set of rings of one polygon (outer boundary first, then holes), or set of paths.
pub type CoordinatesCollection = Vec<Coordinates>;
/// Set of polygons or of path sets.
pub type CoordinatesCollections = Vec<CoordinatesCollection>;

/// Type of the feature geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FeatureType {
    /// Points. Every coordinate is a separate point.
    Point,
    /// Lines. Every coordinate sequence is a separate line.
    LineString,
    /// Polygons. Every collection is a separate polygon.
    Polygon,
}

/// Geometry with the id of the item it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Geometry type.
    pub feature_type: FeatureType,
    /// Coordinates of the geometry.
    pub geometry: CoordinatesCollections,
    /// Id of the feature. Equal to the id of the layer and the source created for it.
    pub id: String,
}

impl Feature {
    /// Creates a new feature.
    pub fn new(feature_type: FeatureType, geometry: CoordinatesCollections, id: String) -> Self {
        Self {
            feature_type,
            geometry,
            id,
        }
    }

    /// GeoJSON geometry value of the feature. Single geometries are represented as `Point`, `LineString` and
    /// `Polygon`, several ones as `MultiPoint`, `MultiLineString` and `MultiPolygon`.
    pub fn geojson_value(&self) -> Value {
        match self.feature_type {
            FeatureType::Point => {
                let mut points: Vec<Vec<f64>> = self
                    .geometry
                    .iter()
                    .flatten()
                    .flatten()
                    .map(position)
                    .collect();
                if points.len() == 1 {
                    Value::Point(points.remove(0))
                } else {
                    Value::MultiPoint(points)
                }
            }
            FeatureType::LineString => {
                let mut lines: Vec<Vec<Vec<f64>>> = self
                    .geometry
                    .iter()
                    .flatten()
                    .map(|line| line.iter().map(position).collect())
                    .collect();
                if lines.len() == 1 {
                    Value::LineString(lines.remove(0))
                } else {
                    Value::MultiLineString(lines)
                }
            }
            FeatureType::Polygon => {
                let mut polygons: Vec<Vec<Vec<Vec<f64>>>> = self
                    .geometry
                    .iter()
                    .map(|polygon| {
                        polygon
                            .iter()
                            .map(|ring| ring.iter().map(position).collect())
                            .collect()
                    })
                    .collect();
                if polygons.len() == 1 {
                    Value::Polygon(polygons.remove(0))
                } else {
                    Value::MultiPolygon(polygons)
                }
            }
        }
    }

    /// JSON representation of the feature as a GeoJSON `Feature` object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(JsonObject::from(&geojson::Feature::from(self)))
    }
}

impl From<&Feature> for geojson::Feature {
    fn from(feature: &Feature) -> Self {
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(feature.geojson_value())),
            id: Some(Id::String(feature.id.clone())),
            properties: None,
            foreign_members: None,
        }
    }
}

fn position(point: &GeoPoint2d) -> Vec<f64> {
    vec![point.lon(), point.lat()]
}

/// Builds the feature to draw the `item` with.
///
/// The `projection` is used to approximate circles around the poles (see [`circle_ring`]).
///
/// Returns [`GeostyleError::UnsupportedItemKind`] for the kinds of items that cannot be drawn by the style.
pub fn build_feature<P>(
    item: &OverlayItem,
    ids: &IdScheme,
    projection: &P,
) -> Result<Feature, GeostyleError>
where
    P: Projection<InPoint = GeoPoint2d, OutPoint = Point2d> + ?Sized,
{
    let id = ids.item_id(item);
    let feature = match &item.kind {
        ItemKind::Rectangle(rectangle) => rectangle_feature(rectangle, id),
        ItemKind::Circle(circle) => Feature::new(
            FeatureType::Polygon,
            vec![vec![circle_ring(&circle.center, circle.radius, projection)]],
            id,
        ),
        ItemKind::Polygon(polygon) => polygon_feature(polygon, id),
        ItemKind::Polyline(polyline) => polyline_feature(polyline, id),
        kind @ (ItemKind::Quick(_) | ItemKind::Custom) => {
            log::warn!("Unsupported map item type: {}", kind.name());
            return Err(GeostyleError::UnsupportedItemKind(kind.name()));
        }
    };

    Ok(feature)
}

fn rectangle_feature(rectangle: &MapRectangle, id: String) -> Feature {
    let rect = &rectangle.rect;
    let bottom_left = rect.bottom_left();
    let top_left = rect.top_left();
    let mut bottom_right = rect.bottom_right();
    let mut top_right = rect.top_right();

    if rect.crosses_date_line() {
        bottom_right = bottom_right.shift_lon(360.0);
        top_right = top_right.shift_lon(360.0);
    }

    Feature::new(
        FeatureType::Polygon,
        vec![vec![vec![
            bottom_left,
            bottom_right,
            top_right,
            top_left,
            bottom_left,
        ]]],
        id,
    )
}

fn polygon_feature(polygon: &MapPolygon, id: String) -> Feature {
    let crosses_date_line = GeoRect::from_path(&polygon.perimeter)
        .is_some_and(|bbox| bbox.crosses_date_line());

    let mut rings = Vec::with_capacity(polygon.holes.len() + 1);
    rings.push(normalize_path(&polygon.perimeter, crosses_date_line, true));
    rings.extend(
        polygon
            .holes
            .iter()
            .map(|hole| normalize_path(hole, crosses_date_line, true)),
    );

    Feature::new(FeatureType::Polygon, vec![rings], id)
}

fn polyline_feature(polyline: &MapPolyline, id: String) -> Feature {
    let crosses_date_line =
        GeoRect::from_path(&polyline.path).is_some_and(|bbox| bbox.crosses_date_line());

    Feature::new(
        FeatureType::LineString,
        vec![vec![normalize_path(&polyline.path, crosses_date_line, false)]],
        id,
    )
}

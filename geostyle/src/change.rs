//! Atomic changes of the style tree and their generation from overlay items.
//!
//! Adding an item produces, in this order: the layer, the GeoJSON source with the item geometry, the paint properties
//! and the layout properties of the layer. Removing an item produces removal of its layer followed by removal of its
//! source, since the renderer refuses to remove a source that is still used by a layer.
//!
//! Change lists must be applied in the order they are generated.

use crate::error::GeostyleError;
use crate::feature::{build_feature, Feature, FeatureType};
use crate::item::{FillStyle, IdScheme, ItemKind, LineStyle, OverlayItem};
use crate::style::{LayerParams, LayerType, SourceParams, StyleTree};
use geostyle_types::cartesian::Point2d;
use geostyle_types::geo::impls::GeoPoint2d;
use geostyle_types::geo::Projection;
use serde_json::{json, Value};

/// Single mutation of the style tree.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleChange {
    /// Adds a layer, optionally below the layer with id `before`.
    AddLayer {
        /// Layer definition.
        params: LayerParams,
        /// Id of the layer to insert the new one before.
        before: Option<String>,
    },
    /// Removes a layer.
    RemoveLayer {
        /// Layer id.
        id: String,
    },
    /// Adds a source or replaces the data of an existing one.
    AddSource {
        /// Source id.
        id: String,
        /// Source definition.
        params: SourceParams,
    },
    /// Removes a source.
    RemoveSource {
        /// Source id.
        id: String,
    },
    /// Sets a paint property of a layer.
    SetPaintProperty {
        /// Layer id.
        layer: String,
        /// Property name, e.g. `fill-color`.
        property: String,
        /// Property value.
        value: Value,
    },
    /// Sets a layout property of a layer.
    SetLayoutProperty {
        /// Layer id.
        layer: String,
        /// Property name, e.g. `visibility`.
        property: String,
        /// Property value.
        value: Value,
    },
    /// Replaces the filter of a layer.
    SetFilter {
        /// Layer id.
        layer: String,
        /// Filter expression.
        filter: Value,
    },
    /// Registers an image.
    AddImage {
        /// Name the image is referenced by.
        name: String,
        /// Encoded image.
        image: Vec<u8>,
    },
}

impl StyleChange {
    /// Applies the change to the style.
    pub fn apply<S: StyleTree + ?Sized>(&self, style: &mut S) {
        match self {
            StyleChange::AddLayer { params, before } => style.add_layer(params, before.as_deref()),
            StyleChange::RemoveLayer { id } => style.remove_layer(id),
            StyleChange::AddSource { id, params } => style.update_source(id, params),
            StyleChange::RemoveSource { id } => style.remove_source(id),
            StyleChange::SetPaintProperty {
                layer,
                property,
                value,
            } => style.set_paint_property(layer, property, value),
            StyleChange::SetLayoutProperty {
                layer,
                property,
                value,
            } => style.set_layout_property(layer, property, value),
            StyleChange::SetFilter { layer, filter } => style.set_filter(layer, filter),
            StyleChange::AddImage { name, image } => style.add_image(name, image),
        }
    }

    /// Layer addition drawing the `feature` from the source with the same id.
    pub fn add_layer_from_feature(feature: &Feature, before: Option<&str>) -> Self {
        let layer_type = match feature.feature_type {
            FeatureType::Point => LayerType::Circle,
            FeatureType::LineString => LayerType::Line,
            FeatureType::Polygon => LayerType::Fill,
        };

        StyleChange::AddLayer {
            params: LayerParams::new(feature.id.clone(), layer_type, Some(feature.id.clone())),
            before: before.map(str::to_string),
        }
    }

    /// GeoJSON source addition containing the `feature`.
    pub fn add_source_from_feature(feature: Feature) -> Self {
        StyleChange::AddSource {
            id: feature.id.clone(),
            params: SourceParams::feature(feature),
        }
    }

    fn paint(layer: &str, property: &str, value: Value) -> Self {
        StyleChange::SetPaintProperty {
            layer: layer.to_string(),
            property: property.to_string(),
            value,
        }
    }

    fn layout(layer: &str, property: &str, value: Value) -> Self {
        StyleChange::SetLayoutProperty {
            layer: layer.to_string(),
            property: property.to_string(),
            value,
        }
    }
}

/// What has changed in an item already added to the style.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ItemChange {
    /// Geometry of the item has changed.
    Geometry,
    /// Colors, line width or opacity of the item have changed.
    Paint,
    /// Visibility of the item has changed.
    Visibility,
}

/// Changes adding the `item` to the style.
///
/// The layer of the item is inserted below the layer with id `before`, if it is given.
///
/// Either all changes needed to draw the item are returned, or an error if the item cannot be drawn by the style.
pub fn add_map_item<P>(
    item: &OverlayItem,
    ids: &IdScheme,
    projection: &P,
    before: Option<&str>,
) -> Result<Vec<StyleChange>, GeostyleError>
where
    P: Projection<InPoint = GeoPoint2d, OutPoint = Point2d> + ?Sized,
{
    let feature = build_feature(item, ids, projection)?;

    let mut changes = vec![
        StyleChange::add_layer_from_feature(&feature, before),
        StyleChange::add_source_from_feature(feature),
    ];
    changes.extend(paint_properties(item, ids)?);
    changes.extend(layout_properties(item, ids));

    Ok(changes)
}

/// Changes removing the layer and the source of the `item` from the style.
pub fn remove_map_item(item: &OverlayItem, ids: &IdScheme) -> Vec<StyleChange> {
    let id = ids.item_id(item);

    vec![
        StyleChange::RemoveLayer { id: id.clone() },
        StyleChange::RemoveSource { id },
    ]
}

/// Changes updating the style after the item has changed.
pub fn update_map_item<P>(
    item: &OverlayItem,
    ids: &IdScheme,
    projection: &P,
    change: ItemChange,
) -> Result<Vec<StyleChange>, GeostyleError>
where
    P: Projection<InPoint = GeoPoint2d, OutPoint = Point2d> + ?Sized,
{
    match change {
        ItemChange::Geometry => Ok(vec![add_source_from_item(item, ids, projection)?]),
        ItemChange::Paint => paint_properties(item, ids),
        ItemChange::Visibility => Ok(layout_properties(item, ids)),
    }
}

/// Source addition with the current geometry of the item. Applied to a style already containing the source, it
/// replaces the source data.
pub fn add_source_from_item<P>(
    item: &OverlayItem,
    ids: &IdScheme,
    projection: &P,
) -> Result<StyleChange, GeostyleError>
where
    P: Projection<InPoint = GeoPoint2d, OutPoint = Point2d> + ?Sized,
{
    Ok(StyleChange::add_source_from_feature(build_feature(
        item, ids, projection,
    )?))
}

/// Paint properties of the item layer.
///
/// Area items set `fill-opacity`, `fill-color` and `fill-outline-color`, polylines set `line-opacity`, `line-color`
/// and `line-width`. Opacity is the alpha of the color multiplied by the item opacity.
pub fn paint_properties(
    item: &OverlayItem,
    ids: &IdScheme,
) -> Result<Vec<StyleChange>, GeostyleError> {
    let id = ids.item_id(item);

    let changes = match &item.kind {
        ItemKind::Rectangle(rectangle) => fill_paint(&id, item.opacity, &rectangle.fill),
        ItemKind::Circle(circle) => fill_paint(&id, item.opacity, &circle.fill),
        ItemKind::Polygon(polygon) => fill_paint(&id, item.opacity, &polygon.fill),
        ItemKind::Polyline(polyline) => line_paint(&id, item.opacity, &polyline.line),
        kind @ (ItemKind::Quick(_) | ItemKind::Custom) => {
            log::warn!("Unsupported map item type: {}", kind.name());
            return Err(GeostyleError::UnsupportedItemKind(kind.name()));
        }
    };

    Ok(changes)
}

fn fill_paint(id: &str, opacity: f64, fill: &FillStyle) -> Vec<StyleChange> {
    vec![
        StyleChange::paint(id, "fill-opacity", json!(fill.color.alpha_f() * opacity)),
        StyleChange::paint(id, "fill-color", json!(fill.color.to_css())),
        StyleChange::paint(id, "fill-outline-color", json!(fill.border.color.to_css())),
    ]
}

fn line_paint(id: &str, opacity: f64, line: &LineStyle) -> Vec<StyleChange> {
    vec![
        StyleChange::paint(id, "line-opacity", json!(line.color.alpha_f() * opacity)),
        StyleChange::paint(id, "line-color", json!(line.color.to_css())),
        StyleChange::paint(id, "line-width", json!(line.width)),
    ]
}

/// Layout properties of the item layer: `line-cap` and `line-join` for polylines, and `visibility` for all items.
/// Visibility always comes last.
pub fn layout_properties(item: &OverlayItem, ids: &IdScheme) -> Vec<StyleChange> {
    let id = ids.item_id(item);
    let mut changes = Vec::with_capacity(3);

    if let ItemKind::Polyline(_) = item.kind {
        changes.push(StyleChange::layout(&id, "line-cap", json!("square")));
        changes.push(StyleChange::layout(&id, "line-join", json!("bevel")));
    }

    let visibility = if item.visible { "visible" } else { "none" };
    changes.push(StyleChange::layout(&id, "visibility", json!(visibility)));

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{MapCircle, MapPolygon, MapPolyline, MapQuickItem, MapRectangle};
    use crate::style::{GeoJsonData, MemoryStyle};
    use crate::Color;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geostyle_types::geo::impls::projection::NormalizedWebMercator;
    use geostyle_types::geo::GeoRect;
    use geostyle_types::latlon;

    fn projection() -> NormalizedWebMercator<GeoPoint2d, Point2d> {
        NormalizedWebMercator::new()
    }

    fn polyline() -> OverlayItem {
        OverlayItem::new(ItemKind::Polyline(MapPolyline {
            path: vec![latlon!(0.0, 0.0), latlon!(10.0, 10.0)],
            line: LineStyle {
                color: Color::RED.with_alpha(51),
                width: 3.0,
            },
        }))
        .with_name("route1")
    }

    fn crossing_rectangle() -> OverlayItem {
        OverlayItem::new(ItemKind::Rectangle(MapRectangle {
            rect: GeoRect::new(170.0, -10.0, -170.0, 10.0).unwrap(),
            fill: FillStyle {
                color: Color::BLUE,
                border: LineStyle::default(),
            },
        }))
    }

    fn supported_items() -> Vec<OverlayItem> {
        vec![
            polyline(),
            crossing_rectangle(),
            OverlayItem::new(ItemKind::Circle(MapCircle {
                center: latlon!(50.0, 50.0),
                radius: 1000.0,
                fill: FillStyle::default(),
            })),
            OverlayItem::new(ItemKind::Polygon(MapPolygon {
                perimeter: vec![latlon!(0.0, 0.0), latlon!(0.0, 1.0), latlon!(1.0, 1.0)],
                holes: vec![],
                fill: FillStyle::default(),
            }))
            .with_visible(false),
        ]
    }

    fn property(change: &StyleChange) -> (&str, &str, &Value) {
        match change {
            StyleChange::SetPaintProperty {
                layer,
                property,
                value,
            }
            | StyleChange::SetLayoutProperty {
                layer,
                property,
                value,
            } => (layer.as_str(), property.as_str(), value),
            other => panic!("not a property change: {other:?}"),
        }
    }

    #[test]
    fn polyline_add_path() {
        let item = polyline();
        let changes = add_map_item(&item, &IdScheme::default(), &projection(), None).unwrap();

        assert_eq!(changes.len(), 8);
        assert_matches!(
            &changes[0],
            StyleChange::AddLayer { params, before: None }
                if params.id == "overlay-route1"
                    && params.layer_type == LayerType::Line
                    && params.source.as_deref() == Some("overlay-route1")
        );
        assert_matches!(
            &changes[1],
            StyleChange::AddSource { id, params: SourceParams::GeoJson { data: GeoJsonData::Feature(feature) } }
                if id == "overlay-route1" && feature.feature_type == FeatureType::LineString
        );

        let paint: Vec<_> = changes[2..5].iter().map(property).collect();
        assert_eq!(paint[0].0, "overlay-route1");
        assert_eq!(paint[0].1, "line-opacity");
        assert_abs_diff_eq!(paint[0].2.as_f64().unwrap(), 0.2, epsilon = 1e-9);
        assert_eq!(paint[1].1, "line-color");
        assert_eq!(paint[1].2, &json!("rgba(255, 0, 0, 0.2)"));
        assert_eq!((paint[2].1, paint[2].2), ("line-width", &json!(3.0)));
        assert!(changes[2..5]
            .iter()
            .all(|c| matches!(c, StyleChange::SetPaintProperty { .. })));

        let layout: Vec<_> = changes[5..].iter().map(property).collect();
        assert_eq!(
            layout,
            vec![
                ("overlay-route1", "line-cap", &json!("square")),
                ("overlay-route1", "line-join", &json!("bevel")),
                ("overlay-route1", "visibility", &json!("visible")),
            ]
        );
        assert!(changes[5..]
            .iter()
            .all(|c| matches!(c, StyleChange::SetLayoutProperty { .. })));
    }

    #[test]
    fn fill_paint_properties() {
        let item = crossing_rectangle().with_opacity(0.5);
        let changes = paint_properties(&item, &IdScheme::default()).unwrap();
        let paint: Vec<_> = changes.iter().map(property).collect();

        assert_eq!(paint[0].1, "fill-opacity");
        assert_abs_diff_eq!(paint[0].2.as_f64().unwrap(), 0.5);
        assert_eq!(paint[1].1, "fill-color");
        assert_eq!(paint[1].2, &json!("rgba(0, 0, 255, 1)"));
        assert_eq!(paint[2].1, "fill-outline-color");
        assert_eq!(paint[2].2, &json!("rgba(0, 0, 0, 1)"));
    }

    #[test]
    fn add_path_order() {
        let ids = IdScheme::default();
        for item in supported_items() {
            let changes = add_map_item(&item, &ids, &projection(), Some("labels")).unwrap();
            let id = ids.item_id(&item);

            assert!(changes.len() >= 4);
            assert_matches!(&changes[0], StyleChange::AddLayer { params, before: Some(before) } if params.id == id && before == "labels");
            assert_matches!(&changes[1], StyleChange::AddSource { id: source, .. } if *source == id);
            assert!(changes[2..].iter().all(|change| property(change).0 == id));
            assert_eq!(property(&changes[changes.len() - 1]).1, "visibility");
        }
    }

    #[test]
    fn invisible_item() {
        let item = crossing_rectangle().with_visible(false);
        let changes = layout_properties(&item, &IdScheme::default());

        assert_eq!(changes.len(), 1);
        assert_eq!(property(&changes[0]).1, "visibility");
        assert_eq!(property(&changes[0]).2, &json!("none"));
    }

    #[test]
    fn remove_path_matches_add_path() {
        let ids = IdScheme::default();
        for item in supported_items() {
            let added = add_map_item(&item, &ids, &projection(), None).unwrap();
            let StyleChange::AddLayer { params, .. } = &added[0] else {
                panic!("first change must add the layer");
            };

            assert_eq!(
                remove_map_item(&item, &ids),
                vec![
                    StyleChange::RemoveLayer {
                        id: params.id.clone()
                    },
                    StyleChange::RemoveSource {
                        id: params.id.clone()
                    },
                ]
            );
        }
    }

    #[test]
    fn unsupported_item_produces_no_changes() {
        let item = OverlayItem::new(ItemKind::Quick(MapQuickItem {
            coordinate: latlon!(0.0, 0.0),
        }));

        assert_matches!(
            add_map_item(&item, &IdScheme::default(), &projection(), None),
            Err(GeostyleError::UnsupportedItemKind(_))
        );
        assert_eq!(remove_map_item(&item, &IdScheme::default()).len(), 2);
    }

    #[test]
    fn update_paths() {
        let ids = IdScheme::default();
        let item = polyline();

        let geometry = update_map_item(&item, &ids, &projection(), ItemChange::Geometry).unwrap();
        assert_matches!(geometry.as_slice(), [StyleChange::AddSource { id, .. }] if id == "overlay-route1");

        let paint = update_map_item(&item, &ids, &projection(), ItemChange::Paint).unwrap();
        assert_eq!(paint, paint_properties(&item, &ids).unwrap());

        let visibility = update_map_item(&item, &ids, &projection(), ItemChange::Visibility).unwrap();
        assert_eq!(visibility, layout_properties(&item, &ids));
    }

    #[test]
    fn apply_add_and_remove() {
        let ids = IdScheme::default();
        let item = crossing_rectangle();
        let id = ids.item_id(&item);
        let mut style = MemoryStyle::new();

        for change in add_map_item(&item, &ids, &projection(), None).unwrap() {
            change.apply(&mut style);
        }

        assert_eq!(style.layer_ids(), vec![id.as_str()]);
        assert!(style.source(&id).is_some());
        assert_eq!(style.paint_property(&id, "fill-color"), Some(&json!("rgba(0, 0, 255, 1)")));
        assert_eq!(style.layout_property(&id, "visibility"), Some(&json!("visible")));

        for change in remove_map_item(&item, &ids) {
            change.apply(&mut style);
        }

        assert!(style.layer_ids().is_empty());
        assert!(style.source(&id).is_none());
    }

    #[test]
    fn apply_filter_and_image() {
        let mut style = MemoryStyle::new();
        let style_tree: &mut dyn StyleTree = &mut style;

        StyleChange::AddLayer {
            params: LayerParams::new("roads", LayerType::Line, None),
            before: None,
        }
        .apply(style_tree);
        StyleChange::SetFilter {
            layer: "roads".into(),
            filter: json!(["==", "class", "motorway"]),
        }
        .apply(style_tree);
        StyleChange::AddImage {
            name: "pin".into(),
            image: vec![0x89, 0x50],
        }
        .apply(style_tree);

        assert_eq!(
            style.layer("roads").and_then(|l| l.filter.clone()),
            Some(json!(["==", "class", "motorway"]))
        );
        assert_eq!(style.image("pin"), Some(&[0x89u8, 0x50][..]));
    }
}

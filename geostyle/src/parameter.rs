//! Style parameters declared by the application on the map: sources, layers and properties that are not derived
//! from overlay items but added to the style directly.
//!
//! Parameter properties use camelCase names (`fillColor`), which are converted into the kebab-case names of the
//! style specification (`fill-color`).

use crate::change::StyleChange;
use crate::error::GeostyleError;
use crate::style::{GeoJsonData, LayerParams, LayerType, SourceParams};
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

lazy_static! {
    static ref CAMEL_CASE_BOUNDARY: Regex =
        Regex::new("([a-z0-9])([A-Z])").expect("static regex is valid");
}

/// Kind of a map parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Adds a source. Properties: `name`, `sourceType` (`geojson`, `vector` or `raster`), `data` for GeoJSON
    /// sources, `url`, `tiles` and `tileSize` for tiled sources.
    Source,
    /// Adds a layer. Properties: `name`, `layerType`, optional `source`, `sourceLayer` and `before`. Other properties
    /// are copied into the layer definition.
    Layer,
    /// Sets paint properties of the `layer`. Every other property is a paint property.
    Paint,
    /// Sets layout properties of the `layer`. Every other property is a layout property.
    Layout,
    /// Sets the `filter` of the `layer`.
    Filter,
    /// Adds an image with the given `name`. The `sprite` is either a base64 string or an array of bytes.
    Image,
}

/// Style parameter of the map.
///
/// ```
/// use geostyle::parameter::{MapParameter, ParameterKind};
///
/// let parameter: MapParameter = serde_json::from_str(
///     r#"{"type": "paint", "layer": "water", "fillColor": "blue"}"#,
/// ).unwrap();
/// assert_eq!(parameter.kind, ParameterKind::Paint);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapParameter {
    /// Kind of the parameter.
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    /// Properties of the parameter.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl MapParameter {
    /// Creates a new parameter.
    pub fn new(kind: ParameterKind, properties: Map<String, Value>) -> Self {
        Self { kind, properties }
    }

    fn str(&self, name: &str) -> Result<&str, GeostyleError> {
        self.optional_str(name)?.ok_or_else(|| {
            GeostyleError::InvalidParameter(format!("{:?} parameter requires `{name}`", self.kind))
        })
    }

    fn optional_str(&self, name: &str) -> Result<Option<&str>, GeostyleError> {
        match self.properties.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(other) => Err(GeostyleError::InvalidParameter(format!(
                "`{name}` must be a string, got {other}"
            ))),
        }
    }

    fn value(&self, name: &str) -> Result<&Value, GeostyleError> {
        self.properties.get(name).ok_or_else(|| {
            GeostyleError::InvalidParameter(format!("{:?} parameter requires `{name}`", self.kind))
        })
    }

    fn other_properties<'a>(
        &'a self,
        consumed: &'a [&'a str],
    ) -> impl Iterator<Item = (String, &'a Value)> + 'a {
        self.properties
            .iter()
            .filter(move |(name, _)| !consumed.contains(&name.as_str()))
            .map(|(name, value)| (to_kebab_case(name), value))
    }
}

/// Converts a camelCase property name into the kebab-case one: `fillOutlineColor` -> `fill-outline-color`.
pub fn to_kebab_case(name: &str) -> String {
    CAMEL_CASE_BOUNDARY
        .replace_all(name, "$1-$2")
        .to_lowercase()
}

/// Changes adding the parameter to the style.
pub fn add_map_parameter(parameter: &MapParameter) -> Result<Vec<StyleChange>, GeostyleError> {
    let change = match parameter.kind {
        ParameterKind::Source => StyleChange::AddSource {
            id: parameter.str("name")?.to_string(),
            params: source_params(parameter)?,
        },
        ParameterKind::Layer => {
            const CONSUMED: &[&str] = &["name", "layerType", "source", "sourceLayer", "before"];

            let mut params = LayerParams::new(
                parameter.str("name")?,
                parameter.str("layerType")?.parse::<LayerType>()?,
                parameter.optional_str("source")?.map(str::to_string),
            );
            params.source_layer = parameter.optional_str("sourceLayer")?.map(str::to_string);
            params.extra.extend(
                parameter
                    .other_properties(CONSUMED)
                    .map(|(name, value)| (name, value.clone())),
            );

            StyleChange::AddLayer {
                params,
                before: parameter.optional_str("before")?.map(str::to_string),
            }
        }
        ParameterKind::Paint | ParameterKind::Layout => {
            let layer = parameter.str("layer")?;
            return Ok(parameter
                .other_properties(&["layer"])
                .map(|(property, value)| {
                    if parameter.kind == ParameterKind::Paint {
                        StyleChange::SetPaintProperty {
                            layer: layer.to_string(),
                            property,
                            value: value.clone(),
                        }
                    } else {
                        StyleChange::SetLayoutProperty {
                            layer: layer.to_string(),
                            property,
                            value: value.clone(),
                        }
                    }
                })
                .collect());
        }
        ParameterKind::Filter => StyleChange::SetFilter {
            layer: parameter.str("layer")?.to_string(),
            filter: parameter.value("filter")?.clone(),
        },
        ParameterKind::Image => StyleChange::AddImage {
            name: parameter.str("name")?.to_string(),
            image: sprite_bytes(parameter.value("sprite")?)?,
        },
    };

    Ok(vec![change])
}

/// Changes removing the parameter from the style. Only sources and layers can be removed; other parameters leave the
/// style as is.
pub fn remove_map_parameter(parameter: &MapParameter) -> Result<Vec<StyleChange>, GeostyleError> {
    Ok(match parameter.kind {
        ParameterKind::Layer => vec![StyleChange::RemoveLayer {
            id: parameter.str("name")?.to_string(),
        }],
        ParameterKind::Source => vec![StyleChange::RemoveSource {
            id: parameter.str("name")?.to_string(),
        }],
        _ => vec![],
    })
}

fn source_params(parameter: &MapParameter) -> Result<SourceParams, GeostyleError> {
    let source_type = parameter.str("sourceType")?;
    let url = parameter.optional_str("url")?.map(str::to_string);

    let params = match source_type {
        "geojson" => {
            let data = match parameter.value("data")? {
                Value::String(data) => serde_json::from_str(data)?,
                data => data.clone(),
            };
            SourceParams::GeoJson {
                data: GeoJsonData::Json(data),
            }
        }
        "vector" => SourceParams::Vector {
            url,
            tiles: tiles(parameter)?,
        },
        "raster" => SourceParams::Raster {
            url,
            tiles: tiles(parameter)?,
            tile_size: match parameter.properties.get("tileSize") {
                None => None,
                Some(size) => Some(
                    size.as_u64()
                        .and_then(|size| u32::try_from(size).ok())
                        .ok_or_else(|| {
                            GeostyleError::InvalidParameter(format!("invalid tile size {size}"))
                        })?,
                ),
            },
        },
        other => {
            return Err(GeostyleError::InvalidParameter(format!(
                "unsupported source type `{other}`"
            )))
        }
    };

    Ok(params)
}

fn tiles(parameter: &MapParameter) -> Result<Vec<String>, GeostyleError> {
    match parameter.properties.get("tiles") {
        None => Ok(vec![]),
        Some(Value::Array(tiles)) => tiles
            .iter()
            .map(|tile| {
                tile.as_str().map(str::to_string).ok_or_else(|| {
                    GeostyleError::InvalidParameter(format!("tile url must be a string, got {tile}"))
                })
            })
            .collect(),
        Some(other) => Err(GeostyleError::InvalidParameter(format!(
            "`tiles` must be an array, got {other}"
        ))),
    }
}

fn sprite_bytes(sprite: &Value) -> Result<Vec<u8>, GeostyleError> {
    match sprite {
        Value::String(encoded) => base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|err| GeostyleError::InvalidParameter(format!("invalid sprite: {err}"))),
        Value::Array(bytes) => bytes
            .iter()
            .map(|byte| {
                byte.as_u64()
                    .and_then(|byte| u8::try_from(byte).ok())
                    .ok_or_else(|| {
                        GeostyleError::InvalidParameter(format!("invalid sprite byte {byte}"))
                    })
            })
            .collect(),
        other => Err(GeostyleError::InvalidParameter(format!(
            "sprite must be a base64 string or an array of bytes, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn parameter(value: Value) -> MapParameter {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn kebab_case() {
        assert_eq!(to_kebab_case("fillOutlineColor"), "fill-outline-color");
        assert_eq!(to_kebab_case("line-width"), "line-width");
        assert_eq!(to_kebab_case("visibility"), "visibility");
        assert_eq!(to_kebab_case("text3dPosition"), "text3d-position");
    }

    #[test]
    fn geojson_source() {
        let source = parameter(json!({
            "type": "source",
            "name": "points",
            "sourceType": "geojson",
            "data": "{\"type\": \"FeatureCollection\", \"features\": []}",
        }));

        assert_eq!(
            add_map_parameter(&source).unwrap(),
            vec![StyleChange::AddSource {
                id: "points".into(),
                params: SourceParams::GeoJson {
                    data: GeoJsonData::Json(json!({"type": "FeatureCollection", "features": []})),
                },
            }]
        );
        assert_eq!(
            remove_map_parameter(&source).unwrap(),
            vec![StyleChange::RemoveSource {
                id: "points".into()
            }]
        );
    }

    #[test]
    fn raster_source() {
        let source = parameter(json!({
            "type": "source",
            "name": "sat",
            "sourceType": "raster",
            "tiles": ["https://tiles/{z}/{x}/{y}.jpg"],
            "tileSize": 512,
        }));

        assert_matches!(
            add_map_parameter(&source).unwrap().as_slice(),
            [StyleChange::AddSource { id, params: SourceParams::Raster { url: None, tiles, tile_size: Some(512) } }]
                if id == "sat" && tiles.len() == 1
        );
    }

    #[test]
    fn invalid_sources() {
        let unknown = parameter(json!({"type": "source", "name": "a", "sourceType": "video"}));
        assert_matches!(add_map_parameter(&unknown), Err(GeostyleError::InvalidParameter(_)));

        let unnamed = parameter(json!({"type": "source", "sourceType": "vector"}));
        assert_matches!(add_map_parameter(&unnamed), Err(GeostyleError::InvalidParameter(_)));

        let bad_data = parameter(json!({"type": "source", "name": "a", "sourceType": "geojson", "data": "{"}));
        assert_matches!(add_map_parameter(&bad_data), Err(GeostyleError::Config(_)));
    }

    #[test]
    fn layer() {
        let layer = parameter(json!({
            "type": "layer",
            "name": "roads",
            "layerType": "line",
            "source": "osm",
            "sourceLayer": "transportation",
            "before": "labels",
            "minZoom": 6,
        }));

        let changes = add_map_parameter(&layer).unwrap();
        assert_matches!(
            changes.as_slice(),
            [StyleChange::AddLayer { params, before: Some(before) }]
                if params.id == "roads"
                    && params.layer_type == LayerType::Line
                    && params.source.as_deref() == Some("osm")
                    && params.source_layer.as_deref() == Some("transportation")
                    && params.extra.get("min-zoom") == Some(&json!(6))
                    && params.extra.len() == 1
                    && before == "labels"
        );

        assert_eq!(
            remove_map_parameter(&layer).unwrap(),
            vec![StyleChange::RemoveLayer { id: "roads".into() }]
        );
    }

    #[test]
    fn unknown_layer_type() {
        let layer = parameter(json!({"type": "layer", "name": "a", "layerType": "polygon"}));
        assert_matches!(add_map_parameter(&layer), Err(GeostyleError::UnknownLayerType(_)));
    }

    #[test]
    fn paint_and_layout() {
        let paint = parameter(json!({
            "type": "paint",
            "layer": "water",
            "fillColor": "blue",
            "fillOpacity": 0.5,
        }));

        assert_eq!(
            add_map_parameter(&paint).unwrap(),
            vec![
                StyleChange::SetPaintProperty {
                    layer: "water".into(),
                    property: "fill-color".into(),
                    value: json!("blue"),
                },
                StyleChange::SetPaintProperty {
                    layer: "water".into(),
                    property: "fill-opacity".into(),
                    value: json!(0.5),
                },
            ]
        );
        assert!(remove_map_parameter(&paint).unwrap().is_empty());

        let layout = parameter(json!({"type": "layout", "layer": "water", "visibility": "none"}));
        assert_eq!(
            add_map_parameter(&layout).unwrap(),
            vec![StyleChange::SetLayoutProperty {
                layer: "water".into(),
                property: "visibility".into(),
                value: json!("none"),
            }]
        );
    }

    #[test]
    fn filter() {
        let filter = parameter(json!({
            "type": "filter",
            "layer": "roads",
            "filter": ["==", "class", "motorway"],
        }));

        assert_eq!(
            add_map_parameter(&filter).unwrap(),
            vec![StyleChange::SetFilter {
                layer: "roads".into(),
                filter: json!(["==", "class", "motorway"]),
            }]
        );
    }

    #[test]
    fn image() {
        let base64 = parameter(json!({"type": "image", "name": "pin", "sprite": "AQID"}));
        let bytes = parameter(json!({"type": "image", "name": "pin", "sprite": [1, 2, 3]}));

        for image in [base64, bytes] {
            assert_eq!(
                add_map_parameter(&image).unwrap(),
                vec![StyleChange::AddImage {
                    name: "pin".into(),
                    image: vec![1, 2, 3],
                }]
            );
        }

        let invalid = parameter(json!({"type": "image", "name": "pin", "sprite": [1, 300]}));
        assert_matches!(add_map_parameter(&invalid), Err(GeostyleError::InvalidParameter(_)));
    }
}

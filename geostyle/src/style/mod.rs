//! The retained-mode style of the renderer: layers, sources and images, and the interface to mutate it.
//!
//! The renderer owns its style tree. This crate only describes changes to it (see [`StyleChange`](crate::StyleChange))
//! and applies them through the [`StyleTree`] trait. [`MemoryStyle`] is an implementation of the trait that keeps the
//! tree in memory with the same semantics as the native renderer.

use crate::error::GeostyleError;
use crate::feature::Feature;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

mod memory;

pub use memory::{MemoryStyle, StyleLayer};

/// Mutable style of a map renderer.
///
/// Implementations must tolerate operations that refer to missing objects or re-create existing ones, treating
/// them as no-ops or overwrites. The calls are never reordered or validated before being passed to the tree.
pub trait StyleTree {
    /// Adds a layer. If `before` is set and a layer with that id exists, the new layer is inserted below it,
    /// otherwise it is put on top of all other layers.
    fn add_layer(&mut self, params: &LayerParams, before: Option<&str>);
    /// Removes the layer with the given id.
    fn remove_layer(&mut self, id: &str);
    /// Adds a source, or replaces the data of an existing source with the same id.
    fn update_source(&mut self, id: &str, params: &SourceParams);
    /// Removes the source with the given id.
    fn remove_source(&mut self, id: &str);
    /// Sets a paint property of a layer.
    fn set_paint_property(&mut self, layer: &str, property: &str, value: &Value);
    /// Sets a layout property of a layer.
    fn set_layout_property(&mut self, layer: &str, property: &str, value: &Value);
    /// Replaces the filter expression of a layer.
    fn set_filter(&mut self, layer: &str, filter: &Value);
    /// Registers an image that can be referenced by layers by its `name`.
    fn add_image(&mut self, name: &str, image: &[u8]);
}

/// Type of a style layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerType {
    /// Filled polygons.
    Fill,
    /// Lines.
    Line,
    /// Icons and labels.
    Symbol,
    /// Points drawn as circles.
    Circle,
    /// Density of points.
    Heatmap,
    /// Extruded polygons.
    FillExtrusion,
    /// Raster images.
    Raster,
    /// Terrain shading.
    Hillshade,
    /// Map background.
    Background,
}

impl LayerType {
    /// Name of the type in the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Fill => "fill",
            LayerType::Line => "line",
            LayerType::Symbol => "symbol",
            LayerType::Circle => "circle",
            LayerType::Heatmap => "heatmap",
            LayerType::FillExtrusion => "fill-extrusion",
            LayerType::Raster => "raster",
            LayerType::Hillshade => "hillshade",
            LayerType::Background => "background",
        }
    }
}

impl FromStr for LayerType {
    type Err = GeostyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "fill" => LayerType::Fill,
            "line" => LayerType::Line,
            "symbol" => LayerType::Symbol,
            "circle" => LayerType::Circle,
            "heatmap" => LayerType::Heatmap,
            "fill-extrusion" => LayerType::FillExtrusion,
            "raster" => LayerType::Raster,
            "hillshade" => LayerType::Hillshade,
            "background" => LayerType::Background,
            other => return Err(GeostyleError::UnknownLayerType(other.to_string())),
        })
    }
}

impl Display for LayerType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of a style layer. Serializes into the layer object of the style JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerParams {
    /// Layer id.
    pub id: String,
    /// Layer type.
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    /// Id of the source the layer draws.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Layer of a vector tile source the layer draws.
    #[serde(rename = "source-layer", skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    /// Other layer properties, e.g. `minzoom`, `paint` or `layout`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LayerParams {
    /// Creates a layer drawing the given source.
    pub fn new(id: impl Into<String>, layer_type: LayerType, source: Option<String>) -> Self {
        Self {
            id: id.into(),
            layer_type,
            source,
            source_layer: None,
            extra: Map::new(),
        }
    }
}

/// Data of a GeoJSON source.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonData {
    /// Single feature built from an overlay item.
    Feature(Feature),
    /// Arbitrary GeoJSON object.
    Json(Value),
}

impl Serialize for GeoJsonData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GeoJsonData::Feature(feature) => feature.to_json().serialize(serializer),
            GeoJsonData::Json(value) => value.serialize(serializer),
        }
    }
}

/// Definition of a style source. Serializes into the source object of the style JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceParams {
    /// Source with inline GeoJSON data.
    GeoJson {
        /// Source data.
        data: GeoJsonData,
    },
    /// Vector tiles source.
    Vector {
        /// URL of the TileJSON document.
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// Tile URL templates.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tiles: Vec<String>,
    },
    /// Raster tiles source.
    Raster {
        /// URL of the TileJSON document.
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// Tile URL templates.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tiles: Vec<String>,
        /// Size of the tiles in pixels.
        #[serde(rename = "tileSize", skip_serializing_if = "Option::is_none")]
        tile_size: Option<u32>,
    },
}

impl SourceParams {
    /// GeoJSON source containing the feature.
    pub fn feature(feature: Feature) -> Self {
        Self::GeoJson {
            data: GeoJsonData::Feature(feature),
        }
    }
}

use super::{LayerParams, SourceParams, StyleTree};
use ahash::{HashMap, HashMapExt};
use serde_json::{Map, Value};

/// Layer stored in a [`MemoryStyle`].
#[derive(Debug, Clone, PartialEq)]
pub struct StyleLayer {
    /// Definition the layer was added with.
    pub params: LayerParams,
    /// Paint properties set after the layer was added.
    pub paint: Map<String, Value>,
    /// Layout properties set after the layer was added.
    pub layout: Map<String, Value>,
    /// Filter expression.
    pub filter: Option<Value>,
}

impl StyleLayer {
    fn new(params: LayerParams) -> Self {
        Self {
            params,
            paint: Map::new(),
            layout: Map::new(),
            filter: None,
        }
    }
}

/// Style tree kept in memory.
///
/// Follows the rules of the native renderer for conflicting operations:
/// * adding a layer with an id that is already used is ignored;
/// * a layer added before a missing layer is put on top;
/// * removing a missing layer or source does nothing;
/// * a source cannot be removed while a layer uses it;
/// * properties and filters of missing layers are ignored;
/// * sources and images are overwritten.
///
/// Ignored operations are reported with warnings in the log.
#[derive(Debug, Default, Clone)]
pub struct MemoryStyle {
    layers: Vec<StyleLayer>,
    sources: HashMap<String, SourceParams>,
    images: HashMap<String, Vec<u8>>,
}

impl MemoryStyle {
    /// Creates an empty style.
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            sources: HashMap::new(),
            images: HashMap::new(),
        }
    }

    /// Ids of the layers from the bottom one to the top one.
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.params.id.as_str()).collect()
    }

    /// Returns the layer with the given id.
    pub fn layer(&self, id: &str) -> Option<&StyleLayer> {
        self.layers.iter().find(|l| l.params.id == id)
    }

    /// Returns the source with the given id.
    pub fn source(&self, id: &str) -> Option<&SourceParams> {
        self.sources.get(id)
    }

    /// Number of sources in the style.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Returns the image registered with the given name.
    pub fn image(&self, name: &str) -> Option<&[u8]> {
        self.images.get(name).map(|image| image.as_slice())
    }

    /// Value of a paint property of a layer.
    pub fn paint_property(&self, layer: &str, property: &str) -> Option<&Value> {
        self.layer(layer)?.paint.get(property)
    }

    /// Value of a layout property of a layer.
    pub fn layout_property(&self, layer: &str, property: &str) -> Option<&Value> {
        self.layer(layer)?.layout.get(property)
    }

    fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.params.id == id)
    }

    fn layer_mut(&mut self, id: &str) -> Option<&mut StyleLayer> {
        let layer = self.layers.iter_mut().find(|l| l.params.id == id);
        if layer.is_none() {
            log::warn!("Layer {id} does not exist");
        }

        layer
    }
}

impl StyleTree for MemoryStyle {
    fn add_layer(&mut self, params: &LayerParams, before: Option<&str>) {
        if self.layer_index(&params.id).is_some() {
            log::warn!("Layer {} already exists", params.id);
            return;
        }

        let index = before
            .and_then(|before| self.layer_index(before))
            .unwrap_or(self.layers.len());
        self.layers.insert(index, StyleLayer::new(params.clone()));
    }

    fn remove_layer(&mut self, id: &str) {
        if let Some(index) = self.layer_index(id) {
            self.layers.remove(index);
        }
    }

    fn update_source(&mut self, id: &str, params: &SourceParams) {
        self.sources.insert(id.to_string(), params.clone());
    }

    fn remove_source(&mut self, id: &str) {
        let in_use = self
            .layers
            .iter()
            .any(|l| l.params.source.as_deref() == Some(id));
        if in_use {
            log::warn!("Source {id} is in use, cannot remove");
            return;
        }

        self.sources.remove(id);
    }

    fn set_paint_property(&mut self, layer: &str, property: &str, value: &Value) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.paint.insert(property.to_string(), value.clone());
        }
    }

    fn set_layout_property(&mut self, layer: &str, property: &str, value: &Value) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.layout.insert(property.to_string(), value.clone());
        }
    }

    fn set_filter(&mut self, layer: &str, filter: &Value) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.filter = Some(filter.clone());
        }
    }

    fn add_image(&mut self, name: &str, image: &[u8]) {
        self.images.insert(name.to_string(), image.to_vec());
    }
}

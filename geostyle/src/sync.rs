//! Queue of style changes collected from the map scene and applied to the style in batches.

use crate::change::{add_map_item, remove_map_item, update_map_item, ItemChange, StyleChange};
use crate::error::GeostyleError;
use crate::item::{IdScheme, OverlayItem};
use crate::parameter::{add_map_parameter, remove_map_parameter, MapParameter};
use crate::style::StyleTree;
use geostyle_types::cartesian::Point2d;
use geostyle_types::geo::impls::projection::NormalizedWebMercator;
use geostyle_types::geo::impls::GeoPoint2d;
use geostyle_types::geo::Projection;
use serde::Deserialize;

/// Configuration of [`StyleSync`].
///
/// ```
/// use geostyle::SyncConfig;
///
/// let config = SyncConfig::from_json(r#"{"items_insert_before": "labels"}"#).unwrap();
/// assert_eq!(config.id_prefix, "overlay");
/// assert_eq!(config.items_insert_before.as_deref(), Some("labels"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Prefix of the layer and source ids created for items.
    pub id_prefix: String,
    /// Id of the style layer the item layers are inserted below. If not set, or the layer does not exist, item
    /// layers are put on top of the style.
    pub items_insert_before: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            id_prefix: IdScheme::DEFAULT_PREFIX.to_string(),
            items_insert_before: None,
        }
    }
}

impl SyncConfig {
    /// Reads the configuration from a JSON string. Missing fields get default values.
    pub fn from_json(json: &str) -> Result<Self, GeostyleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Id scheme for the items.
    pub fn id_scheme(&self) -> IdScheme {
        IdScheme::new(&self.id_prefix)
    }
}

/// Collects style changes for the scene events and applies them to a style tree.
///
/// Events usually come from the scene while the style is being rendered, so changes are only queued here.
/// [`StyleSync::sync`] then applies everything queued so far in the order the events came.
///
/// ```
/// use geostyle::geostyle_types::latlon;
/// use geostyle::item::{ItemKind, MapPolyline, OverlayItem};
/// use geostyle::{MemoryStyle, StyleSync, SyncConfig};
///
/// let mut sync = StyleSync::new(SyncConfig::default());
/// let route = OverlayItem::new(ItemKind::Polyline(MapPolyline {
///     path: vec![latlon!(10.0, 20.0), latlon!(11.0, 21.0)],
///     line: Default::default(),
/// }))
/// .with_name("route");
/// sync.add_item(&route);
///
/// let mut style = MemoryStyle::new();
/// sync.sync(&mut style);
///
/// assert_eq!(style.layer_ids(), vec!["overlay-route"]);
/// ```
pub struct StyleSync<P = NormalizedWebMercator<GeoPoint2d, Point2d>> {
    ids: IdScheme,
    insert_before: Option<String>,
    projection: P,
    pending: Vec<StyleChange>,
}

impl StyleSync {
    /// Creates an empty queue projecting circles with the Web Mercator projection.
    pub fn new(config: SyncConfig) -> Self {
        Self::with_projection(config, NormalizedWebMercator::new())
    }
}

impl<P> StyleSync<P>
where
    P: Projection<InPoint = GeoPoint2d, OutPoint = Point2d>,
{
    /// Creates an empty queue with the given map projection.
    pub fn with_projection(config: SyncConfig, projection: P) -> Self {
        Self {
            ids: config.id_scheme(),
            insert_before: config.items_insert_before,
            projection,
            pending: Vec::new(),
        }
    }

    /// Id scheme used for the items.
    pub fn ids(&self) -> &IdScheme {
        &self.ids
    }

    /// Queues the changes adding the item to the style. Returns false if the item cannot be drawn by the style and
    /// was skipped.
    pub fn add_item(&mut self, item: &OverlayItem) -> bool {
        match add_map_item(
            item,
            &self.ids,
            &self.projection,
            self.insert_before.as_deref(),
        ) {
            Ok(changes) => {
                self.pending.extend(changes);
                true
            }
            Err(err) => {
                log::warn!("Skipping map item {}: {err}", self.ids.item_id(item));
                false
            }
        }
    }

    /// Queues the changes removing the item from the style.
    pub fn remove_item(&mut self, item: &OverlayItem) {
        if !item.kind.is_supported() {
            log::debug!("Item {} was never added to the style", self.ids.item_id(item));
            return;
        }

        self.pending.extend(remove_map_item(item, &self.ids));
    }

    /// Queues the changes updating the style after the given property of the item changed.
    pub fn item_changed(&mut self, item: &OverlayItem, change: ItemChange) -> bool {
        match update_map_item(item, &self.ids, &self.projection, change) {
            Ok(changes) => {
                self.pending.extend(changes);
                true
            }
            Err(err) => {
                log::warn!("Skipping update of map item {}: {err}", self.ids.item_id(item));
                false
            }
        }
    }

    /// Queues the changes adding the parameter to the style. Nothing is queued if the parameter is invalid.
    pub fn add_parameter(&mut self, parameter: &MapParameter) -> Result<(), GeostyleError> {
        let changes = add_map_parameter(parameter).map_err(|err| {
            log::warn!("Skipping map parameter: {err}");
            err
        })?;
        self.pending.extend(changes);

        Ok(())
    }

    /// Queues the changes removing the parameter from the style.
    pub fn remove_parameter(&mut self, parameter: &MapParameter) -> Result<(), GeostyleError> {
        let changes = remove_map_parameter(parameter).map_err(|err| {
            log::warn!("Skipping map parameter: {err}");
            err
        })?;
        self.pending.extend(changes);

        Ok(())
    }

    /// Changes waiting to be applied.
    pub fn pending(&self) -> &[StyleChange] {
        &self.pending
    }

    /// Returns true if there are changes waiting to be applied.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drops all queued changes without applying them.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Applies all queued changes to the style and empties the queue. Returns the number of applied changes.
    pub fn sync<S: StyleTree + ?Sized>(&mut self, style: &mut S) -> usize {
        let count = self.pending.len();
        if count == 0 {
            return 0;
        }

        for change in self.pending.drain(..) {
            change.apply(style);
        }

        log::debug!("Applied {count} style changes");
        count
    }
}

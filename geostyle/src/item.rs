//! Map overlay items: the scene elements that are translated into style layers.

use crate::Color;
use geostyle_types::geo::impls::GeoPoint2d;
use geostyle_types::geo::GeoRect;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique integer identifying an item for the whole life of the process.
///
/// Used as the item identity when the item has no object name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(u64);

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

impl ItemHandle {
    /// Returns a new handle, never returned before.
    pub fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// Numeric value of the handle.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Style of a line or of an outline of an area.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    /// Color of the line.
    pub color: Color,
    /// Width of the line in pixels.
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Style of an area item.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FillStyle {
    /// Fill color.
    pub color: Color,
    /// Outline.
    pub border: LineStyle,
}

/// Rectangle aligned to meridians and parallels.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRectangle {
    /// Extent of the rectangle.
    pub rect: GeoRect,
    /// Fill and outline.
    pub fill: FillStyle,
}

/// Circle on the surface of the Earth.
#[derive(Debug, Clone, PartialEq)]
pub struct MapCircle {
    /// Center of the circle.
    pub center: GeoPoint2d,
    /// Radius in meters.
    pub radius: f64,
    /// Fill and outline.
    pub fill: FillStyle,
}

/// Polygon with optional holes.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPolygon {
    /// Outer boundary. Does not need to repeat the first point at the end.
    pub perimeter: Vec<GeoPoint2d>,
    /// Inner boundaries.
    pub holes: Vec<Vec<GeoPoint2d>>,
    /// Fill and outline.
    pub fill: FillStyle,
}

/// Open path.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPolyline {
    /// Points of the path.
    pub path: Vec<GeoPoint2d>,
    /// Line style.
    pub line: LineStyle,
}

/// Screen-space widget anchored to a geographic coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct MapQuickItem {
    /// Anchor coordinate.
    pub coordinate: GeoPoint2d,
}

/// Geometry and style of an item, depending on its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// See [`MapRectangle`].
    Rectangle(MapRectangle),
    /// See [`MapCircle`].
    Circle(MapCircle),
    /// See [`MapPolygon`].
    Polygon(MapPolygon),
    /// See [`MapPolyline`].
    Polyline(MapPolyline),
    /// Widget items are drawn by the scene itself, not by the style.
    Quick(MapQuickItem),
    /// Item with application defined drawing.
    Custom,
}

impl ItemKind {
    /// Name of the kind, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Rectangle(_) => "MapRectangle",
            ItemKind::Circle(_) => "MapCircle",
            ItemKind::Polygon(_) => "MapPolygon",
            ItemKind::Polyline(_) => "MapPolyline",
            ItemKind::Quick(_) => "MapQuickItem",
            ItemKind::Custom => "CustomMapItem",
        }
    }

    /// Returns true for the kinds that can be drawn with style layers.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            ItemKind::Rectangle(_) | ItemKind::Circle(_) | ItemKind::Polygon(_) | ItemKind::Polyline(_)
        )
    }
}

/// Element of the map scene.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    /// Name given to the item by the application. May be empty.
    pub object_name: String,
    /// Process-unique handle of the item.
    pub handle: ItemHandle,
    /// Opacity multiplier applied on top of the colors opacity.
    pub opacity: f64,
    /// Whether the item is shown.
    pub visible: bool,
    /// Geometry and style.
    pub kind: ItemKind,
}

impl OverlayItem {
    /// Creates a new visible, fully opaque item with a fresh handle and no name.
    pub fn new(kind: ItemKind) -> Self {
        Self {
            object_name: String::new(),
            handle: ItemHandle::next(),
            opacity: 1.0,
            visible: true,
            kind,
        }
    }

    /// Sets the object name of the item.
    pub fn with_name(self, object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            ..self
        }
    }

    /// Sets the visibility of the item.
    pub fn with_visible(self, visible: bool) -> Self {
        Self { visible, ..self }
    }

    /// Sets the opacity multiplier of the item.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }
}

/// Derives style layer and source ids from items.
///
/// The id of an item is `"<prefix>-<object name>"`, or `"<prefix>-<handle>"` if the item has no name. It stays the
/// same for the whole life of the item, so the layer and source created for an item can later be found and removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScheme {
    prefix: String,
}

impl IdScheme {
    /// Prefix used by [`IdScheme::default`].
    pub const DEFAULT_PREFIX: &'static str = "overlay";

    /// Creates a new scheme with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Prefix of the ids.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Layer and source id of the item.
    pub fn item_id(&self, item: &OverlayItem) -> String {
        if item.object_name.is_empty() {
            format!("{}-{}", self.prefix, item.handle.get())
        } else {
            format!("{}-{}", self.prefix, item.object_name)
        }
    }
}

impl Default for IdScheme {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

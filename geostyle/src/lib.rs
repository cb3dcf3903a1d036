//! Geostyle keeps the style of a retained-mode map renderer in sync with the overlay items of a map scene.
//!
//! Rectangles, circles, polygons and polylines placed on the map are converted into GeoJSON features, and each
//! feature is drawn by a dedicated style layer and source. The crate does not touch the renderer directly: it
//! produces lists of [`StyleChange`]s, which are later applied to anything implementing [`StyleTree`].
//!
//! # Quick start
//!
//! ```
//! use geostyle::geostyle_types::geo::GeoRect;
//! use geostyle::item::{FillStyle, ItemKind, MapRectangle, OverlayItem};
//! use geostyle::{Color, MemoryStyle, StyleSync, SyncConfig};
//!
//! let area = OverlayItem::new(ItemKind::Rectangle(MapRectangle {
//!     rect: GeoRect::new(170.0, -10.0, -170.0, 10.0).unwrap(),
//!     fill: FillStyle {
//!         color: Color::RED.with_alpha(128),
//!         ..Default::default()
//!     },
//! }))
//! .with_name("area");
//!
//! let mut sync = StyleSync::new(SyncConfig::default());
//! sync.add_item(&area);
//!
//! let mut style = MemoryStyle::new();
//! sync.sync(&mut style);
//!
//! assert_eq!(style.layer_ids(), vec!["overlay-area"]);
//! assert!(style.source("overlay-area").is_some());
//! ```
//!
//! # Main components
//!
//! * [`feature`] builds GeoJSON features from items, unwrapping geometries crossing the date line
//!   ([`dateline`]) and approximating circles ([`circle`]).
//! * [`change`] turns item lifecycle events into style changes.
//! * [`parameter`] turns application-defined style parameters into style changes.
//! * [`StyleSync`] queues the changes and applies them in batches.
//! * [`style`] describes the style tree the changes are applied to.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod change;
pub mod circle;
mod color;
pub mod dateline;
pub mod error;
pub mod feature;
pub mod item;
pub mod parameter;
pub mod style;
mod sync;

pub use change::StyleChange;
pub use color::Color;
pub use error::GeostyleError;
pub use feature::Feature;
pub use style::{MemoryStyle, StyleTree};
pub use sync::{StyleSync, SyncConfig};

// Reexport geostyle_types
pub use geostyle_types;

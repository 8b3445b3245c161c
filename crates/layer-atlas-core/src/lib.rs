//! Core library for packing document layers and building texture-atlas mappings.
//!
//! - Packer: binary-tree grower (`TreePacker`), deterministic, right-then-down search
//! - Layout: `plan_layout` turns layer geometry into per-layer move deltas plus a set of layers that did not fit
//! - Atlas: `build_mappings` / `build_atlas_record` produce normalized UV regions with sanitized names
//! - Host: `LayerHost` applies a plan to a live document; `Document` is an in-memory host
//!
//! Quick example:
//! ```ignore
//! use layer_atlas_core::prelude::*;
//! # fn main() -> layer_atlas_core::Result<()> {
//! let mut doc = Document::new(100, 100, vec![
//!     LayerGeometry::new("Background", Bounds::new(0, 0, 100, 100)).locked(),
//!     LayerGeometry::new("icon", Bounds::new(40, 40, 60, 60)),
//! ]);
//! let plan = fit_layers(&mut doc, &LayoutConfig::default())?;
//! let atlas = build_atlas_record(doc.width, doc.height, &doc.layers, &AtlasConfig::default())?;
//! println!("moved {} layers, {} parts", plan.moves.len(), atlas.parts().len());
//! # Ok(()) }
//! ```

pub mod atlas;
pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod layout;
pub mod model;
pub mod naming;
pub mod packer;

pub use atlas::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use host::*;
pub use layout::*;
pub use model::*;
pub use packer::*;

/// Convenience prelude for common types and functions.
/// Importing `layer_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::atlas::{AtlasRecord, AtlasSlot, build_atlas_record, build_mappings};
    pub use crate::config::{AtlasConfig, CanvasGrowth, LayoutConfig, LayoutConfigBuilder, SortOrder};
    pub use crate::host::{Document, LayerHost, apply_plan, fit_layers};
    pub use crate::layout::{LayoutPlan, plan_layout};
    pub use crate::model::{
        AtlasRegion, BACKGROUND_LAYER, Block, Bounds, FittedBlock, LayerGeometry, LayerMove,
        PackStats, Placement, Rect, UvRect,
    };
    pub use crate::packer::{FitResult, Packer, tree::TreePacker};
}

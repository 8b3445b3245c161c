//! Boundary between the pure layout core and a live document.
//!
//! The core only computes plans. A `LayerHost` owns the document and performs the moves.

use crate::config::LayoutConfig;
use crate::error::{LayerAtlasError, Result};
use crate::layout::{LayoutPlan, plan_layout};
use crate::model::{BACKGROUND_LAYER, Bounds, LayerGeometry};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// A document that can report layer geometry and move layers.
pub trait LayerHost {
    /// Document size in pixels.
    fn surface_size(&self) -> (u32, u32);
    /// Snapshot of the current layer geometry, in document order.
    fn layers(&self) -> Vec<LayerGeometry>;
    fn has_layer(&self, id: &str) -> bool;
    /// Checks that `move_layer(id, dx, dy)` would succeed, without moving anything.
    fn check_move(&self, id: &str, _dx: i64, _dy: i64) -> Result<()> {
        if self.has_layer(id) {
            Ok(())
        } else {
            Err(LayerAtlasError::UnknownLayer(id.to_string()))
        }
    }
    fn move_layer(&mut self, id: &str, dx: i64, dy: i64) -> Result<()>;
}

/// In-memory document: the simplest `LayerHost`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub width: u32,
    pub height: u32,
    pub layers: Vec<LayerGeometry>,
}

impl Document {
    pub fn new(width: u32, height: u32, layers: Vec<LayerGeometry>) -> Self {
        Self {
            width,
            height,
            layers,
        }
    }

    /// Layer named `name`. Hidden or locked layers sharing the name of a packable one are
    /// skipped, so this is the layer a plan move refers to.
    pub fn layer(&self, name: &str) -> Option<&LayerGeometry> {
        self.position(name).map(|i| &self.layers[i])
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.layers
            .iter()
            .position(|l| l.name == name && l.is_packable())
            .or_else(|| self.layers.iter().position(|l| l.name == name))
    }

    fn moved_bounds(&self, id: &str, dx: i64, dy: i64) -> Result<(usize, Bounds)> {
        let i = self
            .position(id)
            .ok_or_else(|| LayerAtlasError::UnknownLayer(id.to_string()))?;
        let bounds = self.layers[i].bounds.translated(dx, dy).ok_or_else(|| {
            LayerAtlasError::MoveOutOfRange {
                id: id.to_string(),
                dx,
                dy,
            }
        })?;
        Ok((i, bounds))
    }
}

impl LayerHost for Document {
    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn layers(&self) -> Vec<LayerGeometry> {
        self.layers.clone()
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.name == id)
    }

    fn check_move(&self, id: &str, dx: i64, dy: i64) -> Result<()> {
        self.moved_bounds(id, dx, dy).map(|_| ())
    }

    fn move_layer(&mut self, id: &str, dx: i64, dy: i64) -> Result<()> {
        let (i, bounds) = self.moved_bounds(id, dx, dy)?;
        self.layers[i].bounds = bounds;
        Ok(())
    }
}

/// Applies every move of `plan` to `host`. Returns the number of layers moved.
///
/// Every move is checked before the first one is made, so an unknown id or an
/// out-of-range move leaves the document untouched.
#[instrument(skip_all, fields(moves = plan.moves.len()))]
pub fn apply_plan<H: LayerHost + ?Sized>(host: &mut H, plan: &LayoutPlan) -> Result<usize> {
    for m in &plan.moves {
        host.check_move(&m.id, m.dx, m.dy)?;
    }
    for m in &plan.moves {
        debug!(id = %m.id, dx = m.dx, dy = m.dy, "move layer");
        host.move_layer(&m.id, m.dx, m.dy)?;
    }
    Ok(plan.moves.len())
}

/// Plans a layout from the host's current geometry, then applies it.
pub fn fit_layers<H: LayerHost + ?Sized>(host: &mut H, cfg: &LayoutConfig) -> Result<LayoutPlan> {
    let (w, h) = host.surface_size();
    let layers = host.layers();
    let plan = plan_layout(&layers, w, h, cfg)?;
    apply_plan(host, &plan)?;
    if !plan.failed.is_empty() {
        warn!(failed = ?plan.failed, "could not fit layers");
    }
    Ok(plan)
}

/// Problems with the base layer that make a raster export unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundIssue {
    Missing,
    Hidden,
}

/// Checks that a visible `Background` layer exists.
pub fn check_background(layers: &[LayerGeometry]) -> Option<BackgroundIssue> {
    match layers.iter().find(|l| l.name == BACKGROUND_LAYER) {
        None => Some(BackgroundIssue::Missing),
        Some(l) if !l.visible => Some(BackgroundIssue::Hidden),
        Some(_) => None,
    }
}

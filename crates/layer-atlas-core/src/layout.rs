use crate::config::{LayoutConfig, SortOrder};
use crate::error::{LayerAtlasError, Result};
use crate::model::{Block, LayerGeometry, LayerMove, PackStats};
use crate::packer::tree::TreePacker;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, instrument};

/// Result of a layout run: what the host should move, and what did not fit.
///
/// `moves` follow the input layer order. An empty `moves` with a non-empty `failed`
/// is a valid outcome ("nothing fit"), not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutPlan {
    pub moves: Vec<LayerMove>,
    pub failed: BTreeSet<String>,
    /// Final packer canvas (may exceed the surface when growth is allowed).
    pub canvas: (u32, u32),
    pub stats: PackStats,
}

impl LayoutPlan {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn move_for(&self, id: &str) -> Option<&LayerMove> {
        self.moves.iter().find(|m| m.id == id)
    }
}

/// Plans a packed layout for `layers` on a `surface_width` x `surface_height` document.
///
/// Notes:
/// - Only visible, unlocked layers are packed.
/// - Each block is the layer bounds plus `cfg.spacing` on both axes.
/// - Layers are never touched; the returned deltas are applied by the host.
#[instrument(skip_all, fields(layers = layers.len()))]
pub fn plan_layout(
    layers: &[LayerGeometry],
    surface_width: u32,
    surface_height: u32,
    cfg: &LayoutConfig,
) -> Result<LayoutPlan> {
    if surface_width == 0 || surface_height == 0 {
        return Err(LayerAtlasError::InvalidDimensions {
            width: surface_width,
            height: surface_height,
        });
    }
    let ceiling = cfg.ceiling(surface_width, surface_height)?;

    let eligible: Vec<&LayerGeometry> = layers.iter().filter(|l| l.is_packable()).collect();
    let mut blocks = build_blocks(&eligible, cfg.spacing)?;
    debug!(
        total = layers.len(),
        eligible = blocks.len(),
        spacing = cfg.spacing,
        "prepared blocks"
    );
    sort_blocks(&mut blocks, cfg.sort_order);

    let mut packer = TreePacker::new(surface_width, surface_height)?;
    if let Some((max_w, max_h)) = ceiling {
        packer = packer.with_max_size(max_w, max_h);
    }
    let result = packer.fit(&blocks)?;

    let positions: HashMap<&str, (u32, u32)> = result
        .fits
        .iter()
        .filter_map(|f| f.fit.map(|p| (f.block.id.as_str(), (p.x, p.y))))
        .collect();

    let mut moves = Vec::with_capacity(positions.len());
    let mut failed = BTreeSet::new();
    for layer in &eligible {
        match positions.get(layer.name.as_str()) {
            Some(&(x, y)) => moves.push(LayerMove {
                id: layer.name.clone(),
                dx: x as i64 - layer.bounds.left as i64,
                dy: y as i64 - layer.bounds.top as i64,
            }),
            None if layer.is_background() => {}
            None => {
                failed.insert(layer.name.clone());
            }
        }
    }

    let stats = result.stats();
    info!(
        moves = moves.len(),
        failed = failed.len(),
        canvas_w = result.width,
        canvas_h = result.height,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "layout planned"
    );
    Ok(LayoutPlan {
        moves,
        failed,
        canvas: (result.width, result.height),
        stats,
    })
}

/// Turns eligible layers into blocks (`bounds + spacing`, id = layer name).
pub fn build_blocks(layers: &[&LayerGeometry], spacing: u32) -> Result<Vec<Block>> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(layers.len());
    let mut blocks = Vec::with_capacity(layers.len());
    for layer in layers {
        if !seen.insert(layer.name.as_str()) {
            return Err(LayerAtlasError::DuplicateIdentifier(layer.name.clone()));
        }
        let w = layer.bounds.width() + spacing as i64;
        let h = layer.bounds.height() + spacing as i64;
        if w <= 0 || h <= 0 || w > u32::MAX as i64 || h > u32::MAX as i64 {
            return Err(LayerAtlasError::InvalidBlockDimensions {
                id: layer.name.clone(),
                width: w,
                height: h,
            });
        }
        blocks.push(Block::new(layer.name.clone(), w as u32, h as u32));
    }
    Ok(blocks)
}

/// Stable sort, so equal keys keep input order.
pub fn sort_blocks(blocks: &mut [Block], order: SortOrder) {
    match order {
        SortOrder::None => {}
        SortOrder::MaxSideDesc => blocks.sort_by(|a, b| b.max_side().cmp(&a.max_side())),
        SortOrder::AreaDesc => blocks.sort_by(|a, b| b.area().cmp(&a.area())),
        SortOrder::HeightDesc => blocks.sort_by(|a, b| b.height.cmp(&a.height)),
        SortOrder::WidthDesc => blocks.sort_by(|a, b| b.width.cmp(&a.width)),
        SortOrder::NameAsc => blocks.sort_by(|a, b| a.id.cmp(&b.id)),
    }
}

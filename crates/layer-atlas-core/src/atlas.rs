use crate::config::AtlasConfig;
use crate::error::{LayerAtlasError, Result};
use crate::model::{AtlasRegion, LayerGeometry, UvRect};
use crate::naming::PartNamer;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// One texture slot of an atlas record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtlasSlot {
    pub texture: String,
    pub parts: Vec<AtlasRegion>,
}

/// Atlas-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtlasMeta {
    pub app: String,
    pub version: String,
    /// Document size the UVs are normalized against.
    pub size: (u32, u32),
}

/// Engine-facing atlas: a full resolution slot and a lower resolution slot sharing one part list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtlasRecord {
    pub slots: Vec<AtlasSlot>,
    pub meta: AtlasMeta,
}

impl AtlasRecord {
    pub fn parts(&self) -> &[AtlasRegion] {
        self.slots.first().map(|s| s.parts.as_slice()).unwrap_or(&[])
    }
}

/// Maps every non-background layer to a normalized UV rectangle.
///
/// `width`/`height` are the document dimensions. Order follows `layers`. Values are not
/// clamped: a layer outside the canvas yields UVs outside `[0, 1]` and a warning.
#[instrument(skip_all, fields(width = width, height = height, layers = layers.len()))]
pub fn build_mappings(width: u32, height: u32, layers: &[LayerGeometry]) -> Result<Vec<AtlasRegion>> {
    if width == 0 || height == 0 {
        return Err(LayerAtlasError::InvalidDimensions { width, height });
    }
    let (w, h) = (width as f64, height as f64);
    let mut namer = PartNamer::new();
    let regions: Vec<AtlasRegion> = layers
        .iter()
        .filter(|l| !l.is_background())
        .map(|l| {
            let uv = UvRect {
                top: l.bounds.top as f64 / h,
                left: l.bounds.left as f64 / w,
                right: l.bounds.right as f64 / w,
                bottom: l.bounds.bottom as f64 / h,
            };
            if !uv.is_normalized() {
                warn!(layer = %l.name, ?uv, "layer extends beyond the canvas");
            }
            AtlasRegion {
                name: namer.name(&l.name),
                uv,
            }
        })
        .collect();
    Ok(regions)
}

/// Builds the two-slot atlas record (full and low resolution textures, identical parts).
pub fn build_atlas_record(
    width: u32,
    height: u32,
    layers: &[LayerGeometry],
    cfg: &AtlasConfig,
) -> Result<AtlasRecord> {
    cfg.validate()?;
    let parts = build_mappings(width, height, layers)?;
    let slots = vec![
        AtlasSlot {
            texture: cfg.texture_path.clone(),
            parts: parts.clone(),
        },
        AtlasSlot {
            texture: cfg.low_res_texture_path.clone(),
            parts,
        },
    ];
    Ok(AtlasRecord {
        slots,
        meta: AtlasMeta {
            app: "layer-atlas".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            size: (width, height),
        },
    })
}

/// Regions whose UVs fall outside `[0, 1]`.
pub fn out_of_range_regions(regions: &[AtlasRegion]) -> impl Iterator<Item = &AtlasRegion> {
    regions.iter().filter(|r| !r.uv.is_normalized())
}

use crate::model::{Block, FittedBlock, PackStats, Placement, Rect};

pub mod tree;

/// A packer places blocks onto a canvas.
///
/// Implementations must ensure no overlaps and keep every placement inside the canvas.
/// `pack` may return `None` if the block cannot be placed.
pub trait Packer {
    fn can_pack(&self, block: &Block) -> bool;
    fn pack(&mut self, block: &Block) -> Option<Placement>;
    /// Current canvas size; grows monotonically.
    fn canvas_size(&self) -> (u32, u32);
}

/// Output of one `fit` call: every input block (same order) with its optional placement.
#[derive(Debug, Clone)]
pub struct FitResult {
    pub fits: Vec<FittedBlock>,
    pub width: u32,
    pub height: u32,
}

impl FitResult {
    pub fn placed(&self) -> impl Iterator<Item = (&Block, Rect)> {
        self.fits
            .iter()
            .filter_map(|f| f.rect().map(|r| (&f.block, r)))
    }

    pub fn unplaced(&self) -> impl Iterator<Item = &Block> {
        self.fits
            .iter()
            .filter(|f| f.fit.is_none())
            .map(|f| &f.block)
    }

    pub fn stats(&self) -> PackStats {
        PackStats::from_fits(&self.fits, self.width, self.height)
    }
}

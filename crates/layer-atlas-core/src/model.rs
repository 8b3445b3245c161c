use serde::{Deserialize, Serialize};

/// Name of the base layer. It is never reported as unplaced and never mapped into the atlas.
pub const BACKGROUND_LAYER: &str = "Background";

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn x2(&self) -> u64 {
        self.x as u64 + self.w as u64
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn y2(&self) -> u64 {
        self.y as u64 + self.h as u64
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    /// True if the two rectangles share any interior area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !((self.x as u64) >= other.x2()
            || (other.x as u64) >= self.x2()
            || (self.y as u64) >= other.y2()
            || (other.y as u64) >= self.y2())
    }
    pub fn fits(&self, w: u32, h: u32) -> bool {
        self.w >= w && self.h >= h
    }
}

/// Layer bounding box in document pixels, top-left origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
    pub fn width(&self) -> i64 {
        self.right as i64 - self.left as i64
    }
    pub fn height(&self) -> i64 {
        self.bottom as i64 - self.top as i64
    }
    /// Bounds shifted by `(dx, dy)`, or `None` when an edge would leave the `i32` range.
    pub fn translated(&self, dx: i64, dy: i64) -> Option<Bounds> {
        let shift = |v: i32, d: i64| i32::try_from(v as i64 + d).ok();
        Some(Bounds {
            left: shift(self.left, dx)?,
            top: shift(self.top, dy)?,
            right: shift(self.right, dx)?,
            bottom: shift(self.bottom, dy)?,
        })
    }
}

/// Geometry of one document layer as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerGeometry {
    pub name: String,
    pub bounds: Bounds,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
}

fn default_true() -> bool {
    true
}

impl LayerGeometry {
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            bounds,
            visible: true,
            locked: false,
        }
    }
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
    /// Layers that take part in packing: visible and unlocked.
    pub fn is_packable(&self) -> bool {
        self.visible && !self.locked
    }
    pub fn is_background(&self) -> bool {
        self.name == BACKGROUND_LAYER
    }
}

/// A rectangle to pack. `id` must be unique within one packing call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl Block {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }
    pub fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }
}

/// Top-left position assigned to a block by the packer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// A block paired with its placement; `fit` is `None` when it could not be placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FittedBlock {
    pub block: Block,
    pub fit: Option<Placement>,
}

impl FittedBlock {
    /// Occupied rectangle, if placed.
    pub fn rect(&self) -> Option<Rect> {
        self.fit
            .map(|p| Rect::new(p.x, p.y, self.block.width, self.block.height))
    }
}

/// Statistics about one packing run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    pub num_blocks: usize,
    pub num_placed: usize,
    pub num_failed: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub canvas_area: u64,
    pub used_area: u64,
    /// used_area / canvas_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl PackStats {
    pub fn from_fits(fits: &[FittedBlock], canvas_width: u32, canvas_height: u32) -> Self {
        let num_placed = fits.iter().filter(|f| f.fit.is_some()).count();
        let used_area: u64 = fits
            .iter()
            .filter(|f| f.fit.is_some())
            .map(|f| f.block.area())
            .sum();
        let canvas_area = (canvas_width as u64) * (canvas_height as u64);
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        Self {
            num_blocks: fits.len(),
            num_placed,
            num_failed: fits.len() - num_placed,
            canvas_width,
            canvas_height,
            canvas_area,
            used_area,
            occupancy,
        }
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Canvas: {}x{}, Placed: {}/{}, Occupancy: {:.2}%, Used Area: {} px²",
            self.canvas_width,
            self.canvas_height,
            self.num_placed,
            self.num_blocks,
            self.occupancy * 100.0,
            self.used_area,
        )
    }

    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }
}

/// Translation the host should apply to one layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerMove {
    pub id: String,
    pub dx: i64,
    pub dy: i64,
}

/// Normalized UV rectangle. Values are nominally in `[0, 1]` but are never clamped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UvRect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl UvRect {
    pub fn is_normalized(&self) -> bool {
        [self.top, self.left, self.right, self.bottom]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

/// One named region of the atlas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtlasRegion {
    pub name: String,
    pub uv: UvRect,
}

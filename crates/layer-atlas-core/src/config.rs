//! Layout and atlas configuration.
//! Key notes:
//!   - `sort_order` decides insertion order; the tree packer is sensitive to it
//!   - `growth` decides how far the packer may grow the canvas past the document surface

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sorting orders for deterministic packing. All sorts are stable, so ties keep input order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    MaxSideDesc,
    AreaDesc,
    HeightDesc,
    WidthDesc,
    NameAsc,
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "area_desc" => Ok(Self::AreaDesc),
            "height_desc" => Ok(Self::HeightDesc),
            "width_desc" => Ok(Self::WidthDesc),
            "name_asc" => Ok(Self::NameAsc),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

/// How the packer may grow the canvas beyond the document surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CanvasGrowth {
    /// Canvas is capped at the surface; anything that would need growth is unplaced.
    Fixed,
    /// Canvas may grow up to `max_width` x `max_height`.
    Bounded,
    /// Canvas may grow without limit.
    Unbounded,
}

impl FromStr for CanvasGrowth {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "bounded" => Ok(Self::Bounded),
            "unbounded" => Ok(Self::Unbounded),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// Pixels added to both width and height of every layer before packing.
    #[serde(default)]
    pub spacing: u32,
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
    #[serde(default = "default_growth")]
    pub growth: CanvasGrowth,
    /// Growth ceiling for `CanvasGrowth::Bounded`.
    #[serde(default)]
    pub max_width: Option<u32>,
    #[serde(default)]
    pub max_height: Option<u32>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 0,
            sort_order: default_sort_order(),
            growth: default_growth(),
            max_width: None,
            max_height: None,
        }
    }
}

impl LayoutConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if bounded growth is selected without a usable ceiling.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::LayerAtlasError;

        if self.growth == CanvasGrowth::Bounded {
            match (self.max_width, self.max_height) {
                (Some(w), Some(h)) if w > 0 && h > 0 => {}
                (w, h) => {
                    return Err(LayerAtlasError::InvalidConfig(format!(
                        "bounded growth needs max_width and max_height > 0 (got {:?}x{:?})",
                        w, h
                    )));
                }
            }
        }
        Ok(())
    }

    /// Growth ceiling for a packer started on a `surface_w` x `surface_h` canvas.
    /// `None` means unbounded.
    pub fn ceiling(&self, surface_w: u32, surface_h: u32) -> crate::error::Result<Option<(u32, u32)>> {
        use crate::error::LayerAtlasError;

        self.validate()?;
        match self.growth {
            CanvasGrowth::Fixed => Ok(Some((surface_w, surface_h))),
            CanvasGrowth::Unbounded => Ok(None),
            CanvasGrowth::Bounded => {
                let w = self.max_width.unwrap_or(surface_w);
                let h = self.max_height.unwrap_or(surface_h);
                if w < surface_w || h < surface_h {
                    return Err(LayerAtlasError::InvalidConfig(format!(
                        "growth ceiling {}x{} is smaller than the surface {}x{}",
                        w, h, surface_w, surface_h
                    )));
                }
                Ok(Some((w, h)))
            }
        }
    }
}

fn default_sort_order() -> SortOrder {
    SortOrder::MaxSideDesc
}
fn default_growth() -> CanvasGrowth {
    CanvasGrowth::Fixed
}

/// Builder for `LayoutConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct LayoutConfigBuilder {
    cfg: LayoutConfig,
}

impl LayoutConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: LayoutConfig::default(),
        }
    }
    pub fn spacing(mut self, v: u32) -> Self {
        self.cfg.spacing = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn growth(mut self, v: CanvasGrowth) -> Self {
        self.cfg.growth = v;
        self
    }
    /// Sets a growth ceiling and switches to `CanvasGrowth::Bounded`.
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.growth = CanvasGrowth::Bounded;
        self.cfg.max_width = Some(w);
        self.cfg.max_height = Some(h);
        self
    }
    pub fn build(self) -> LayoutConfig {
        self.cfg
    }
}

impl LayoutConfig {
    /// Create a fluent builder for `LayoutConfig`.
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder::new()
    }
}

/// Texture references written into the atlas record. Both slots share one mapping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Full resolution texture path.
    pub texture_path: String,
    /// Lower resolution variant (e.g. 1080p) of the same texture.
    pub low_res_texture_path: String,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            texture_path: "atlas.xbm".into(),
            low_res_texture_path: "atlas_1080p.xbm".into(),
        }
    }
}

impl AtlasConfig {
    pub fn new(texture_path: impl Into<String>, low_res_texture_path: impl Into<String>) -> Self {
        Self {
            texture_path: texture_path.into(),
            low_res_texture_path: low_res_texture_path.into(),
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::LayerAtlasError;

        if self.texture_path.trim().is_empty() || self.low_res_texture_path.trim().is_empty() {
            return Err(LayerAtlasError::InvalidConfig(
                "texture paths must not be empty".into(),
            ));
        }
        Ok(())
    }
}

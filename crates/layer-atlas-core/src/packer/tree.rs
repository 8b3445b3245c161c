use super::{FitResult, Packer};
use crate::error::{LayerAtlasError, Result};
use crate::model::{Block, FittedBlock, Placement, Rect};
use std::collections::HashSet;
use tracing::{debug, instrument, trace};

type NodeId = usize;

#[derive(Clone, Copy, Debug)]
struct Node {
    rect: Rect,
    used: bool,
    right: Option<NodeId>,
    down: Option<NodeId>,
}

impl Node {
    fn free(rect: Rect) -> Self {
        Self {
            rect,
            used: false,
            right: None,
            down: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Grow {
    Right,
    Down,
}

/// Binary-tree rectangle packer that grows its canvas right or down on demand.
///
/// This is a greedy heuristic, not an optimal bin packer: the first free node found by a
/// right-then-down depth-first walk wins, and placed blocks never move. Feed blocks largest
/// first (see `SortOrder::MaxSideDesc`) for tighter layouts.
///
/// Nodes live in an arena; the root index changes whenever the canvas grows.
pub struct TreePacker {
    nodes: Vec<Node>,
    root: NodeId,
    ceiling: Option<(u32, u32)>,
}

impl TreePacker {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LayerAtlasError::InvalidDimensions { width, height });
        }
        Ok(Self {
            nodes: vec![Node::free(Rect::new(0, 0, width, height))],
            root: 0,
            ceiling: None,
        })
    }

    /// Caps canvas growth. A growth step that would exceed `max_width` x `max_height` is
    /// never taken; blocks that would need it stay unplaced.
    pub fn with_max_size(mut self, max_width: u32, max_height: u32) -> Self {
        self.ceiling = Some((max_width, max_height));
        self
    }

    pub fn width(&self) -> u32 {
        self.nodes[self.root].rect.w
    }

    pub fn height(&self) -> u32 {
        self.nodes[self.root].rect.h
    }

    /// Packs `blocks` in the given order and consumes the packer.
    ///
    /// Fails without placing anything if a block has a zero dimension or two blocks share an id.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub fn fit(mut self, blocks: &[Block]) -> Result<FitResult> {
        validate_blocks(blocks)?;

        let (start_w, start_h) = self.canvas_size();
        let mut fits = Vec::with_capacity(blocks.len());
        for block in blocks {
            let fit = self.pack(block);
            if fit.is_none() {
                debug!(id = %block.id, w = block.width, h = block.height, "block does not fit");
            }
            fits.push(FittedBlock {
                block: block.clone(),
                fit,
            });
        }

        let (width, height) = self.canvas_size();
        if (width, height) != (start_w, start_h) {
            debug!(from = ?(start_w, start_h), to = ?(width, height), "canvas grew");
        }
        Ok(FitResult {
            fits,
            width,
            height,
        })
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn find_node(&self, w: u32, h: u32) -> Option<NodeId> {
        // Depth-first, right subtree before down subtree.
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.used {
                if let Some(down) = node.down {
                    stack.push(down);
                }
                if let Some(right) = node.right {
                    stack.push(right);
                }
            } else if node.rect.fits(w, h) {
                return Some(id);
            }
        }
        None
    }

    fn split_node(&mut self, id: NodeId, w: u32, h: u32) -> Placement {
        let r = self.nodes[id].rect;
        let down = self.alloc(Node::free(Rect::new(r.x, r.y + h, r.w, r.h - h)));
        let right = self.alloc(Node::free(Rect::new(r.x + w, r.y, r.w - w, h)));
        let node = &mut self.nodes[id];
        node.used = true;
        node.down = Some(down);
        node.right = Some(right);
        Placement { x: r.x, y: r.y }
    }

    fn within_ceiling(&self, w: u64, h: u64) -> bool {
        let (max_w, max_h) = self.ceiling.unwrap_or((u32::MAX, u32::MAX));
        w <= max_w as u64 && h <= max_h as u64
    }

    fn grow_direction(&self, w: u32, h: u32) -> Option<Grow> {
        let root = self.nodes[self.root].rect;
        let (rw, rh) = (root.w as u64, root.h as u64);
        let can_grow_down = w <= root.w && self.within_ceiling(rw, rh + h as u64);
        let can_grow_right = h <= root.h && self.within_ceiling(rw + w as u64, rh);

        // Grow towards the shorter side to keep the canvas roughly square.
        let should_grow_right = can_grow_right && rh >= rw + w as u64;
        let should_grow_down = can_grow_down && rw >= rh + h as u64;

        if should_grow_right {
            Some(Grow::Right)
        } else if should_grow_down {
            Some(Grow::Down)
        } else if can_grow_right {
            Some(Grow::Right)
        } else if can_grow_down {
            Some(Grow::Down)
        } else {
            None
        }
    }

    fn grow_node(&mut self, w: u32, h: u32) -> Option<Placement> {
        let dir = self.grow_direction(w, h)?;
        let old = self.nodes[self.root].rect;
        let new_root = match dir {
            Grow::Right => {
                let right = self.alloc(Node::free(Rect::new(old.w, 0, w, old.h)));
                Node {
                    rect: Rect::new(0, 0, old.w + w, old.h),
                    used: true,
                    right: Some(right),
                    down: Some(self.root),
                }
            }
            Grow::Down => {
                let down = self.alloc(Node::free(Rect::new(0, old.h, old.w, h)));
                Node {
                    rect: Rect::new(0, 0, old.w, old.h + h),
                    used: true,
                    right: Some(self.root),
                    down: Some(down),
                }
            }
        };
        self.root = self.alloc(new_root);
        trace!(?dir, w = self.width(), h = self.height(), "grow");
        let id = self.find_node(w, h)?;
        Some(self.split_node(id, w, h))
    }
}

impl Packer for TreePacker {
    fn can_pack(&self, block: &Block) -> bool {
        if block.width == 0 || block.height == 0 {
            return false;
        }
        self.find_node(block.width, block.height).is_some()
            || self.grow_direction(block.width, block.height).is_some()
    }

    fn pack(&mut self, block: &Block) -> Option<Placement> {
        let (w, h) = (block.width, block.height);
        if w == 0 || h == 0 {
            return None;
        }
        match self.find_node(w, h) {
            Some(id) => Some(self.split_node(id, w, h)),
            None => self.grow_node(w, h),
        }
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

fn validate_blocks(blocks: &[Block]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(blocks.len());
    for b in blocks {
        if b.width == 0 || b.height == 0 {
            return Err(LayerAtlasError::InvalidBlockDimensions {
                id: b.id.clone(),
                width: b.width as i64,
                height: b.height as i64,
            });
        }
        if !seen.insert(b.id.as_str()) {
            return Err(LayerAtlasError::DuplicateIdentifier(b.id.clone()));
        }
    }
    Ok(())
}

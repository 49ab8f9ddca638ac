//! Greedy growing-canvas atlas packer.
//!
//! Sprites are placed largest first. Each one goes to the first position in
//! the candidate list where it fits, with at least one spare column and row
//! left past its far edges; if none fits, the canvas grows by the sprite's
//! size in both directions and the whole list is scanned again.
//! Every placement appends two new candidates, one below and one to the
//! right of the sprite, each leaving a one-pixel gap.
//!
//! The candidate list is kept in insertion order and scanned first-fit, so
//! the layout depends only on the input order. Same sprites in, same atlas
//! out.

use glam::UVec2;

use crate::api::error::{AtlasError, Result};
use crate::components::sprite::{Placement, Sprite};
use crate::core::canvas::Canvas;
use crate::core::pixels::PixelBuffer;

/// The packed atlas: pixels plus one placement per input sprite, in input
/// order.
#[derive(Debug, Clone)]
pub struct PackedAtlas {
    pub canvas: PixelBuffer,
    pub placements: Vec<Placement>,
}

impl PackedAtlas {
    pub fn size(&self) -> UVec2 {
        self.canvas.size()
    }
}

/// Incremental packer state: the canvas and the untried candidates.
#[derive(Debug, Clone)]
pub struct AtlasPacker {
    canvas: Canvas,
    candidates: Vec<UVec2>,
    max_size: u32,
}

impl AtlasPacker {
    /// An empty packer whose canvas may grow to `max_size` on each side.
    pub fn new(max_size: u32) -> Self {
        Self {
            canvas: Canvas::new(),
            candidates: vec![UVec2::ZERO],
            max_size,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Untried positions, in the order they will be scanned.
    pub fn candidates(&self) -> &[UVec2] {
        &self.candidates
    }

    /// Place one sprite, growing the canvas as needed. `index` is recorded in
    /// the returned placement.
    pub fn place(&mut self, index: usize, sprite: &Sprite) -> Result<Placement> {
        let size = sprite.size();
        let slot = loop {
            if let Some(slot) = self.first_fit(size) {
                break slot;
            }
            self.grow_for(sprite)?;
        };

        let top_left = self.candidates.remove(slot);
        self.canvas.place(&sprite.image, top_left);

        let placement = Placement {
            sprite: index,
            top_left,
            size,
        };
        self.candidates.extend(placement.neighbor_candidates());
        Ok(placement)
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    fn first_fit(&self, size: UVec2) -> Option<usize> {
        self.candidates
            .iter()
            .position(|&candidate| self.canvas.fits(candidate, size))
    }

    fn grow_for(&mut self, sprite: &Sprite) -> Result<()> {
        // A zero-sized side would not enlarge the canvas and never let a
        // blocked candidate through.
        let step = sprite.size().max(UVec2::ONE);
        let width = u64::from(self.canvas.width()) + u64::from(step.x);
        let height = u64::from(self.canvas.height()) + u64::from(step.y);
        let limit = u64::from(self.max_size);
        if width > limit || height > limit {
            return Err(AtlasError::CanvasTooLarge {
                sprite: sprite.name.clone(),
                frame_idx: sprite.frame_idx,
                width,
                height,
                limit: self.max_size,
            });
        }

        log::debug!(
            "growing canvas {}x{} -> {width}x{height} for `{}` frame {}",
            self.canvas.width(),
            self.canvas.height(),
            sprite.name,
            sprite.frame_idx
        );
        // Both fit in u32: they are bounded by `max_size`.
        self.canvas.grow(width as u32, height as u32);
        Ok(())
    }
}

/// Indices of `sprites` by descending area; equal areas keep input order.
pub fn packing_order(sprites: &[Sprite]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sprites.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(sprites[i].area()));
    order
}

/// Pack all sprites onto one canvas no larger than `max_size` per side.
pub fn pack(sprites: &[Sprite], max_size: u32) -> Result<PackedAtlas> {
    let mut packer = AtlasPacker::new(max_size);
    let mut placements = Vec::with_capacity(sprites.len());

    for index in packing_order(sprites) {
        placements.push(packer.place(index, &sprites[index])?);
    }
    placements.sort_by_key(|p| p.sprite);

    let canvas = packer.into_canvas().into_pixels();
    log::info!(
        "packed {} sprites into a {}x{} atlas",
        placements.len(),
        canvas.width(),
        canvas.height()
    );
    Ok(PackedAtlas { canvas, placements })
}

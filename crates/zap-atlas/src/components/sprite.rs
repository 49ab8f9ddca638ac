use glam::UVec2;

use crate::core::pixels::PixelBuffer;

/// Width of the guard border extruded around every sprite, in pixels.
pub const EXTRUSION: u32 = 1;

/// A sprite frame cut out of a source sheet.
///
/// `image` already includes the extruded guard border on all four sides, so
/// it is `2 * EXTRUSION` pixels wider and taller than the authored frame.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Logical sprite name (`base` or `base_tag`).
    pub name: String,
    /// Position of this frame within its animation sequence.
    pub frame_idx: u32,
    /// Frame pixels including the guard border.
    pub image: PixelBuffer,
}

impl Sprite {
    pub fn new(name: impl Into<String>, frame_idx: u32, image: PixelBuffer) -> Self {
        Self {
            name: name.into(),
            frame_idx,
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> UVec2 {
        self.image.size()
    }

    /// Pixel area, used as the packing sort key.
    pub fn area(&self) -> u64 {
        self.image.area()
    }
}

/// Where the packer put a sprite. `sprite` indexes the slice of sprites
/// handed to the packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub sprite: usize,
    pub top_left: UVec2,
    pub size: UVec2,
}

impl Placement {
    pub fn top_right(&self) -> UVec2 {
        UVec2::new(self.top_left.x + self.size.x, self.top_left.y)
    }

    pub fn bottom_left(&self) -> UVec2 {
        UVec2::new(self.top_left.x, self.top_left.y + self.size.y)
    }

    /// Candidate positions opened up by this placement: below it, then to
    /// its right, each one pixel clear of the sprite.
    pub fn neighbor_candidates(&self) -> [UVec2; 2] {
        let below = self.bottom_left() + UVec2::Y;
        let right = self.top_right() + UVec2::X;
        [below, right]
    }

    /// Exclusive corner of the footprint.
    pub fn bottom_right(&self) -> UVec2 {
        self.top_left + self.size
    }

    /// Whether two footprints share any pixel.
    pub fn overlaps(&self, other: &Self) -> bool {
        let a_max = self.bottom_right();
        let b_max = other.bottom_right();
        self.top_left.x < b_max.x
            && other.top_left.x < a_max.x
            && self.top_left.y < b_max.y
            && other.top_left.y < a_max.y
    }

    /// The authored frame rectangle `(x, y, w, h)` in atlas space, with the
    /// guard border removed.
    pub fn unpadded_rect(&self) -> (u32, u32, u32, u32) {
        let inner = self.size.saturating_sub(UVec2::splat(2 * EXTRUSION));
        (
            self.top_left.x + EXTRUSION,
            self.top_left.y + EXTRUSION,
            inner.x,
            inner.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(x: u32, y: u32, w: u32, h: u32) -> Placement {
        Placement {
            sprite: 0,
            top_left: UVec2::new(x, y),
            size: UVec2::new(w, h),
        }
    }

    #[test]
    fn sprite_size_comes_from_image() {
        let sprite = Sprite::new("hero", 2, PixelBuffer::new(6, 4));
        assert_eq!(sprite.width(), 6);
        assert_eq!(sprite.height(), 4);
        assert_eq!(sprite.area(), 24);
    }

    #[test]
    fn corners() {
        let p = placed(3, 5, 4, 2);
        assert_eq!(p.top_right(), UVec2::new(7, 5));
        assert_eq!(p.bottom_left(), UVec2::new(3, 7));
        assert_eq!(p.bottom_right(), UVec2::new(7, 7));
    }

    #[test]
    fn neighbors_leave_one_pixel_gap() {
        let p = placed(0, 0, 4, 4);
        assert_eq!(p.neighbor_candidates(), [UVec2::new(0, 5), UVec2::new(5, 0)]);
    }

    #[test]
    fn overlap_detection() {
        let a = placed(0, 0, 4, 4);
        assert!(a.overlaps(&placed(3, 3, 2, 2)));
        assert!(!a.overlaps(&placed(4, 0, 2, 2)));
        assert!(!a.overlaps(&placed(0, 4, 2, 2)));
    }

    #[test]
    fn unpadding_strips_guard_border() {
        assert_eq!(placed(10, 20, 6, 5).unpadded_rect(), (11, 21, 4, 3));
    }
}

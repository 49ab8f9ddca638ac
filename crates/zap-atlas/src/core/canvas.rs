//! Growing atlas canvas with an occupancy plane.
//!
//! The canvas starts empty and only ever grows; growth keeps existing pixels
//! anchored at the top-left. A parallel one-byte-per-pixel plane records which
//! pixels already belong to a placed sprite (0 = free, 1 = occupied).

use glam::UVec2;

use crate::core::pixels::PixelBuffer;

#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: PixelBuffer,
    occupancy: Vec<u8>,
}

impl Canvas {
    /// A 0x0 canvas.
    pub fn new() -> Self {
        Self {
            pixels: PixelBuffer::new(0, 0),
            occupancy: Vec::new(),
        }
    }

    pub fn size(&self) -> UVec2 {
        self.pixels.size()
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }

    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.occupancy[y as usize * self.width() as usize + x as usize] != 0
    }

    /// Whether a `size` footprint at `top_left` lies inside the canvas.
    pub fn contains(&self, top_left: UVec2, size: UVec2) -> bool {
        let right = u64::from(top_left.x) + u64::from(size.x);
        let bottom = u64::from(top_left.y) + u64::from(size.y);
        right <= u64::from(self.width()) && bottom <= u64::from(self.height())
    }

    /// Whether every pixel of the footprint is free. The footprint must be
    /// inside the canvas.
    pub fn is_free(&self, top_left: UVec2, size: UVec2) -> bool {
        let stride = self.width() as usize;
        (top_left.y..top_left.y + size.y).all(|y| {
            let start = y as usize * stride + top_left.x as usize;
            self.occupancy[start..start + size.x as usize]
                .iter()
                .all(|&cell| cell == 0)
        })
    }

    /// Whether the footprint ends strictly before the right and bottom
    /// edges, leaving at least one spare column and row.
    pub fn has_room(&self, top_left: UVec2, size: UVec2) -> bool {
        let right = u64::from(top_left.x) + u64::from(size.x);
        let bottom = u64::from(top_left.y) + u64::from(size.y);
        right < u64::from(self.width()) && bottom < u64::from(self.height())
    }

    /// Packing fit test: room past the footprint and every pixel free.
    pub fn fits(&self, top_left: UVec2, size: UVec2) -> bool {
        self.has_room(top_left, size) && self.is_free(top_left, size)
    }

    /// Reallocate to `width x height`, keeping pixels and occupancy at the
    /// top-left and zero-filling the rest.
    pub fn grow(&mut self, width: u32, height: u32) {
        let old_width = self.width() as usize;
        let mut occupancy = vec![0u8; width as usize * height as usize];
        if old_width > 0 {
            for (y, row) in self.occupancy.chunks_exact(old_width).enumerate() {
                let start = y * width as usize;
                occupancy[start..start + old_width].copy_from_slice(row);
            }
        }
        self.pixels = self.pixels.grown(width, height);
        self.occupancy = occupancy;
    }

    /// Claim the footprint of `image` at `top_left` and copy its pixels in.
    ///
    /// Overlapping an occupied pixel means the packer picked a bad candidate,
    /// which is a bug rather than bad input, so this panics.
    pub fn place(&mut self, image: &PixelBuffer, top_left: UVec2) {
        let size = image.size();
        assert!(
            self.contains(top_left, size),
            "placement {top_left} of {size} outside {} canvas",
            self.size(),
        );
        assert!(
            self.is_free(top_left, size),
            "placement {top_left} of {size} overlaps occupied pixels",
        );

        let stride = self.width() as usize;
        for y in top_left.y..top_left.y + size.y {
            let start = y as usize * stride + top_left.x as usize;
            self.occupancy[start..start + size.x as usize].fill(1);
        }
        self.pixels.blit(image, top_left.x, top_left.y);
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> PixelBuffer {
        PixelBuffer::from_rgba(width, height, vec![value; (width * height * 4) as usize]).unwrap()
    }

    #[test]
    fn new_canvas_is_empty() {
        let canvas = Canvas::new();
        assert_eq!(canvas.size(), UVec2::ZERO);
        assert!(!canvas.contains(UVec2::ZERO, UVec2::ONE));
        assert!(canvas.contains(UVec2::ZERO, UVec2::ZERO));
    }

    #[test]
    fn footprint_must_stop_short_of_the_far_edge() {
        let mut canvas = Canvas::new();
        canvas.grow(4, 4);
        assert!(canvas.contains(UVec2::ZERO, UVec2::new(4, 4)));
        assert!(!canvas.fits(UVec2::ZERO, UVec2::new(4, 4)));
        assert!(!canvas.fits(UVec2::new(2, 2), UVec2::new(2, 2)));
        assert!(!canvas.fits(UVec2::new(0, 1), UVec2::new(3, 3)));
        assert!(canvas.fits(UVec2::ZERO, UVec2::new(3, 3)));
        assert!(canvas.fits(UVec2::new(1, 1), UVec2::new(2, 2)));
    }

    #[test]
    fn place_marks_occupancy_and_copies_pixels() {
        let mut canvas = Canvas::new();
        canvas.grow(5, 5);
        canvas.place(&solid(2, 3, 7), UVec2::new(1, 1));

        assert!(canvas.is_occupied(1, 1));
        assert!(canvas.is_occupied(2, 3));
        assert!(!canvas.is_occupied(3, 1));
        assert!(!canvas.is_occupied(1, 4));
        assert_eq!(canvas.pixels().pixel(2, 2), &[7, 7, 7, 7]);
        assert_eq!(canvas.pixels().pixel(0, 0), &[0, 0, 0, 0]);

        assert!(!canvas.fits(UVec2::new(2, 3), UVec2::ONE));
        assert!(canvas.fits(UVec2::new(3, 0), UVec2::new(1, 4)));
    }

    #[test]
    fn grow_preserves_content_and_occupancy() {
        let mut canvas = Canvas::new();
        canvas.grow(2, 2);
        canvas.place(&solid(2, 2, 9), UVec2::ZERO);
        canvas.grow(5, 3);

        assert_eq!(canvas.size(), UVec2::new(5, 3));
        assert!(canvas.is_occupied(1, 1));
        assert!(!canvas.is_occupied(2, 0));
        assert!(!canvas.is_occupied(0, 2));
        assert_eq!(canvas.pixels().pixel(1, 1), &[9, 9, 9, 9]);
        assert_eq!(canvas.pixels().pixel(4, 2), &[0, 0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "overlaps occupied pixels")]
    fn overlapping_place_panics() {
        let mut canvas = Canvas::new();
        canvas.grow(4, 4);
        canvas.place(&solid(2, 2, 1), UVec2::ZERO);
        canvas.place(&solid(2, 2, 1), UVec2::new(1, 1));
    }
}

//! Raw 8-bit pixel buffers shared by every pipeline stage.
//!
//! Pixels are stored row-major with interleaved channels. The packing core
//! only ever sees RGBA; RGB buffers exist so the extruder can pass them
//! through untouched.

use glam::UVec2;

use crate::api::error::{AtlasError, Result};

/// Channel count of an RGB buffer.
pub const RGB: usize = 3;
/// Channel count of an RGBA buffer.
pub const RGBA: usize = 4;

/// A 2D grid of 8-bit pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled (transparent black) RGBA buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * RGBA;
        Self {
            width,
            height,
            channels: RGBA,
            data: vec![0; len],
        }
    }

    /// Wrap raw interleaved pixel data. The length must match
    /// `width * height * channels`.
    pub fn from_raw(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self> {
        if channels == 0 {
            return Err(AtlasError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(AtlasError::BufferSize {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Wrap raw RGBA data.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, RGBA, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Pixel count (`width * height`).
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }

    fn row_len(&self) -> usize {
        self.width as usize * self.channels
    }

    /// Channels of the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = self.offset(x, y);
        &self.data[start..start + self.channels]
    }

    /// View an RGBA buffer as whole pixels. Returns None for other layouts.
    pub fn rgba_pixels(&self) -> Option<&[[u8; 4]]> {
        (self.channels == RGBA).then(|| bytemuck::cast_slice(&self.data))
    }

    /// Mutable view of an RGBA buffer as whole pixels.
    pub fn rgba_pixels_mut(&mut self) -> Option<&mut [[u8; 4]]> {
        (self.channels == RGBA).then(|| bytemuck::cast_slice_mut(&mut self.data))
    }

    /// Copy out the `w x h` region whose top-left is (x, y).
    /// Returns None when the region reaches outside the buffer.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Option<Self> {
        let right = x.checked_add(w)?;
        let bottom = y.checked_add(h)?;
        if right > self.width || bottom > self.height {
            return None;
        }

        let row_bytes = w as usize * self.channels;
        let mut data = Vec::with_capacity(row_bytes * h as usize);
        for row in y..bottom {
            let start = self.offset(x, row);
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Some(Self {
            width: w,
            height: h,
            channels: self.channels,
            data,
        })
    }

    /// Copy `src` into this buffer with its top-left at (x, y).
    ///
    /// Panics if the channel layouts differ or `src` does not fit; callers
    /// check placement bounds first.
    pub fn blit(&mut self, src: &Self, x: u32, y: u32) {
        assert_eq!(self.channels, src.channels, "blit between different channel layouts");
        assert!(
            u64::from(x) + u64::from(src.width) <= u64::from(self.width)
                && u64::from(y) + u64::from(src.height) <= u64::from(self.height),
            "blit of {}x{} at ({x}, {y}) overflows {}x{} buffer",
            src.width,
            src.height,
            self.width,
            self.height,
        );

        let row_bytes = src.row_len();
        for row in 0..src.height {
            let dst = self.offset(x, y + row);
            let from = src.offset(0, row);
            self.data[dst..dst + row_bytes].copy_from_slice(&src.data[from..from + row_bytes]);
        }
    }

    /// A larger copy of this buffer: existing content stays at the top-left,
    /// the new area is zero. Dimensions never shrink.
    pub fn grown(&self, width: u32, height: u32) -> Self {
        debug_assert!(width >= self.width && height >= self.height, "buffers only grow");
        let mut grown = Self {
            width,
            height,
            channels: self.channels,
            data: vec![0; width as usize * height as usize * self.channels],
        };
        grown.blit(self, 0, 0);
        grown
    }
}

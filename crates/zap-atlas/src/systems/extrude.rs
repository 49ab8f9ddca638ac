//! Guard-pixel extrusion.
//!
//! Fully transparent pixels that touch opaque content (up, down, left or
//! right) take the average color of those opaque neighbors. When the atlas is
//! sampled with bilinear filtering, the edge of a sprite then blends with its
//! own color instead of with whatever sits next to it in the atlas.

use crate::api::error::{AtlasError, Result};
use crate::core::pixels::{PixelBuffer, RGB, RGBA};

/// Up, left, down, right.
const NEIGHBORS: [(i64, i64); 4] = [(0, -1), (-1, 0), (0, 1), (1, 0)];

/// Extrude opaque content one pixel into the surrounding transparent pixels.
///
/// RGB input has nothing to extrude into and is returned as an unchanged
/// copy. Neighbors are always read from `input`, so a single call grows
/// content by exactly one pixel.
pub fn extrude(input: &PixelBuffer) -> Result<PixelBuffer> {
    match input.channels() {
        RGB => return Ok(input.clone()),
        RGBA => {}
        other => return Err(AtlasError::UnsupportedChannels(other)),
    }

    let width = i64::from(input.width());
    let height = i64::from(input.height());
    let src = input.rgba_pixels().ok_or(AtlasError::UnsupportedChannels(input.channels()))?;

    let mut output = input.clone();
    let dst = output
        .rgba_pixels_mut()
        .ok_or(AtlasError::UnsupportedChannels(input.channels()))?;

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            if src[idx][3] != 0 {
                continue;
            }

            let mut sum = [0u32; 4];
            let mut count = 0u32;
            for (dx, dy) in NEIGHBORS {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || nx >= width || ny < 0 || ny >= height {
                    continue;
                }
                let neighbor = src[(ny * width + nx) as usize];
                if neighbor[3] > 0 {
                    for (acc, channel) in sum.iter_mut().zip(neighbor) {
                        *acc += u32::from(channel);
                    }
                    count += 1;
                }
            }

            if count > 0 {
                // Mean of at most four u8 values, so it always fits in a u8.
                dst[idx] = sum.map(|total| (total / count) as u8);
            }
        }
    }

    Ok(output)
}

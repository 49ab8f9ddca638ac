//! Cutting sprite and mask frames out of source sheets.
//!
//! Sheets are expected to have been run through the extruder already, so the
//! pixel ring around every authored sprite frame holds its guard border.
//! Sprites are cropped with that ring included. Masks are reduced to the
//! bounding box of their non-zero pixels.

use glam::UVec2;

use crate::api::config::AtlasConfig;
use crate::api::error::{AtlasError, Result};
use crate::assets::sheet::{FrameDescriptor, FrameRect, SourceSheet};
use crate::components::layer::LayerKind;
use crate::components::mask::{Mask, MaskKey, MaskTable};
use crate::components::sprite::{Sprite, EXTRUSION};
use crate::core::pixels::PixelBuffer;

/// Sprites and masks pulled from one or more sheets, in extraction order.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub sprites: Vec<Sprite>,
    pub masks: MaskTable,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another extraction, keeping sprite order.
    pub fn merge(&mut self, other: Self) {
        self.sprites.extend(other.sprites);
        self.masks.extend(other.masks);
    }
}

/// Extract every frame of a sheet.
///
/// Fails on the first frame whose layer is neither the sprite layer nor a
/// mask layer, or whose rectangle leaves the sheet.
pub fn extract_sheet(sheet: &SourceSheet, config: &AtlasConfig) -> Result<Extraction> {
    if !sheet.layers.iter().any(|l| *l == config.sprite_layer) {
        return Err(AtlasError::MissingSpriteLayer {
            sheet: sheet.name.clone(),
            sprite_layer: config.sprite_layer.clone(),
        });
    }

    let mut out = Extraction::new();
    let mut empty_masks = 0usize;

    for frame in &sheet.frames {
        let kind = LayerKind::classify(&frame.layer_name, &config.sprite_layer, &config.mask_prefix)
            .ok_or_else(|| AtlasError::InvalidLayer {
                sheet: sheet.name.clone(),
                layer: frame.layer_name.clone(),
                sprite_layer: config.sprite_layer.clone(),
                mask_prefix: config.mask_prefix.clone(),
            })?;

        match kind {
            LayerKind::Sprite => {
                out.sprites.push(extract_sprite(sheet, frame)?);
            }
            LayerKind::Mask(layer) => match extract_mask(sheet, frame)? {
                Some(mask) => {
                    let key = MaskKey::new(&frame.name, layer, frame.frame_idx);
                    if out.masks.insert(key, mask).is_some() {
                        log::warn!(
                            "{}: duplicate mask frame `{}`, keeping the last one",
                            sheet.name,
                            frame.filename
                        );
                    }
                }
                None => {
                    log::debug!("{}: mask frame `{}` is empty, skipped", sheet.name, frame.filename);
                    empty_masks += 1;
                }
            },
        }
    }

    log::info!(
        "{}: extracted {} sprite frames, {} masks ({} empty)",
        sheet.name,
        out.sprites.len(),
        out.masks.len(),
        empty_masks
    );
    Ok(out)
}

/// Crop a sprite frame together with its one-pixel guard border.
pub fn extract_sprite(sheet: &SourceSheet, frame: &FrameDescriptor) -> Result<Sprite> {
    let padded = frame.rect.expand(i64::from(EXTRUSION));
    let image = crop(sheet, frame, padded)?;
    Ok(Sprite::new(&frame.name, frame.frame_idx, image))
}

/// Bounding box of a mask frame, or None when the frame has no set pixels.
pub fn extract_mask(sheet: &SourceSheet, frame: &FrameDescriptor) -> Result<Option<Mask>> {
    let region = crop(sheet, frame, frame.rect)?;
    Ok(mask_bounds(&region).map(|(top_left, size)| Mask {
        name: frame.name.clone(),
        frame_idx: frame.frame_idx,
        top_left,
        width: size.x,
        height: size.y,
    }))
}

/// Bounding box of the pixels with any non-zero channel, as (top-left, size).
///
/// The box is moved down by the extrusion width to line up with the padded
/// sprite; it is not moved horizontally.
pub fn mask_bounds(region: &PixelBuffer) -> Option<(UVec2, UVec2)> {
    let (width, height) = (region.width(), region.height());
    let intensity = |x: u32, y: u32| region.pixel(x, y).iter().copied().max().unwrap_or(0);

    let column_set = |x: u32| (0..height).any(|y| intensity(x, y) > 0);
    let row_set = |y: u32| (0..width).any(|x| intensity(x, y) > 0);

    let left = (0..width).find(|&x| column_set(x))?;
    let right = (0..width).rev().find(|&x| column_set(x))?;
    let top = (0..height).find(|&y| row_set(y))? + EXTRUSION;
    let bottom = (0..height).rev().find(|&y| row_set(y))? + EXTRUSION;

    Some((
        UVec2::new(left, top),
        UVec2::new(right - left + 1, bottom - top + 1),
    ))
}

fn crop(sheet: &SourceSheet, frame: &FrameDescriptor, rect: FrameRect) -> Result<PixelBuffer> {
    let to_u32 = |v: i64| u32::try_from(v).ok();
    let region = match (to_u32(rect.x), to_u32(rect.y), to_u32(rect.w), to_u32(rect.h)) {
        (Some(x), Some(y), Some(w), Some(h)) => sheet.image.crop(x, y, w, h),
        _ => None,
    };
    region.ok_or_else(|| AtlasError::FrameOutOfBounds {
        sheet: sheet.name.clone(),
        frame: frame.filename.clone(),
        x: rect.x,
        y: rect.y,
        w: rect.w,
        h: rect.h,
        sheet_width: sheet.image.width(),
        sheet_height: sheet.image.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPAQUE: [u8; 4] = [255, 255, 255, 255];

    /// A sheet of the given size whose pixel values encode their position:
    /// red = x, green = y, alpha = 255.
    fn coordinate_sheet(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        PixelBuffer::from_rgba(width, height, data).unwrap()
    }

    fn sheet_with(image: PixelBuffer, frames: Vec<FrameDescriptor>) -> SourceSheet {
        SourceSheet::new(
            "test.json",
            image,
            vec!["sprite".into(), "mask_hit".into()],
            frames,
        )
    }

    fn frame(filename: &str, x: i64, y: i64, w: i64, h: i64) -> FrameDescriptor {
        FrameDescriptor::new(filename, FrameRect::new(x, y, w, h)).unwrap()
    }

    fn paint(image: &mut PixelBuffer, points: &[(u32, u32)]) {
        let width = image.width();
        let pixels = image.rgba_pixels_mut().unwrap();
        for &(x, y) in points {
            pixels[(y * width + x) as usize] = OPAQUE;
        }
    }

    #[test]
    fn sprite_crop_includes_guard_border() {
        let sheet = sheet_with(coordinate_sheet(10, 10), vec![]);
        let sprite = extract_sprite(&sheet, &frame("hero.sprite.run.2", 2, 3, 4, 5)).unwrap();

        assert_eq!(sprite.name, "hero_run");
        assert_eq!(sprite.frame_idx, 2);
        assert_eq!(sprite.size(), UVec2::new(6, 7));
        assert_eq!(&sprite.image.pixel(0, 0)[..2], &[1, 2]);
        assert_eq!(&sprite.image.pixel(5, 6)[..2], &[6, 8]);
    }

    #[test]
    fn sprite_at_sheet_edge_is_out_of_bounds() {
        let sheet = sheet_with(coordinate_sheet(10, 10), vec![]);
        let err = extract_sprite(&sheet, &frame("hero.sprite..0", 0, 3, 4, 4)).unwrap_err();
        match err {
            AtlasError::FrameOutOfBounds { sheet, frame, x, .. } => {
                assert_eq!(sheet, "test.json");
                assert_eq!(frame, "hero.sprite..0");
                assert_eq!(x, -1);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = extract_sprite(&sheet, &frame("hero.sprite..0", 6, 1, 4, 3)).unwrap_err();
        assert!(matches!(err, AtlasError::FrameOutOfBounds { .. }));
    }

    #[test]
    fn mask_bounds_shift_vertically_only() {
        let mut region = PixelBuffer::new(8, 6);
        paint(&mut region, &[(2, 1), (5, 3), (3, 2)]);

        let (top_left, size) = mask_bounds(&region).unwrap();
        // Columns 2..=5, rows 1..=3 shifted down to 2..=4.
        assert_eq!(top_left, UVec2::new(2, 2));
        assert_eq!(size, UVec2::new(4, 3));
    }

    #[test]
    fn single_pixel_mask() {
        let mut region = PixelBuffer::new(4, 4);
        paint(&mut region, &[(0, 0)]);
        assert_eq!(mask_bounds(&region), Some((UVec2::new(0, 1), UVec2::new(1, 1))));
    }

    #[test]
    fn any_nonzero_channel_counts() {
        // Black pixel with only alpha set, and a transparent pixel with color.
        let data = [[0, 0, 0, 0], [0, 0, 0, 7], [0, 0, 0, 0], [0, 3, 0, 0]].concat();
        let region = PixelBuffer::from_rgba(4, 1, data).unwrap();
        assert_eq!(mask_bounds(&region), Some((UVec2::new(1, 1), UVec2::new(3, 1))));
    }

    #[test]
    fn empty_mask_has_no_bounds() {
        assert_eq!(mask_bounds(&PixelBuffer::new(5, 5)), None);
        assert_eq!(mask_bounds(&PixelBuffer::new(0, 0)), None);
    }

    #[test]
    fn extract_sheet_splits_sprites_and_masks() {
        let mut image = PixelBuffer::new(20, 10);
        paint(&mut image, &[(1, 1), (12, 2), (13, 4)]);
        let sheet = sheet_with(
            image,
            vec![
                frame("hero.sprite.idle.0", 1, 1, 4, 4),
                frame("hero.mask_hit.idle.0", 11, 1, 4, 4),
                frame("hero.mask_hit.idle.1", 1, 5, 4, 4),
            ],
        );

        let out = extract_sheet(&sheet, &AtlasConfig::default()).unwrap();
        assert_eq!(out.sprites.len(), 1);
        assert_eq!(out.sprites[0].size(), UVec2::new(6, 6));

        // Second mask frame is empty and produces nothing.
        assert_eq!(out.masks.len(), 1);
        let mask = out.masks.get("hero_idle", "hit", 0).unwrap();
        assert_eq!(mask.name, "hero_idle");
        assert_eq!(mask.top_left, UVec2::new(1, 2));
        assert_eq!((mask.width, mask.height), (2, 3));
        assert!(out.masks.get("hero_idle", "hit", 1).is_none());
    }

    #[test]
    fn invalid_layer_names_sheet_and_layer() {
        let sheet = sheet_with(
            coordinate_sheet(10, 10),
            vec![
                frame("hero.sprite..0", 1, 1, 2, 2),
                frame("hero.background..0", 1, 1, 2, 2),
            ],
        );
        let err = extract_sheet(&sheet, &AtlasConfig::default()).unwrap_err();
        match err {
            AtlasError::InvalidLayer { sheet, layer, .. } => {
                assert_eq!(sheet, "test.json");
                assert_eq!(layer, "background");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_sprite_layer() {
        let sheet = SourceSheet::new("bare.json", coordinate_sheet(4, 4), vec!["mask_hit".into()], vec![]);
        let err = extract_sheet(&sheet, &AtlasConfig::default()).unwrap_err();
        assert!(matches!(err, AtlasError::MissingSpriteLayer { ref sheet, .. } if sheet == "bare.json"));
    }

    #[test]
    fn merge_keeps_order() {
        let mut a = Extraction::new();
        a.sprites.push(Sprite::new("a", 0, PixelBuffer::new(1, 1)));
        let mut b = Extraction::new();
        b.sprites.push(Sprite::new("b", 0, PixelBuffer::new(1, 1)));
        a.merge(b);
        let names: Vec<_> = a.sprites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}

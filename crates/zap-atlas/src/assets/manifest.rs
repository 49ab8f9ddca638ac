use std::collections::BTreeMap;
use std::io;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::components::mask::{Mask, MaskTable};
use crate::components::sprite::{Placement, Sprite};

/// Geometry manifest written next to the atlas image.
/// Loaded by the game at runtime to find sprite frames and their masks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasManifest {
    /// Atlas size as `[width, height]`.
    pub size: [u32; 2],
    /// Frames of each logical sprite, ordered by frame index.
    pub frames: BTreeMap<String, Vec<FrameEntry>>,
}

/// One animation frame: the sprite rectangle plus any masks for that frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameEntry {
    pub sprite: RectEntry,
    /// Mask layer name → mask rectangle. Only layers with a mask on this
    /// frame appear.
    #[serde(default)]
    pub masks: BTreeMap<String, RectEntry>,
}

/// A named rectangle in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectEntry {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub frame_idx: u32,
}

impl RectEntry {
    /// Atlas rectangle of a placed sprite, with its guard border removed.
    pub fn from_placement(sprite: &Sprite, placement: &Placement) -> Self {
        let (x, y, w, h) = placement.unpadded_rect();
        Self {
            name: sprite.name.clone(),
            x,
            y,
            w,
            h,
            frame_idx: sprite.frame_idx,
        }
    }

    /// A mask's bounding box, as extracted.
    pub fn from_mask(mask: &Mask) -> Self {
        Self {
            name: mask.name.clone(),
            x: mask.top_left.x,
            y: mask.top_left.y,
            w: mask.width,
            h: mask.height,
            frame_idx: mask.frame_idx,
        }
    }
}

impl AtlasManifest {
    /// Build the manifest for a packed atlas.
    ///
    /// `placements` must hold one entry per sprite; each is joined to its
    /// sprite through `Placement::sprite`.
    pub fn build(size: UVec2, sprites: &[Sprite], placements: &[Placement], masks: &MaskTable) -> Self {
        let mut grouped: BTreeMap<String, Vec<(&Sprite, &Placement)>> = BTreeMap::new();
        for placement in placements {
            let sprite = &sprites[placement.sprite];
            grouped.entry(sprite.name.clone()).or_default().push((sprite, placement));
        }

        let frames = grouped
            .into_iter()
            .map(|(name, mut group)| {
                group.sort_by_key(|(sprite, _)| sprite.frame_idx);
                let entries = group
                    .into_iter()
                    .map(|(sprite, placement)| FrameEntry {
                        sprite: RectEntry::from_placement(sprite, placement),
                        masks: masks
                            .for_frame(&sprite.name, sprite.frame_idx)
                            .map(|(layer, mask)| (layer.to_owned(), RectEntry::from_mask(mask)))
                            .collect(),
                    })
                    .collect();
                (name, entries)
            })
            .collect();

        Self {
            size: [size.x, size.y],
            frames,
        }
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write the manifest as JSON indented with four spaces.
    pub fn write_json<W: io::Write>(&self, writer: W) -> Result<(), serde_json::Error> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut ser)
    }
}

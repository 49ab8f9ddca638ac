//! Source sprite sheets as exported by Aseprite.
//!
//! Each sheet is a PNG plus a JSON description listing every frame of every
//! layer. Frame filenames follow `{base}.{layer}.{tag}.{frame_index}`, which
//! is what Aseprite produces with `--filename-format
//! '{title}.{layer}.{tag}.{tagframe}'`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::error::{AtlasError, Result};
use crate::core::pixels::PixelBuffer;

/// Frame rectangle in sheet pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl FrameRect {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    /// Grow by `by` pixels on every side.
    pub fn expand(self, by: i64) -> Self {
        Self {
            x: self.x - by,
            y: self.y - by,
            w: self.w + 2 * by,
            h: self.h + 2 * by,
        }
    }
}

/// The pieces of a `{base}.{layer}.{tag}.{frame_index}` frame filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameName {
    pub base: String,
    pub layer: String,
    pub tag: String,
    pub frame_idx: u32,
}

impl FrameName {
    /// Split a frame filename. Returns None unless there are exactly four
    /// dot-separated parts and the last is a frame index.
    pub fn parse(filename: &str) -> Option<Self> {
        let mut parts = filename.split('.');
        let base = parts.next()?;
        let layer = parts.next()?;
        let tag = parts.next()?;
        let frame_idx = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            base: base.to_owned(),
            layer: layer.to_owned(),
            tag: tag.to_owned(),
            frame_idx,
        })
    }

    /// `base_tag`, or just `base` for untagged frames.
    pub fn sprite_name(&self) -> String {
        if self.tag.is_empty() {
            self.base.clone()
        } else {
            format!("{}_{}", self.base, self.tag)
        }
    }
}

/// One frame of one layer, ready for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Logical sprite name (`base` or `base_tag`).
    pub name: String,
    pub layer_name: String,
    pub tag: String,
    pub frame_idx: u32,
    pub rect: FrameRect,
    /// Filename as written in the sheet, for error messages.
    pub filename: String,
}

impl FrameDescriptor {
    pub fn new(filename: &str, rect: FrameRect) -> Option<Self> {
        let parsed = FrameName::parse(filename)?;
        Some(Self {
            name: parsed.sprite_name(),
            layer_name: parsed.layer,
            tag: parsed.tag,
            frame_idx: parsed.frame_idx,
            rect,
            filename: filename.to_owned(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ArrayFrame {
    filename: String,
    frame: FrameRect,
}

#[derive(Debug, Clone, Deserialize)]
struct HashFrame {
    frame: FrameRect,
}

/// Frames of a hash-format sheet, kept in document order.
#[derive(Debug, Clone)]
struct HashFrames(Vec<(String, HashFrame)>);

impl<'de> Deserialize<'de> for HashFrames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FramesVisitor;

        impl<'de> Visitor<'de> for FramesVisitor {
            type Value = HashFrames;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of frames keyed by filename")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<HashFrames, A::Error> {
                let mut frames = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    frames.push(entry);
                }
                Ok(HashFrames(frames))
            }
        }

        deserializer.deserialize_map(FramesVisitor)
    }
}

/// Aseprite writes frames either as an array or as an object keyed by
/// filename, depending on the export options. Both keep file order, which
/// decides packing order among equal-sized sprites.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SheetFrames {
    Array(Vec<ArrayFrame>),
    Hash(HashFrames),
}

/// A layer entry in the sheet metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerInfo {
    pub name: String,
}

/// Sheet metadata: the image to load and the layers it contains.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetMeta {
    /// Sheet image path, relative to the JSON file.
    pub image: String,
    #[serde(default)]
    pub layers: Vec<LayerInfo>,
}

/// Parsed sheet JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetDescriptor {
    frames: SheetFrames,
    pub meta: SheetMeta,
}

impl SheetDescriptor {
    /// Parse a sheet JSON. `sheet` names the sheet in error messages.
    pub fn from_json(sheet: &str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| AtlasError::SheetParse {
            sheet: sheet.to_owned(),
            source,
        })
    }

    pub fn layer_names(&self) -> Vec<String> {
        self.meta.layers.iter().map(|l| l.name.clone()).collect()
    }

    /// Every frame as a descriptor, in sheet order.
    pub fn frame_descriptors(&self, sheet: &str) -> Result<Vec<FrameDescriptor>> {
        let describe = |filename: &str, rect: FrameRect| {
            FrameDescriptor::new(filename, rect).ok_or_else(|| AtlasError::MalformedFrameName {
                sheet: sheet.to_owned(),
                filename: filename.to_owned(),
            })
        };

        match &self.frames {
            SheetFrames::Array(frames) => frames
                .iter()
                .map(|f| describe(&f.filename, f.frame))
                .collect(),
            SheetFrames::Hash(HashFrames(frames)) => frames
                .iter()
                .map(|(filename, f)| describe(filename, f.frame))
                .collect(),
        }
    }
}

/// A decoded sheet together with its frame list.
#[derive(Debug, Clone)]
pub struct SourceSheet {
    /// Name used in error messages, usually the JSON file name.
    pub name: String,
    pub image: PixelBuffer,
    pub layers: Vec<String>,
    pub frames: Vec<FrameDescriptor>,
}

impl SourceSheet {
    pub fn new(
        name: impl Into<String>,
        image: PixelBuffer,
        layers: Vec<String>,
        frames: Vec<FrameDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            image,
            layers,
            frames,
        }
    }

    /// Combine a parsed description with its decoded image.
    pub fn from_descriptor(
        name: impl Into<String>,
        descriptor: &SheetDescriptor,
        image: PixelBuffer,
    ) -> Result<Self> {
        let name = name.into();
        let frames = descriptor.frame_descriptors(&name)?;
        Ok(Self {
            layers: descriptor.layer_names(),
            name,
            image,
            frames,
        })
    }
}

use thiserror::Error;

/// Everything that can stop an atlas build.
///
/// Configuration problems (bad layer names, malformed frame names, frames
/// outside their sheet) are reported before any packing starts, so a failed
/// run never produces a partial atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// A frame's layer is neither the sprite layer nor mask-prefixed.
    #[error(
        "sheet `{sheet}`: layer `{layer}` is not valid; it must be named `{sprite_layer}` \
         or start with `{mask_prefix}`"
    )]
    InvalidLayer {
        sheet: String,
        layer: String,
        sprite_layer: String,
        mask_prefix: String,
    },

    /// The sheet's layer list lacks the sprite layer.
    #[error("sheet `{sheet}` is missing the `{sprite_layer}` layer")]
    MissingSpriteLayer { sheet: String, sprite_layer: String },

    /// A frame filename is not `base.layer.tag.index`.
    #[error("sheet `{sheet}`: frame name `{filename}` is not of the form `base.layer.tag.index`")]
    MalformedFrameName { sheet: String, filename: String },

    /// A frame rectangle (after extrusion padding) reaches outside its sheet.
    #[error(
        "sheet `{sheet}`: frame `{frame}` rect ({x}, {y}, {w}, {h}) lies outside the \
         {sheet_width}x{sheet_height} sheet"
    )]
    FrameOutOfBounds {
        sheet: String,
        frame: String,
        x: i64,
        y: i64,
        w: i64,
        h: i64,
        sheet_width: u32,
        sheet_height: u32,
    },

    /// The sheet JSON could not be parsed.
    #[error("sheet `{sheet}`: invalid sheet description")]
    SheetParse {
        sheet: String,
        #[source]
        source: serde_json::Error,
    },

    /// The pixel buffer has a channel layout the operation cannot handle.
    #[error("unsupported channel count {0}; expected 3 (RGB) or 4 (RGBA)")]
    UnsupportedChannels(usize),

    /// Raw pixel data does not match the declared dimensions.
    #[error("pixel data is {actual} bytes but {width}x{height}x{channels} needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },

    /// Growing the canvas for a sprite would exceed the size limit.
    #[error(
        "placing sprite `{sprite}` (frame {frame_idx}) needs a {width}x{height} canvas, \
         over the {limit} pixel limit"
    )]
    CanvasTooLarge {
        sprite: String,
        frame_idx: u32,
        width: u64,
        height: u64,
        limit: u32,
    },
}

pub type Result<T, E = AtlasError> = std::result::Result<T, E>;

pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::config::AtlasConfig;
pub use api::error::{AtlasError, Result};
pub use api::pipeline::{AtlasPipeline, AtlasOutput};
pub use crate::core::pixels::PixelBuffer;
pub use crate::core::canvas::Canvas;
pub use components::layer::LayerKind;
pub use components::sprite::{Sprite, Placement, EXTRUSION};
pub use components::mask::{Mask, MaskKey, MaskTable};
pub use systems::extrude::extrude;
pub use systems::extract::{extract_sheet, extract_sprite, extract_mask, mask_bounds, Extraction};
pub use systems::pack::{pack, packing_order, AtlasPacker, PackedAtlas};
pub use assets::sheet::{FrameDescriptor, FrameName, FrameRect, SheetDescriptor, SourceSheet};
pub use assets::manifest::{AtlasManifest, FrameEntry, RectEntry};

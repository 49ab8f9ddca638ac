use serde::{Deserialize, Serialize};

/// Configuration for an atlas build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Name of the layer holding visible sprite pixels (default: "sprite").
    pub sprite_layer: String,
    /// Prefix marking mask layers (default: "mask_").
    pub mask_prefix: String,
    /// Largest allowed canvas side in pixels (default: 16384).
    pub max_canvas_size: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            sprite_layer: "sprite".to_owned(),
            mask_prefix: "mask_".to_owned(),
            max_canvas_size: 16384,
        }
    }
}

impl AtlasConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Role of an authoring layer within a sprite sheet.
///
/// Every frame in a sheet belongs to one layer. The sprite layer carries the
/// visible pixels; mask layers carry auxiliary regions (hit boxes, collision
/// bounds) that end up as bounding boxes in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// The visible sprite layer.
    Sprite,
    /// A mask layer, holding the layer name with the mask prefix stripped.
    Mask(String),
}

impl LayerKind {
    /// Classify a layer name. Returns None for names that are neither the
    /// sprite layer nor mask-prefixed.
    pub fn classify(layer: &str, sprite_layer: &str, mask_prefix: &str) -> Option<Self> {
        if layer == sprite_layer {
            Some(Self::Sprite)
        } else {
            layer
                .strip_prefix(mask_prefix)
                .map(|name| Self::Mask(name.to_owned()))
        }
    }
}

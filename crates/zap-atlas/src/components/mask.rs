use std::collections::BTreeMap;

use glam::UVec2;

/// Tight bounding box of the non-zero pixels of one mask layer frame.
///
/// Coordinates are local to the owning sprite's frame. `name` is the logical
/// sprite the mask belongs to; the mask layer name is part of the table key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pub name: String,
    pub frame_idx: u32,
    pub top_left: UVec2,
    pub width: u32,
    pub height: u32,
}

/// Lookup key: (sprite name, mask layer name, frame index).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaskKey {
    pub sprite: String,
    pub layer: String,
    pub frame_idx: u32,
}

impl MaskKey {
    pub fn new(sprite: impl Into<String>, layer: impl Into<String>, frame_idx: u32) -> Self {
        Self {
            sprite: sprite.into(),
            layer: layer.into(),
            frame_idx,
        }
    }
}

/// All masks of a run, keyed by sprite, mask layer and frame.
///
/// Filled during extraction and only read afterwards. Frames whose mask
/// region was empty simply have no entry.
#[derive(Debug, Clone, Default)]
pub struct MaskTable {
    masks: BTreeMap<MaskKey, Mask>,
}

impl MaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a mask, returning the one it replaced if the key was taken.
    pub fn insert(&mut self, key: MaskKey, mask: Mask) -> Option<Mask> {
        self.masks.insert(key, mask)
    }

    pub fn get(&self, sprite: &str, layer: &str, frame_idx: u32) -> Option<&Mask> {
        self.masks.get(&MaskKey::new(sprite, layer, frame_idx))
    }

    /// Masks of `sprite` at `frame_idx`, as (mask layer name, mask) in layer
    /// name order.
    pub fn for_frame<'a>(
        &'a self,
        sprite: &'a str,
        frame_idx: u32,
    ) -> impl Iterator<Item = (&'a str, &'a Mask)> + 'a {
        let start = MaskKey::new(sprite, String::new(), 0);
        self.masks
            .range(start..)
            .take_while(move |(key, _)| key.sprite == sprite)
            .filter(move |(key, _)| key.frame_idx == frame_idx)
            .map(|(key, mask)| (key.layer.as_str(), mask))
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Merge another table in; later entries win on key collisions.
    pub fn extend(&mut self, other: Self) {
        self.masks.extend(other.masks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(name: &str, frame_idx: u32, x: u32) -> Mask {
        Mask {
            name: name.into(),
            frame_idx,
            top_left: UVec2::new(x, 1),
            width: 2,
            height: 3,
        }
    }

    fn table() -> MaskTable {
        let mut t = MaskTable::new();
        t.insert(MaskKey::new("hero", "hit", 0), mask("hero", 0, 1));
        t.insert(MaskKey::new("hero", "feet", 0), mask("hero", 0, 2));
        t.insert(MaskKey::new("hero", "hit", 1), mask("hero", 1, 3));
        t.insert(MaskKey::new("hero_run", "hit", 0), mask("hero_run", 0, 4));
        t.insert(MaskKey::new("bat", "hit", 0), mask("bat", 0, 5));
        t
    }

    #[test]
    fn lookup_by_composite_key() {
        let t = table();
        assert_eq!(t.get("hero", "hit", 1).unwrap().top_left.x, 3);
        assert!(t.get("hero", "feet", 1).is_none());
        assert!(t.get("ghost", "hit", 0).is_none());
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn for_frame_only_returns_that_sprite_and_frame() {
        let t = table();
        let found: Vec<_> = t.for_frame("hero", 0).map(|(layer, m)| (layer, m.top_left.x)).collect();
        assert_eq!(found, vec![("feet", 2), ("hit", 1)]);

        let found: Vec<_> = t.for_frame("hero", 1).map(|(layer, _)| layer).collect();
        assert_eq!(found, vec!["hit"]);

        assert_eq!(t.for_frame("hero", 7).count(), 0);
        assert_eq!(t.for_frame("hero_run", 0).count(), 1);
    }

    #[test]
    fn zero_sized_mask_is_still_present() {
        let mut t = MaskTable::new();
        let mut m = mask("hero", 0, 0);
        m.width = 0;
        m.height = 0;
        t.insert(MaskKey::new("hero", "hit", 0), m);
        assert!(t.get("hero", "hit", 0).is_some());
    }
}

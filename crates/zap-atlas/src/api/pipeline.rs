use crate::api::config::AtlasConfig;
use crate::api::error::Result;
use crate::assets::manifest::AtlasManifest;
use crate::assets::sheet::SourceSheet;
use crate::core::pixels::PixelBuffer;
use crate::systems::extract::{extract_sheet, Extraction};
use crate::systems::pack::pack;

/// Result of a full atlas build.
#[derive(Debug, Clone)]
pub struct AtlasOutput {
    /// Packed RGBA atlas image.
    pub canvas: PixelBuffer,
    pub manifest: AtlasManifest,
}

/// Drives a build: sheets are extracted as they are added, and packing only
/// starts in [`AtlasPipeline::build`], once every sheet extracted cleanly.
///
/// Sprite order, and therefore the atlas layout, follows the order sheets
/// are added in.
#[derive(Debug, Clone)]
pub struct AtlasPipeline {
    config: AtlasConfig,
    extraction: Extraction,
    sheets: usize,
}

impl AtlasPipeline {
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            extraction: Extraction::new(),
            sheets: 0,
        }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Number of sheets added so far.
    pub fn sheet_count(&self) -> usize {
        self.sheets
    }

    /// Extracted state so far.
    pub fn extraction(&self) -> &Extraction {
        &self.extraction
    }

    /// Extract one sheet's sprites and masks.
    pub fn add_sheet(&mut self, sheet: &SourceSheet) -> Result<()> {
        let extracted = extract_sheet(sheet, &self.config)?;
        self.extraction.merge(extracted);
        self.sheets += 1;
        Ok(())
    }

    /// Pack everything extracted so far and build the manifest.
    pub fn build(self) -> Result<AtlasOutput> {
        let Extraction { sprites, masks } = self.extraction;
        log::info!(
            "packing {} sprite frames with {} masks from {} sheets",
            sprites.len(),
            masks.len(),
            self.sheets
        );

        let packed = pack(&sprites, self.config.max_canvas_size)?;
        let manifest = AtlasManifest::build(packed.size(), &sprites, &packed.placements, &masks);
        Ok(AtlasOutput {
            canvas: packed.canvas,
            manifest,
        })
    }
}

impl Default for AtlasPipeline {
    fn default() -> Self {
        Self::new(AtlasConfig::default())
    }
}

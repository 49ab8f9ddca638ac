//! Filesystem side of the tool: listing inputs, PNG decode/encode, sheet
//! loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::{ColorType, DynamicImage};
use zap_atlas::core::pixels::{RGB, RGBA};
use zap_atlas::{PixelBuffer, SheetDescriptor, SourceSheet};

/// Files in `dir` with the given extension, sorted by path so runs are
/// reproducible.
pub fn files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn to_buffer(image: DynamicImage) -> Result<PixelBuffer> {
    let buffer = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        PixelBuffer::from_raw(rgba.width(), rgba.height(), RGBA, rgba.into_raw())?
    } else {
        let rgb = image.to_rgb8();
        PixelBuffer::from_raw(rgb.width(), rgb.height(), RGB, rgb.into_raw())?
    };
    Ok(buffer)
}

/// Decode an image, keeping RGB images as RGB and everything with alpha as
/// RGBA.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    to_buffer(image)
}

/// Decode an image as RGBA.
pub fn load_rgba(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    let rgba = image.to_rgba8();
    Ok(PixelBuffer::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())?)
}

pub fn save_image(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    let color = match buffer.channels() {
        RGB => ColorType::Rgb8,
        RGBA => ColorType::Rgba8,
        other => bail!("cannot encode a {other}-channel buffer"),
    };
    image::save_buffer(path, buffer.as_bytes(), buffer.width(), buffer.height(), color)
        .with_context(|| format!("writing {}", path.display()))
}

/// Load a sheet JSON and the image it points at (relative to the JSON).
pub fn load_sheet(json_path: &Path) -> Result<SourceSheet> {
    let name = json_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| json_path.display().to_string());
    let json = fs::read_to_string(json_path).with_context(|| format!("reading {}", json_path.display()))?;
    let descriptor = SheetDescriptor::from_json(&name, &json)?;

    let image_path = json_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&descriptor.meta.image);
    let image = load_rgba(&image_path)?;
    log::debug!(
        "{name}: loaded {}x{} sheet image {}",
        image.width(),
        image.height(),
        image_path.display()
    );

    Ok(SourceSheet::from_descriptor(name, &descriptor, image)?)
}

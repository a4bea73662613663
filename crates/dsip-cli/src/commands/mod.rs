//! CLI command implementations

pub mod histogram;
pub mod luts;
pub mod process;
pub mod profile;

use anyhow::{Context, Result};
use dsip_core::PixelBuffer;
use dsip_core::codec;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    codec::load(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    codec::save(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

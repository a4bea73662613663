//! LUT library listing

use anyhow::{Context, Result};

use crate::LutsArgs;
use crate::config::{CliConfig, LUT_DIR_ENV};
use crate::library::ImageLibrary;

pub fn run(args: LutsArgs, config: &CliConfig) -> Result<()> {
    let dir = args
        .dir
        .or_else(|| config.lut_dir.clone())
        .with_context(|| format!("No LUT directory given (pass one or set {LUT_DIR_ENV})"))?;
    let library = ImageLibrary::open(&dir)?;

    if library.is_empty() {
        println!("No LUT images in {}", library.dir().display());
        return Ok(());
    }
    for (index, path) in library.entries().iter().enumerate() {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("{index:>4}  {name}");
    }
    Ok(())
}

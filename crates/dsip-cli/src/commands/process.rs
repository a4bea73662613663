//! Look processing command

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use dsip_core::{ColorCube, Profile, process_image_with_cube};
use tracing::{debug, info};

use crate::ProcessArgs;
use crate::config::{CliConfig, GRAIN_DIR_ENV, LUT_DIR_ENV};
use crate::library::{ImageLibrary, pick_grain};

pub fn run(args: ProcessArgs, config: &CliConfig) -> Result<()> {
    let start = Instant::now();

    let source = super::load_image(&args.input)?;
    let parsed = Profile::load(&args.profile)
        .with_context(|| format!("Failed to read profile: {}", args.profile.display()))?;
    let profile = parsed.profile;

    let lut_path = resolve_lut(&args, config, profile.lut_file_index)?;
    let lut_image = super::load_image(&lut_path)?;
    let cube = ColorCube::from_image(&lut_image)
        .with_context(|| format!("Invalid LUT image: {}", lut_path.display()))?;
    info!(lut = %lut_path.display(), level = cube.level(), "using LUT");

    let grain_path = resolve_grain(&args, config)?;
    let grain = super::load_image(&grain_path)?;
    info!(grain = %grain_path.display(), "using grain plate");

    let params = if args.preview {
        profile.to_params().preview()
    } else {
        profile.to_params()
    };
    debug!(?params, "processing parameters");

    let output = process_image_with_cube(&source, &cube, &grain, params)
        .with_context(|| format!("Failed to process: {}", args.input.display()))?;
    super::save_image(&args.output, &output)?;

    info!(
        output = %args.output.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}

/// An explicit `--lut` wins; otherwise the profile index selects from the
/// LUT directory.
fn resolve_lut(args: &ProcessArgs, config: &CliConfig, index: i32) -> Result<PathBuf> {
    if let Some(lut) = &args.lut {
        return Ok(lut.clone());
    }
    let Some(dir) = args.lut_dir.as_ref().or(config.lut_dir.as_ref()) else {
        bail!("No LUT given (pass --lut or --lut-dir, or set {LUT_DIR_ENV})");
    };
    select_lut(dir, index)
}

fn select_lut(dir: &Path, index: i32) -> Result<PathBuf> {
    let library = ImageLibrary::open(dir)?;
    let path = library
        .select(index)
        .with_context(|| format!("No LUT images in {}", dir.display()))?;
    debug!(index, count = library.entries().len(), "selected LUT");
    Ok(path.to_path_buf())
}

fn resolve_grain(args: &ProcessArgs, config: &CliConfig) -> Result<PathBuf> {
    let candidates = if !args.grain.is_empty() {
        args.grain.clone()
    } else if let Some(dir) = args.grain_dir.as_ref().or(config.grain_dir.as_ref()) {
        ImageLibrary::open(dir)?.entries().to_vec()
    } else {
        bail!("No grain plate given (pass --grain or --grain-dir, or set {GRAIN_DIR_ENV})");
    };

    pick_grain(&candidates, args.seed)
        .map(Path::to_path_buf)
        .context("No grain images to choose from")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_lut_uses_wrapped_profile_index() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        assert_eq!(select_lut(dir.path(), 0).unwrap(), dir.path().join("a.png"));
        assert_eq!(select_lut(dir.path(), 3).unwrap(), dir.path().join("b.png"));
    }

    #[test]
    fn test_select_lut_from_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = select_lut(dir.path(), 0).unwrap_err();
        assert!(err.to_string().contains("No LUT images"));
    }
}

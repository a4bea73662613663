//! Directories of LUT images and grain plates.
//!
//! A library is the sorted list of image files in one directory. LUTs are
//! addressed by index (wrapping, so any profile index selects something);
//! grain plates are drawn at random.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// File extensions the codec can read.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "tga", "webp"];

/// Image files of one directory, sorted by file name.
#[derive(Debug, Clone)]
pub struct ImageLibrary {
    dir: PathBuf,
    entries: Vec<PathBuf>,
}

impl ImageLibrary {
    /// Scan `dir` (non-recursive). Subdirectories and files without an
    /// image extension are skipped.
    pub fn open(dir: &Path) -> Result<Self> {
        let read = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        let mut entries = Vec::new();
        for entry in read {
            let path = entry
                .with_context(|| format!("Failed to list {}", dir.display()))?
                .path();
            if path.is_file() && is_image(&path) {
                entries.push(path);
            }
        }
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        tracing::debug!(dir = %dir.display(), count = entries.len(), "scanned image library");
        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, wrapping modulo the entry count in both
    /// directions. `None` only when the library is empty.
    pub fn select(&self, index: i32) -> Option<&Path> {
        if self.entries.is_empty() {
            return None;
        }
        let i = (index as i64).rem_euclid(self.entries.len() as i64) as usize;
        Some(&self.entries[i])
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Pick one grain plate. A seed makes the choice reproducible.
pub fn pick_grain(candidates: &[PathBuf], seed: Option<u64>) -> Option<&Path> {
    let choice = match seed {
        Some(seed) => candidates.choose(&mut StdRng::seed_from_u64(seed)),
        None => candidates.choose(&mut rand::rng()),
    };
    choice.map(PathBuf::as_path)
}

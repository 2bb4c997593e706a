//! PNG encoding of rasters and a directory-backed artifact sink.
//!
//! Feature-gated behind `png` (default on) so the rasterizer can be used
//! without pulling in the `image` crate.

use std::path::{Path, PathBuf};

use duotone_core::compositor::{ArtifactSink, Stage};
use duotone_core::error::ArtError;
use duotone_core::raster::Raster;
use tracing::debug;

/// Writes a raster as an RGBA PNG.
///
/// Returns `ArtError::Io` on encode or write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), ArtError> {
    let img = image::RgbaImage::from_raw(raster.width(), raster.height(), raster.pixels().to_vec())
        .ok_or_else(|| ArtError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| ArtError::Io(format!("{}: {e}", path.display())))
}

/// Reads a PNG back into a straight-alpha raster.
pub fn read_png(path: &Path) -> Result<Raster, ArtError> {
    let img = image::open(path)
        .map_err(|e| ArtError::Io(format!("{}: {e}", path.display())))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    Raster::from_rgba8(w, h, img.into_raw())
}

/// Writes each stage as a PNG named by [`Stage::file_name`] into one directory.
#[derive(Debug, Clone)]
pub struct PngDirectorySink {
    dir: PathBuf,
}

impl PngDirectorySink {
    /// Creates the sink, creating `dir` and its parents if missing.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, ArtError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| ArtError::Io(format!("{}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a stage is written to.
    pub fn path_for(&self, stage: Stage) -> PathBuf {
        self.dir.join(stage.file_name())
    }
}

impl ArtifactSink for PngDirectorySink {
    fn persist(&mut self, stage: Stage, raster: &Raster) -> Result<(), ArtError> {
        let path = self.path_for(stage);
        write_png(raster, &path)?;
        debug!(path = %path.display(), "wrote artifact");
        Ok(())
    }
}

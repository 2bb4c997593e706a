#![deny(unsafe_code)]
//! CPU rendering backend for duotone.
//!
//! Sits between `duotone-core` (traits, layer drawing, compositing) and the
//! CLI: provides [`VelloSurface`], a [`DrawSurface`](duotone_core::DrawSurface)
//! on the `vello_cpu` rasterizer, and PNG artifact output.

pub mod pixel;
pub mod surface;

#[cfg(feature = "png")]
pub mod snapshot;

use duotone_core::compositor::{ArtifactSink, Compositor};
use duotone_core::error::ArtError;
use duotone_core::page::PageSize;
use duotone_core::raster::Raster;
use duotone_core::traits::Traits;
use tracing::info;

pub use surface::VelloSurface;

#[cfg(feature = "png")]
pub use snapshot::PngDirectorySink;

/// Renders and composites `traits` on `page`, persisting every stage to `sink`.
pub fn render_artwork(
    traits: &Traits,
    page: PageSize,
    sink: &mut dyn ArtifactSink,
) -> Result<Raster, ArtError> {
    info!(
        hash = %traits.token.hash,
        width = page.width(),
        height = page.height(),
        "rendering artwork"
    );
    Compositor::new(page).run(traits, VelloSurface::new, sink)
}

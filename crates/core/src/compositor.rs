//! The two-layer compositing pipeline.
//!
//! Renders both ink layers, tints each one by screening its ink over it,
//! then multiplies the two tinted previews into the final artwork. Every
//! intermediate raster is handed to an [`ArtifactSink`] in [`Stage::ORDER`];
//! the final image is always persisted last.

use tracing::info;

use crate::error::ArtError;
use crate::layer::LayerRenderer;
use crate::page::PageSize;
use crate::raster::{BlendMode, Raster};
use crate::surface::DrawSurface;
use crate::traits::{InkLayer, Traits};

const WHITE: [u8; 4] = [255, 255, 255, 255];

/// A named intermediate or final output of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ColourOne,
    ColourTwo,
    ColourOnePreview,
    ColourTwoPreview,
    Final,
}

impl Stage {
    /// Stages in the order they are produced.
    pub const ORDER: [Stage; 5] = [
        Stage::ColourOne,
        Stage::ColourTwo,
        Stage::ColourOnePreview,
        Stage::ColourTwoPreview,
        Stage::Final,
    ];

    /// File name the stage is written under.
    pub fn file_name(self) -> &'static str {
        match self {
            Stage::ColourOne => "01 colour one.png",
            Stage::ColourTwo => "02 colour two.png",
            Stage::ColourOnePreview => "01 colour one preview.png",
            Stage::ColourTwoPreview => "02 colour two preview.png",
            Stage::Final => "preview.png",
        }
    }
}

/// Receives rasters as the pipeline produces them.
pub trait ArtifactSink {
    fn persist(&mut self, stage: Stage, raster: &Raster) -> Result<(), ArtError>;
}

/// Keeps every persisted raster in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Vec<(Stage, Raster)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent raster persisted for `stage`.
    pub fn get(&self, stage: Stage) -> Option<&Raster> {
        self.artifacts
            .iter()
            .rev()
            .find(|(s, _)| *s == stage)
            .map(|(_, r)| r)
    }

    /// Stages in arrival order.
    pub fn stages(&self) -> Vec<Stage> {
        self.artifacts.iter().map(|(s, _)| *s).collect()
    }

    pub fn into_artifacts(self) -> Vec<(Stage, Raster)> {
        self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn persist(&mut self, stage: Stage, raster: &Raster) -> Result<(), ArtError> {
        self.artifacts.push((stage, raster.clone()));
        Ok(())
    }
}

/// Drives one full render of a set of traits.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    page: PageSize,
}

impl Compositor {
    pub fn new(page: PageSize) -> Self {
        Self { page }
    }

    pub fn page(&self) -> PageSize {
        self.page
    }

    /// Runs the pipeline and returns the final raster.
    ///
    /// `make_surface` is called once per layer for a fresh surface of the
    /// compositor's page size. Any surface or sink error aborts the run
    /// before the final stage is persisted.
    pub fn run<S, F>(
        &self,
        traits: &Traits,
        mut make_surface: F,
        sink: &mut dyn ArtifactSink,
    ) -> Result<Raster, ArtError>
    where
        S: DrawSurface,
        F: FnMut(PageSize) -> Result<S, ArtError>,
    {
        let renderer = LayerRenderer::new(traits);
        let mut render_layer = |layer: InkLayer| -> Result<Raster, ArtError> {
            let mut surface = make_surface(self.page)?;
            renderer.render(layer, &mut surface);
            surface.snapshot()
        };

        let colour_one = render_layer(InkLayer::First)?;
        persist(sink, Stage::ColourOne, &colour_one)?;
        let colour_two = render_layer(InkLayer::Second)?;
        persist(sink, Stage::ColourTwo, &colour_two)?;

        let mut canvas = Raster::filled(self.page.width(), self.page.height(), WHITE)?;
        canvas.composite(&colour_one, BlendMode::Normal)?;
        canvas.fill_blend(traits.first_colour.to_srgb(), BlendMode::Screen);
        let preview_one = canvas.clone();
        persist(sink, Stage::ColourOnePreview, &preview_one)?;

        canvas.composite(&colour_two, BlendMode::Normal)?;
        canvas.fill_blend(traits.second_colour.to_srgb(), BlendMode::Screen);
        let preview_two = canvas.clone();
        persist(sink, Stage::ColourTwoPreview, &preview_two)?;

        canvas.composite(&preview_one, BlendMode::Normal)?;
        canvas.composite(&preview_two, BlendMode::Multiply)?;
        persist(sink, Stage::Final, &canvas)?;
        Ok(canvas)
    }
}

fn persist(sink: &mut dyn ArtifactSink, stage: Stage, raster: &Raster) -> Result<(), ArtError> {
    sink.persist(stage, raster)?;
    info!(stage = stage.file_name(), "stage complete");
    Ok(())
}

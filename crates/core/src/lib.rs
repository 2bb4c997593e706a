#![deny(unsafe_code)]
//! Core types for the duotone generative print system.
//!
//! A seed string drives [`SeededRandom`], which [`TraitGenerator`] turns into
//! an immutable [`Traits`] record. [`LayerRenderer`] draws each of the two ink
//! layers onto any [`DrawSurface`], and [`Compositor`] blends the resulting
//! [`Raster`]s into the final artwork, handing each stage to an
//! [`ArtifactSink`].

pub mod color;
pub mod compositor;
pub mod error;
pub mod layer;
pub mod page;
pub mod palette;
pub mod prng;
pub mod raster;
pub mod seed;
pub mod shape;
pub mod surface;
pub mod traits;

pub use color::{Hsl, Srgb};
pub use compositor::{ArtifactSink, Compositor, MemorySink, Stage};
pub use error::ArtError;
pub use layer::LayerRenderer;
pub use page::{PageSize, RenderConfig};
pub use palette::{Ink, InkPalette};
pub use prng::SeededRandom;
pub use raster::{BlendMode, Raster};
pub use seed::TokenData;
pub use surface::{DrawSurface, Paint, StrokeStyle};
pub use traits::{DrawStep, InkLayer, ShapeKind, TraitGenerator, Traits};

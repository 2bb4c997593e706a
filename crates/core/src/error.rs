//! Error types for duotone core.

use thiserror::Error;

/// Errors produced while generating traits, rendering layers or compositing.
#[derive(Debug, Error)]
pub enum ArtError {
    /// Width or height was zero (or overflowed) when creating a page or raster.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// `choice` was asked to pick from an empty list.
    #[error("cannot choose from an empty set")]
    EmptyChoiceSet,

    /// No second ink distinct from the first could be drawn.
    #[error("ink palette exhausted: no distinct second ink after {attempts} draws")]
    PaletteExhausted { attempts: usize },

    /// Two rasters had incompatible dimensions for a compositing operation.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A color string or channel could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// An ink palette could not be constructed from the given entries.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// A drawing surface failed to allocate, or an artifact failed to encode,
    /// write or read back.
    #[error("I/O error: {0}")]
    Io(String),
}

//! Output page geometry and render settings.

use serde::{Deserialize, Serialize};

use crate::error::ArtError;

/// Resolution every absolute measurement is specified at.
pub const REFERENCE_DPI: f64 = 300.0;

/// Border width in pixels at [`REFERENCE_DPI`].
const REFERENCE_BORDER: f64 = 250.0;

/// Page width divided by this gives the overlay stroke width.
const LINE_WIDTH_DIVISOR: f64 = 300.0;

/// Pixel dimensions of the output page plus the resolution they were derived at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    width: u32,
    height: u32,
    dpi: f64,
}

impl PageSize {
    /// Creates a page from pixel dimensions.
    ///
    /// Returns `ArtError::InvalidDimensions` if either side is zero or the
    /// dpi is not a positive finite number.
    pub fn new(width: u32, height: u32, dpi: f64) -> Result<Self, ArtError> {
        if width == 0 || height == 0 || !dpi.is_finite() || dpi <= 0.0 {
            return Err(ArtError::InvalidDimensions);
        }
        Ok(Self { width, height, dpi })
    }

    /// Creates a page from physical dimensions, rounding to whole pixels.
    pub fn from_inches(width_in: f64, height_in: f64, dpi: f64) -> Result<Self, ArtError> {
        let to_px = |inches: f64| -> Result<u32, ArtError> {
            let px = (inches * dpi).round();
            if !px.is_finite() || px < 1.0 || px > f64::from(u32::MAX) {
                return Err(ArtError::InvalidDimensions);
            }
            Ok(px as u32)
        };
        Self::new(to_px(width_in)?, to_px(height_in)?, dpi)
    }

    /// The 11.75in x 16.5in page at 300 dpi (3525 x 4950 px).
    pub fn reference() -> Self {
        Self {
            width: 3525,
            height: 4950,
            dpi: REFERENCE_DPI,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Width of the white frame, scaled linearly from 250 px at 300 dpi.
    pub fn border_width(&self) -> f64 {
        REFERENCE_BORDER * self.dpi / REFERENCE_DPI
    }

    /// Stroke width for outlined shapes.
    pub fn line_width(&self) -> f64 {
        f64::from(self.width) / LINE_WIDTH_DIVISOR
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::reference()
    }
}

/// Page settings for a render run.
///
/// Deserializes with defaults for any missing field, so `{}` is the reference page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width_inches: f64,
    pub height_inches: f64,
    pub dpi: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_inches: 11.75,
            height_inches: 16.5,
            dpi: REFERENCE_DPI,
        }
    }
}

impl RenderConfig {
    /// Resolves the configured page into pixel dimensions.
    pub fn page(&self) -> Result<PageSize, ArtError> {
        PageSize::from_inches(self.width_inches, self.height_inches, self.dpi)
    }
}

//! The drawing surface seam between layer rendering and a rasterizer.
//!
//! [`DrawSurface`] is a small 2D canvas: a current transform and global alpha
//! that can be saved and restored, plus rect, path fill and path stroke
//! operations. Rendering code only talks to this trait, so any backend that
//! can fill paths and hand back an RGBA8 [`Raster`] can draw an artwork.
//!
//! The trait is object-safe so layers can be rendered onto `&mut dyn DrawSurface`.

use kurbo::{Affine, BezPath, Cap, Join, Rect};

use crate::color::Srgb;
use crate::error::ArtError;
use crate::page::PageSize;
use crate::raster::Raster;

/// Fill paint for rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Srgb),
    /// Linear gradient along the local y axis. `start` is the color
    /// at `y0` and `end` the color at `y1`; outside that span the nearest
    /// stop is extended.
    VerticalGradient {
        y0: f64,
        y1: f64,
        start: Srgb,
        end: Srgb,
    },
}

impl Paint {
    /// Color of the paint at local row coordinate `y`.
    pub fn color_at(&self, y: f64) -> Srgb {
        match *self {
            Paint::Solid(c) => c,
            Paint::VerticalGradient { y0, y1, start, end } => {
                let span = y1 - y0;
                if span == 0.0 {
                    return end;
                }
                let t = ((y - y0) / span).clamp(0.0, 1.0);
                start.lerp(end, t)
            }
        }
    }
}

/// Stroke parameters for outlined paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub cap: Cap,
    pub join: Join,
}

impl StrokeStyle {
    /// Round-capped stroke of the given width with miter joins.
    pub fn round_caps(width: f64) -> Self {
        Self {
            width,
            cap: Cap::Round,
            join: Join::Miter,
        }
    }
}

/// Transform and alpha captured by [`DrawSurface::save`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub transform: Affine,
    pub alpha: f64,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// Current state plus the save stack, shared by surface implementations.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: SurfaceState,
    saved: Vec<SurfaceState>,
}

impl StateStack {
    pub fn current(&self) -> SurfaceState {
        self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pops the last saved state. An unbalanced restore is ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    /// Number of saves not yet restored.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Post-multiplies a translation, so it applies in the current local space.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current.transform = self.current.transform * Affine::translate((dx, dy));
    }

    /// Post-multiplies a rotation by `radians` (clockwise on a y-down page).
    pub fn rotate(&mut self, radians: f64) {
        self.current.transform = self.current.transform * Affine::rotate(radians);
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.current.alpha = alpha.clamp(0.0, 1.0);
    }
}

/// A 2D drawing target with a save/restore transform stack.
pub trait DrawSurface {
    /// Pixel size of the page being drawn.
    fn page(&self) -> PageSize;

    /// Pushes the current transform and alpha.
    fn save(&mut self);

    /// Pops to the last saved transform and alpha.
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);

    fn rotate(&mut self, radians: f64);

    /// Sets the alpha multiplier for subsequent fills and strokes, in [0, 1].
    fn set_global_alpha(&mut self, alpha: f64);

    /// Fills an axis-aligned rectangle given in the current local space.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    fn fill_path(&mut self, path: &BezPath, color: Srgb);

    fn stroke_path(&mut self, path: &BezPath, color: Srgb, style: &StrokeStyle);

    /// Rasterizes everything drawn so far into a straight-alpha RGBA8 raster.
    ///
    /// Returns `ArtError::Io` if the backend cannot produce pixels.
    fn snapshot(&mut self) -> Result<Raster, ArtError>;
}

#[cfg(test)]
pub(crate) mod recording {
    //! A surface that records calls instead of drawing, for draw-order tests.

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Save,
        Restore,
        Translate(f64, f64),
        Rotate(f64),
        Alpha(f64),
        FillRect {
            rect: Rect,
            paint: Paint,
        },
        FillPath {
            bbox: Rect,
            color: Srgb,
            alpha: f64,
            transform: Affine,
        },
        StrokePath {
            bbox: Rect,
            color: Srgb,
            alpha: f64,
            width: f64,
        },
    }

    pub struct RecordingSurface {
        page: PageSize,
        state: StateStack,
        pub ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub fn new(page: PageSize) -> Self {
            Self {
                page,
                state: StateStack::default(),
                ops: Vec::new(),
            }
        }

        pub fn depth(&self) -> usize {
            self.state.depth()
        }
    }

    impl DrawSurface for RecordingSurface {
        fn page(&self) -> PageSize {
            self.page
        }

        fn save(&mut self) {
            self.state.save();
            self.ops.push(Op::Save);
        }

        fn restore(&mut self) {
            self.state.restore();
            self.ops.push(Op::Restore);
        }

        fn translate(&mut self, dx: f64, dy: f64) {
            self.state.translate(dx, dy);
            self.ops.push(Op::Translate(dx, dy));
        }

        fn rotate(&mut self, radians: f64) {
            self.state.rotate(radians);
            self.ops.push(Op::Rotate(radians));
        }

        fn set_global_alpha(&mut self, alpha: f64) {
            self.state.set_alpha(alpha);
            self.ops.push(Op::Alpha(alpha));
        }

        fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
            self.ops.push(Op::FillRect {
                rect,
                paint: *paint,
            });
        }

        fn fill_path(&mut self, path: &BezPath, color: Srgb) {
            use kurbo::Shape;
            let state = self.state.current();
            self.ops.push(Op::FillPath {
                bbox: path.bounding_box(),
                color,
                alpha: state.alpha,
                transform: state.transform,
            });
        }

        fn stroke_path(&mut self, path: &BezPath, color: Srgb, style: &StrokeStyle) {
            use kurbo::Shape;
            self.ops.push(Op::StrokePath {
                bbox: path.bounding_box(),
                color,
                alpha: self.state.current().alpha,
                width: style.width,
            });
        }

        fn snapshot(&mut self) -> Result<Raster, ArtError> {
            Raster::new(self.page.width(), self.page.height())
        }
    }
}

//! Renders one ink layer of an artwork onto a [`DrawSurface`].
//!
//! A layer is a grayscale page: a solid or gradient background, a white
//! border frame, then the grid of shapes drawn in white with an optional
//! translucent black pass on top. The compositor later tints it with the
//! layer's ink.

use glam::DVec2;
use kurbo::Rect;
use tracing::debug;

use crate::color::{hsl_to_srgb, Hsl, Srgb};
use crate::shape::{shape_path, RADIUS_SCALE};
use crate::surface::{DrawSurface, Paint, StrokeStyle};
use crate::traits::{BackgroundSpec, BackgroundType, GridShape, InkLayer, LayerParams, Traits};

/// Scale applied to shape positions around the page center.
const GRID_SCALE: f64 = 0.8;

/// Nudge offsets are in units of `width / NUDGE_DIVISOR`.
const NUDGE_DIVISOR: f64 = 200.0;

/// Solid background lightness, light and dark.
const SOLID_LIGHT: f64 = 90.0;
const SOLID_DARK: f64 = 50.0;

/// Gradient lightness at the (start, end) stops.
const GRADIENT_LIGHT: (f64, f64) = (90.0, 50.0);
const GRADIENT_DARK: (f64, f64) = (30.0, 70.0);

/// Draws layers from a fixed set of traits.
#[derive(Debug, Clone, Copy)]
pub struct LayerRenderer<'t> {
    traits: &'t Traits,
}

impl<'t> LayerRenderer<'t> {
    pub fn new(traits: &'t Traits) -> Self {
        Self { traits }
    }

    /// Draws the full layer page for `layer`.
    ///
    /// Leaves the surface transform and alpha as they were on entry.
    pub fn render<S: DrawSurface + ?Sized>(&self, layer: InkLayer, surface: &mut S) {
        let params = self.traits.layer_params(layer);
        debug!(
            ?layer,
            background = ?params.background.kind,
            dark = params.background.dark,
            opacity = params.shape_opacity,
            "rendering layer"
        );
        draw_background(surface, &params);
        draw_border(surface);
        draw_grid(surface, &self.traits.grid, &params);
    }
}

fn gray(lightness: f64) -> Srgb {
    hsl_to_srgb(Hsl::gray(lightness))
}

/// Background paint for a page of height `h`.
fn background_paint(background: BackgroundSpec, flipped: bool, h: f64) -> Paint {
    match background.kind {
        BackgroundType::Solid => Paint::Solid(gray(if background.dark { SOLID_DARK } else { SOLID_LIGHT })),
        BackgroundType::Gradient => {
            let (start, end) = if background.dark { GRADIENT_DARK } else { GRADIENT_LIGHT };
            let (y0, y1) = if flipped { (h, 0.0) } else { (0.0, h) };
            Paint::VerticalGradient {
                y0,
                y1,
                start: gray(start),
                end: gray(end),
            }
        }
    }
}

fn draw_background<S: DrawSurface + ?Sized>(surface: &mut S, params: &LayerParams) {
    let page = surface.page();
    let (w, h) = (f64::from(page.width()), f64::from(page.height()));
    let full = Rect::new(0.0, 0.0, w, h);
    surface.fill_rect(full, &Paint::Solid(Srgb::WHITE));
    surface.fill_rect(full, &background_paint(params.background, params.flipped, h));
}

fn draw_border<S: DrawSurface + ?Sized>(surface: &mut S) {
    let page = surface.page();
    let (w, h) = (f64::from(page.width()), f64::from(page.height()));
    let b = page.border_width();
    let white = Paint::Solid(Srgb::WHITE);
    for rect in [
        Rect::new(0.0, 0.0, w, b),
        Rect::new(0.0, 0.0, b, h),
        Rect::new(0.0, h - b, w, h),
        Rect::new(w - b, 0.0, w, h),
    ] {
        surface.fill_rect(rect, &white);
    }
}

/// Center of `shape` relative to the page center, before the nudge.
fn shape_center(shape: &GridShape, size: DVec2) -> DVec2 {
    let offset = DVec2::splat(shape.size * size.x);
    (DVec2::new(shape.x, shape.y) * size - size / 2.0 + offset) * GRID_SCALE
}

fn draw_grid<S: DrawSurface + ?Sized>(surface: &mut S, grid: &[GridShape], params: &LayerParams) {
    let page = surface.page();
    let size = DVec2::new(f64::from(page.width()), f64::from(page.height()));
    let stroke = StrokeStyle::round_caps(page.line_width());
    let origin = size / 2.0 + DVec2::new(params.nudge.x, params.nudge.y) * size.x / NUDGE_DIVISOR;
    let opacity = params.shape_opacity;

    surface.save();
    surface.translate(origin.x, origin.y);
    for shape in grid {
        let center = shape_center(shape, size);
        let path = shape_path(shape.kind, shape.size * size.x * RADIUS_SCALE);

        surface.save();
        surface.translate(center.x, center.y);
        surface.rotate(f64::from(shape.rotation_degrees).to_radians());
        if shape.filled {
            surface.fill_path(&path, Srgb::WHITE);
            if opacity > 0.0 {
                surface.set_global_alpha(opacity);
                surface.fill_path(&path, Srgb::BLACK);
                surface.set_global_alpha(1.0);
            }
        } else {
            surface.stroke_path(&path, Srgb::WHITE, &stroke);
            if opacity > 0.0 {
                surface.set_global_alpha(opacity);
                surface.stroke_path(&path, Srgb::BLACK, &stroke);
                surface.set_global_alpha(1.0);
            }
        }
        surface.restore();
    }
    surface.restore();
}

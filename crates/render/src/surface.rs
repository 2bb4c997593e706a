//! [`DrawSurface`] implementation on the `vello_cpu` rasterizer.
//!
//! Paths and transforms arrive as core `kurbo` types and are copied element
//! by element into `vello_cpu`'s own `kurbo` types. Global alpha is applied
//! with an opacity layer around each draw. Vertical gradients are filled as
//! one-pixel-tall rows, each colored at its row center.

use duotone_core::error::ArtError;
use duotone_core::page::PageSize;
use duotone_core::raster::Raster;
use duotone_core::surface::{DrawSurface, Paint, StateStack, StrokeStyle};
use duotone_core::Srgb;
use kurbo::{Affine, BezPath, Cap, Join, PathEl, Rect};
use tracing::trace;

use crate::pixel::unpremultiply_rgba8;

/// A CPU-rasterized page.
pub struct VelloSurface {
    page: PageSize,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    state: StateStack,
}

impl VelloSurface {
    /// Allocates a surface for `page`.
    ///
    /// Returns `ArtError::Io` if a side exceeds the rasterizer's 65535 px limit.
    pub fn new(page: PageSize) -> Result<Self, ArtError> {
        let side = |px: u32, name: &str| {
            u16::try_from(px).map_err(|_| {
                ArtError::Io(format!(
                    "page {name} of {px} px exceeds the rasterizer limit of {} px",
                    u16::MAX
                ))
            })
        };
        let width = side(page.width(), "width")?;
        let height = side(page.height(), "height")?;
        trace!(width, height, "allocating vello_cpu surface");
        Ok(Self {
            page,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            state: StateStack::default(),
        })
    }

    /// Sets transform and paint color, then runs `draw` inside an opacity
    /// layer when the current alpha is below 1.
    fn draw_with(&mut self, color: Srgb, draw: impl FnOnce(&mut vello_cpu::RenderContext)) {
        let state = self.state.current();
        if state.alpha <= 0.0 {
            return;
        }
        self.ctx.set_transform(affine_to_cpu(state.transform));
        self.ctx.set_paint(color_to_cpu(color));
        let layered = state.alpha < 1.0;
        if layered {
            self.ctx.push_opacity_layer(state.alpha as f32);
        }
        draw(&mut self.ctx);
        if layered {
            self.ctx.pop_layer();
        }
    }
}

impl DrawSurface for VelloSurface {
    fn page(&self) -> PageSize {
        self.page
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rotate(radians);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.set_alpha(alpha);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        match *paint {
            Paint::Solid(color) => {
                self.draw_with(color, |ctx| ctx.fill_rect(&rect_to_cpu(rect)));
            }
            Paint::VerticalGradient { .. } => {
                let mut y = rect.y0.floor();
                while y < rect.y1 {
                    let row = Rect::new(rect.x0, y.max(rect.y0), rect.x1, (y + 1.0).min(rect.y1));
                    let color = paint.color_at(y + 0.5);
                    self.draw_with(color, |ctx| ctx.fill_rect(&rect_to_cpu(row)));
                    y += 1.0;
                }
            }
        }
    }

    fn fill_path(&mut self, path: &BezPath, color: Srgb) {
        let path = bezpath_to_cpu(path);
        self.draw_with(color, |ctx| ctx.fill_path(&path));
    }

    fn stroke_path(&mut self, path: &BezPath, color: Srgb, style: &StrokeStyle) {
        let path = bezpath_to_cpu(path);
        let stroke = stroke_to_cpu(style);
        self.draw_with(color, |ctx| {
            ctx.set_stroke(stroke);
            ctx.stroke_path(&path);
        });
    }

    fn snapshot(&mut self) -> Result<Raster, ArtError> {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        let pixels = unpremultiply_rgba8(pixmap.data_as_u8_slice());
        Raster::from_rgba8(self.page.width(), self.page.height(), pixels)
    }
}

fn color_to_cpu(c: Srgb) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn stroke_to_cpu(style: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    let cap = match style.cap {
        Cap::Butt => vello_cpu::kurbo::Cap::Butt,
        Cap::Square => vello_cpu::kurbo::Cap::Square,
        Cap::Round => vello_cpu::kurbo::Cap::Round,
    };
    let join = match style.join {
        Join::Bevel => vello_cpu::kurbo::Join::Bevel,
        Join::Miter => vello_cpu::kurbo::Join::Miter,
        Join::Round => vello_cpu::kurbo::Join::Round,
    };
    vello_cpu::kurbo::Stroke::new(style.width)
        .with_caps(cap)
        .with_join(join)
}

//! Path geometry for grid shapes.
//!
//! Paths are built around the origin in page pixels; the layer renderer
//! positions and rotates them through the surface transform.

use std::f64::consts::{PI, TAU};

use kurbo::{Arc, BezPath, Point, Vec2};

use crate::traits::ShapeKind;

/// Flattening tolerance for arc segments, in pixels.
const ARC_TOLERANCE: f64 = 0.1;

/// Ratio of a shape's drawn radius to its grid `size * width`.
pub const RADIUS_SCALE: f64 = 0.666;

/// Builds the outline of `kind` at radius `radius`, centered on the origin.
pub fn shape_path(kind: ShapeKind, radius: f64) -> BezPath {
    match kind {
        ShapeKind::Circle => circle(radius),
        ShapeKind::Semicircle => semicircle(radius),
        ShapeKind::Cross | ShapeKind::Plus => cross(radius),
    }
}

/// Full circle starting and ending at `(r, 0)`.
fn circle(r: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((r, 0.0));
    append_arc(&mut path, r, 0.0, TAU);
    path.line_to((r, 0.0));
    path
}

/// Half disc over the positive-y half plane, open at the center.
fn semicircle(r: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((r, 0.0));
    append_arc(&mut path, r, 0.0, PI);
    path.line_to((0.0, 0.0));
    path
}

/// Twelve-point saltire; a plus is the same outline turned 45 degrees.
fn cross(r: f64) -> BezPath {
    let c = r / 2.0;
    let points = [
        (-c, -2.0 * c),
        (0.0, -c),
        (c, -2.0 * c),
        (2.0 * c, -c),
        (c, 0.0),
        (2.0 * c, c),
        (c, 2.0 * c),
        (0.0, c),
        (-c, 2.0 * c),
        (-2.0 * c, c),
        (-c, 0.0),
        (-2.0 * c, -c),
    ];
    let mut path = BezPath::new();
    path.move_to(points[0]);
    for &p in &points[1..] {
        path.line_to(p);
    }
    path.close_path();
    path
}

fn append_arc(path: &mut BezPath, r: f64, start: f64, sweep: f64) {
    let arc = Arc::new(Point::ORIGIN, Vec2::new(r, r), start, sweep, 0.0);
    arc.to_cubic_beziers(ARC_TOLERANCE, |p1, p2, p| path.curve_to(p1, p2, p));
}

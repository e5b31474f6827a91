//! Stroke geometry and rasterization.
//!
//! Segments are drawn as a dense run of round brush stamps, which gives
//! round caps and joins and leaves no gaps however far apart two pointer
//! samples are.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Distance between brush stamps along a segment, in pixels.
const STAMP_SPACING: f32 = 0.5;

/// Smallest brush radius that still covers the pixel under the stamp center.
const MIN_RADIUS: f32 = 0.75;

/// A surface-local point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f32 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// A polyline as recorded between pointer-down and pointer-up.
pub type Stroke = Vec<Point>;

/// Pen settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Line width in pixels.
    pub width: f32,
    pub color: Rgba<u8>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 3.0,
            color: Rgba([0, 0, 0, 255]),
        }
    }
}

impl StrokeStyle {
    pub fn with_width(width: f32) -> Self {
        Self { width, ..Self::default() }
    }

    fn radius(&self) -> f32 {
        (self.width / 2.0).max(MIN_RADIUS)
    }
}

/// Draw a straight segment from `from` to `to`.
///
/// The segment is first clipped to the canvas grown by the brush radius, so
/// the number of stamps is bounded by the canvas size however far off the
/// surface either end lies.
pub(crate) fn draw_segment(canvas: &mut RgbaImage, from: Point, to: Point, style: &StrokeStyle) {
    let r = style.radius();
    let (w, h) = canvas.dimensions();
    let Some((from, to)) = clip_segment(from, to, (-r, -r), (w as f32 + r, h as f32 + r)) else {
        return;
    };

    let steps = (from.distance(&to) / STAMP_SPACING).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let center = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        stamp(canvas, center, style);
    }
}

/// Liang-Barsky clip of `from..to` against the rectangle `min..max`.
/// Returns `None` when nothing of the segment lies inside.
fn clip_segment(from: Point, to: Point, min: (f32, f32), max: (f32, f32)) -> Option<(Point, Point)> {
    if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (x0, y0) = (from.x as f64, from.y as f64);
    let (dx, dy) = (to.x as f64 - x0, to.y as f64 - y0);
    let edges = [
        (-dx, x0 - min.0 as f64),
        (dx, max.0 as f64 - x0),
        (-dy, y0 - min.1 as f64),
        (dy, max.1 as f64 - y0),
    ];

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let (mut enter, mut exit) = (None, None);
    for (edge, (p, q)) in edges.into_iter().enumerate() {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            if t > t0 {
                t0 = t;
                enter = Some(edge);
            }
        } else {
            if t < t0 {
                return None;
            }
            if t < t1 {
                t1 = t;
                exit = Some(edge);
            }
        }
    }

    // Clipped ends sit exactly on the edge that cut them.
    let at = |t: f64, edge: Option<usize>| {
        let (mut x, mut y) = (x0 + dx * t, y0 + dy * t);
        match edge {
            Some(0) => x = min.0 as f64,
            Some(1) => x = max.0 as f64,
            Some(2) => y = min.1 as f64,
            Some(3) => y = max.1 as f64,
            _ => {}
        }
        Point::new(x as f32, y as f32)
    };
    Some((at(t0, enter), at(t1, exit)))
}

/// Fill a disc at `center`, clipped to the canvas.
fn stamp(canvas: &mut RgbaImage, center: Point, style: &StrokeStyle) {
    let r = style.radius();
    let (w, h) = canvas.dimensions();

    let x0 = ((center.x - r).floor() as i64).max(0);
    let y0 = ((center.y - r).floor() as i64).max(0);
    let x1 = ((center.x + r).ceil() as i64).min(w as i64 - 1);
    let y1 = ((center.y + r).ceil() as i64).min(h as i64 - 1);

    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 + 0.5 - center.x;
            let dy = py as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= r * r {
                canvas.put_pixel(px as u32, py as u32, style.color);
            }
        }
    }
}

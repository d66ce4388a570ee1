//! Cubic Bézier geometry for the artery track.
//!
//! The same four control points drive both the evaluated handle position and
//! the SVG path string, so markers sit exactly on the rendered track.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

/// Width and height of the view box the artery is drawn in.
pub const VIEW_WIDTH: f64 = 600.0;
pub const VIEW_HEIGHT: f64 = 200.0;

/// Where `p` lands on a stage laid out at the view box's aspect ratio with
/// the drawing stretched edge to edge, as `(left %, top %)`.
pub fn stage_percent(p: Point) -> (f64, f64) {
    (p.x / VIEW_WIDTH * 100.0, p.y / VIEW_HEIGHT * 100.0)
}

/// Pixel position of `p` on a stage `stage_width` wide that letterboxes the
/// view box the way SVG `xMidYMid meet` does.
pub fn stage_pixels(p: Point, stage_width: f64, stage_height: f64) -> Point {
    let scale = (stage_width / VIEW_WIDTH).min(stage_height / VIEW_HEIGHT);
    Point {
        x: (stage_width - VIEW_WIDTH * scale) / 2.0 + p.x * scale,
        y: (stage_height - VIEW_HEIGHT * scale) / 2.0 + p.y * scale,
    }
}

/// The S-shaped artery: anchored at both sides, pulled up then down.
pub const ARTERY: CubicBezier = CubicBezier {
    p0: Point::new(0.0, 100.0),
    p1: Point::new(300.0, -50.0),
    p2: Point::new(300.0, 250.0),
    p3: Point::new(600.0, 100.0),
};

impl CubicBezier {
    /// Evaluate the curve at `t`.
    ///
    /// `t` is not clamped; values outside `[0, 1]` extrapolate past the
    /// anchors, so callers pass a normalized parameter.
    pub fn point_at(&self, t: f64) -> Point {
        Point {
            x: Self::axis(self.p0.x, self.p1.x, self.p2.x, self.p3.x, t),
            y: Self::axis(self.p0.y, self.p1.y, self.p2.y, self.p3.y, t),
        }
    }

    #[inline]
    fn axis(a0: f64, a1: f64, a2: f64, a3: f64, t: f64) -> f64 {
        let c = 3.0 * (a1 - a0);
        let b = 3.0 * (a2 - 2.0 * a1 + a0);
        let a = a3 - 3.0 * a2 + 3.0 * a1 - a0;
        a0 + t * c + t * t * b + t * t * t * a
    }

    /// SVG path data (`M x,y C x,y x,y x,y`) for this curve.
    pub fn path_data(&self) -> String {
        format!("M{} C{} {} {}", self.p0, self.p1, self.p2, self.p3)
    }

    /// Parse path data of the form produced by [`CubicBezier::path_data`].
    ///
    /// Only a single absolute moveto followed by a single absolute cubic
    /// segment is accepted.
    pub fn from_path_data(d: &str) -> Option<Self> {
        let rest = d.trim().strip_prefix('M')?;
        let (start, curve) = rest.split_once('C')?;
        let p0 = parse_point(start)?;
        let mut controls = curve.split_whitespace().map(parse_point);
        let p1 = controls.next()??;
        let p2 = controls.next()??;
        let p3 = controls.next()??;
        if controls.next().is_some() {
            return None;
        }
        Some(Self { p0, p1, p2, p3 })
    }
}

fn parse_point(pair: &str) -> Option<Point> {
    let (x, y) = pair.trim().split_once(',')?;
    Some(Point {
        x: x.trim().parse().ok()?,
        y: y.trim().parse().ok()?,
    })
}

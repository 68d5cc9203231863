//! Draw collaborator.
//!
//! The core only ever fills rectangles and polygons in world coordinates.
//! Presenting the finished frame is the concrete surface's business.

use serde::{Deserialize, Serialize};

/// 8-bit RGB colour, written as a tuple `(r, g, b)` in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    /// Full-range HSV to RGB.  `hue`, `saturation` and `value` are in `[0, 1]`;
    /// a hue of exactly 1.0 wraps to red.  Channels are truncated, not rounded.
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Rgb {
        let channel = |c: f64| (c * 255.0) as u8;
        if saturation == 0.0 {
            let v = channel(value);
            return Rgb(v, v, v);
        }
        let sector = (hue * 6.0).floor();
        let f = hue * 6.0 - sector;
        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * f);
        let t = value * (1.0 - saturation * (1.0 - f));
        let (r, g, b) = match (sector as i32).rem_euclid(6) {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };
        Rgb(channel(r), channel(g), channel(b))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
    fn fill_polygon(&mut self, points: &[Point], color: Rgb);
}

// ── Recording surface ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect(Rect, Rgb),
    Polygon(Vec<Point>, Rgb),
}

/// A surface that remembers what was drawn, in order.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> impl Iterator<Item = (&Rect, &Rgb)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Rect(r, color) => Some((r, color)),
            DrawCommand::Polygon(..) => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = (&[Point], &Rgb)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polygon(points, color) => Some((points.as_slice(), color)),
            DrawCommand::Rect(..) => None,
        })
    }
}

impl Surface for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.commands.push(DrawCommand::Rect(rect, color));
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        self.commands.push(DrawCommand::Polygon(points.to_vec(), color));
    }
}

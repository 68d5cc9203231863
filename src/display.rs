//! Rendering layer — all terminal I/O lives here.
//!
//! `TerminalSurface` rasterises the game's world coordinates onto a pixel
//! grid of half-block cells: every terminal cell shows two vertically
//! stacked pixels (foreground = upper, background = lower).  The bottom
//! terminal row is kept free for the controls hint.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use dodge_shooter::surface::{Point, Rect, Rgb, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HINT: Color = Color::DarkGrey;
const C_GAME_OVER: Color = Color::Red;
const C_GAME_OVER_HINT: Color = Color::White;

const HALF_BLOCK: char = '▀';

/// What the frame shows on top of the playfield.
#[derive(Clone, Debug)]
pub struct Hud {
    pub game_over: bool,
    pub players: usize,
}

// ── Surface ───────────────────────────────────────────────────────────────────

pub struct TerminalSurface {
    world_w: i32,
    world_h: i32,
    cols: u16,
    /// Terminal rows used for the playfield.
    rows: u16,
    pixels: Vec<Rgb>,
}

impl TerminalSurface {
    pub fn new(world_w: i32, world_h: i32, term_cols: u16, term_rows: u16) -> Self {
        let mut surface = Self {
            world_w,
            world_h,
            cols: 0,
            rows: 0,
            pixels: Vec::new(),
        };
        surface.resize(term_cols, term_rows);
        surface
    }

    /// Follows a terminal resize.  Contents are discarded; the next frame
    /// redraws everything anyway.
    pub fn resize(&mut self, term_cols: u16, term_rows: u16) {
        self.cols = term_cols.max(1);
        self.rows = term_rows.saturating_sub(1).max(1);
        self.pixels = vec![Rgb::BLACK; self.px_w() as usize * self.px_h() as usize];
    }

    fn px_w(&self) -> i32 {
        self.cols as i32
    }

    fn px_h(&self) -> i32 {
        self.rows as i32 * 2
    }

    /// World x → pixel column, rounding toward negative infinity.
    fn col_floor(&self, x: i32) -> i32 {
        (x as i64 * self.px_w() as i64).div_euclid(self.world_w as i64) as i32
    }

    fn col_ceil(&self, x: i32) -> i32 {
        let w = self.world_w as i64;
        ((x as i64 * self.px_w() as i64 + w - 1).div_euclid(w)) as i32
    }

    fn row_floor(&self, y: i32) -> i32 {
        (y as i64 * self.px_h() as i64).div_euclid(self.world_h as i64) as i32
    }

    fn row_ceil(&self, y: i32) -> i32 {
        let h = self.world_h as i64;
        ((y as i64 * self.px_h() as i64 + h - 1).div_euclid(h)) as i32
    }

    /// Centre of pixel `(px, py)` in world coordinates.
    fn pixel_centre(&self, px: i32, py: i32) -> (f32, f32) {
        (
            (px as f32 + 0.5) * self.world_w as f32 / self.px_w() as f32,
            (py as f32 + 0.5) * self.world_h as f32 / self.px_h() as f32,
        )
    }

    fn put(&mut self, px: i32, py: i32, color: Rgb) {
        if px < 0 || py < 0 || px >= self.px_w() || py >= self.px_h() {
            return;
        }
        let idx = py as usize * self.px_w() as usize + px as usize;
        self.pixels[idx] = color;
    }

    fn pixel(&self, px: i32, py: i32) -> Rgb {
        self.pixels[py as usize * self.px_w() as usize + px as usize]
    }
}

impl Surface for TerminalSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        if rect.w <= 0 || rect.h <= 0 {
            return;
        }
        // Anything with area covers at least one pixel, however small.
        let x0 = self.col_floor(rect.x);
        let x1 = self.col_ceil(rect.x + rect.w).max(x0 + 1);
        let y0 = self.row_floor(rect.y);
        let y1 = self.row_ceil(rect.y + rect.h).max(y0 + 1);
        for py in y0.max(0)..y1.min(self.px_h()) {
            for px in x0.max(0)..x1.min(self.px_w()) {
                self.put(px, py, color);
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let min_x = points.iter().map(|p| p.x).min().unwrap_or(0);
        let max_x = points.iter().map(|p| p.x).max().unwrap_or(0);
        let min_y = points.iter().map(|p| p.y).min().unwrap_or(0);
        let max_y = points.iter().map(|p| p.y).max().unwrap_or(0);

        for py in self.row_floor(min_y).max(0)..self.row_ceil(max_y).min(self.px_h()) {
            for px in self.col_floor(min_x).max(0)..self.col_ceil(max_x).min(self.px_w()) {
                let (wx, wy) = self.pixel_centre(px, py);
                if contains(points, wx, wy) {
                    self.put(px, py, color);
                }
            }
        }
    }
}

/// Even-odd point-in-polygon test.
fn contains(points: &[Point], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = (points[i].x as f32, points[i].y as f32);
        let (xj, yj) = (points[j].x as f32, points[j].y as f32);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Present one complete frame.
pub fn present<W: Write>(out: &mut W, surface: &TerminalSurface, hud: &Hud) -> std::io::Result<()> {
    draw_pixels(out, surface)?;
    draw_controls_hint(out, surface, hud)?;

    if hud.game_over {
        draw_game_over(out, surface)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, surface.rows))?;
    out.flush()?;
    Ok(())
}

// ── Playfield ─────────────────────────────────────────────────────────────────

fn draw_pixels<W: Write>(out: &mut W, surface: &TerminalSurface) -> std::io::Result<()> {
    let mut current: Option<(Rgb, Rgb)> = None;
    for row in 0..surface.rows {
        out.queue(cursor::MoveTo(0, row))?;
        for col in 0..surface.cols {
            let top = surface.pixel(col as i32, row as i32 * 2);
            let bottom = surface.pixel(col as i32, row as i32 * 2 + 1);
            // Only emit colour changes; most of the frame is background.
            if current != Some((top, bottom)) {
                out.queue(style::SetForegroundColor(to_color(top)))?;
                out.queue(style::SetBackgroundColor(to_color(bottom)))?;
                current = Some((top, bottom));
            }
            out.queue(Print(HALF_BLOCK))?;
        }
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    surface: &TerminalSurface,
    hud: &Hud,
) -> std::io::Result<()> {
    let hint = if hud.players > 1 {
        "P1: W A S D, E fire   P2: arrows, / fire   Q : Quit"
    } else {
        "W A S D : Move   E : Fire   Q : Quit"
    };
    out.queue(cursor::MoveTo(1, surface.rows))?;
    out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, surface: &TerminalSurface) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", C_GAME_OVER),
        ("║    GAME  OVER    ║", C_GAME_OVER),
        ("╚══════════════════╝", C_GAME_OVER),
        ("Q - Quit", C_GAME_OVER_HINT),
    ];

    let cx = surface.cols / 2;
    let start_row = (surface.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetBackgroundColor(Color::Reset))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> TerminalSurface {
        // 80 columns × 30 playfield rows → 80 × 60 pixels, 10 world units each.
        TerminalSurface::new(800, 600, 80, 31)
    }

    #[test]
    fn rect_maps_world_units_to_pixels() {
        let mut s = surface();
        s.fill_rect(Rect::new(100, 100, 30, 30), Rgb::WHITE);
        assert_eq!(s.pixel(10, 10), Rgb::WHITE);
        assert_eq!(s.pixel(12, 12), Rgb::WHITE);
        assert_eq!(s.pixel(13, 12), Rgb::BLACK);
        assert_eq!(s.pixel(9, 10), Rgb::BLACK);
    }

    #[test]
    fn tiny_rect_still_covers_a_pixel() {
        let mut s = surface();
        s.fill_rect(Rect::new(101, 101, 2, 2), Rgb::WHITE);
        assert_eq!(s.pixel(10, 10), Rgb::WHITE);
    }

    #[test]
    fn offscreen_rect_is_clipped() {
        let mut s = surface();
        s.fill_rect(Rect::new(-50, -50, 70, 70), Rgb::WHITE);
        s.fill_rect(Rect::new(790, 590, 100, 100), Rgb::WHITE);
        assert_eq!(s.pixel(0, 0), Rgb::WHITE);
        assert_eq!(s.pixel(79, 59), Rgb::WHITE);
    }

    #[test]
    fn triangle_fills_its_base_but_not_the_upper_corners() {
        let mut s = surface();
        s.fill_polygon(
            &[Point::new(415, 500), Point::new(400, 530), Point::new(430, 530)],
            Rgb::WHITE,
        );
        // Base row (world y 520..530) is fully covered.
        assert_eq!(s.pixel(40, 52), Rgb::WHITE);
        assert_eq!(s.pixel(42, 52), Rgb::WHITE);
        // Top corners of the bounding box stay empty.
        assert_eq!(s.pixel(40, 50), Rgb::BLACK);
        assert_eq!(s.pixel(42, 50), Rgb::BLACK);
    }

    #[test]
    fn resize_reserves_the_hint_row() {
        let mut s = surface();
        s.resize(40, 11);
        assert_eq!(s.rows, 10);
        assert_eq!(s.pixels.len(), 40 * 20);
    }

    #[test]
    fn present_writes_every_cell() {
        let s = TerminalSurface::new(800, 600, 4, 3);
        let mut out = Vec::new();
        present(&mut out, &s, &Hud { game_over: false, players: 1 }).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches(HALF_BLOCK).count(), 4 * 2);
    }
}

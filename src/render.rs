//! Drawing rules for each entity kind.  Pure: reads the entity, writes
//! primitives to the surface, nothing else.

use crate::config::Config;
use crate::entities::{Bullet, Enemy, Entity, Player};
use crate::surface::{Point, Rect, Surface};

// ── Health bar layout ─────────────────────────────────────────────────────────

const BAR_TRACK: Rect = Rect { x: 10, y: 10, w: 240, h: 40 };
const BAR_FILL_X: i32 = 20;
const BAR_FILL_Y: i32 = 20;
const BAR_FILL_H: i32 = 20;
/// Filled width per health point, in tenths of a unit (2.2 units).
const BAR_FILL_SCALE_TENTHS: i32 = 22;
/// Vertical distance between stacked bars of consecutive players.
const BAR_STACK_STEP: i32 = 50;

impl Entity {
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, config: &Config) {
        match self {
            Entity::Player(p) => p.render(surface, config),
            Entity::Enemy(e) => e.render(surface),
            Entity::Bullet(b) => b.render(surface, config),
        }
    }
}

impl Player {
    /// Upward triangle inscribed in the hit box, then the health bar.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, config: &Config) {
        let (x, y) = (self.body.x, self.body.y);
        let size = config.player.size;
        surface.fill_polygon(
            &[
                Point::new(x + size / 2, y),
                Point::new(x, y + size),
                Point::new(x + size, y + size),
            ],
            config.player.color,
        );

        let offset = self.id as i32 * BAR_STACK_STEP;
        surface.fill_rect(
            Rect { y: BAR_TRACK.y + offset, ..BAR_TRACK },
            config.health_bar.background,
        );
        let fill = self.health.max(0) * BAR_FILL_SCALE_TENTHS / 10;
        surface.fill_rect(
            Rect::new(BAR_FILL_X, BAR_FILL_Y + offset, fill, BAR_FILL_H),
            config.health_bar.foreground,
        );
    }
}

impl Enemy {
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_rect(
            Rect::new(self.body.x, self.body.y, self.size, self.size),
            self.color,
        );
    }
}

impl Bullet {
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, config: &Config) {
        let size = config.bullet.size;
        surface.fill_rect(
            Rect::new(self.body.x, self.body.y, size, size * 2),
            config.bullet.color,
        );
    }
}

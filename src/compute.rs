//! Per-frame game rules.
//!
//! Each entity kind gets an `update` that moves it one step, applies its
//! rules against the rest of the pool and reports whether it survives.
//! All randomness comes through the injected `rng` so callers control
//! determinism (tests use a seeded `StdRng`).

use rand::Rng;

use crate::config::{CollisionModel, Config};
use crate::entities::{Bullet, Enemy, Entity, Fate, Kinematic, Player};
use crate::input::KeyState;
use crate::pool::EntityPool;
use crate::surface::Rgb;

/// Everything an update may read besides the pool itself.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'a> {
    pub keys: &'a KeyState,
    pub config: &'a Config,
}

impl<'a> FrameContext<'a> {
    pub fn new(keys: &'a KeyState, config: &'a Config) -> Self {
        Self { keys, config }
    }
}

/// Rolls a "chance out of 1000": true when a 1..=1000 draw lands below it.
pub fn roll_chance<R: Rng + ?Sized>(rng: &mut R, chance: u32) -> bool {
    rng.gen_range(1..=1000u32) < chance
}

// ── Movement ──────────────────────────────────────────────────────────────────

impl Kinematic {
    /// Applies one frame of velocity.
    pub fn step(&mut self) {
        self.x += self.xvel;
        self.y += self.yvel;
    }
}

// ── Collision ─────────────────────────────────────────────────────────────────

/// Square hit box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitBox {
    pub x: i32,
    pub y: i32,
    pub side: i32,
}

impl HitBox {
    pub fn new(x: i32, y: i32, side: i32) -> Self {
        Self { x, y, side }
    }

    /// True when `(px, py)` lies strictly inside the box.
    pub fn contains_strictly(&self, px: i32, py: i32) -> bool {
        self.x < px && px < self.x + self.side && self.y < py && py < self.y + self.side
    }
}

/// Number of collision hits between two boxes under `model`.
///
/// `Corner` checks `b`'s anchor inside `a`, then `a`'s anchor inside `b`,
/// counting each independently.  `Aabb` counts one hit for any strict
/// overlap.
pub fn hits(model: CollisionModel, a: HitBox, b: HitBox) -> i32 {
    match model {
        CollisionModel::Corner => {
            i32::from(a.contains_strictly(b.x, b.y)) + i32::from(b.contains_strictly(a.x, a.y))
        }
        CollisionModel::Aabb => i32::from(
            a.x < b.x + b.side && b.x < a.x + a.side && a.y < b.y + b.side && b.y < a.y + a.side,
        ),
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

impl Entity {
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &FrameContext,
        pool: &mut EntityPool,
        rng: &mut R,
    ) -> Fate {
        match self {
            Entity::Player(p) => p.update(ctx, pool, rng),
            Entity::Enemy(e) => e.update(ctx, pool),
            Entity::Bullet(b) => b.update(),
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

impl Player {
    pub fn hit_box(&self, config: &Config) -> HitBox {
        HitBox::new(self.body.x, self.body.y, config.player.size)
    }

    /// Moves with last frame's velocity, fires on a fresh press of the fire
    /// key, reads the new velocity from the direction keys, then takes
    /// damage from enemies and maybe regenerates.
    ///
    /// Direction keys add up independently, so a diagonal moves √2 times
    /// faster than a single axis.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &FrameContext,
        pool: &mut EntityPool,
        rng: &mut R,
    ) -> Fate {
        let cfg = ctx.config;
        self.body.step();

        if !ctx.keys.is_held(self.keys.fire) {
            self.just_fired = false;
        } else if !self.just_fired {
            self.just_fired = true;
            let bullet = Bullet::new(
                self.body.x + cfg.player.size / 2,
                self.body.y - cfg.bullet.size,
                cfg.bullet.speed,
            );
            pool.spawn(bullet);
        }

        let speed = cfg.player.speed;
        let mut xvel = 0;
        let mut yvel = 0;
        if ctx.keys.is_held(self.keys.up) {
            yvel -= speed;
        }
        if ctx.keys.is_held(self.keys.down) {
            yvel += speed;
        }
        if ctx.keys.is_held(self.keys.left) {
            xvel -= speed;
        }
        if ctx.keys.is_held(self.keys.right) {
            xvel += speed;
        }
        self.body.xvel = xvel;
        self.body.yvel = yvel;

        self.health -= self.enemy_damage(cfg, pool);

        if roll_chance(rng, cfg.player.heal_chance) && self.health < cfg.player.max_health {
            self.health += 1;
        }

        if self.health <= 0 {
            log::info!("player {} defeated", self.id);
            return Fate::Defeated;
        }
        Fate::Alive
    }

    /// One point per collision hit with each enemy, plus two for every enemy
    /// that has sunk past the bottom edge.
    pub fn enemy_damage(&self, config: &Config, pool: &EntityPool) -> i32 {
        let me = self.hit_box(config);
        let floor = config.window.height;
        pool.iter()
            .filter_map(|(_, e)| e.as_enemy())
            .map(|enemy| {
                let mut damage = hits(config.rules.collision, enemy.hit_box(), me);
                if enemy.body.y > floor - enemy.size {
                    damage += 2;
                }
                damage
            })
            .sum()
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

impl Enemy {
    /// A fresh enemy at the top edge with random column, speed, size and hue.
    pub fn spawn_random<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Self {
        let e = &config.enemy;
        let x = rng.gen_range(0..=config.window.width);
        let speed = rng.gen_range(e.min_speed..=e.max_speed);
        let size = rng.gen_range(e.min_size..=e.max_size);
        let hue = rng.gen_range(0..=360i32) as f64 / 360.0;
        Enemy::new(x, 0, speed, size, Rgb::from_hsv(hue, 1.0, 1.0))
    }

    pub fn hit_box(&self) -> HitBox {
        HitBox::new(self.body.x, self.body.y, self.size)
    }

    /// Falls one step, dies at the bottom edge, and otherwise trades itself
    /// for the first live bullet it collides with.
    pub fn update(&mut self, ctx: &FrameContext, pool: &mut EntityPool) -> Fate {
        let cfg = ctx.config;
        self.body.step();

        if self.body.y >= cfg.window.height {
            return Fate::Dead;
        }

        let me = self.hit_box();
        let struck = pool.iter().find_map(|(slot, e)| {
            let bullet = e.as_bullet()?;
            let hit = hits(cfg.rules.collision, bullet.hit_box(cfg), me) > 0;
            hit.then_some(slot)
        });
        if let Some(slot) = struck {
            pool.remove(slot);
            log::debug!("enemy at ({}, {}) shot down", self.body.x, self.body.y);
            return Fate::Dead;
        }
        Fate::Alive
    }
}

// ── Bullet ────────────────────────────────────────────────────────────────────

impl Bullet {
    /// Bullets collide as a square even though they are drawn twice as tall.
    pub fn hit_box(&self, config: &Config) -> HitBox {
        HitBox::new(self.body.x, self.body.y, config.bullet.size)
    }

    /// Rises one step; alive while still below the top edge.
    pub fn update(&mut self) -> Fate {
        self.body.step();
        if self.body.y > 0 {
            Fate::Alive
        } else {
            Fate::Dead
        }
    }
}

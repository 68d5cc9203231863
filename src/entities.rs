//! All entity types — pure data, no per-frame rules.
//!
//! Rules live in `compute`, drawing in `render`.

use crate::config::Config;
use crate::input::KeyMap;
use crate::surface::Rgb;

/// Position and velocity shared by every entity kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Kinematic {
    pub x: i32,
    pub y: i32,
    pub xvel: i32,
    pub yvel: i32,
}

impl Kinematic {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn moving(x: i32, y: i32, xvel: i32, yvel: i32) -> Self {
        Self { x, y, xvel, yvel }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Kinematic,
    pub health: i32,
    pub keys: KeyMap,
    /// Set while the fire key stays held after a shot.
    pub just_fired: bool,
    /// Player slot index; only decides where the health bar is drawn.
    pub id: usize,
}

impl Player {
    pub fn new(id: usize, keys: KeyMap, config: &Config) -> Self {
        Self {
            body: Kinematic::at(config.player.spawn_x, config.player.spawn_y),
            health: config.player.max_health,
            keys,
            just_fired: false,
            id,
        }
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Kinematic,
    pub size: i32,
    pub color: Rgb,
}

impl Enemy {
    /// An enemy at `(x, y)` falling `speed` units per frame.
    pub fn new(x: i32, y: i32, speed: i32, size: i32, color: Rgb) -> Self {
        Self {
            body: Kinematic::moving(x, y, 0, speed),
            size,
            color,
        }
    }
}

// ── Bullet ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub body: Kinematic,
}

impl Bullet {
    /// A bullet at `(x, y)` rising `speed` units per frame.
    pub fn new(x: i32, y: i32, speed: i32) -> Self {
        Self {
            body: Kinematic::moving(x, y, 0, -speed),
        }
    }
}

// ── Pool entry ────────────────────────────────────────────────────────────────

/// The closed set of things that can occupy a pool slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Player(Player),
    Enemy(Enemy),
    Bullet(Bullet),
}

impl Entity {
    pub fn body(&self) -> &Kinematic {
        match self {
            Entity::Player(p) => &p.body,
            Entity::Enemy(e) => &e.body,
            Entity::Bullet(b) => &b.body,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Entity::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Entity::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_bullet(&self) -> Option<&Bullet> {
        match self {
            Entity::Bullet(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Player> for Entity {
    fn from(p: Player) -> Self {
        Entity::Player(p)
    }
}

impl From<Enemy> for Entity {
    fn from(e: Enemy) -> Self {
        Entity::Enemy(e)
    }
}

impl From<Bullet> for Entity {
    fn from(b: Bullet) -> Self {
        Entity::Bullet(b)
    }
}

/// Result of one entity update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fate {
    Alive,
    /// Left the screen or was destroyed; the slot is emptied.
    Dead,
    /// A player whose health ran out.  Removed like `Dead`, and ends the game.
    Defeated,
}

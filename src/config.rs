//! Game constants, loadable from a RON file.
//!
//! `Config::default()` carries the reference tuning.  A config file only
//! needs to mention the values it changes; every section falls back to its
//! defaults field by field.

use std::path::Path;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::input::KeyMap;
use crate::surface::Rgb;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub enemy: EnemyConfig,
    pub player: PlayerConfig,
    pub health_bar: HealthBarConfig,
    pub bullet: BulletConfig,
    /// Hard ceiling on live entities.  Spawns into a full pool are dropped.
    pub pool_capacity: usize,
    pub rules: Rules,
    /// One key mapping per player slot, in identity-index order.
    pub controls: Vec<KeyMap>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    pub background: Rgb,
    pub fps_limit: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub min_size: i32,
    pub max_size: i32,
    pub min_speed: i32,
    pub max_speed: i32,
    /// Chance out of 1000, rolled once per frame.
    pub spawn_chance: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub size: i32,
    pub speed: i32,
    /// Chance out of 1000, rolled once per frame per player.
    pub heal_chance: u32,
    pub color: Rgb,
    pub max_health: i32,
    pub spawn_x: i32,
    pub spawn_y: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthBarConfig {
    pub background: Rgb,
    pub foreground: Rgb,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub speed: i32,
    pub size: i32,
    pub color: Rgb,
}

/// How boxes are tested against each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionModel {
    /// Each box's top-left corner is tested against the other box's strict
    /// interior.  Misses overlaps where neither corner lands inside.
    #[default]
    Corner,
    /// Strict interior overlap of the two boxes.
    Aabb,
}

/// What happens once a player has been defeated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameOverPolicy {
    /// Only the defeated player leaves the pool; the world keeps running.
    #[default]
    Continue,
    /// The world stops updating and spawning; frames only re-render.
    Freeze,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub collision: CollisionModel,
    pub on_game_over: GameOverPolicy,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            enemy: EnemyConfig::default(),
            player: PlayerConfig::default(),
            health_bar: HealthBarConfig::default(),
            bullet: BulletConfig::default(),
            pool_capacity: 256,
            rules: Rules::default(),
            controls: vec![KeyMap::player_one(), KeyMap::player_two()],
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Rgb(0x00, 0x00, 0x10),
            fps_limit: 60,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            min_size: 20,
            max_size: 40,
            min_speed: 2,
            max_speed: 4,
            spawn_chance: 10,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: 30,
            speed: 5,
            heal_chance: 10,
            color: Rgb::WHITE,
            max_health: 100,
            spawn_x: 400,
            spawn_y: 500,
        }
    }
}

impl Default for HealthBarConfig {
    fn default() -> Self {
        Self {
            background: Rgb(0x10, 0x10, 0x10),
            foreground: Rgb(0xff, 0x00, 0x00),
        }
    }
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            speed: 10,
            size: 10,
            color: Rgb(0x80, 0x80, 0x80),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("when loading config file at {:?}", path))?;
        let config = Self::from_ron(&content)
            .with_context(|| format!("when parsing config file at {:?}", path))?;
        log::debug!("loaded config from {:?}", path);
        Ok(config)
    }

    /// Parses and validates a RON document.
    pub fn from_ron(content: &str) -> anyhow::Result<Self> {
        let config: Config = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.window.width > 0 && self.window.height > 0,
            "window must have a positive size, got {}x{}",
            self.window.width,
            self.window.height
        );
        ensure!(self.window.fps_limit > 0, "fps_limit must be positive");
        ensure!(self.pool_capacity > 0, "pool_capacity must be positive");
        ensure!(
            0 < self.enemy.min_size && self.enemy.min_size <= self.enemy.max_size,
            "enemy size range {}..={} is empty or non-positive",
            self.enemy.min_size,
            self.enemy.max_size
        );
        ensure!(
            0 < self.enemy.min_speed && self.enemy.min_speed <= self.enemy.max_speed,
            "enemy speed range {}..={} is empty or non-positive",
            self.enemy.min_speed,
            self.enemy.max_speed
        );
        ensure!(self.player.size > 0, "player size must be positive");
        ensure!(self.player.speed >= 0, "player speed must not be negative");
        ensure!(self.player.max_health > 0, "player max_health must be positive");
        ensure!(self.bullet.size > 0, "bullet size must be positive");
        ensure!(
            self.bullet.speed > 0,
            "bullet speed must be positive, got {}",
            self.bullet.speed
        );
        Ok(())
    }
}

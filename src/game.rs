//! Frame driver core.
//!
//! `Game` owns the pool and the game-over latch.  The binary owns the
//! terminal, the live key table and frame pacing, and calls `frame` once per
//! tick with a fresh key snapshot.

use anyhow::ensure;
use rand::Rng;

use crate::compute::{roll_chance, FrameContext};
use crate::config::{Config, GameOverPolicy};
use crate::entities::{Enemy, Player};
use crate::input::KeyState;
use crate::pool::{EntityPool, PassReport};
use crate::surface::{Rect, Surface};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// True only on the frame the first player went down.
    pub game_over_now: bool,
    /// Whether an enemy spawn was rolled this frame (it may still have been
    /// dropped by a full pool).
    pub enemy_spawned: bool,
    pub pass: PassReport,
}

#[derive(Clone, Debug)]
pub struct Game {
    config: Config,
    pool: EntityPool,
    game_over: bool,
    frame: u64,
}

impl Game {
    /// Builds the pool and spawns `players` players, one per configured key
    /// mapping.
    pub fn new(config: Config, players: usize) -> anyhow::Result<Self> {
        config.validate()?;
        ensure!(players > 0, "at least one player is required");
        ensure!(
            players <= config.controls.len(),
            "{} players requested but only {} key mappings are configured",
            players,
            config.controls.len()
        );

        let mut pool = EntityPool::new(config.pool_capacity);
        for (id, keys) in config.controls.iter().take(players).enumerate() {
            pool.spawn(Player::new(id, *keys, &config));
        }
        log::info!(
            "new game: {} player(s), pool of {} slots",
            players,
            config.pool_capacity
        );

        Ok(Self {
            config,
            pool,
            game_over: false,
            frame: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut EntityPool {
        &mut self.pool
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Frames simulated so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn players_alive(&self) -> usize {
        self.pool
            .iter()
            .filter(|(_, e)| e.as_player().is_some())
            .count()
    }

    /// Clears the surface, maybe spawns an enemy, and runs one pool pass.
    ///
    /// Under `GameOverPolicy::Freeze` a finished game only redraws.
    pub fn frame<S, R>(&mut self, keys: &KeyState, surface: &mut S, rng: &mut R) -> FrameOutcome
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let window = &self.config.window;
        surface.fill_rect(Rect::new(0, 0, window.width, window.height), window.background);

        let ctx = FrameContext::new(keys, &self.config);
        let mut outcome = FrameOutcome::default();

        if self.game_over && self.config.rules.on_game_over == GameOverPolicy::Freeze {
            self.pool.render_all(&ctx, surface);
            return outcome;
        }
        self.frame += 1;

        if roll_chance(rng, self.config.enemy.spawn_chance) {
            let enemy = Enemy::spawn_random(&self.config, rng);
            log::debug!(
                "frame {}: enemy spawned at x={} size={}",
                self.frame,
                enemy.body.x,
                enemy.size
            );
            self.pool.spawn(enemy);
            outcome.enemy_spawned = true;
        }

        outcome.pass = self.pool.update_and_render(&ctx, surface, rng);

        if outcome.pass.defeated > 0 && !self.game_over {
            self.game_over = true;
            outcome.game_over_now = true;
            log::info!("game over after {} frames", self.frame);
        }
        outcome
    }
}

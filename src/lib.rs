//! Dodge-and-shoot arcade core.
//!
//! A fixed-capacity entity pool drives three entity kinds (player, enemy,
//! bullet) through one update+render pass per frame.  Everything here is
//! pure logic over injected collaborators: key state comes in as a
//! snapshot, randomness through an `Rng`, and drawing through a `Surface`.

pub mod compute;
pub mod config;
pub mod entities;
pub mod game;
pub mod input;
pub mod pool;
pub mod render;
pub mod surface;

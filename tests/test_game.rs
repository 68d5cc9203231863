use dodge_shooter::config::{Config, GameOverPolicy};
use dodge_shooter::entities::*;
use dodge_shooter::game::Game;
use dodge_shooter::input::{Key, KeyState};
use dodge_shooter::surface::{DrawCommand, DrawList, Rect, Rgb};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// No random spawns, no healing.
fn calm_config() -> Config {
    let mut config = Config::default();
    config.enemy.spawn_chance = 0;
    config.player.heal_chance = 0;
    config
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(1234)
}

fn player_slot(game: &Game) -> usize {
    game.pool()
        .iter()
        .find(|(_, e)| e.as_player().is_some())
        .map(|(i, _)| i)
        .unwrap()
}

fn set_health(game: &mut Game, health: i32) {
    let slot = player_slot(game);
    game.pool_mut()
        .get_mut(slot)
        .unwrap()
        .as_player_mut()
        .unwrap()
        .health = health;
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_game_spawns_requested_players() {
    let game = Game::new(Config::default(), 2).unwrap();
    assert_eq!(game.players_alive(), 2);
    assert_eq!(game.pool().capacity(), 256);
    let ids: Vec<usize> = game
        .pool()
        .iter()
        .filter_map(|(_, e)| e.as_player())
        .map(|p| p.id)
        .collect();
    assert!(ids.contains(&0) && ids.contains(&1));
    assert!(!game.is_over());
}

#[test]
fn too_many_players_is_rejected() {
    assert!(Game::new(Config::default(), 3).is_err());
    assert!(Game::new(Config::default(), 0).is_err());
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = Config::default();
    config.pool_capacity = 0;
    assert!(Game::new(config, 1).is_err());
}

// ── Frame ─────────────────────────────────────────────────────────────────────

#[test]
fn frame_starts_by_clearing_to_background() {
    let mut game = Game::new(calm_config(), 1).unwrap();
    let mut list = DrawList::new();
    game.frame(&KeyState::new(), &mut list, &mut seeded_rng());
    assert_eq!(
        list.commands[0],
        DrawCommand::Rect(Rect::new(0, 0, 800, 600), Rgb(0x00, 0x00, 0x10))
    );
    // Background, then the player's triangle and two health-bar rects.
    assert_eq!(list.commands.len(), 4);
    assert_eq!(game.frame_count(), 1);
}

#[test]
fn certain_spawn_chance_adds_an_enemy_every_frame() {
    let mut config = calm_config();
    config.enemy.spawn_chance = 1001;
    let mut game = Game::new(config, 1).unwrap();
    let mut rng = seeded_rng();
    for _ in 0..5 {
        let outcome = game.frame(&KeyState::new(), &mut DrawList::new(), &mut rng);
        assert!(outcome.enemy_spawned);
    }
    let enemies = game
        .pool()
        .iter()
        .filter(|(_, e)| e.as_enemy().is_some())
        .count();
    assert_eq!(enemies, 5);
}

#[test]
fn spawns_stop_silently_at_capacity() {
    let mut config = calm_config();
    config.enemy.spawn_chance = 1001;
    config.pool_capacity = 4;
    let mut game = Game::new(config, 1).unwrap();
    let mut rng = seeded_rng();
    for _ in 0..10 {
        game.frame(&KeyState::new(), &mut DrawList::new(), &mut rng);
        assert!(game.pool().len() <= 4);
    }
    assert!(game.pool().is_full());
}

#[test]
fn fire_then_shot_travels_up() {
    let mut game = Game::new(calm_config(), 1).unwrap();
    let mut rng = seeded_rng();
    let fire = KeyState::holding(&[Key::Char('e')]);
    game.frame(&fire, &mut DrawList::new(), &mut rng);
    game.frame(&fire, &mut DrawList::new(), &mut rng);

    let shots: Vec<&Bullet> = game
        .pool()
        .iter()
        .filter_map(|(_, e)| e.as_bullet())
        .collect();
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].body.y, 480);
}

#[test]
fn last_hit_ends_the_game_exactly_once() {
    let mut game = Game::new(calm_config(), 1).unwrap();
    set_health(&mut game, 1);
    game.pool_mut().spawn(Enemy::new(390, 490, 0, 30, Rgb::WHITE));

    let mut rng = seeded_rng();
    let outcome = game.frame(&KeyState::new(), &mut DrawList::new(), &mut rng);
    assert!(outcome.game_over_now);
    assert_eq!(outcome.pass.defeated, 1);
    assert!(game.is_over());
    assert_eq!(game.players_alive(), 0);

    let outcome = game.frame(&KeyState::new(), &mut DrawList::new(), &mut rng);
    assert!(!outcome.game_over_now);
    assert!(game.is_over());
}

#[test]
fn second_player_falling_later_does_not_retrigger() {
    let mut game = Game::new(calm_config(), 2).unwrap();
    // Both players share the spawn point, so one enemy hits both.
    let slots: Vec<usize> = game.pool().iter().map(|(i, _)| i).collect();
    for (slot, health) in slots.iter().zip([1, 2]) {
        game.pool_mut()
            .get_mut(*slot)
            .unwrap()
            .as_player_mut()
            .unwrap()
            .health = health;
    }
    game.pool_mut().spawn(Enemy::new(390, 490, 0, 30, Rgb::WHITE));
    let mut rng = seeded_rng();

    let first = game.frame(&KeyState::new(), &mut DrawList::new(), &mut rng);
    assert!(first.game_over_now);
    assert_eq!(game.players_alive(), 1);

    let second = game.frame(&KeyState::new(), &mut DrawList::new(), &mut rng);
    assert_eq!(second.pass.defeated, 1);
    assert!(!second.game_over_now);
    assert_eq!(game.players_alive(), 0);
}

#[test]
fn game_keeps_running_after_game_over_by_default() {
    let mut game = Game::new(calm_config(), 1).unwrap();
    set_health(&mut game, 1);
    game.pool_mut().spawn(Enemy::new(390, 490, 0, 30, Rgb::WHITE));
    game.pool_mut().spawn(Enemy::new(100, 100, 3, 20, Rgb::WHITE));

    let mut rng = seeded_rng();
    game.frame(&KeyState::new(), &mut DrawList::new(), &mut rng);
    assert!(game.is_over());
    game.frame(&KeyState::new(), &mut DrawList::new(), &mut rng);

    let faller = game
        .pool()
        .iter()
        .filter_map(|(_, e)| e.as_enemy())
        .find(|e| e.body.yvel == 3)
        .unwrap();
    assert_eq!(faller.body.y, 106);
    assert_eq!(game.frame_count(), 2);
}

#[test]
fn freeze_policy_stops_the_world_after_game_over() {
    let mut config = calm_config();
    config.rules.on_game_over = GameOverPolicy::Freeze;
    let mut game = Game::new(config, 1).unwrap();
    set_health(&mut game, 1);
    game.pool_mut().spawn(Enemy::new(390, 490, 0, 30, Rgb::WHITE));
    game.pool_mut().spawn(Enemy::new(100, 100, 3, 20, Rgb::WHITE));

    let mut rng = seeded_rng();
    game.frame(&KeyState::new(), &mut DrawList::new(), &mut rng);
    assert!(game.is_over());

    let mut list = DrawList::new();
    let outcome = game.frame(&KeyState::new(), &mut list, &mut rng);
    assert_eq!(outcome.pass.updated, 0);
    assert_eq!(game.frame_count(), 1);
    let faller = game
        .pool()
        .iter()
        .filter_map(|(_, e)| e.as_enemy())
        .find(|e| e.body.yvel == 3)
        .unwrap();
    assert_eq!(faller.body.y, 103);
    // Background plus both enemies are still drawn.
    assert_eq!(list.commands.len(), 3);
}

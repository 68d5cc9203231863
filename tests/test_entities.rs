use dodge_shooter::config::Config;
use dodge_shooter::entities::*;
use dodge_shooter::input::KeyMap;
use dodge_shooter::surface::{DrawList, Point, Rect, Rgb};

#[test]
fn player_starts_at_spawn_point_with_full_health() {
    let config = Config::default();
    let p = Player::new(0, KeyMap::player_one(), &config);
    assert_eq!(p.body, Kinematic::at(400, 500));
    assert_eq!(p.health, 100);
    assert!(!p.just_fired);
}

#[test]
fn enemy_falls_and_bullet_rises() {
    let e = Enemy::new(10, 0, 3, 25, Rgb::WHITE);
    assert_eq!((e.body.xvel, e.body.yvel), (0, 3));
    let b = Bullet::new(10, 100, 10);
    assert_eq!((b.body.xvel, b.body.yvel), (0, -10));
}

#[test]
fn entity_accessors_match_variant() {
    let e: Entity = Bullet::new(1, 2, 10).into();
    assert!(e.as_bullet().is_some());
    assert!(e.as_enemy().is_none());
    assert!(e.as_player().is_none());
    assert_eq!(e.body().x, 1);
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[test]
fn player_renders_triangle_and_health_bar() {
    let config = Config::default();
    let mut p = Player::new(0, KeyMap::player_one(), &config);
    p.health = 50;
    let mut list = DrawList::new();
    p.render(&mut list, &config);

    let polys: Vec<_> = list.polygons().collect();
    assert_eq!(polys.len(), 1);
    assert_eq!(
        polys[0].0,
        &[Point::new(415, 500), Point::new(400, 530), Point::new(430, 530)][..]
    );

    let rects: Vec<_> = list.rects().collect();
    assert_eq!(rects.len(), 2);
    assert_eq!(*rects[0].0, Rect::new(10, 10, 240, 40));
    assert_eq!(*rects[0].1, config.health_bar.background);
    assert_eq!(*rects[1].0, Rect::new(20, 20, 110, 20));
    assert_eq!(*rects[1].1, config.health_bar.foreground);
}

#[test]
fn second_player_health_bar_is_stacked_below() {
    let config = Config::default();
    let p = Player::new(1, KeyMap::player_two(), &config);
    let mut list = DrawList::new();
    p.render(&mut list, &config);
    let rects: Vec<_> = list.rects().collect();
    assert_eq!(rects[0].0.y, 60);
    assert_eq!(*rects[1].0, Rect::new(20, 70, 220, 20));
}

#[test]
fn enemy_renders_square_and_bullet_tall_rect() {
    let config = Config::default();
    let mut list = DrawList::new();
    Entity::from(Enemy::new(5, 6, 2, 30, Rgb(1, 2, 3))).render(&mut list, &config);
    Entity::from(Bullet::new(7, 8, 10)).render(&mut list, &config);
    let rects: Vec<_> = list.rects().collect();
    assert_eq!(*rects[0].0, Rect::new(5, 6, 30, 30));
    assert_eq!(*rects[0].1, Rgb(1, 2, 3));
    assert_eq!(*rects[1].0, Rect::new(7, 8, 10, 20));
    assert_eq!(*rects[1].1, config.bullet.color);
}

// ── Colour ────────────────────────────────────────────────────────────────────

#[test]
fn hue_converts_to_saturated_rgb() {
    assert_eq!(Rgb::from_hsv(0.0, 1.0, 1.0), Rgb(255, 0, 0));
    assert_eq!(Rgb::from_hsv(1.0, 1.0, 1.0), Rgb(255, 0, 0));
    assert_eq!(Rgb::from_hsv(120.0 / 360.0, 1.0, 1.0), Rgb(0, 255, 0));
    assert_eq!(Rgb::from_hsv(240.0 / 360.0, 1.0, 1.0), Rgb(0, 0, 255));
    assert_eq!(Rgb::from_hsv(0.5, 0.0, 1.0), Rgb(255, 255, 255));
}

#[test]
fn spawn_hues_match_double_precision_reference() {
    // (degrees, expected) for hues an enemy can roll; 12 and 64 sit on
    // truncation boundaries that single precision gets wrong.
    let table = [
        (0, Rgb(255, 0, 0)),
        (12, Rgb(255, 50, 0)),
        (64, Rgb(238, 255, 0)),
        (120, Rgb(0, 255, 0)),
        (240, Rgb(0, 0, 255)),
        (360, Rgb(255, 0, 0)),
    ];
    for (degrees, expected) in table {
        let hue = degrees as f64 / 360.0;
        assert_eq!(Rgb::from_hsv(hue, 1.0, 1.0), expected, "hue {degrees}");
    }
}

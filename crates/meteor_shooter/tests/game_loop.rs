//! Full game loop runs on the built-in physics world

use meteor_engine::core::config::EngineConfig;
use meteor_engine::Engine;
use meteor_shooter::{Autopilot, Game, GameApp, GameConfig, PlayerInput};

const FRAME: f32 = 1.0 / 60.0;

/// Lane so narrow that every obstacle flies straight at the ship
fn narrow_lane() -> GameConfig {
    let mut config = GameConfig {
        seed: Some(7),
        ..GameConfig::default()
    };
    config.lane.visible_range_extent = 0.001;
    config.lane.target_spread = 0.0;
    config
}

#[test]
fn test_engine_runs_game_headless() {
    let mut config = GameConfig {
        seed: Some(99),
        ..GameConfig::default()
    };
    config.engine = EngineConfig::new()
        .with_fixed_frame_time(FRAME)
        .with_max_frames(600);

    let mut app = GameApp::new(config.clone()).with_autopilot(Autopilot::default());
    Engine::run(config.engine, &mut app).unwrap();

    let game = app.game().unwrap();
    assert!(game.scene().objects_count() >= 1);
    assert!(game.spawn_interval() <= 0.5);
}

#[test]
fn test_unprotected_ship_is_hit_and_round_restarts() {
    let mut game = Game::new(narrow_lane()).unwrap();

    let mut frames = 0;
    while game.generation() == 0 && frames < 60 * 20 {
        game.tick(FRAME).unwrap();
        frames += 1;
    }

    assert_eq!(game.generation(), 1);
    assert_eq!(game.shot_down(), 0);
    assert!(game.scene().get::<meteor_shooter::ship::Ship>(game.ship()).is_some());
}

#[test]
fn test_shooting_obstacles_counts_kills() {
    let mut game = Game::new(narrow_lane()).unwrap();
    game.set_input(PlayerInput {
        fire: true,
        ..PlayerInput::default()
    });

    let mut frames = 0;
    while game.shot_down() == 0 && frames < 60 * 10 {
        game.tick(FRAME).unwrap();
        frames += 1;
    }

    assert!(game.shot_down() >= 1);
    assert!(game.spawn_interval() <= 0.5);
}

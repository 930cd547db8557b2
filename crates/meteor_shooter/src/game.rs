//! Game director
//!
//! Owns the scene of the current round and everything that outlives a
//! single scene object: spawning, player input, the kill counter and the
//! deferred restart after the ship is hit.

use crate::assets::RenderAssets;
use crate::config::GameConfig;
use crate::difficulty;
use crate::events::GameEvent;
use crate::obstacle::{Obstacle, ObstacleSpawn};
use crate::projectile::Projectile;
use crate::random::GameRng;
use crate::ship::Ship;
use meteor_engine::core::config::ConfigError;
use meteor_engine::foundation::collections::ObjectHandle;
use meteor_engine::foundation::math::{utils, Vec3};
use meteor_engine::physics::PhysicsError;
use meteor_engine::render::RenderSurface;
use meteor_engine::scene::{Scene, SceneError};
use thiserror::Error;

/// Seconds between statistics log lines
const STATS_PERIOD: f32 = 3.0;

/// Game errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Scene operation failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Physics call failed while building the scene
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Held player controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Move towards -X
    pub move_left: bool,
    /// Move towards +X
    pub move_right: bool,
    /// Fire whenever the cannon is ready
    pub fire: bool,
}

impl PlayerInput {
    /// Net horizontal velocity for the given move speed
    pub fn horizontal_velocity(&self, speed: f32) -> f32 {
        let mut velocity = 0.0;
        if self.move_left {
            velocity -= speed;
        }
        if self.move_right {
            velocity += speed;
        }
        velocity
    }
}

/// Frame statistics, logged every few seconds
#[derive(Debug, Clone, Copy, Default)]
struct FrameStats {
    frames: u32,
    elapsed: f32,
}

/// The meteor shooter
pub struct Game {
    config: GameConfig,
    assets: RenderAssets,
    rng: GameRng,
    scene: Scene<GameEvent>,
    ship: ObjectHandle,
    input: PlayerInput,
    spawn_timeout: f32,
    spawn_interval: f32,
    shot_down: u32,
    paused: bool,
    restarting: bool,
    generation: u32,
    stats: FrameStats,
}

impl Game {
    /// Create a game and its first round
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let assets = RenderAssets::default();
        let (scene, ship) = Self::build_scene(&config, assets)?;
        let rng = GameRng::new(config.seed);

        let mut game = Self {
            spawn_interval: config.difficulty.initial_interval,
            config,
            assets,
            rng,
            scene,
            ship,
            input: PlayerInput::default(),
            spawn_timeout: 0.0,
            shot_down: 0,
            paused: false,
            restarting: false,
            generation: 0,
            stats: FrameStats::default(),
        };
        game.recompute_interval();

        log::info!("Game created (seed: {:?})", game.config.seed);
        Ok(game)
    }

    /// Advance the game by one frame of `delta_time` seconds
    ///
    /// The frame time is clamped to `[0, max_frame_time]` first, so a stall
    /// neither spawns a burst of obstacles nor runs the spawn timer backwards.
    pub fn tick(&mut self, delta_time: f32) -> Result<(), GameError> {
        if self.paused {
            return Ok(());
        }

        let delta_time = self.frame_time(delta_time);

        self.update_stats(delta_time);

        self.spawn_timeout += delta_time;
        while self.spawn_timeout >= self.spawn_interval {
            self.spawn_timeout -= self.spawn_interval;
            self.spawn_obstacle();
        }

        let velocity = self.input.horizontal_velocity(self.config.ship.move_speed);
        if let Some(ship) = self.scene.get_mut::<Ship>(self.ship) {
            ship.set_horizontal_velocity(velocity);
        }

        if self.input.fire {
            self.fire();
        }

        self.scene.on_update(delta_time);
        let stats = self.scene.tick(delta_time)?;
        log::trace!(
            "Frame: {} steps, {} contacts, {} reaped",
            stats.steps,
            stats.contacts,
            stats.reaped
        );

        for event in self.scene.drain_events() {
            match event {
                GameEvent::ObstacleShotDown => self.notify_shot_down(),
                GameEvent::RestartRequested => self.restart(),
            }
        }

        if self.restarting {
            self.restarting = false;
            self.do_restart()?;
        }

        Ok(())
    }

    /// Draw the current round
    pub fn render(&mut self, surface: &mut dyn RenderSurface) {
        self.scene.on_render(surface);
    }

    /// Request a new round once the current frame finishes
    pub fn restart(&mut self) {
        self.restarting = true;
    }

    /// Whether a restart is waiting for the end of the frame
    pub fn is_restart_pending(&self) -> bool {
        self.restarting
    }

    /// Pause or resume ticking
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("Game {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Whether ticking is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Replace the held controls
    pub fn set_input(&mut self, input: PlayerInput) {
        self.input = input;
    }

    /// Held controls
    pub fn input(&self) -> PlayerInput {
        self.input
    }

    /// Obstacles shot down this round
    pub fn shot_down(&self) -> u32 {
        self.shot_down
    }

    /// Current seconds between obstacle spawns
    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    /// Number of restarts so far
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Handle of this round's ship
    pub fn ship(&self) -> ObjectHandle {
        self.ship
    }

    /// Ship position, if the ship is still in the scene
    pub fn ship_position(&self) -> Option<Vec3> {
        self.scene.position(self.ship)
    }

    /// Scene of the current round
    pub fn scene(&self) -> &Scene<GameEvent> {
        &self.scene
    }

    /// Scene of the current round, mutable
    pub fn scene_mut(&mut self) -> &mut Scene<GameEvent> {
        &mut self.scene
    }

    /// Active configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn build_scene(
        config: &GameConfig,
        assets: RenderAssets,
    ) -> Result<(Scene<GameEvent>, ObjectHandle), GameError> {
        let mut scene = Scene::with_builtin_physics(config.scene.clone())?;

        let camera = &config.camera;
        let lens = scene.camera_mut();
        lens.set_lens(
            utils::deg_to_rad(camera.fov_degrees),
            camera.aspect,
            camera.near,
            camera.far,
        );
        lens.look_at(
            Vec3::from(camera.eye),
            Vec3::from(camera.target),
            Vec3::from(camera.up),
        );

        let ship = Ship::create(scene.physics_mut(), &config.ship, &config.lane, assets.ship)?;
        let ship = scene.add(ship)?;

        Ok((scene, ship))
    }

    fn do_restart(&mut self) -> Result<(), GameError> {
        let cleared = self.scene.clear();

        let (scene, ship) = Self::build_scene(&self.config, self.assets)?;
        self.scene = scene;
        self.ship = ship;

        self.spawn_timeout = 0.0;
        self.spawn_interval = self.config.difficulty.initial_interval;
        self.shot_down = 0;
        self.generation += 1;
        self.recompute_interval();

        log::info!(
            "Restarted round {} ({} objects cleared)",
            self.generation,
            cleared
        );
        Ok(())
    }

    fn notify_shot_down(&mut self) {
        self.shot_down += 1;
        self.recompute_interval();
    }

    fn recompute_interval(&mut self) {
        self.spawn_interval = difficulty::spawn_interval(self.shot_down, &self.config.difficulty);
        log::debug!(
            "Shot down: {}, spawn interval: {:.4}",
            self.shot_down,
            self.spawn_interval
        );
    }

    fn spawn_obstacle(&mut self) {
        let spawn = ObstacleSpawn::sample(&mut self.rng, &self.config.lane, &self.config.obstacle);

        let obstacle = match Obstacle::create(
            self.scene.physics_mut(),
            &spawn,
            &self.config.obstacle,
            self.assets.obstacle,
        ) {
            Ok(obstacle) => obstacle,
            Err(e) => {
                log::warn!("Failed to create obstacle: {}", e);
                return;
            }
        };

        if let Err(e) = self.scene.add(obstacle) {
            log::warn!("Failed to spawn obstacle: {}", e);
        }
    }

    fn fire(&mut self) {
        let Some(position) = self.scene.position(self.ship) else {
            return;
        };
        let Some(shot) = self
            .scene
            .get_mut::<Ship>(self.ship)
            .and_then(|ship| ship.fire(position))
        else {
            return;
        };

        let projectile = match Projectile::create(
            self.scene.physics_mut(),
            shot,
            &self.config.projectile,
            self.assets.projectile,
        ) {
            Ok(projectile) => projectile,
            Err(e) => {
                log::warn!("Failed to create projectile: {}", e);
                return;
            }
        };

        if let Err(e) = self.scene.add(projectile) {
            log::warn!("Failed to spawn projectile: {}", e);
        }
    }

    fn frame_time(&self, delta_time: f32) -> f32 {
        let max = self.config.max_frame_time;
        let clamped = utils::clamp(delta_time, 0.0, max);
        if !(0.0..=max).contains(&delta_time) {
            log::debug!("Frame time {} clamped to {}", delta_time, clamped);
        }
        clamped
    }

    fn update_stats(&mut self, delta_time: f32) {
        self.stats.frames += 1;
        self.stats.elapsed += delta_time;

        if self.stats.elapsed < STATS_PERIOD {
            return;
        }

        let fps = self.stats.frames as f32 / self.stats.elapsed;
        log::info!(
            "Tick: {:.4}, FPS: {:.1}, objects: {}, shot down: {}, spawn interval: {:.4}, ship x: {:.2}",
            delta_time,
            fps,
            self.scene.objects_count(),
            self.shot_down,
            self.spawn_interval,
            self.ship_position().map_or(0.0, |p| p.x)
        );
        self.stats = FrameStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meteor_engine::render::RecordingSurface;

    const FRAME: f32 = 1.0 / 60.0;

    /// Exact in binary, so frame sums hit spawn boundaries exactly
    const STEP: f32 = 1.0 / 32.0;

    fn run(game: &mut Game, frames: u32) {
        for _ in 0..frames {
            game.tick(STEP).unwrap();
        }
    }

    fn seeded() -> GameConfig {
        GameConfig {
            seed: Some(1234),
            ..GameConfig::default()
        }
    }

    /// Config where nothing spawns within a test's horizon
    fn quiet() -> GameConfig {
        let mut config = seeded();
        config.difficulty.initial_interval = 1.0e6;
        config.difficulty.min_interval = 1.0e6;
        config.difficulty.max_interval = 1.0e6;
        config
    }

    #[test]
    fn test_new_game_has_only_the_ship() {
        let game = Game::new(seeded()).unwrap();

        assert_eq!(game.scene().objects_count(), 1);
        assert!(game.scene().get::<Ship>(game.ship()).is_some());
        assert_eq!(game.shot_down(), 0);
        assert_eq!(game.spawn_interval(), 0.5);
        assert_eq!(game.ship_position(), Some(Vec3::zeros()));
        assert_eq!(game.generation(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = seeded();
        config.ship.mass = -1.0;
        assert!(matches!(Game::new(config), Err(GameError::Config(_))));
    }

    #[test]
    fn test_obstacles_spawn_on_interval() {
        let mut game = Game::new(seeded()).unwrap();

        run(&mut game, 8);
        assert_eq!(game.scene().objects_count(), 1);

        run(&mut game, 8);
        assert_eq!(game.scene().objects_count(), 2);

        run(&mut game, 32);
        assert_eq!(game.scene().objects_count(), 4);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game = Game::new(seeded()).unwrap();

        // A stall counts as one 0.05 s frame, not a burst of spawns
        game.tick(10.0).unwrap();
        assert_eq!(game.scene().objects_count(), 1);
        assert_relative_eq!(game.spawn_timeout, 0.05, epsilon = 1.0e-6);

        for _ in 0..10 {
            game.tick(2.0).unwrap();
        }
        assert_eq!(game.scene().objects_count(), 2);
    }

    #[test]
    fn test_negative_frame_is_ignored() {
        let mut game = Game::new(seeded()).unwrap();

        game.tick(-5.0).unwrap();
        assert_eq!(game.spawn_timeout, 0.0);

        run(&mut game, 16);
        assert_eq!(game.scene().objects_count(), 2);
    }

    #[test]
    fn test_paused_game_does_not_tick() {
        let mut game = Game::new(seeded()).unwrap();
        game.set_paused(true);
        game.tick(5.0).unwrap();

        assert!(game.is_paused());
        assert_eq!(game.scene().objects_count(), 1);
    }

    #[test]
    fn test_input_moves_ship_and_clamps() {
        let mut game = Game::new(quiet()).unwrap();
        game.set_input(PlayerInput {
            move_right: true,
            ..PlayerInput::default()
        });

        for _ in 0..60 {
            game.tick(FRAME).unwrap();
        }
        let x = game.ship_position().unwrap().x;
        assert_relative_eq!(x, 10.0, epsilon = 0.25);

        for _ in 0..240 {
            game.tick(FRAME).unwrap();
        }
        assert_relative_eq!(game.ship_position().unwrap().x, 20.0, epsilon = 1.0e-4);
    }

    #[test]
    fn test_fire_spawns_projectiles_on_cooldown() {
        let mut game = Game::new(quiet()).unwrap();
        game.set_input(PlayerInput {
            fire: true,
            ..PlayerInput::default()
        });

        // Cooldown starts empty; the cannon is ready once a quarter second
        // has passed before the frame fires
        run(&mut game, 8);
        assert_eq!(game.scene().objects_count(), 1);
        run(&mut game, 1);
        assert_eq!(game.scene().objects_count(), 2);
    }

    #[test]
    fn test_restart_is_deferred_to_end_of_tick() {
        let mut game = Game::new(quiet()).unwrap();

        game.restart();
        assert!(game.is_restart_pending());
        game.tick(FRAME).unwrap();

        assert!(!game.is_restart_pending());
        assert_eq!(game.generation(), 1);
        assert!(game.scene().get::<Ship>(game.ship()).is_some());
        assert_eq!(game.scene().objects_count(), 1);
        assert_eq!(game.spawn_interval(), 0.5);
    }

    #[test]
    fn test_render_draws_every_object() {
        let mut game = Game::new(seeded()).unwrap();
        run(&mut game, 32);

        let mut surface = RecordingSurface::new();
        game.render(&mut surface);

        assert_eq!(surface.draw_count(), game.scene().objects_count());
    }

    #[test]
    fn test_horizontal_velocity() {
        let both = PlayerInput {
            move_left: true,
            move_right: true,
            fire: false,
        };
        assert_eq!(both.horizontal_velocity(10.0), 0.0);

        let left = PlayerInput {
            move_left: true,
            ..PlayerInput::default()
        };
        assert_eq!(left.horizontal_velocity(10.0), -10.0);
    }
}

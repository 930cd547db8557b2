//! Frame loop integration

use crate::config::GameConfig;
use crate::game::{Game, PlayerInput};
use meteor_engine::render::RenderSurface;
use meteor_engine::{AppError, Application, Engine};

/// Scripted input for headless runs: always fires and sweeps across the lane
#[derive(Debug, Clone)]
pub struct Autopilot {
    period: f32,
    elapsed: f32,
    moving_right: bool,
}

impl Autopilot {
    /// Reverse direction every `period` seconds
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
            moving_right: true,
        }
    }

    /// Input for the next frame
    pub fn next_input(&mut self, delta_time: f32) -> PlayerInput {
        self.elapsed += delta_time;
        if self.elapsed >= self.period {
            self.elapsed -= self.period;
            self.moving_right = !self.moving_right;
        }

        PlayerInput {
            move_left: !self.moving_right,
            move_right: self.moving_right,
            fire: true,
        }
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(2.0)
    }
}

/// Runs a [`Game`] inside the engine's frame loop
pub struct GameApp {
    config: GameConfig,
    game: Option<Game>,
    autopilot: Option<Autopilot>,
}

impl GameApp {
    /// Create the application; the game itself is built in `initialize`
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            game: None,
            autopilot: None,
        }
    }

    /// Drive input from an [`Autopilot`]
    pub fn with_autopilot(mut self, autopilot: Autopilot) -> Self {
        self.autopilot = Some(autopilot);
        self
    }

    /// The running game
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// The running game, mutable
    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.game.as_mut()
    }
}

impl Application for GameApp {
    fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Initializing meteor shooter...");
        let game = Game::new(self.config.clone()).map_err(|e| AppError::GameLogic(e.to_string()))?;
        self.game = Some(game);
        Ok(())
    }

    fn update(&mut self, _engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        let Some(game) = self.game.as_mut() else {
            return Err(AppError::GameLogic("game not initialized".to_string()));
        };

        if let Some(autopilot) = self.autopilot.as_mut() {
            game.set_input(autopilot.next_input(delta_time));
        }

        game.tick(delta_time)
            .map_err(|e| AppError::GameLogic(e.to_string()))
    }

    fn render(&mut self, surface: &mut dyn RenderSurface) -> Result<(), AppError> {
        if let Some(game) = self.game.as_mut() {
            game.render(surface);
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        if let Some(game) = self.game.as_ref() {
            log::info!(
                "Meteor shooter finished after {} frames: {} rounds, {} shot down in the last one",
                engine.frame_count(),
                game.generation() + 1,
                game.shot_down()
            );
        }
    }
}

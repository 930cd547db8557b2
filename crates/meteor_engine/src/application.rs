//! Hooks a game implements to run inside [`Engine::run`]

use crate::engine::{Engine, EngineError};
use crate::render::RenderSurface;
use thiserror::Error;

/// Per-frame callbacks driven by the headless frame loop
///
/// The engine calls `initialize` once, then `update` and `render` every
/// frame until exit, then `cleanup`.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Advance game state by `delta_time` seconds
    ///
    /// An error stops the loop and is returned from [`Engine::run`].
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Render the application into the frame's surface
    fn render(&mut self, _surface: &mut dyn RenderSurface) -> Result<(), AppError> {
        Ok(())
    }

    /// Called once after the last frame, also when the frame limit ends the run
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Errors an application reports back to the frame loop
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine failure seen by the application
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Free-form failure
    #[error("Application error: {0}")]
    Custom(String),

    /// Application configuration rejected
    #[error("Config error: {0}")]
    Config(String),

    /// Game state could not advance
    #[error("Game logic error: {0}")]
    GameLogic(String),
}

//! Headless frame loop

use crate::{
    application::Application,
    core::config::EngineConfig,
    foundation::time::Timer,
    render::RecordingSurface,
};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Headless driver for an [`Application`]
///
/// Owns frame timing and the surface applications render into. The loop
/// runs until the application calls [`Engine::request_exit`] or the
/// configured frame limit is reached.
pub struct Engine {
    /// Surface the application renders into; cleared every frame
    pub surface: RecordingSurface,

    timer: Timer,
    config: EngineConfig,

    /// Cleared by `request_exit`
    running: bool,

    frames: u64,
}

impl Engine {
    /// Validate `config` and create an engine that has run no frames
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(|e| EngineError::ConfigError(e.to_string()))?;
        log::info!("Engine ready: {:?}", config);

        Ok(Self {
            surface: RecordingSurface::new(),
            timer: Timer::new(),
            config,
            running: true,
            frames: 0,
        })
    }

    /// Run an application until it exits or the frame limit is reached
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Entering frame loop");

        while engine.running && !engine.frame_limit_reached() {
            let frame_start = Instant::now();
            engine.timer.tick();
            let delta_time = engine.frame_delta();

            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

            engine.surface.clear();
            app.render(&mut engine.surface)
                .map_err(|e| EngineError::RenderError(format!("App render: {e}")))?;

            engine.frames += 1;
            engine.limit_frame_rate(frame_start);
        }

        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete after {} frames ({:.1} average FPS)",
            engine.frames,
            engine.timer.average_fps()
        );
        Ok(())
    }

    fn frame_delta(&self) -> f32 {
        self.config
            .fixed_frame_time
            .unwrap_or_else(|| self.timer.delta_time())
    }

    fn frame_limit_reached(&self) -> bool {
        self.config.max_frames.is_some_and(|max| self.frames >= max)
    }

    fn limit_frame_rate(&self, frame_start: Instant) {
        let Some(fps) = self.config.target_fps else {
            return;
        };
        let budget = Duration::from_secs_f64(1.0 / f64::from(fps));
        let spent = frame_start.elapsed();
        if spent < budget {
            std::thread::sleep(budget - spent);
        }
    }

    /// Stop the loop after the current frame
    pub fn request_exit(&mut self) {
        log::debug!("Exit requested at frame {}", self.frames);
        self.running = false;
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Total wall-clock time since the engine started
    pub fn total_time(&self) -> f32 {
        self.timer.total_time()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Reasons [`Engine::run`] stops early
#[derive(Error, Debug)]
pub enum EngineError {
    /// The application's render hook failed
    #[error("Rendering error: {0}")]
    RenderError(String),

    /// The application's initialize or update hook failed
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// The engine configuration was rejected
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::render::{DrawItem, MaterialId, MeshId, RenderSurface};

    #[derive(Default)]
    struct CountingApp {
        initialized: bool,
        updates: Vec<f32>,
        renders: u32,
        cleaned_up: bool,
        exit_after: Option<usize>,
        fail_at: Option<usize>,
    }

    impl Application for CountingApp {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            self.initialized = true;
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
            self.updates.push(delta_time);
            if self.fail_at == Some(self.updates.len()) {
                return Err(AppError::GameLogic("boom".to_string()));
            }
            if self.exit_after == Some(self.updates.len()) {
                engine.request_exit();
            }
            Ok(())
        }

        fn render(&mut self, surface: &mut dyn RenderSurface) -> Result<(), AppError> {
            self.renders += 1;
            surface.draw(DrawItem::new(MeshId(0), MaterialId(0)));
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    #[test]
    fn test_runs_until_frame_limit() {
        let config = EngineConfig::new().with_fixed_frame_time(0.02).with_max_frames(5);
        let mut app = CountingApp::default();

        Engine::run(config, &mut app).unwrap();

        assert!(app.initialized);
        assert_eq!(app.updates, vec![0.02; 5]);
        assert_eq!(app.renders, 5);
        assert!(app.cleaned_up);
    }

    #[test]
    fn test_request_exit_stops_loop() {
        let config = EngineConfig::new().with_fixed_frame_time(0.02).with_max_frames(100);
        let mut app = CountingApp {
            exit_after: Some(3),
            ..CountingApp::default()
        };

        Engine::run(config, &mut app).unwrap();

        assert_eq!(app.updates.len(), 3);
        assert!(app.cleaned_up);
    }

    #[test]
    fn test_update_error_propagates() {
        let config = EngineConfig::new().with_fixed_frame_time(0.02).with_max_frames(10);
        let mut app = CountingApp {
            fail_at: Some(2),
            ..CountingApp::default()
        };

        let result = Engine::run(config, &mut app);

        assert!(matches!(result, Err(EngineError::ApplicationError(_))));
        assert!(!app.cleaned_up);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig::new().with_target_fps(0);
        assert!(matches!(Engine::new(config), Err(EngineError::ConfigError(_))));
    }
}

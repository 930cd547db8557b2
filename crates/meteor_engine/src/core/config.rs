//! # Engine and Scene Configuration
//!
//! - **Scene Config**: fixed step length, remainder policy, step budget and
//!   gravity of the physics scene a `Scene` creates
//! - **Engine Config**: headless frame loop settings
//!
//! Both serialize with serde and load through the [`Config`] trait.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
pub use crate::foundation::time::StepPolicy;

/// Default fixed physics step in seconds
pub const DEFAULT_FIXED_DELTA_TIME: f32 = 0.02;

/// Physics stepping of a [`Scene`](crate::scene::Scene)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Length of one physics step in seconds
    pub fixed_delta_time: f32,
    /// What happens to frame time that does not fill a whole step
    pub step_policy: StepPolicy,
    /// Upper bound on physics steps run by one `tick`
    pub max_steps_per_tick: u32,
    /// Gravity of the physics scene
    pub gravity: Vec3,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fixed_delta_time: DEFAULT_FIXED_DELTA_TIME,
            step_policy: StepPolicy::default(),
            max_steps_per_tick: 10,
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl SceneConfig {
    /// Set the fixed step length
    pub fn with_fixed_delta_time(mut self, fixed_delta_time: f32) -> Self {
        self.fixed_delta_time = fixed_delta_time;
        self
    }

    /// Set the remainder policy
    pub fn with_step_policy(mut self, step_policy: StepPolicy) -> Self {
        self.step_policy = step_policy;
        self
    }

    /// Set the step budget per tick
    pub fn with_max_steps_per_tick(mut self, max_steps: u32) -> Self {
        self.max_steps_per_tick = max_steps;
        self
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Reject non-positive step lengths and a zero step budget
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_delta_time.is_finite() && self.fixed_delta_time > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fixed_delta_time must be positive, got {}",
                self.fixed_delta_time
            )));
        }
        if self.max_steps_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "max_steps_per_tick must be at least 1".to_string(),
            ));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }
        Ok(())
    }
}

impl Config for SceneConfig {}

/// Frame loop settings
///
/// Drives the headless frame loop in [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target FPS for frame rate limiting (None = unlimited)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_fps: Option<u32>,
    /// Feed this delta time every frame instead of wall-clock time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_frame_time: Option<f32>,
    /// Stop after this many frames (None = until the application quits)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_frames: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Unlimited, wall-clock driven configuration
    pub fn new() -> Self {
        Self {
            target_fps: None,
            fixed_frame_time: None,
            max_frames: None,
        }
    }

    /// Sleep to hold `fps` frames per second
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    /// Use a constant frame time
    pub fn with_fixed_frame_time(mut self, frame_time: f32) -> Self {
        self.fixed_frame_time = Some(frame_time);
        self
    }

    /// Stop after `frames` frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Reject negative frame times and a zero FPS target
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(frame_time) = self.fixed_frame_time {
            if !(frame_time.is_finite() && frame_time >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "fixed_frame_time must not be negative, got {frame_time}"
                )));
            }
        }
        if self.target_fps == Some(0) {
            return Err(ConfigError::Invalid("target_fps must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_scene_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.fixed_delta_time, 0.02);
        assert_eq!(config.step_policy, StepPolicy::CarryRemainder);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scene_validation() {
        assert!(SceneConfig::default().with_fixed_delta_time(0.0).validate().is_err());
        assert!(SceneConfig::default().with_max_steps_per_tick(0).validate().is_err());
    }

    #[test]
    fn test_scene_config_from_toml() {
        let config = SceneConfig::from_str_as(
            "fixed_delta_time = 0.01\nstep_policy = \"DropRemainder\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.fixed_delta_time, 0.01);
        assert_eq!(config.step_policy, StepPolicy::DropRemainder);
        assert_eq!(config.max_steps_per_tick, 10);
    }

    #[test]
    fn test_engine_config_builder() {
        let config = EngineConfig::new().with_fixed_frame_time(0.016).with_max_frames(3);
        assert_eq!(config.fixed_frame_time, Some(0.016));
        assert_eq!(config.max_frames, Some(3));
        assert!(config.validate().is_ok());
        assert!(EngineConfig::new().with_target_fps(0).validate().is_err());
    }
}

//! # Core Engine Module
//!
//! Configuration shared by the scene and the frame loop.

pub mod config;

pub use config::{Config, ConfigError, EngineConfig, SceneConfig, StepPolicy};

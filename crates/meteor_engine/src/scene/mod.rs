//! Scene management
//!
//! [`Scene`] owns the live objects and the physics scene, runs the
//! fixed-step loop and performs deferred removal.

pub mod object_scene;

pub use object_scene::{Scene, SceneError, TickStats};

//! # Meteor Engine
//!
//! Scene, object lifecycle and fixed-step simulation core for small 3D
//! games.
//!
//! - [`scene::Scene`] owns objects in a slotmap arena, runs their update
//!   and render hooks and steps physics at a fixed rate. Objects marked for
//!   removal are dropped after the step that marked them.
//! - [`physics::PhysicsScene`] is the rigid-body service a scene drives;
//!   [`physics::PhysicsWorld`] is the built-in box-collider implementation.
//! - [`render::RenderSurface`] is the drawing boundary. The engine ships a
//!   [`render::RecordingSurface`] only.
//! - [`Engine::run`] is a headless frame loop for an [`Application`].
//!
//! ```rust,no_run
//! use meteor_engine::prelude::*;
//! use std::any::Any;
//!
//! struct Crate {
//!     core: ObjectCore,
//! }
//!
//! impl GameObject<()> for Crate {
//!     fn core(&self) -> &ObjectCore { &self.core }
//!     fn core_mut(&mut self) -> &mut ObjectCore { &mut self.core }
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! }
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut scene: Scene<()> = Scene::with_builtin_physics(SceneConfig::default())?;
//!     let body = scene
//!         .physics_mut()
//!         .create_rigid_body(&RigidBodyDesc::dynamic(Pose::identity()))?;
//!     scene.physics_mut().attach_box_shape(body, Vec3::repeat(0.5))?;
//!
//!     let handle = scene.add(Crate { core: ObjectCore::with_body(ObjectKind::new("crate"), body) })?;
//!     scene.on_update(0.02);
//!     scene.tick(0.02)?;
//!     assert!(scene.contains(handle));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{Config, ConfigError, EngineConfig, SceneConfig, StepPolicy},
        ecs::{
            CollisionContext, Contact, GameObject, Lifetime, ObjectContext, ObjectCore, ObjectKind,
        },
        events::EventQueue,
        foundation::{
            collections::{BodyHandle, ObjectHandle},
            math::{Mat4, Pose, Quat, Transform, Vec3},
            time::Timer,
        },
        physics::{ActorFlags, PhysicsError, PhysicsScene, PhysicsWorld, RigidBodyDesc},
        render::{Camera, DrawItem, MaterialId, MeshId, RecordingSurface, RenderSurface},
        scene::{Scene, SceneError, TickStats},
        AppError, Application, Engine, EngineError,
    };
}

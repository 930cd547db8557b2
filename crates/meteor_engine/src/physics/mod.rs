//! Rigid-body physics service
//!
//! The scene talks to physics only through [`PhysicsScene`]. It creates
//! bodies, attaches box shapes, registers actors and steps the simulation.
//! Contact-begin notifications come back from [`PhysicsScene::fetch_results`]
//! as a plain list so gameplay code never runs inside the solver.
//!
//! [`PhysicsWorld`] is the built-in implementation used by the game and
//! the tests.

pub mod collision;
pub mod world;

pub use collision::{BoundingSphere, OrientedBox};
pub use world::PhysicsWorld;

use crate::foundation::collections::BodyHandle;
use crate::foundation::math::{Pose, Vec3};
use thiserror::Error;

/// Errors reported by a physics scene
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Handle does not name a body of this scene
    #[error("Unknown rigid body: {0:?}")]
    UnknownBody(BodyHandle),

    /// Actor was registered twice
    #[error("Rigid body {0:?} is already part of the scene")]
    AlreadyInScene(BodyHandle),

    /// Actor is not registered
    #[error("Rigid body {0:?} is not part of the scene")]
    NotInScene(BodyHandle),

    /// Shape parameters cannot describe a collider
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Body or step parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// `simulate` was called again before `fetch_results`
    #[error("Simulation step already in progress")]
    StepInProgress,
}

/// Result type for physics calls
pub type PhysicsResult<T> = Result<T, PhysicsError>;

bitflags::bitflags! {
    /// Per-actor behaviour switches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ActorFlags: u32 {
        /// Pose is driven by game code through kinematic targets
        const KINEMATIC = 1 << 0;
        /// Scene gravity does not apply
        const DISABLE_GRAVITY = 1 << 1;
    }
}

impl Default for ActorFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Parameters for a new rigid body
#[derive(Debug, Clone)]
pub struct RigidBodyDesc {
    /// Initial pose
    pub pose: Pose,
    /// Behaviour flags
    pub flags: ActorFlags,
    /// Mass in kilograms (ignored for kinematic bodies)
    pub mass: f32,
    /// Linear velocity damping coefficient
    pub linear_damping: f32,
    /// Angular velocity damping coefficient
    pub angular_damping: f32,
    /// Initial linear velocity
    pub linear_velocity: Vec3,
    /// Initial angular velocity (axis * radians per second)
    pub angular_velocity: Vec3,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            pose: Pose::identity(),
            flags: ActorFlags::empty(),
            mass: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.05,
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
        }
    }
}

impl RigidBodyDesc {
    /// Dynamic body at `pose`
    pub fn dynamic(pose: Pose) -> Self {
        Self {
            pose,
            ..Self::default()
        }
    }

    /// Kinematic body at `pose`
    pub fn kinematic(pose: Pose) -> Self {
        Self {
            pose,
            flags: ActorFlags::KINEMATIC,
            ..Self::default()
        }
    }

    /// Set mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set linear and angular damping
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Set initial linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set initial angular velocity
    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    /// Add behaviour flags
    pub fn with_flags(mut self, flags: ActorFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Check if the body is kinematic
    pub fn is_kinematic(&self) -> bool {
        self.flags.contains(ActorFlags::KINEMATIC)
    }
}

/// Two actors that started touching during the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactPair {
    /// First participant
    pub body_a: BodyHandle,
    /// Second participant
    pub body_b: BodyHandle,
}

impl ContactPair {
    /// Create a pair in canonical order so `(a, b)` and `(b, a)` compare equal
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        if body_a <= body_b {
            Self { body_a, body_b }
        } else {
            Self {
                body_a: body_b,
                body_b: body_a,
            }
        }
    }

    /// Check if `body` takes part in this contact
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }
}

/// Rigid-body simulation owned by a single scene
///
/// Bodies exist from `create_rigid_body` until `release_body`. In between
/// they take part in simulation only while registered with `add_actor`.
pub trait PhysicsScene {
    /// Create a body that is not yet part of the simulation
    fn create_rigid_body(&mut self, desc: &RigidBodyDesc) -> PhysicsResult<BodyHandle>;

    /// Give a body a box collider
    fn attach_box_shape(&mut self, body: BodyHandle, half_extents: Vec3) -> PhysicsResult<()>;

    /// Free a body, detaching it first if needed
    fn release_body(&mut self, body: BodyHandle) -> PhysicsResult<()>;

    /// Register a body with the simulation
    fn add_actor(&mut self, body: BodyHandle) -> PhysicsResult<()>;

    /// Detach a body from the simulation; the body itself stays valid
    fn remove_actor(&mut self, body: BodyHandle) -> PhysicsResult<()>;

    /// Check if a body is registered with the simulation
    fn contains_actor(&self, body: BodyHandle) -> bool;

    /// Current pose
    fn pose(&self, body: BodyHandle) -> PhysicsResult<Pose>;

    /// Teleport a body
    fn set_pose(&mut self, body: BodyHandle, pose: Pose) -> PhysicsResult<()>;

    /// Pose a kinematic body moves to during the next step
    fn set_kinematic_target(&mut self, body: BodyHandle, pose: Pose) -> PhysicsResult<()>;

    /// Current linear velocity
    fn linear_velocity(&self, body: BodyHandle) -> PhysicsResult<Vec3>;

    /// Overwrite linear velocity
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) -> PhysicsResult<()>;

    /// Current angular velocity
    fn angular_velocity(&self, body: BodyHandle) -> PhysicsResult<Vec3>;

    /// Overwrite angular velocity
    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3) -> PhysicsResult<()>;

    /// Attach an opaque back-reference to the body's owner
    fn set_user_data(&mut self, body: BodyHandle, data: Option<u64>) -> PhysicsResult<()>;

    /// Back-reference set with `set_user_data`
    fn user_data(&self, body: BodyHandle) -> Option<u64>;

    /// Start one simulation step of `delta_time` seconds
    fn simulate(&mut self, delta_time: f32) -> PhysicsResult<()>;

    /// Finish the running step and return its contact-begin pairs
    ///
    /// Returns an empty list when no step is running.
    fn fetch_results(&mut self) -> Vec<ContactPair>;

    /// Number of registered actors
    fn actor_count(&self) -> usize;
}

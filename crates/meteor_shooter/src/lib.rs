//! # Meteor Shooter
//!
//! A top-down shooter on [`meteor_engine`]: the player's ship slides along
//! the X axis at the bottom of the lane and fires at meteors tumbling in
//! from +Z. Getting hit starts a new round; every meteor shot down shortens
//! the spawn interval.
//!
//! The [`Game`] director can be ticked directly, or run inside the engine's
//! frame loop through [`GameApp`].

pub mod app;
pub mod assets;
pub mod config;
pub mod difficulty;
pub mod events;
pub mod game;
pub mod obstacle;
pub mod projectile;
pub mod random;
pub mod ship;

pub use app::{Autopilot, GameApp};
pub use config::GameConfig;
pub use events::GameEvent;
pub use game::{Game, GameError, PlayerInput};

//! Scene objects
//!
//! Objects are trait objects owned by the scene's arena. Shared state
//! (kind tag, physics body, removal flag) lives in [`ObjectCore`].

pub mod components;
pub mod entity;
pub mod game_object;

pub use components::{Lifecycle, LifecycleState, Lifetime};
pub use entity::ObjectKind;
pub use game_object::{CollisionContext, Contact, GameObject, ObjectContext, ObjectCore};

//! Components embedded in scene objects

pub mod lifecycle;
pub mod lifetime;

pub use lifecycle::{Lifecycle, LifecycleState};
pub use lifetime::Lifetime;

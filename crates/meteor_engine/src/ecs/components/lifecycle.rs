//! Lifecycle component for scene objects
//!
//! An object is created `Live` and moves to `MarkedForRemoval` exactly once.
//! The scene drops marked objects during its reap pass; there is no way back.

/// Current state of an object's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Object is updated, rendered and receives collisions
    #[default]
    Live,
    /// Object waits for the next reap pass
    MarkedForRemoval,
}

/// Removal flag shared by every scene object
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    /// Create a live lifecycle
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Mark for removal
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn destroy(&mut self) -> bool {
        if self.state == LifecycleState::Live {
            self.state = LifecycleState::MarkedForRemoval;
            true
        } else {
            false
        }
    }

    /// Check if the object waits for removal
    pub fn is_marked(&self) -> bool {
        self.state == LifecycleState::MarkedForRemoval
    }

    /// Check if the object is still live
    pub fn is_live(&self) -> bool {
        self.state == LifecycleState::Live
    }
}

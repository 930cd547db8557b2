//! Events objects send to the director

/// Scene-level effects requested from object hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// A projectile destroyed an obstacle
    ObstacleShotDown,
    /// The ship was hit; start a new scene generation after this frame
    RestartRequested,
}

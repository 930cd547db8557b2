//! Lifetime Component
//!
//! Countdown used by short-lived objects such as projectiles and obstacles.

/// Local time accumulator with a time-to-live
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// Seconds accumulated through `advance`
    pub elapsed: f32,
    /// How long the object should live
    pub time_to_live: f32,
}

impl Lifetime {
    /// Create a lifetime that expires after `time_to_live` seconds
    pub fn new(time_to_live: f32) -> Self {
        Self {
            elapsed: 0.0,
            time_to_live,
        }
    }

    /// Accumulate `delta_time` and report whether the lifetime has run out
    pub fn advance(&mut self, delta_time: f32) -> bool {
        self.elapsed += delta_time;
        self.is_expired()
    }

    /// Check if elapsed time strictly exceeds the time-to-live
    pub fn is_expired(&self) -> bool {
        self.elapsed > self.time_to_live
    }

    /// Get remaining lifetime in seconds
    pub fn remaining(&self) -> f32 {
        (self.time_to_live - self.elapsed).max(0.0)
    }
}

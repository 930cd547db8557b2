//! Frame timing and fixed-step splitting

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Wall-clock frame timer
pub struct Timer {
    started: Instant,
    last_tick: Instant,
    delta: Duration,
    ticks: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Start timing now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_tick: now,
            delta: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Mark the start of a frame
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.ticks += 1;
    }

    /// Seconds between the last two ticks
    pub fn delta_time(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Seconds from creation to the last tick
    pub fn total_time(&self) -> f32 {
        self.last_tick.duration_since(self.started).as_secs_f32()
    }

    /// Ticks so far
    pub fn frame_count(&self) -> u64 {
        self.ticks
    }

    /// Mean ticks per second since creation
    pub fn average_fps(&self) -> f32 {
        let total = self.total_time();
        if total > 0.0 {
            self.ticks as f32 / total
        } else {
            0.0
        }
    }
}

/// What happens to the part of a frame's delta time that does not fill a
/// whole fixed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepPolicy {
    /// Leftover time is discarded at the end of every call. Simulation time
    /// drifts behind wall-clock time, but each call is independent.
    DropRemainder,

    /// Leftover time is carried into the next call.
    #[default]
    CarryRemainder,
}

/// Tolerance used when deciding whether another whole step fits
///
/// Without it `0.06 / 0.02` style inputs lose a step to rounding.
pub const STEP_EPSILON: f32 = 1.0e-5;

/// Splits variable frame time into a whole number of fixed steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    policy: StepPolicy,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create a splitter for the given fixed interval
    ///
    /// `max_steps` bounds the work done by a single call; time beyond the
    /// bound is discarded.
    pub fn new(step: f32, policy: StepPolicy, max_steps: u32) -> Self {
        Self {
            step,
            policy,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Length of one fixed step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Active remainder policy
    pub fn policy(&self) -> StepPolicy {
        self.policy
    }

    /// Time waiting to be simulated (always zero for `DropRemainder`)
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Feed a frame's delta time and return how many fixed steps to run
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        if delta_time.is_finite() && delta_time > 0.0 {
            self.accumulator += delta_time;
        }

        let mut steps = 0;
        while self.accumulator + STEP_EPSILON >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator + STEP_EPSILON >= self.step {
            log::warn!(
                "Fixed step budget of {} exhausted, dropping {:.4}s of simulation time",
                self.max_steps,
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        match self.policy {
            StepPolicy::DropRemainder => self.accumulator = 0.0,
            StepPolicy::CarryRemainder => self.accumulator = self.accumulator.max(0.0),
        }

        steps
    }

    /// Forget any carried time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

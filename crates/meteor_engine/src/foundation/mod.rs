//! Building blocks with no knowledge of scenes or objects
//!
//! - `math`: nalgebra aliases, poses and velocity helpers
//! - `collections`: generational handles for objects and bodies
//! - `time`: frame timer and the fixed-step splitter
//! - `logging`: `env_logger` setup for binaries

pub mod collections;
pub mod logging;
pub mod math;
pub mod time;

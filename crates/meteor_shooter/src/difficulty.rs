//! Obstacle spawn interval as a function of the kill count

use crate::config::DifficultyConfig;

/// Seconds between obstacle spawns after `kills` obstacles were shot down
///
/// Decays exponentially from `max_interval` towards `offset` and never leaves
/// `[min_interval, max_interval]`.
pub fn spawn_interval(kills: u32, config: &DifficultyConfig) -> f32 {
    let ranged = (kills as f32 / config.kills_divisor)
        .trunc()
        .clamp(config.min_ranged as f32, config.max_ranged as f32);

    let interval = config.base * (-config.decay * ranged).exp();

    (config.offset + config.scale * interval).clamp(config.min_interval, config.max_interval)
}

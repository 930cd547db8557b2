//! Game configuration
//!
//! Every tunable of the shooter lives here, grouped the way the game uses
//! them. Defaults reproduce the stock game; a TOML or RON file may override
//! any subset of fields.

use meteor_engine::core::config::{Config, ConfigError, EngineConfig, SceneConfig};
use meteor_engine::foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed; a random seed is drawn when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Longest frame the game simulates; longer or negative frame times
    /// are clamped into `[0, max_frame_time]`
    pub max_frame_time: f32,

    /// Headless frame loop settings
    pub engine: EngineConfig,

    /// Physics stepping of every scene generation
    pub scene: SceneConfig,

    /// Playfield geometry
    pub lane: LaneConfig,

    /// Player ship settings
    pub ship: ShipConfig,

    /// Projectile settings
    pub projectile: ProjectileConfig,

    /// Obstacle settings
    pub obstacle: ObstacleConfig,

    /// Spawn interval curve
    pub difficulty: DifficultyConfig,

    /// Scene camera
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_frame_time: 0.05,
            engine: EngineConfig::new()
                .with_fixed_frame_time(1.0 / 60.0)
                .with_max_frames(3600),
            scene: SceneConfig::default().with_gravity(Vec3::zeros()),
            lane: LaneConfig::default(),
            ship: ShipConfig::default(),
            projectile: ProjectileConfig::default(),
            obstacle: ObstacleConfig::default(),
            difficulty: DifficultyConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    /// or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path).and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => {
                log::info!("Loaded game configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load game configuration from {}: {}. Using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.max_frame_time >= 0.0, "max_frame_time must not be negative")?;
        self.engine.validate()?;
        self.scene.validate()?;
        self.lane.validate()?;
        self.ship.validate()?;
        self.projectile.validate()?;
        self.obstacle.validate()?;
        self.difficulty.validate()?;
        self.camera.validate()
    }
}

fn ensure(condition: bool, message: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid(message.to_string()))
    }
}

/// Playfield geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Half width of the lane; the ship is clamped to it and obstacles spawn in it
    pub visible_range_extent: f32,

    /// Distance along +Z at which obstacles appear
    pub spawn_distance: f32,

    /// Fraction of the lane width obstacles may drift sideways before reaching the ship line
    pub target_spread: f32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            visible_range_extent: 20.0,
            spawn_distance: 40.0,
            target_spread: 0.5,
        }
    }
}

impl LaneConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.visible_range_extent > 0.0, "lane.visible_range_extent must be positive")?;
        ensure(self.spawn_distance > 0.0, "lane.spawn_distance must be positive")?;
        ensure(self.target_spread >= 0.0, "lane.target_spread must not be negative")
    }
}

/// Player ship settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Half size of the ship's box collider
    pub half_extent: f32,

    /// Ship mass
    pub mass: f32,

    /// Seconds between shots
    pub fire_interval: f32,

    /// Sideways bias of the muzzle direction; alternates sign every shot
    pub cannon_offset: f32,

    /// Distance from the ship along the muzzle direction where shots appear
    pub muzzle_distance: f32,

    /// Horizontal speed while a move input is held
    pub move_speed: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            half_extent: 0.5,
            mass: 10.0,
            fire_interval: 0.25,
            cannon_offset: 0.25,
            muzzle_distance: 2.0,
            move_speed: 10.0,
        }
    }
}

impl ShipConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.half_extent > 0.0, "ship.half_extent must be positive")?;
        ensure(self.mass > 0.0, "ship.mass must be positive")?;
        ensure(self.fire_interval >= 0.0, "ship.fire_interval must not be negative")
    }
}

/// Projectile settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Forward speed along +Z
    pub speed: f32,

    /// Seconds before a projectile that hit nothing disappears
    pub time_to_live: f32,

    /// Visual scale; the collider is half of it
    pub scale: [f32; 3],
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 16.0,
            time_to_live: 10.0,
            scale: [0.2, 0.2, 1.0],
        }
    }
}

impl ProjectileConfig {
    /// Scale as a vector
    pub fn scale(&self) -> Vec3 {
        Vec3::from(self.scale)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.time_to_live > 0.0, "projectile.time_to_live must be positive")?;
        ensure(
            self.scale.iter().all(|s| *s > 0.0),
            "projectile.scale components must be positive",
        )
    }
}

/// Obstacle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Seconds before an obstacle disappears
    pub time_to_live: f32,

    /// Smallest box edge length
    pub min_size: f32,

    /// Largest box edge length
    pub max_size: f32,

    /// Slowest approach speed
    pub min_speed: f32,

    /// Fastest approach speed
    pub max_speed: f32,

    /// Upper bound of each angular velocity component
    pub max_angular_velocity: f32,

    /// Spawn with a random orientation instead of axis aligned
    pub random_orientation: bool,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            time_to_live: 6.0,
            min_size: 1.0,
            max_size: 2.5,
            min_speed: 10.0,
            max_speed: 15.0,
            max_angular_velocity: 2.0,
            random_orientation: false,
        }
    }
}

impl ObstacleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.time_to_live > 0.0, "obstacle.time_to_live must be positive")?;
        ensure(
            self.min_size > 0.0 && self.min_size <= self.max_size,
            "obstacle sizes must satisfy 0 < min_size <= max_size",
        )?;
        ensure(
            self.min_speed >= 0.0 && self.min_speed <= self.max_speed,
            "obstacle speeds must satisfy 0 <= min_speed <= max_speed",
        )
    }
}

/// Spawn interval curve
///
/// `ranged = clamp(trunc(kills / kills_divisor), min_ranged, max_ranged)`,
/// `interval = base * exp(-decay * ranged)`,
/// `result = clamp(offset + scale * interval, min_interval, max_interval)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Spawn interval right after a restart, before the first recompute
    pub initial_interval: f32,
    /// Kills per difficulty step
    pub kills_divisor: f32,
    /// Lower clamp of the difficulty step
    pub min_ranged: u32,
    /// Upper clamp of the difficulty step
    pub max_ranged: u32,
    /// Curve amplitude
    pub base: f32,
    /// Curve decay rate
    pub decay: f32,
    /// Constant added to the scaled curve
    pub offset: f32,
    /// Curve scale
    pub scale: f32,
    /// Shortest spawn interval
    pub min_interval: f32,
    /// Longest spawn interval
    pub max_interval: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            initial_interval: 0.25,
            kills_divisor: 1.7,
            min_ranged: 1,
            max_ranged: 150,
            base: 0.981_389,
            decay: 0.017_539_4,
            offset: 0.07,
            scale: 0.7,
            min_interval: 0.05,
            max_interval: 0.5,
        }
    }
}

impl DifficultyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.kills_divisor > 0.0, "difficulty.kills_divisor must be positive")?;
        ensure(
            self.min_ranged <= self.max_ranged,
            "difficulty.min_ranged must not exceed max_ranged",
        )?;
        ensure(
            self.min_interval > 0.0 && self.min_interval <= self.max_interval,
            "difficulty intervals must satisfy 0 < min_interval <= max_interval",
        )?;
        ensure(self.initial_interval > 0.0, "difficulty.initial_interval must be positive")
    }
}

/// Scene camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position
    pub eye: [f32; 3],
    /// Look-at point
    pub target: [f32; 3],
    /// Up direction
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 30.0, 5.0],
            target: [0.0, 0.0, 10.0],
            up: [0.0, 1.0, 0.0],
            fov_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.near > 0.0 && self.near < self.far,
            "camera clipping planes must satisfy 0 < near < far",
        )?;
        ensure(self.aspect > 0.0, "camera.aspect must be positive")
    }
}

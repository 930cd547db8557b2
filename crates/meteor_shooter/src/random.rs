//! Random helpers used when spawning obstacles

use meteor_engine::foundation::math::{constants, normalize_or, Quat, Unit, Vec3};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Seedable random source owned by the director
pub struct GameRng {
    rng: StdRng,
}

impl GameRng {
    /// Deterministic generator when `seed` is given, entropy-seeded otherwise
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Uniform scalar in `[min, max)`; `min` when the range is empty
    pub fn scalar(&mut self, min: f32, max: f32) -> f32 {
        if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Uniform sample in `[0, 1)`
    pub fn unit_scalar(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Component-wise uniform sample in the box `[min, max)`
    pub fn vector_in_box(&mut self, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            self.scalar(min.x, max.x),
            self.scalar(min.y, max.y),
            self.scalar(min.z, max.z),
        )
    }

    /// Unit vector with x and y drawn from `[0, 1)` and z solved for
    ///
    /// When `x² + y² > 1` there is no real z; the (x, y, 0) direction is used
    /// instead.
    pub fn unit_vector(&mut self) -> Vec3 {
        let sign = if self.unit_scalar() > 0.5 { 1.0 } else { -1.0 };
        let x = self.unit_scalar();
        let y = self.unit_scalar();
        let rest = 1.0 - x * x - y * y;

        if rest >= 0.0 {
            Vec3::new(x, y, sign * rest.sqrt())
        } else {
            normalize_or(Vec3::new(x, y, 0.0), Vec3::x())
        }
    }

    /// Rotation by a uniform angle in `[0, 2π)` about a random unit axis
    pub fn quaternion(&mut self) -> Quat {
        let angle = self.scalar(0.0, constants::TAU);
        let axis = Unit::new_normalize(self.unit_vector());
        Quat::from_axis_angle(&axis, angle)
    }

    /// Angular velocity with each component in `[0, max)`
    pub fn angular_velocity(&mut self, max: f32) -> Vec3 {
        Vec3::new(self.unit_scalar(), self.unit_scalar(), self.unit_scalar()) * max
    }
}

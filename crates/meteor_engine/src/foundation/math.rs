//! Math types shared by the scene, the physics service and the game
//!
//! Everything is nalgebra in `f32`. Physics reports rigid [`Pose`]s; objects
//! that draw at a different size than their pose add a scale through
//! [`Transform`].

pub use nalgebra::Unit;

/// 3D vector
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4x4 homogeneous matrix
pub type Mat4 = nalgebra::Matrix4<f32>;

/// 3D point
pub type Point3 = nalgebra::Point3<f32>;

/// Unit quaternion
pub type Quat = nalgebra::UnitQuaternion<f32>;

/// Position and orientation of a rigid body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World position
    pub position: Vec3,

    /// World orientation
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Origin, unrotated
    pub fn identity() -> Self {
        Self::from_position(Vec3::zeros())
    }

    /// Unrotated pose at `position`
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::identity())
    }

    /// Pose from both parts
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    /// Rotate, then translate
    pub fn to_matrix(&self) -> Mat4 {
        self.orientation
            .to_homogeneous()
            .append_translation(&self.position)
    }
}

/// Pose plus a local scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// World position
    pub position: Vec3,
    /// World orientation
    pub rotation: Quat,
    /// Scale applied before the rotation
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_pose_scale(&Pose::identity(), Vec3::repeat(1.0))
    }
}

impl Transform {
    /// Unscaled transform at the origin
    pub fn identity() -> Self {
        Self::default()
    }

    /// Scale `pose` by `scale` in its local frame
    pub fn from_pose_scale(pose: &Pose, scale: Vec3) -> Self {
        Self {
            position: pose.position,
            rotation: pose.orientation,
            scale,
        }
    }

    /// World matrix: scale, then rotate, then translate
    pub fn to_matrix(&self) -> Mat4 {
        Pose::new(self.position, self.rotation).to_matrix()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Smallest length treated as non-zero when normalizing
pub const NORMALIZE_EPSILON: f32 = 1.0e-6;

/// Normalize `v`, or return `fallback` when `v` has (near) zero length
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    v.try_normalize(NORMALIZE_EPSILON).unwrap_or(fallback)
}

/// Project a velocity onto the X-Z plane while keeping its current speed.
///
/// The vertical component is dropped, the remaining X-Z direction is
/// renormalized and rescaled to the length of the *unprojected* vector.
/// Returns `None` when the X-Z part has zero length (purely vertical motion),
/// in which case there is no direction to preserve.
pub fn horizontal_lock(velocity: Vec3) -> Option<Vec3> {
    let speed = velocity.norm();
    let planar = Vec3::new(velocity.x, 0.0, velocity.z);

    planar
        .try_normalize(NORMALIZE_EPSILON)
        .map(|direction| direction * speed)
}

/// Angle constants
pub mod constants {
    /// Half turn
    pub const PI: f32 = std::f32::consts::PI;

    /// Full turn
    pub const TAU: f32 = std::f32::consts::TAU;
}

/// Scalar helpers
pub mod utils {
    /// Degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Limit `value` to `[min, max]`
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        value.max(min).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_lock_keeps_current_speed() {
        let velocity = Vec3::new(3.0, 4.0, 2.0);
        let speed = velocity.norm();

        let locked = horizontal_lock(velocity).unwrap();

        assert_eq!(locked.y, 0.0);
        assert_relative_eq!(locked.norm(), speed, epsilon = 1.0e-5);
        // Direction in the plane is preserved
        assert_relative_eq!(locked.x / locked.z, 3.0 / 2.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_horizontal_lock_vertical_only() {
        assert!(horizontal_lock(Vec3::new(0.0, 7.0, 0.0)).is_none());
        assert!(horizontal_lock(Vec3::zeros()).is_none());
    }

    #[test]
    fn test_normalize_or_fallback() {
        let fallback = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(normalize_or(Vec3::zeros(), fallback), fallback);
        assert_relative_eq!(normalize_or(Vec3::new(2.0, 0.0, 0.0), fallback), Vec3::x());
    }

    #[test]
    fn test_pose_rotates_before_translating() {
        let quarter_turn = Quat::from_axis_angle(&Vec3::y_axis(), constants::PI / 2.0);
        let pose = Pose::new(Vec3::new(0.0, 0.0, 5.0), quarter_turn);
        let point = pose.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));

        assert_relative_eq!(point, Point3::new(0.0, 0.0, 4.0), epsilon = 1.0e-5);
    }

    #[test]
    fn test_transform_scale_then_translate() {
        let pose = Pose::from_position(Vec3::new(1.0, 2.0, 3.0));
        let transform = Transform::from_pose_scale(&pose, Vec3::new(2.0, 2.0, 2.0));
        let point = transform.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));

        assert_relative_eq!(point, Point3::new(3.0, 2.0, 3.0));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(utils::clamp(25.0, -20.0, 20.0), 20.0);
        assert_eq!(utils::clamp(-25.0, -20.0, 20.0), -20.0);
        assert_eq!(utils::clamp(5.0, -20.0, 20.0), 5.0);
    }
}

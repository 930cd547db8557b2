//! # 3D Camera
//!
//! Perspective camera described by a lens (field of view, aspect ratio and
//! clipping planes) and a look-at frame (eye, target, up).
//!
//! ## Coordinate System
//! Right-handed, Y-up world space. The view matrix looks down the camera's
//! negative Z axis, matching nalgebra's `look_at_rh` convention.

use crate::foundation::math::{utils, Mat4, Point3, Vec3};
use bytemuck::{Pod, Zeroable};

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height) for projection calculations
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 0.0, 5.0), 45.0, 16.0 / 9.0, 0.1, 100.0)
    }
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Replace the lens parameters
    ///
    /// `fov` is in radians.
    pub fn set_lens(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        self.fov = fov;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        log::trace!(
            "Camera lens updated - fov: {:.3}, aspect: {:.3}, near: {}, far: {}",
            fov,
            aspect,
            near,
            far
        );
    }

    /// Place the camera at `eye` looking at `target`
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.position = eye;
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - eye: {:?}, target: {:?}, up: {:?}", eye, target, up);
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Camera-to-clip transform
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined projection * view
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Snapshot of the matrices a render surface binds once per pass
    pub fn params(&self) -> CameraParams {
        CameraParams {
            view: self.view_matrix().into(),
            projection: self.projection_matrix().into(),
            view_projection: self.view_projection_matrix().into(),
            eye_position: [self.position.x, self.position.y, self.position.z, 1.0],
        }
    }
}

/// Per-pass camera data in a GPU-friendly layout
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraParams {
    /// World-to-camera matrix (column major)
    pub view: [[f32; 4]; 4],
    /// Camera-to-clip matrix (column major)
    pub projection: [[f32; 4]; 4],
    /// Combined matrix (column major)
    pub view_projection: [[f32; 4]; 4],
    /// Eye position, w = 1
    pub eye_position: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perspective_converts_degrees() {
        let camera = Camera::perspective(Vec3::zeros(), 90.0, 1.0, 0.1, 10.0);
        assert_relative_eq!(camera.fov, std::f32::consts::FRAC_PI_2, epsilon = 1.0e-6);
    }

    #[test]
    fn test_view_matrix_moves_target_in_front() {
        let mut camera = Camera::default();
        camera.look_at(Vec3::new(0.0, 30.0, 5.0), Vec3::new(0.0, 0.0, 10.0), Vec3::y());

        let target_in_view = camera
            .view_matrix()
            .transform_point(&Point3::new(0.0, 0.0, 10.0));

        // Right-handed view space looks down -Z
        assert!(target_in_view.z < 0.0);
        assert_relative_eq!(target_in_view.x, 0.0, epsilon = 1.0e-4);
        assert_relative_eq!(target_in_view.y, 0.0, epsilon = 1.0e-4);
    }

    #[test]
    fn test_params_are_column_major() {
        let camera = Camera::default();
        let params = camera.params();
        let view = camera.view_matrix();

        // Column 3 holds the translation
        assert_relative_eq!(params.view[3][2], view[(2, 3)]);
        assert_eq!(params.eye_position, [0.0, 0.0, 5.0, 1.0]);
    }

    #[test]
    fn test_set_lens() {
        let mut camera = Camera::default();
        camera.set_lens(1.0, 2.0, 0.01, 1000.0);
        assert_eq!((camera.fov, camera.aspect, camera.near, camera.far), (1.0, 2.0, 0.01, 1000.0));
    }
}

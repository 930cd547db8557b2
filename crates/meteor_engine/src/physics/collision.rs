//! Narrow-phase shapes for the built-in physics world
//!
//! Every collider is a box. Boxes are first rejected with their bounding
//! spheres, then tested exactly with the separating axis theorem.

use crate::foundation::math::{Pose, Quat, Vec3};

/// Cross products shorter than this are treated as parallel edge pairs
const PARALLEL_EPSILON: f32 = 1.0e-8;

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another (touching counts)
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }
}

/// Box with arbitrary orientation in world space
#[derive(Debug, Clone, Copy)]
pub struct OrientedBox {
    /// Box center in world space
    pub center: Vec3,
    /// Half size along each local axis
    pub half_extents: Vec3,
    /// Rotation from local to world space
    pub orientation: Quat,
}

impl OrientedBox {
    /// Place a box with the given half extents at a body pose
    pub fn from_pose(pose: &Pose, half_extents: Vec3) -> Self {
        Self {
            center: pose.position,
            half_extents,
            orientation: pose.orientation,
        }
    }

    /// Local axes expressed in world space
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.orientation * Vec3::x(),
            self.orientation * Vec3::y(),
            self.orientation * Vec3::z(),
        ]
    }

    /// Sphere enclosing the box
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.half_extents.norm())
    }

    /// Half length of the box's shadow on `axis` (scaled by `|axis|`)
    fn projected_radius(&self, axes: &[Vec3; 3], axis: &Vec3) -> f32 {
        axes.iter()
            .zip(self.half_extents.iter())
            .map(|(local, extent)| extent * local.dot(axis).abs())
            .sum()
    }

    /// Exact overlap test; touching boxes overlap
    pub fn intersects(&self, other: &OrientedBox) -> bool {
        if !self.bounding_sphere().intersects(&other.bounding_sphere()) {
            return false;
        }

        let axes_a = self.axes();
        let axes_b = other.axes();
        let offset = other.center - self.center;

        let mut candidates = Vec::with_capacity(15);
        candidates.extend_from_slice(&axes_a);
        candidates.extend_from_slice(&axes_b);
        for a in &axes_a {
            for b in &axes_b {
                let cross = a.cross(b);
                if cross.magnitude_squared() > PARALLEL_EPSILON {
                    candidates.push(cross);
                }
            }
        }

        candidates.iter().all(|axis| {
            let distance = offset.dot(axis).abs();
            distance <= self.projected_radius(&axes_a, axis) + other.projected_radius(&axes_b, axis)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;

    fn unit_box(center: Vec3) -> OrientedBox {
        OrientedBox::from_pose(&Pose::from_position(center), Vec3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn test_sphere_intersection() {
        let a = BoundingSphere::new(Vec3::zeros(), 5.0);
        let b = BoundingSphere::new(Vec3::new(8.0, 0.0, 0.0), 5.0);
        let c = BoundingSphere::new(Vec3::new(11.0, 0.0, 0.0), 5.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_axis_aligned_boxes() {
        let a = unit_box(Vec3::zeros());
        assert!(a.intersects(&unit_box(Vec3::new(0.9, 0.0, 0.0))));
        assert!(a.intersects(&unit_box(Vec3::new(1.0, 0.0, 0.0))));
        assert!(!a.intersects(&unit_box(Vec3::new(1.1, 0.0, 0.0))));
    }

    #[test]
    fn test_rotated_box_reaches_further() {
        // Rotated 45 degrees about Y the corner sticks out to ~0.707
        let rotated = OrientedBox::from_pose(
            &Pose::new(Vec3::zeros(), Quat::from_axis_angle(&Vec3::y_axis(), PI / 4.0)),
            Vec3::new(0.5, 0.5, 0.5),
        );
        let other = unit_box(Vec3::new(1.15, 0.0, 0.0));
        assert!(rotated.intersects(&other));
        assert!(!unit_box(Vec3::zeros()).intersects(&other));
    }

    #[test]
    fn test_spheres_overlap_but_boxes_do_not() {
        // Diagonal neighbours: bounding spheres overlap, boxes are separated
        let a = unit_box(Vec3::zeros());
        let b = unit_box(Vec3::new(1.05, 1.05, 0.0));
        assert!(a.bounding_sphere().intersects(&b.bounding_sphere()));
        assert!(!a.intersects(&b));
    }
}

//! Built-in rigid-body world
//!
//! A small explicit-Euler simulation with box colliders. Contact detection
//! follows the usual begin/stay split: pairs overlapping this step are
//! compared with the pairs of the previous step and only new ones are
//! reported.

use super::collision::OrientedBox;
use super::{
    ActorFlags, ContactPair, PhysicsError, PhysicsResult, PhysicsScene, RigidBodyDesc,
};
use crate::foundation::collections::{BodyHandle, SlotMap};
use crate::foundation::math::{normalize_or, Pose, Quat, Vec3};
use std::collections::HashSet;

/// Bounciness of dynamic/dynamic contacts
const RESTITUTION: f32 = 0.5;

/// Angular speeds below this leave the orientation untouched
const MIN_ANGULAR_SPEED: f32 = 1.0e-6;

#[derive(Debug, Clone)]
struct Body {
    pose: Pose,
    kinematic_target: Option<Pose>,
    flags: ActorFlags,
    inverse_mass: f32,
    linear_damping: f32,
    angular_damping: f32,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    half_extents: Option<Vec3>,
    user_data: Option<u64>,
    in_scene: bool,
}

impl Body {
    fn is_kinematic(&self) -> bool {
        self.flags.contains(ActorFlags::KINEMATIC)
    }

    fn collider(&self) -> Option<OrientedBox> {
        self.half_extents
            .map(|half_extents| OrientedBox::from_pose(&self.pose, half_extents))
    }
}

/// Physics scene with box colliders and contact-begin reporting
pub struct PhysicsWorld {
    gravity: Vec3,
    bodies: SlotMap<BodyHandle, Body>,

    /// Registered actors in registration order; keeps contact order stable
    actors: Vec<BodyHandle>,

    previous_pairs: HashSet<ContactPair>,
    pending_contacts: Option<Vec<ContactPair>>,
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity
    pub fn new(gravity: Vec3) -> Self {
        log::debug!("Creating physics world with gravity {:?}", gravity);
        Self {
            gravity,
            bodies: SlotMap::with_key(),
            actors: Vec::new(),
            previous_pairs: HashSet::new(),
            pending_contacts: None,
        }
    }

    /// Scene gravity
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Number of bodies, registered or not
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn body(&self, handle: BodyHandle) -> PhysicsResult<&Body> {
        self.bodies.get(handle).ok_or(PhysicsError::UnknownBody(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> PhysicsResult<&mut Body> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    fn integrate(&mut self, delta_time: f32) {
        let gravity = self.gravity;
        for &handle in &self.actors {
            let Some(body) = self.bodies.get_mut(handle) else {
                continue;
            };

            if body.is_kinematic() {
                if let Some(target) = body.kinematic_target.take() {
                    body.pose = target;
                }
                continue;
            }

            if !body.flags.contains(ActorFlags::DISABLE_GRAVITY) {
                body.linear_velocity += gravity * delta_time;
            }
            body.linear_velocity *= 1.0 / (1.0 + delta_time * body.linear_damping);
            body.angular_velocity *= 1.0 / (1.0 + delta_time * body.angular_damping);

            body.pose.position += body.linear_velocity * delta_time;

            let spin = body.angular_velocity * delta_time;
            if body.angular_velocity.norm() > MIN_ANGULAR_SPEED {
                body.pose.orientation = Quat::from_scaled_axis(spin) * body.pose.orientation;
            }
        }
    }

    /// Every overlapping actor pair, in registration order
    fn overlapping_pairs(&self) -> Vec<ContactPair> {
        let colliders: Vec<(BodyHandle, OrientedBox)> = self
            .actors
            .iter()
            .filter_map(|&handle| {
                self.bodies
                    .get(handle)
                    .and_then(Body::collider)
                    .map(|collider| (handle, collider))
            })
            .collect();

        let mut pairs = Vec::new();
        for (i, (handle_a, box_a)) in colliders.iter().enumerate() {
            for (handle_b, box_b) in &colliders[i + 1..] {
                if box_a.intersects(box_b) {
                    pairs.push(ContactPair::new(*handle_a, *handle_b));
                }
            }
        }
        pairs
    }

    /// Push approaching dynamic bodies apart along the centre line
    fn resolve_contact(&mut self, pair: ContactPair) {
        let (Some(a), Some(b)) = (self.bodies.get(pair.body_a), self.bodies.get(pair.body_b))
        else {
            return;
        };

        let inverse_mass_a = if a.is_kinematic() { 0.0 } else { a.inverse_mass };
        let inverse_mass_b = if b.is_kinematic() { 0.0 } else { b.inverse_mass };
        let inverse_mass_sum = inverse_mass_a + inverse_mass_b;
        if inverse_mass_sum <= 0.0 {
            return;
        }

        let normal = normalize_or(b.pose.position - a.pose.position, Vec3::x());
        let approach_speed = (b.linear_velocity - a.linear_velocity).dot(&normal);
        if approach_speed >= 0.0 {
            return;
        }

        let impulse = -(1.0 + RESTITUTION) * approach_speed / inverse_mass_sum;
        if let Some(a) = self.bodies.get_mut(pair.body_a) {
            a.linear_velocity -= normal * (impulse * inverse_mass_a);
        }
        if let Some(b) = self.bodies.get_mut(pair.body_b) {
            b.linear_velocity += normal * (impulse * inverse_mass_b);
        }
    }
}

impl PhysicsScene for PhysicsWorld {
    fn create_rigid_body(&mut self, desc: &RigidBodyDesc) -> PhysicsResult<BodyHandle> {
        if !desc.is_kinematic() && !(desc.mass.is_finite() && desc.mass > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "dynamic body mass must be positive, got {}",
                desc.mass
            )));
        }
        if desc.linear_damping < 0.0 || desc.angular_damping < 0.0 {
            return Err(PhysicsError::InvalidParameter(
                "damping must not be negative".to_string(),
            ));
        }

        let inverse_mass = if desc.is_kinematic() { 0.0 } else { 1.0 / desc.mass };
        let handle = self.bodies.insert(Body {
            pose: desc.pose,
            kinematic_target: None,
            flags: desc.flags,
            inverse_mass,
            linear_damping: desc.linear_damping,
            angular_damping: desc.angular_damping,
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            half_extents: None,
            user_data: None,
            in_scene: false,
        });
        log::trace!("Created rigid body {:?}", handle);
        Ok(handle)
    }

    fn attach_box_shape(&mut self, body: BodyHandle, half_extents: Vec3) -> PhysicsResult<()> {
        if half_extents.iter().any(|e| !(e.is_finite() && *e > 0.0)) {
            return Err(PhysicsError::InvalidShape(format!(
                "box half extents must be positive, got {half_extents:?}"
            )));
        }
        self.body_mut(body)?.half_extents = Some(half_extents);
        Ok(())
    }

    fn release_body(&mut self, body: BodyHandle) -> PhysicsResult<()> {
        if self.contains_actor(body) {
            self.remove_actor(body)?;
        }
        self.bodies
            .remove(body)
            .map(|_| ())
            .ok_or(PhysicsError::UnknownBody(body))
    }

    fn add_actor(&mut self, body: BodyHandle) -> PhysicsResult<()> {
        let entry = self.body_mut(body)?;
        if entry.in_scene {
            return Err(PhysicsError::AlreadyInScene(body));
        }
        entry.in_scene = true;
        self.actors.push(body);
        Ok(())
    }

    fn remove_actor(&mut self, body: BodyHandle) -> PhysicsResult<()> {
        let entry = self.body_mut(body)?;
        if !entry.in_scene {
            return Err(PhysicsError::NotInScene(body));
        }
        entry.in_scene = false;
        self.actors.retain(|&handle| handle != body);
        self.previous_pairs.retain(|pair| !pair.involves(body));
        if let Some(pending) = self.pending_contacts.as_mut() {
            pending.retain(|pair| !pair.involves(body));
        }
        Ok(())
    }

    fn contains_actor(&self, body: BodyHandle) -> bool {
        self.bodies.get(body).is_some_and(|entry| entry.in_scene)
    }

    fn pose(&self, body: BodyHandle) -> PhysicsResult<Pose> {
        Ok(self.body(body)?.pose)
    }

    fn set_pose(&mut self, body: BodyHandle, pose: Pose) -> PhysicsResult<()> {
        self.body_mut(body)?.pose = pose;
        Ok(())
    }

    fn set_kinematic_target(&mut self, body: BodyHandle, pose: Pose) -> PhysicsResult<()> {
        let entry = self.body_mut(body)?;
        if !entry.is_kinematic() {
            return Err(PhysicsError::InvalidParameter(format!(
                "body {body:?} is not kinematic"
            )));
        }
        entry.kinematic_target = Some(pose);
        Ok(())
    }

    fn linear_velocity(&self, body: BodyHandle) -> PhysicsResult<Vec3> {
        Ok(self.body(body)?.linear_velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) -> PhysicsResult<()> {
        self.body_mut(body)?.linear_velocity = velocity;
        Ok(())
    }

    fn angular_velocity(&self, body: BodyHandle) -> PhysicsResult<Vec3> {
        Ok(self.body(body)?.angular_velocity)
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3) -> PhysicsResult<()> {
        self.body_mut(body)?.angular_velocity = velocity;
        Ok(())
    }

    fn set_user_data(&mut self, body: BodyHandle, data: Option<u64>) -> PhysicsResult<()> {
        self.body_mut(body)?.user_data = data;
        Ok(())
    }

    fn user_data(&self, body: BodyHandle) -> Option<u64> {
        self.bodies.get(body).and_then(|entry| entry.user_data)
    }

    fn simulate(&mut self, delta_time: f32) -> PhysicsResult<()> {
        if self.pending_contacts.is_some() {
            return Err(PhysicsError::StepInProgress);
        }
        if !(delta_time.is_finite() && delta_time > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "step length must be positive, got {delta_time}"
            )));
        }

        self.integrate(delta_time);

        let current = self.overlapping_pairs();
        for &pair in &current {
            self.resolve_contact(pair);
        }

        let began: Vec<ContactPair> = current
            .iter()
            .filter(|pair| !self.previous_pairs.contains(pair))
            .copied()
            .collect();
        self.previous_pairs = current.into_iter().collect();

        log::trace!(
            "Physics step {:.4}s: {} actors, {} new contacts",
            delta_time,
            self.actors.len(),
            began.len()
        );
        self.pending_contacts = Some(began);
        Ok(())
    }

    fn fetch_results(&mut self) -> Vec<ContactPair> {
        self.pending_contacts.take().unwrap_or_default()
    }

    fn actor_count(&self) -> usize {
        self.actors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn add_box(world: &mut PhysicsWorld, desc: &RigidBodyDesc) -> BodyHandle {
        let body = world.create_rigid_body(desc).unwrap();
        world.attach_box_shape(body, Vec3::new(0.5, 0.5, 0.5)).unwrap();
        world.add_actor(body).unwrap();
        body
    }

    fn step(world: &mut PhysicsWorld, dt: f32) -> Vec<ContactPair> {
        world.simulate(dt).unwrap();
        world.fetch_results()
    }

    #[test]
    fn test_gravity_integration() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -10.0, 0.0));
        let body = add_box(&mut world, &RigidBodyDesc::dynamic(Pose::identity()));

        step(&mut world, 0.1);

        assert_relative_eq!(world.linear_velocity(body).unwrap().y, -1.0, epsilon = 1.0e-5);
        assert_relative_eq!(world.pose(body).unwrap().position.y, -0.1, epsilon = 1.0e-5);
    }

    #[test]
    fn test_disable_gravity_flag() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -10.0, 0.0));
        let desc = RigidBodyDesc::dynamic(Pose::identity()).with_flags(ActorFlags::DISABLE_GRAVITY);
        let body = add_box(&mut world, &desc);

        step(&mut world, 0.1);

        assert_eq!(world.pose(body).unwrap().position, Vec3::zeros());
    }

    #[test]
    fn test_kinematic_body_moves_to_target() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -10.0, 0.0));
        let body = add_box(&mut world, &RigidBodyDesc::kinematic(Pose::identity()));
        let target = Pose::from_position(Vec3::new(3.0, 0.0, 0.0));

        world.set_kinematic_target(body, target).unwrap();
        step(&mut world, 0.02);

        assert_eq!(world.pose(body).unwrap(), target);
        // No gravity on kinematic bodies
        step(&mut world, 0.02);
        assert_eq!(world.pose(body).unwrap(), target);
    }

    #[test]
    fn test_kinematic_target_rejected_for_dynamic_body() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let body = add_box(&mut world, &RigidBodyDesc::dynamic(Pose::identity()));
        assert!(matches!(
            world.set_kinematic_target(body, Pose::identity()),
            Err(PhysicsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_contact_begin_reported_once() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let a = add_box(&mut world, &RigidBodyDesc::kinematic(Pose::identity()));
        let b = add_box(
            &mut world,
            &RigidBodyDesc::kinematic(Pose::from_position(Vec3::new(0.5, 0.0, 0.0))),
        );

        let first = step(&mut world, 0.02);
        assert_eq!(first, vec![ContactPair::new(a, b)]);

        // Still touching: no new begin event
        assert!(step(&mut world, 0.02).is_empty());

        // Separate, then touch again
        world.set_kinematic_target(b, Pose::from_position(Vec3::new(5.0, 0.0, 0.0))).unwrap();
        assert!(step(&mut world, 0.02).is_empty());
        world.set_kinematic_target(b, Pose::from_position(Vec3::new(0.5, 0.0, 0.0))).unwrap();
        assert_eq!(step(&mut world, 0.02).len(), 1);
    }

    #[test]
    fn test_dynamic_contact_pushes_bodies_apart() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let a = add_box(
            &mut world,
            &RigidBodyDesc::dynamic(Pose::identity()).with_linear_velocity(Vec3::new(1.0, 0.0, 0.0)),
        );
        let b = add_box(
            &mut world,
            &RigidBodyDesc::dynamic(Pose::from_position(Vec3::new(0.9, 0.0, 0.0)))
                .with_linear_velocity(Vec3::new(-1.0, 0.0, 0.0)),
        );

        step(&mut world, 0.01);

        assert!(world.linear_velocity(a).unwrap().x < 0.0);
        assert!(world.linear_velocity(b).unwrap().x > 0.0);
    }

    #[test]
    fn test_actor_registration() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let body = world.create_rigid_body(&RigidBodyDesc::default()).unwrap();
        assert!(!world.contains_actor(body));

        world.add_actor(body).unwrap();
        assert_eq!(world.add_actor(body), Err(PhysicsError::AlreadyInScene(body)));
        assert_eq!(world.actor_count(), 1);

        world.remove_actor(body).unwrap();
        assert_eq!(world.remove_actor(body), Err(PhysicsError::NotInScene(body)));
        assert_eq!(world.actor_count(), 0);

        world.release_body(body).unwrap();
        assert_eq!(world.pose(body), Err(PhysicsError::UnknownBody(body)));
    }

    #[test]
    fn test_removed_actor_is_not_reported() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let a = add_box(&mut world, &RigidBodyDesc::kinematic(Pose::identity()));
        add_box(&mut world, &RigidBodyDesc::kinematic(Pose::identity()));

        world.simulate(0.02).unwrap();
        world.remove_actor(a).unwrap();
        assert!(world.fetch_results().is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let massless = RigidBodyDesc::dynamic(Pose::identity()).with_mass(0.0);
        assert!(matches!(
            world.create_rigid_body(&massless),
            Err(PhysicsError::InvalidParameter(_))
        ));

        let body = world.create_rigid_body(&RigidBodyDesc::default()).unwrap();
        assert!(matches!(
            world.attach_box_shape(body, Vec3::new(1.0, 0.0, 1.0)),
            Err(PhysicsError::InvalidShape(_))
        ));
        assert!(matches!(world.simulate(0.0), Err(PhysicsError::InvalidParameter(_))));
    }

    #[test]
    fn test_simulate_requires_fetch() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        world.simulate(0.02).unwrap();
        assert_eq!(world.simulate(0.02), Err(PhysicsError::StepInProgress));
        world.fetch_results();
        assert!(world.simulate(0.02).is_ok());
    }
}

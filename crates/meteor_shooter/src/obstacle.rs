//! Tumbling meteor obstacle

use crate::config::{LaneConfig, ObstacleConfig};
use crate::events::GameEvent;
use crate::projectile::Projectile;
use crate::random::GameRng;
use meteor_engine::ecs::{CollisionContext, GameObject, Lifetime, ObjectContext, ObjectCore, ObjectKind};
use meteor_engine::foundation::math::{horizontal_lock, normalize_or, Pose, Quat, Vec3};
use meteor_engine::physics::{ActorFlags, PhysicsResult, PhysicsScene, RigidBodyDesc};
use meteor_engine::render::{DrawItem, RenderSurface};
use std::any::Any;

/// Initial state of an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSpawn {
    /// Spawn position
    pub position: Vec3,
    /// Spawn orientation
    pub orientation: Quat,
    /// Initial linear velocity
    pub velocity: Vec3,
    /// Box edge lengths
    pub size: Vec3,
    /// Initial angular velocity
    pub angular_velocity: Vec3,
}

impl ObstacleSpawn {
    /// Pick a random spawn point across the lane, aimed at the ship line
    ///
    /// The spawn X covers the whole lane, the drift towards the hit point is
    /// narrower.
    pub fn sample(rng: &mut GameRng, lane: &LaneConfig, config: &ObstacleConfig) -> Self {
        let extent = lane.visible_range_extent;
        let spawn_x = rng.scalar(-extent, extent);
        let drift = rng.scalar(-extent, extent) * lane.target_spread;

        let position = Vec3::new(spawn_x, 0.0, lane.spawn_distance);
        let hit_point = Vec3::new(spawn_x + drift, 0.0, 0.0);
        let direction = normalize_or(hit_point - position, -Vec3::z());
        let velocity = direction * rng.scalar(config.min_speed, config.max_speed);

        let size = rng.vector_in_box(
            Vec3::repeat(config.min_size),
            Vec3::repeat(config.max_size),
        );
        let orientation = if config.random_orientation {
            rng.quaternion()
        } else {
            Quat::identity()
        };
        let angular_velocity = rng.angular_velocity(config.max_angular_velocity);

        Self {
            position,
            orientation,
            velocity,
            size,
            angular_velocity,
        }
    }
}

/// Dynamic box moving in the X-Z plane towards the ship
pub struct Obstacle {
    core: ObjectCore,
    draw: DrawItem,
    size: Vec3,
    lifetime: Lifetime,
}

impl Obstacle {
    /// Type tag
    pub const KIND: ObjectKind = ObjectKind::new("game.obstacle");

    /// Create the obstacle body
    pub fn create(
        physics: &mut dyn PhysicsScene,
        spawn: &ObstacleSpawn,
        config: &ObstacleConfig,
        draw: DrawItem,
    ) -> PhysicsResult<Self> {
        let desc = RigidBodyDesc::dynamic(Pose::new(spawn.position, spawn.orientation))
            .with_flags(ActorFlags::DISABLE_GRAVITY)
            .with_damping(0.0, 0.0)
            .with_linear_velocity(spawn.velocity)
            .with_angular_velocity(spawn.angular_velocity);
        let body = physics.create_rigid_body(&desc)?;

        if let Err(e) = physics.attach_box_shape(body, spawn.size * 0.5) {
            let _ = physics.release_body(body);
            return Err(e);
        }

        Ok(Self {
            core: ObjectCore::with_body(Self::KIND, body),
            draw,
            size: spawn.size,
            lifetime: Lifetime::new(config.time_to_live),
        })
    }

    /// Box edge lengths
    pub fn size(&self) -> Vec3 {
        self.size
    }
}

impl GameObject<GameEvent> for Obstacle {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        &mut self.core
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_update(&mut self, ctx: &mut ObjectContext<'_, GameEvent>, delta_time: f32) {
        if self.lifetime.advance(delta_time) {
            self.destroy();
        }

        let Some(body) = ctx.body() else {
            return;
        };
        let physics = ctx.physics();
        let Ok(velocity) = physics.linear_velocity(body) else {
            return;
        };
        // Purely vertical motion has no planar direction to keep
        if let Some(locked) = horizontal_lock(velocity) {
            if let Err(e) = physics.set_linear_velocity(body, locked) {
                log::warn!("Obstacle failed to lock its velocity: {}", e);
            }
        }
    }

    fn on_render(&self, surface: &mut dyn RenderSurface) {
        surface.draw(self.draw);
    }

    fn on_collision(&mut self, ctx: &mut CollisionContext<'_, GameEvent>) {
        if ctx.other().kind == Projectile::KIND {
            ctx.emit(GameEvent::ObstacleShotDown);
            self.destroy();
        }
    }

    fn local_scale(&self) -> Option<Vec3> {
        Some(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::RenderAssets;
    use approx::assert_relative_eq;
    use meteor_engine::events::EventQueue;
    use meteor_engine::foundation::collections::ObjectHandle;
    use meteor_engine::physics::PhysicsWorld;

    fn spawn_at(position: Vec3, velocity: Vec3) -> ObstacleSpawn {
        ObstacleSpawn {
            position,
            orientation: Quat::identity(),
            velocity,
            size: Vec3::new(2.0, 2.0, 2.0),
            angular_velocity: Vec3::zeros(),
        }
    }

    #[test]
    fn test_sampled_spawn_is_inside_configured_ranges() {
        let lane = LaneConfig::default();
        let config = ObstacleConfig::default();
        let mut rng = GameRng::new(Some(9));

        for _ in 0..64 {
            let spawn = ObstacleSpawn::sample(&mut rng, &lane, &config);

            assert_eq!(spawn.position.y, 0.0);
            assert_eq!(spawn.position.z, 40.0);
            assert!(spawn.position.x.abs() <= 20.0);
            assert!(spawn.velocity.z < 0.0);
            assert_eq!(spawn.velocity.y, 0.0);

            let speed = spawn.velocity.norm();
            assert!((10.0 - 1.0e-4..=15.0 + 1.0e-4).contains(&speed));
            assert!(spawn.size.iter().all(|s| (1.0..2.5).contains(s)));
            assert!(spawn.angular_velocity.iter().all(|w| (0.0..2.0).contains(w)));
            assert_eq!(spawn.orientation, Quat::identity());
        }
    }

    #[test]
    fn test_update_removes_vertical_velocity_and_keeps_speed() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let velocity = Vec3::new(3.0, 4.0, 2.0);
        let mut obstacle = Obstacle::create(
            &mut world,
            &spawn_at(Vec3::new(0.0, 0.0, 40.0), velocity),
            &ObstacleConfig::default(),
            RenderAssets::default().obstacle,
        )
        .unwrap();
        let body = obstacle.core().body().unwrap();
        let mut events = EventQueue::new();

        let mut ctx = ObjectContext::new(&mut world, &mut events, ObjectHandle::default(), Some(body));
        obstacle.on_update(&mut ctx, 0.02);

        let locked = world.linear_velocity(body).unwrap();
        assert_eq!(locked.y, 0.0);
        assert_relative_eq!(locked.norm(), velocity.norm(), epsilon = 1.0e-5);
    }

    #[test]
    fn test_obstacle_ignores_scene_gravity() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        let obstacle = Obstacle::create(
            &mut world,
            &spawn_at(Vec3::new(0.0, 0.0, 40.0), Vec3::new(0.0, 0.0, -10.0)),
            &ObstacleConfig::default(),
            RenderAssets::default().obstacle,
        )
        .unwrap();
        let body = obstacle.core().body().unwrap();
        world.add_actor(body).unwrap();

        for _ in 0..10 {
            world.simulate(0.02).unwrap();
            world.fetch_results();
        }

        let pose = world.pose(body).unwrap();
        assert_eq!(pose.position.y, 0.0);
        assert_relative_eq!(pose.position.z, 38.0, epsilon = 1.0e-4);
        assert_eq!(world.linear_velocity(body).unwrap(), Vec3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn test_vertical_only_velocity_is_left_alone() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let mut obstacle = Obstacle::create(
            &mut world,
            &spawn_at(Vec3::zeros(), Vec3::new(0.0, 5.0, 0.0)),
            &ObstacleConfig::default(),
            RenderAssets::default().obstacle,
        )
        .unwrap();
        let body = obstacle.core().body().unwrap();
        let mut events = EventQueue::new();

        let mut ctx = ObjectContext::new(&mut world, &mut events, ObjectHandle::default(), Some(body));
        obstacle.on_update(&mut ctx, 0.02);

        assert_eq!(world.linear_velocity(body).unwrap(), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_obstacle_expires() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let mut obstacle = Obstacle::create(
            &mut world,
            &spawn_at(Vec3::zeros(), Vec3::new(0.0, 0.0, -10.0)),
            &ObstacleConfig::default(),
            RenderAssets::default().obstacle,
        )
        .unwrap();
        let body = obstacle.core().body();
        let mut events: EventQueue<GameEvent> = EventQueue::new();

        let mut ctx = ObjectContext::new(&mut world, &mut events, ObjectHandle::default(), body);
        obstacle.on_update(&mut ctx, 6.0);
        assert!(!obstacle.is_marked_to_remove());
        obstacle.on_update(&mut ctx, 0.01);
        assert!(obstacle.is_marked_to_remove());
    }

    #[test]
    fn test_create_rejects_degenerate_size() {
        let mut world = PhysicsWorld::new(Vec3::zeros());
        let mut spawn = spawn_at(Vec3::zeros(), Vec3::zeros());
        spawn.size = Vec3::new(0.0, 1.0, 1.0);

        let result = Obstacle::create(
            &mut world,
            &spawn,
            &ObstacleConfig::default(),
            RenderAssets::default().obstacle,
        );

        assert!(result.is_err());
        assert_eq!(world.body_count(), 0);
    }
}

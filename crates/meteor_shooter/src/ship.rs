//! Player ship

use crate::config::{LaneConfig, ShipConfig};
use crate::events::GameEvent;
use meteor_engine::ecs::{CollisionContext, GameObject, ObjectContext, ObjectCore, ObjectKind};
use meteor_engine::foundation::math::{utils, Pose, Vec3};
use meteor_engine::physics::{PhysicsResult, PhysicsScene, RigidBodyDesc};
use meteor_engine::render::{DrawItem, RenderSurface};
use std::any::Any;

/// Kinematic box the player steers along the X axis
pub struct Ship {
    core: ObjectCore,
    draw: DrawItem,
    config: ShipConfig,
    lane_extent: f32,
    target: Pose,
    move_velocity: f32,
    fire_timeout: f32,
    cannon_flip: f32,
}

/// Where and in which direction a new projectile starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Spawn position
    pub position: Vec3,
    /// Muzzle direction (not normalized)
    pub direction: Vec3,
}

impl Ship {
    /// Type tag
    pub const KIND: ObjectKind = ObjectKind::new("game.ship");

    /// Create the ship's kinematic body at the origin
    pub fn create(
        physics: &mut dyn PhysicsScene,
        config: &ShipConfig,
        lane: &LaneConfig,
        draw: DrawItem,
    ) -> PhysicsResult<Self> {
        let pose = Pose::identity();
        let desc = RigidBodyDesc::kinematic(pose).with_mass(config.mass);
        let body = physics.create_rigid_body(&desc)?;

        let half = config.half_extent;
        if let Err(e) = physics.attach_box_shape(body, Vec3::new(half, half, half)) {
            let _ = physics.release_body(body);
            return Err(e);
        }

        Ok(Self {
            core: ObjectCore::with_body(Self::KIND, body),
            draw,
            config: config.clone(),
            lane_extent: lane.visible_range_extent,
            target: pose,
            move_velocity: 0.0,
            fire_timeout: 0.0,
            cannon_flip: 1.0,
        })
    }

    /// Horizontal speed used by the following updates
    pub fn set_horizontal_velocity(&mut self, velocity: f32) {
        self.move_velocity = velocity;
    }

    /// Current horizontal speed
    pub fn horizontal_velocity(&self) -> f32 {
        self.move_velocity
    }

    /// Pose the ship is steering towards
    pub fn target(&self) -> Pose {
        self.target
    }

    /// Try to fire from `position`
    ///
    /// Returns the shot when the cannon is ready. Successive shots alternate
    /// between the left and right cannon.
    pub fn fire(&mut self, position: Vec3) -> Option<Shot> {
        if self.fire_timeout < self.config.fire_interval {
            return None;
        }

        self.fire_timeout = 0.0;
        self.cannon_flip = -self.cannon_flip;

        let direction = Vec3::new(self.cannon_flip * self.config.cannon_offset, 0.0, 1.0);
        Some(Shot {
            position: position + direction * self.config.muzzle_distance,
            direction,
        })
    }

    fn advance(&mut self, delta_time: f32) {
        self.fire_timeout += delta_time;

        let x = self.target.position.x + self.move_velocity * delta_time;
        self.target.position.x = utils::clamp(x, -self.lane_extent, self.lane_extent);
    }
}

impl GameObject<GameEvent> for Ship {
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
        self.advance(delta_time);

        let Some(body) = ctx.body() else {
            return;
        };
        if let Err(e) = ctx.physics().set_kinematic_target(body, self.target) {
            log::warn!("Ship failed to set its kinematic target: {}", e);
        }
    }

    fn on_render(&self, surface: &mut dyn RenderSurface) {
        surface.draw(self.draw);
    }

    fn on_collision(&mut self, ctx: &mut CollisionContext<'_, GameEvent>) {
        log::info!("Ship hit by {}", ctx.other().kind);
        ctx.destroy_other();
        self.destroy();
        ctx.emit(GameEvent::RestartRequested);
    }
}

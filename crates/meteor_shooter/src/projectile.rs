//! Laser projectile

use crate::config::ProjectileConfig;
use crate::events::GameEvent;
use crate::ship::Shot;
use meteor_engine::ecs::{CollisionContext, GameObject, Lifetime, ObjectContext, ObjectCore, ObjectKind};
use meteor_engine::foundation::math::{Pose, Vec3};
use meteor_engine::physics::{ActorFlags, PhysicsResult, PhysicsScene, RigidBodyDesc};
use meteor_engine::render::{DrawItem, RenderSurface};
use std::any::Any;

/// Dynamic box flying along +Z until it hits something or expires
pub struct Projectile {
    core: ObjectCore,
    draw: DrawItem,
    scale: Vec3,
    velocity: Vec3,
    lifetime: Lifetime,
}

impl Projectile {
    /// Type tag
    pub const KIND: ObjectKind = ObjectKind::new("game.projectile");

    /// Create the projectile body at the shot position
    ///
    /// The body keeps the world orientation; the shot direction only picks
    /// the muzzle.
    pub fn create(
        physics: &mut dyn PhysicsScene,
        shot: Shot,
        config: &ProjectileConfig,
        draw: DrawItem,
    ) -> PhysicsResult<Self> {
        let velocity = Vec3::new(0.0, 0.0, config.speed);
        let desc = RigidBodyDesc::dynamic(Pose::from_position(shot.position))
            .with_flags(ActorFlags::DISABLE_GRAVITY)
            .with_linear_velocity(velocity);
        let body = physics.create_rigid_body(&desc)?;

        let scale = config.scale();
        if let Err(e) = physics.attach_box_shape(body, scale * 0.5) {
            let _ = physics.release_body(body);
            return Err(e);
        }

        Ok(Self {
            core: ObjectCore::with_body(Self::KIND, body),
            draw,
            scale,
            velocity,
            lifetime: Lifetime::new(config.time_to_live),
        })
    }

    /// Time left before the projectile expires
    pub fn remaining(&self) -> f32 {
        self.lifetime.remaining()
    }
}

impl GameObject<GameEvent> for Projectile {
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

        // Contacts may have deflected it; keep it on its line
        if let Some(body) = ctx.body() {
            if let Err(e) = ctx.physics().set_linear_velocity(body, self.velocity) {
                log::warn!("Projectile failed to set its velocity: {}", e);
            }
        }
    }

    fn on_render(&self, surface: &mut dyn RenderSurface) {
        surface.draw(self.draw);
    }

    fn on_collision(&mut self, _ctx: &mut CollisionContext<'_, GameEvent>) {
        self.destroy();
    }

    fn local_scale(&self) -> Option<Vec3> {
        Some(self.scale)
    }
}

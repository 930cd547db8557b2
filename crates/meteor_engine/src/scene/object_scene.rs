//! The scene: object arena, physics scene and the fixed-step loop

use crate::config::ConfigError;
use crate::core::config::SceneConfig;
use crate::ecs::{CollisionContext, Contact, GameObject, ObjectContext};
use crate::events::EventQueue;
use crate::foundation::collections::{BodyHandle, ObjectHandle, OpaqueHandle, SlotMap};
use crate::foundation::math::{Mat4, Vec3};
use crate::foundation::time::FixedTimestep;
use crate::physics::{ContactPair, PhysicsError, PhysicsScene, PhysicsWorld};
use crate::render::{Camera, ObjectParams, RenderSurface};
use thiserror::Error;

/// Errors reported by [`Scene`]
#[derive(Error, Debug)]
pub enum SceneError {
    /// Another object already registered this body
    #[error("Physics body {0:?} is already registered with the scene")]
    DuplicateBody(BodyHandle),

    /// Handle does not name a live object
    #[error("Object {0:?} is not part of the scene")]
    UnknownObject(ObjectHandle),

    /// Physics call failed
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Scene configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// What one [`Scene::tick`] call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Physics steps run (one reap pass follows each)
    pub steps: u32,
    /// Objects dropped by the reap passes
    pub reaped: usize,
    /// Contact-begin pairs reported by physics
    pub contacts: usize,
}

/// Owner of every live object and of the physics scene they live in
///
/// Objects are added with [`Scene::add`] and marked for removal from their
/// hooks or with [`Scene::remove`]. Marked objects stay in the scene until
/// the reap pass that follows each physics step inside [`Scene::tick`].
pub struct Scene<E: 'static> {
    objects: SlotMap<ObjectHandle, Box<dyn GameObject<E>>>,

    /// Insertion order; drives update and render order
    order: Vec<ObjectHandle>,

    physics: Box<dyn PhysicsScene>,
    camera: Camera,
    current_object: ObjectParams,
    events: EventQueue<E>,
    timestep: FixedTimestep,
    config: SceneConfig,
}

impl<E: 'static> Scene<E> {
    /// Create a scene around an existing physics scene
    pub fn new(config: SceneConfig, physics: Box<dyn PhysicsScene>) -> Result<Self, SceneError> {
        config.validate()?;
        let timestep = FixedTimestep::new(
            config.fixed_delta_time,
            config.step_policy,
            config.max_steps_per_tick,
        );

        log::debug!(
            "Creating scene: fixed step {}s, policy {:?}, max {} steps per tick",
            config.fixed_delta_time,
            config.step_policy,
            config.max_steps_per_tick
        );

        Ok(Self {
            objects: SlotMap::with_key(),
            order: Vec::new(),
            physics,
            camera: Camera::default(),
            current_object: ObjectParams::default(),
            events: EventQueue::new(),
            timestep,
            config,
        })
    }

    /// Create a scene with a fresh [`PhysicsWorld`] using the configured gravity
    pub fn with_builtin_physics(config: SceneConfig) -> Result<Self, SceneError> {
        let physics = Box::new(PhysicsWorld::new(config.gravity));
        Self::new(config, physics)
    }

    /// Add an object; its body (if any) joins the physics scene in the same call
    pub fn add<T: GameObject<E>>(&mut self, object: T) -> Result<ObjectHandle, SceneError> {
        self.add_boxed(Box::new(object))
    }

    /// Add an already boxed object
    pub fn add_boxed(&mut self, object: Box<dyn GameObject<E>>) -> Result<ObjectHandle, SceneError> {
        let body = object.core().body();
        let kind = object.kind();

        if let Some(body) = body {
            if self.physics.contains_actor(body) {
                log::error!(
                    "Rejecting {} object: body {:?} is already registered with the scene",
                    kind,
                    body
                );
                return Err(SceneError::DuplicateBody(body));
            }
        }

        let handle = self.objects.insert(object);

        if let Some(body) = body {
            if let Err(e) = self.register_body(handle, body) {
                self.objects.remove(handle);
                let _ = self.physics.release_body(body);
                return Err(e.into());
            }
        }

        self.order.push(handle);
        log::trace!("Added {} object {:?}", kind, handle);
        Ok(handle)
    }

    fn register_body(&mut self, handle: ObjectHandle, body: BodyHandle) -> Result<(), PhysicsError> {
        self.physics.add_actor(body)?;
        if let Err(e) = self.physics.set_user_data(body, Some(handle.to_raw())) {
            let _ = self.physics.remove_actor(body);
            return Err(e);
        }
        Ok(())
    }

    /// Mark an object for removal at the next reap pass
    pub fn remove(&mut self, handle: ObjectHandle) -> Result<(), SceneError> {
        self.objects
            .get_mut(handle)
            .ok_or(SceneError::UnknownObject(handle))?
            .destroy();
        Ok(())
    }

    /// Update every live object in insertion order
    ///
    /// Iterates a snapshot of the order taken on entry. Marked objects are
    /// skipped.
    pub fn on_update(&mut self, delta_time: f32) {
        let snapshot = self.order.clone();
        for handle in snapshot {
            let Some(object) = self.objects.get_mut(handle) else {
                continue;
            };
            if object.is_marked_to_remove() {
                continue;
            }

            let body = object.core().body();
            let mut ctx = ObjectContext::new(self.physics.as_mut(), &mut self.events, handle, body);
            object.on_update(&mut ctx, delta_time);
        }
    }

    /// Render every object in insertion order
    ///
    /// The camera is bound once; the per-object parameters are rewritten
    /// before each object's render hook.
    pub fn on_render(&mut self, surface: &mut dyn RenderSurface) {
        surface.bind_camera(&self.camera.params());

        for handle in &self.order {
            let Some(object) = self.objects.get(*handle) else {
                continue;
            };
            self.current_object = ObjectParams::from_world(&object.transform(self.physics.as_ref()));
            surface.update_object_params(&self.current_object);
            object.on_render(surface);
        }
    }

    /// Advance physics by as many fixed steps as fit into `delta_time`
    ///
    /// Each step simulates, fetches contacts, dispatches collision hooks and
    /// then reaps marked objects.
    pub fn tick(&mut self, delta_time: f32) -> Result<TickStats, SceneError> {
        let mut stats = TickStats {
            steps: self.timestep.advance(delta_time),
            ..TickStats::default()
        };

        let step = self.timestep.step();
        for _ in 0..stats.steps {
            self.physics.simulate(step)?;
            let contacts = self.physics.fetch_results();
            stats.contacts += contacts.len();
            self.dispatch_contacts(&contacts);
            stats.reaped += self.reap();
        }

        Ok(stats)
    }

    /// Mark every object and reap once; returns the number dropped
    ///
    /// Events still queued by the dropped objects are discarded.
    pub fn clear(&mut self) -> usize {
        for object in self.objects.values_mut() {
            object.destroy();
        }
        let reaped = self.reap();

        if !self.events.is_empty() {
            log::debug!("Discarding {} undrained events", self.events.len());
            self.events.clear();
        }
        log::debug!("Scene cleared, {} objects dropped", reaped);
        reaped
    }

    fn object_for_body(&self, body: BodyHandle) -> Option<ObjectHandle> {
        let handle = ObjectHandle::from_raw(self.physics.user_data(body)?);
        let object = self.objects.get(handle)?;
        (object.core().body() == Some(body)).then_some(handle)
    }

    fn is_marked(&self, handle: ObjectHandle) -> bool {
        self.objects
            .get(handle)
            .map_or(true, |object| object.is_marked_to_remove())
    }

    fn dispatch_contacts(&mut self, contacts: &[ContactPair]) {
        for pair in contacts {
            let (Some(a), Some(b)) = (
                self.object_for_body(pair.body_a),
                self.object_for_body(pair.body_b),
            ) else {
                log::trace!("Ignoring contact with an unowned body: {:?}", pair);
                continue;
            };

            if self.is_marked(a) || self.is_marked(b) {
                continue;
            }

            self.deliver_collision(a, b);
            if !self.is_marked(b) {
                self.deliver_collision(b, a);
            }
        }
    }

    fn deliver_collision(&mut self, receiver: ObjectHandle, other: ObjectHandle) {
        let Some(other_kind) = self.objects.get(other).map(|object| object.kind()) else {
            return;
        };
        let Some(object) = self.objects.get_mut(receiver) else {
            return;
        };

        let body = object.core().body();
        let contact = Contact {
            handle: other,
            kind: other_kind,
        };
        let mut ctx = CollisionContext::new(
            ObjectContext::new(self.physics.as_mut(), &mut self.events, receiver, body),
            contact,
        );
        object.on_collision(&mut ctx);

        if ctx.other_destroy_requested() {
            if let Some(other_object) = self.objects.get_mut(other) {
                other_object.destroy();
            }
        }
    }

    /// Drop marked objects, detaching their actors first
    fn reap(&mut self) -> usize {
        let objects = &mut self.objects;
        let physics = self.physics.as_mut();
        let mut reaped = 0;

        self.order.retain(|&handle| {
            let marked = objects
                .get(handle)
                .map_or(true, |object| object.is_marked_to_remove());
            if !marked {
                return true;
            }

            if let Some(object) = objects.remove(handle) {
                if let Some(body) = object.core().body() {
                    detach_body(physics, body);
                }
                reaped += 1;
            }
            false
        });

        if reaped > 0 {
            log::trace!("Reaped {} objects, {} remain", reaped, self.order.len());
        }
        reaped
    }

    /// Number of objects in the scene, marked ones included until reaped
    pub fn objects_count(&self) -> usize {
        self.order.len()
    }

    /// Check if a handle names an object of this scene
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.objects.contains_key(handle)
    }

    /// Handles in update/render order
    pub fn handles(&self) -> &[ObjectHandle] {
        &self.order
    }

    /// Camera bound at the start of each render pass
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Object parameters written for the most recently rendered object
    pub fn current_object_params(&self) -> &ObjectParams {
        &self.current_object
    }

    /// Type-erased object access
    pub fn object(&self, handle: ObjectHandle) -> Option<&dyn GameObject<E>> {
        self.objects.get(handle).map(|object| &**object)
    }

    /// Downcast an object to its concrete type
    pub fn get<T: GameObject<E>>(&self, handle: ObjectHandle) -> Option<&T> {
        self.objects.get(handle)?.as_any().downcast_ref::<T>()
    }

    /// Downcast an object to its concrete type, mutably
    pub fn get_mut<T: GameObject<E>>(&mut self, handle: ObjectHandle) -> Option<&mut T> {
        self.objects.get_mut(handle)?.as_any_mut().downcast_mut::<T>()
    }

    /// World transform of an object
    pub fn transform(&self, handle: ObjectHandle) -> Option<Mat4> {
        let object = self.objects.get(handle)?;
        Some(object.transform(self.physics.as_ref()))
    }

    /// World position of an object
    pub fn position(&self, handle: ObjectHandle) -> Option<Vec3> {
        let object = self.objects.get(handle)?;
        Some(object.position(self.physics.as_ref()))
    }

    /// Physics scene, read-only
    pub fn physics(&self) -> &dyn PhysicsScene {
        self.physics.as_ref()
    }

    /// Physics scene, used by factories to create bodies before `add`
    pub fn physics_mut(&mut self) -> &mut dyn PhysicsScene {
        self.physics.as_mut()
    }

    /// Take the events objects emitted since the last call
    pub fn drain_events(&mut self) -> Vec<E> {
        self.events.drain()
    }

    /// Configuration the scene was built with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Frame time waiting for the next whole step
    pub fn pending_time(&self) -> f32 {
        self.timestep.pending()
    }
}

impl<E: 'static> Drop for Scene<E> {
    fn drop(&mut self) {
        let physics = self.physics.as_mut();
        for handle in &self.order {
            if let Some(body) = self.objects.get(*handle).and_then(|object| object.core().body()) {
                detach_body(physics, body);
            }
        }
        log::debug!("Scene released with {} objects", self.order.len());
    }
}

fn detach_body(physics: &mut dyn PhysicsScene, body: BodyHandle) {
    if physics.contains_actor(body) {
        if let Err(e) = physics.remove_actor(body) {
            log::warn!("Failed to detach body {:?}: {}", body, e);
        }
    }
    if let Err(e) = physics.release_body(body) {
        log::warn!("Failed to release body {:?}: {}", body, e);
    }
}

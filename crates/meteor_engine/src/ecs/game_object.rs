//! Scene object trait and the contexts passed to its hooks
//!
//! Objects are owned by a [`Scene`](crate::scene::Scene). They never touch
//! the scene's object list: the only structural change an object can make is
//! marking itself (or, from a collision, the other participant) for removal.
//! Everything else that must escape an object goes through the event outbox
//! of the context.

use super::components::Lifecycle;
use super::entity::ObjectKind;
use crate::events::EventQueue;
use crate::foundation::collections::{BodyHandle, ObjectHandle};
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::physics::PhysicsScene;
use crate::render::RenderSurface;
use std::any::Any;

/// State shared by every scene object
#[derive(Debug, Clone)]
pub struct ObjectCore {
    kind: ObjectKind,
    body: Option<BodyHandle>,
    lifecycle: Lifecycle,
}

impl ObjectCore {
    /// Core for an object with no physics body
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            body: None,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Core for an object driven by a physics body
    pub fn with_body(kind: ObjectKind, body: BodyHandle) -> Self {
        Self {
            kind,
            body: Some(body),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Type tag
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Owned physics body, if any
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Removal state
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Mark for removal; returns `true` on the first call only
    pub fn destroy(&mut self) -> bool {
        self.lifecycle.destroy()
    }

    /// Check the removal flag
    pub fn is_marked_to_remove(&self) -> bool {
        self.lifecycle.is_marked()
    }
}

/// Context handed to [`GameObject::on_update`]
pub struct ObjectContext<'a, E> {
    physics: &'a mut dyn PhysicsScene,
    events: &'a mut EventQueue<E>,
    handle: ObjectHandle,
    body: Option<BodyHandle>,
}

impl<'a, E> ObjectContext<'a, E> {
    /// Build a context for the object `handle`
    pub fn new(
        physics: &'a mut dyn PhysicsScene,
        events: &'a mut EventQueue<E>,
        handle: ObjectHandle,
        body: Option<BodyHandle>,
    ) -> Self {
        Self {
            physics,
            events,
            handle,
            body,
        }
    }

    /// Handle of the object being updated
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// The object's physics body, if any
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Physics scene the object lives in
    pub fn physics(&mut self) -> &mut dyn PhysicsScene {
        &mut *self.physics
    }

    /// Queue a scene-level event for the owner of the scene
    pub fn emit(&mut self, event: E) {
        self.events.send(event);
    }
}

/// The other participant of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Scene handle of the other object
    pub handle: ObjectHandle,
    /// Kind of the other object
    pub kind: ObjectKind,
}

/// Context handed to [`GameObject::on_collision`]
pub struct CollisionContext<'a, E> {
    inner: ObjectContext<'a, E>,
    other: Contact,
    destroy_other: bool,
}

impl<'a, E> CollisionContext<'a, E> {
    /// Build a context describing a contact with `other`
    pub fn new(inner: ObjectContext<'a, E>, other: Contact) -> Self {
        Self {
            inner,
            other,
            destroy_other: false,
        }
    }

    /// The object this one collided with
    pub fn other(&self) -> Contact {
        self.other
    }

    /// Mark the other participant for removal
    pub fn destroy_other(&mut self) {
        self.destroy_other = true;
    }

    /// Whether `destroy_other` was requested
    pub fn other_destroy_requested(&self) -> bool {
        self.destroy_other
    }

    /// Handle of the object receiving the callback
    pub fn handle(&self) -> ObjectHandle {
        self.inner.handle()
    }

    /// The object's physics body, if any
    pub fn body(&self) -> Option<BodyHandle> {
        self.inner.body()
    }

    /// Physics scene the object lives in
    pub fn physics(&mut self) -> &mut dyn PhysicsScene {
        self.inner.physics()
    }

    /// Queue a scene-level event for the owner of the scene
    pub fn emit(&mut self, event: E) {
        self.inner.emit(event);
    }
}

/// Polymorphic scene object
///
/// `E` is the event type objects emit towards the scene owner. Every hook
/// has a no-op default, so a variant only implements what it reacts to.
pub trait GameObject<E>: Any {
    /// Shared state
    fn core(&self) -> &ObjectCore;

    /// Shared state, mutable
    fn core_mut(&mut self) -> &mut ObjectCore;

    /// Downcast support
    fn as_any(&self) -> &dyn Any;

    /// Downcast support
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Advance object-local state by `delta_time` seconds
    fn on_update(&mut self, _ctx: &mut ObjectContext<'_, E>, _delta_time: f32) {}

    /// Issue draws; object parameters are already bound
    fn on_render(&self, _surface: &mut dyn RenderSurface) {}

    /// React to a contact that began this step
    fn on_collision(&mut self, _ctx: &mut CollisionContext<'_, E>) {}

    /// Scale prepended to the body pose when building the world transform
    fn local_scale(&self) -> Option<Vec3> {
        None
    }

    /// World transform: body pose (with local scale), else identity
    fn transform(&self, physics: &dyn PhysicsScene) -> Mat4 {
        let Some(pose) = self.core().body().and_then(|body| physics.pose(body).ok()) else {
            return Mat4::identity();
        };
        match self.local_scale() {
            Some(scale) => Transform::from_pose_scale(&pose, scale).to_matrix(),
            None => pose.to_matrix(),
        }
    }

    /// World position: body position, else origin
    fn position(&self, physics: &dyn PhysicsScene) -> Vec3 {
        self.core()
            .body()
            .and_then(|body| physics.pose(body).ok())
            .map_or_else(Vec3::zeros, |pose| pose.position)
    }

    /// Type tag
    fn kind(&self) -> ObjectKind {
        self.core().kind()
    }

    /// Mark for removal (idempotent)
    fn destroy(&mut self) {
        self.core_mut().destroy();
    }

    /// Check the removal flag
    fn is_marked_to_remove(&self) -> bool {
        self.core().is_marked_to_remove()
    }
}

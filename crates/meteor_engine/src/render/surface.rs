//! Render surface boundary
//!
//! The scene does not know about devices, pipelines or shaders. It writes
//! into a [`RenderSurface`]: bind the camera once, then per object update the
//! object parameters and let the object issue its draws.

use super::camera::CameraParams;
use crate::foundation::math::Mat4;
use bytemuck::{Pod, Zeroable};

/// Mesh identifier understood by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Material identifier understood by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// One draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawItem {
    /// Geometry to draw
    pub mesh: MeshId,
    /// Material to draw it with
    pub material: MaterialId,
}

impl DrawItem {
    /// Create a draw item
    pub fn new(mesh: MeshId, material: MaterialId) -> Self {
        Self { mesh, material }
    }
}

/// Per-object scratch uniform, rewritten before each object renders
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectParams {
    /// Object-to-world matrix (column major)
    pub world: [[f32; 4]; 4],
    /// World-to-object matrix (column major), identity when not invertible
    pub inverse_world: [[f32; 4]; 4],
}

impl Default for ObjectParams {
    fn default() -> Self {
        Self::from_world(&Mat4::identity())
    }
}

impl ObjectParams {
    /// Build params for an object-to-world matrix
    pub fn from_world(world: &Mat4) -> Self {
        let inverse = world.try_inverse().unwrap_or_else(Mat4::identity);
        Self {
            world: (*world).into(),
            inverse_world: inverse.into(),
        }
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Sink for the scene's render pass
pub trait RenderSurface {
    /// Bind per-pass camera data
    fn bind_camera(&mut self, camera: &CameraParams);

    /// Replace the per-object parameters used by subsequent draws
    fn update_object_params(&mut self, params: &ObjectParams);

    /// Issue a draw with the current camera and object parameters
    fn draw(&mut self, item: DrawItem);
}

/// A call made on a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// `bind_camera`
    BindCamera(CameraParams),
    /// `update_object_params`
    ObjectParams(ObjectParams),
    /// `draw`
    Draw(DrawItem),
}

/// Surface that records every call, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<RenderCommand>,
}

impl RecordingSurface {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls in order
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of recorded draws
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::Draw(_)))
            .count()
    }

    /// Forget recorded calls (start of a new frame)
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn bind_camera(&mut self, camera: &CameraParams) {
        self.commands.push(RenderCommand::BindCamera(*camera));
    }

    fn update_object_params(&mut self, params: &ObjectParams) {
        self.commands.push(RenderCommand::ObjectParams(*params));
    }

    fn draw(&mut self, item: DrawItem) {
        self.commands.push(RenderCommand::Draw(item));
    }
}

//! Rendering boundary: camera math and the surface the scene draws into

pub mod camera;
pub mod surface;

pub use camera::{Camera, CameraParams};
pub use surface::{
    DrawItem, MaterialId, MeshId, ObjectParams, RecordingSurface, RenderCommand, RenderSurface,
};

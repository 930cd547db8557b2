//! Render asset identifiers
//!
//! The surface resolves these ids to real meshes and materials; the game
//! only decides which id each object draws with.

use meteor_engine::render::{DrawItem, MaterialId, MeshId};

/// Ship hull mesh
pub const SHIP_MESH: MeshId = MeshId(1);
/// Projectile mesh
pub const PROJECTILE_MESH: MeshId = MeshId(2);
/// Obstacle mesh
pub const OBSTACLE_MESH: MeshId = MeshId(3);

/// Diffuse material tinted for the ship
pub const SHIP_MATERIAL: MaterialId = MaterialId(1);
/// Emissive material for projectiles
pub const PROJECTILE_MATERIAL: MaterialId = MaterialId(2);
/// Textured diffuse material for obstacles
pub const OBSTACLE_MATERIAL: MaterialId = MaterialId(3);

/// Draw items for every object variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderAssets {
    /// Ship
    pub ship: DrawItem,
    /// Projectile
    pub projectile: DrawItem,
    /// Obstacle
    pub obstacle: DrawItem,
}

impl Default for RenderAssets {
    fn default() -> Self {
        Self {
            ship: DrawItem::new(SHIP_MESH, SHIP_MATERIAL),
            projectile: DrawItem::new(PROJECTILE_MESH, PROJECTILE_MATERIAL),
            obstacle: DrawItem::new(OBSTACLE_MESH, OBSTACLE_MATERIAL),
        }
    }
}

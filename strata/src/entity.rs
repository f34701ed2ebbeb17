//! Entity and block-entity records that generation stages may append to.

use glam::DVec3;

/// A live entity placed during generation (e.g. a naturally-spawned mob).
#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: String,
    pub pos: DVec3,
}

/// A voxel carrying structured data (e.g. a chest with an inventory, a spawner).
#[derive(Debug, Clone)]
pub struct BlockEntity {
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Ordered, mutable sequence of entities produced so far for one chunk.
pub type EntityList = Vec<Entity>;

/// Ordered, mutable sequence of block entities produced so far for one chunk.
pub type BlockEntityList = Vec<BlockEntity>;

//! The five stage contracts the pipeline composes, in fixed invocation order:
//! Biome → Height → Composition → Structures* → Finishers*.
//!
//! Every stage is a pure function of `(seed, coordinates, stage-specific parameters)`.
//! None may read the wall clock, a thread id, or any global RNG state. Implementations
//! that cache internally must key the cache on coordinates and must return results
//! identical to an uncached implementation (see `TerrainHeightGen`).

use crate::biome::Biome;
use crate::chunk::{BiomeMap, BlockNibbles, BlockTypes, HeightMap};
use crate::entity::{BlockEntityList, EntityList};
use crate::error::StageError;

/// Assigns a biome tag to every column of a chunk.
///
/// Must be re-entrant: concurrent calls for different coordinates must not interfere,
/// since this stage is also reachable from [`crate::Generator::generate_biomes`] on
/// arbitrary caller threads while the worker is running.
pub trait BiomeGen: Send + Sync {
    fn gen_biomes(&self, cx: i32, cz: i32) -> Result<BiomeMap, StageError>;
}

/// Computes a surface height per column.
///
/// Receives the chunk's own [`BiomeGen`] so it may query neighboring chunks (typically
/// for height averaging) by calling `biomes.gen_biomes` at other coordinates.
pub trait TerrainHeightGen: Send + Sync {
    fn gen_height_map(
        &self,
        cx: i32,
        cz: i32,
        biomes: &dyn BiomeGen,
    ) -> Result<HeightMap, StageError>;
}

/// Fills in block types and metadata from a height map, initializing every cell
/// (including air) and optionally spawning naturally-occurring entities.
pub trait TerrainCompositionGen: Send + Sync {
    fn compose(
        &self,
        cx: i32,
        cz: i32,
        heights: &HeightMap,
        biomes: &dyn BiomeGen,
        height_gen: &dyn TerrainHeightGen,
    ) -> Result<(BlockTypes, BlockNibbles, EntityList, BlockEntityList), StageError>;
}

/// Mutates an already-composed chunk to add a larger structure (a cave system, a vein
/// of ore, a dungeon). Multiple structure generators run in the pipeline's configured
/// order; that order is part of the deterministic contract.
pub trait StructureGen: Send + Sync {
    fn gen_structures(
        &self,
        cx: i32,
        cz: i32,
        blocks: &mut BlockTypes,
        nibbles: &mut BlockNibbles,
        heights: &mut HeightMap,
        entities: &mut EntityList,
        block_entities: &mut BlockEntityList,
    ) -> Result<(), StageError>;
}

/// Like [`StructureGen`] but for small cosmetic additions (grass, flowers, single
/// trees). Receives an immutable view of the finished biome map.
pub trait FinishGen: Send + Sync {
    fn gen_finish(
        &self,
        cx: i32,
        cz: i32,
        blocks: &mut BlockTypes,
        nibbles: &mut BlockNibbles,
        heights: &mut HeightMap,
        biomes: &BiomeMap,
        entities: &mut EntityList,
        block_entities: &mut BlockEntityList,
    ) -> Result<(), StageError>;
}

/// Trivial helper so stage implementations can report a column's biome without
/// constructing a full `BiomeMap` first, used by built-in composition/height stages.
#[inline]
pub(crate) fn biome_at(map: &BiomeMap, x: usize, z: usize) -> Biome {
    map.get(x, z)
}

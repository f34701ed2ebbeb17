//! The pipeline assembler: turns a [`PipelineConfig`] into instantiated stages and
//! orchestrates them in the fixed Biome → Height → Composition → Structures* →
//! Finishers* order for one chunk.

use crate::biome::Biome;
use crate::chunk::{BiomeMap, BlockNibbles, BlockTypes, HeightMap, CHUNK_WIDTH};
use crate::config::{ConfigView, PipelineConfig};
use crate::coord::ChunkCoord;
use crate::entity::{BlockEntityList, EntityList};
use crate::error::{GeneratorError, StageError};
use crate::gen;
use crate::stage::{BiomeGen, FinishGen, StructureGen, TerrainCompositionGen, TerrainHeightGen};

/// The full output of generating one chunk.
pub struct GeneratedChunk {
    pub blocks: BlockTypes,
    pub nibbles: BlockNibbles,
    pub heights: HeightMap,
    pub biomes: BiomeMap,
    pub entities: EntityList,
    pub block_entities: BlockEntityList,
}

/// An assembled, seed-bound generation pipeline.
///
/// Stages are held flat as sibling `Box<dyn Trait>` fields, not nested
/// construction-time references — see the design note in `SPEC_FULL.md` §9 for why.
/// A stage that needs a sibling's output (e.g. `TerrainHeightGen` querying
/// `BiomeGen`) receives that sibling as a call argument from [`Pipeline::generate`],
/// not as a field of its own.
pub struct Pipeline {
    seed: i64,
    biome_gen: Box<dyn BiomeGen>,
    height_gen: Box<dyn TerrainHeightGen>,
    composition_gen: Box<dyn TerrainCompositionGen>,
    structures: Vec<Box<dyn StructureGen>>,
    finishers: Vec<Box<dyn FinishGen>>,
}

impl Pipeline {
    /// Assemble a pipeline from a configuration view. The seed widens from the
    /// public `i32`-at-the-boundary representation to an internal 64-bit seed (see
    /// `SPEC_FULL.md` §3) before being handed to stage constructors.
    pub fn build(view: &dyn ConfigView) -> Result<Self, GeneratorError> {
        let config = PipelineConfig::from_view(view)?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, GeneratorError> {
        let seed = config.seed;

        let biome_gen = gen::build_biome_gen(&config.biome_gen, seed)?;
        let height_gen = gen::build_height_gen(&config.height_gen, seed)?;
        let composition_gen = gen::build_composition_gen(&config.composition_gen, seed)?;

        let structures = config.structures.iter().enumerate()
            .map(|(i, selector)| gen::build_structure_gen(selector, seed, i as i64))
            .collect::<Result<Vec<_>, _>>()?;

        let finishers = config.finishers.iter()
            .map(|selector| gen::build_finish_gen(selector, seed))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { seed, biome_gen, height_gen, composition_gen, structures, finishers })
    }

    /// Assemble a pipeline directly from already-constructed stages, bypassing the
    /// selector registry. Used by tests that need to inject a stage that can't be
    /// named through a config selector (e.g. one that deterministically fails).
    #[cfg(test)]
    pub(crate) fn assemble(
        seed: i64,
        biome_gen: Box<dyn BiomeGen>,
        height_gen: Box<dyn TerrainHeightGen>,
        composition_gen: Box<dyn TerrainCompositionGen>,
        structures: Vec<Box<dyn StructureGen>>,
        finishers: Vec<Box<dyn FinishGen>>,
    ) -> Self {
        Self { seed, biome_gen, height_gen, composition_gen, structures, finishers }
    }

    #[inline]
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Run every stage, in fixed order, for one chunk.
    pub fn generate(&self, coord: ChunkCoord) -> Result<GeneratedChunk, StageError> {
        let ChunkCoord { x: cx, z: cz } = coord;

        let biomes = self.biome_gen.gen_biomes(cx, cz)?;
        let mut heights = self.height_gen.gen_height_map(cx, cz, self.biome_gen.as_ref())?;

        let (mut blocks, mut nibbles, mut entities, mut block_entities) = self.composition_gen.compose(
            cx, cz, &heights, self.biome_gen.as_ref(), self.height_gen.as_ref(),
        )?;

        for structure in &self.structures {
            structure.gen_structures(cx, cz, &mut blocks, &mut nibbles, &mut heights, &mut entities, &mut block_entities)?;
        }

        for finisher in &self.finishers {
            finisher.gen_finish(cx, cz, &mut blocks, &mut nibbles, &mut heights, &biomes, &mut entities, &mut block_entities)?;
        }

        Ok(GeneratedChunk { blocks, nibbles, heights, biomes, entities, block_entities })
    }

    /// Invoke the biome stage directly, bypassing height/composition/structures/
    /// finishers. Used by the direct-query API and by `biome_at`.
    pub fn generate_biomes(&self, coord: ChunkCoord) -> Result<BiomeMap, StageError> {
        self.biome_gen.gen_biomes(coord.x, coord.z)
    }

    /// Convert a world-block column to its chunk coordinate, invoke the biome stage,
    /// and return the specific column's biome.
    pub fn biome_at(&self, block_x: i32, block_z: i32) -> Result<Biome, StageError> {
        let coord = ChunkCoord::from_block(block_x, block_z);
        let map = self.generate_biomes(coord)?;
        let local_x = block_x.rem_euclid(CHUNK_WIDTH as i32) as usize;
        let local_z = block_z.rem_euclid(CHUNK_WIDTH as i32) as usize;
        Ok(map.get(local_x, local_z))
    }
}

//! Built-in [`FinishGen`] implementations.

use crate::biome::Biome;
use crate::block;
use crate::chunk::{BiomeMap, BlockNibbles, BlockTypes, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::entity::{BlockEntityList, EntityList};
use crate::error::StageError;
use crate::rand::ChunkRandom;
use crate::stage::FinishGen;

/// Small cosmetic additions: a handful of single-log trees in forested biomes, and
/// tall grass scattered across plains/shrubland, placed on top of the existing
/// surface. Selector: `decorate:<tree_tries>:<grass_tries>`.
pub struct DecorateFinishGen {
    seed: i64,
    tree_tries: u32,
    grass_tries: u32,
}

impl DecorateFinishGen {
    pub fn new(seed: i64, tree_tries: u32, grass_tries: u32) -> Self {
        Self { seed, tree_tries, grass_tries }
    }

    fn wants_trees(biome: Biome) -> bool {
        matches!(biome, Biome::Forest | Biome::SeasonalForest | Biome::RainForest | Biome::Taiga)
    }

    fn wants_grass(biome: Biome) -> bool {
        matches!(biome, Biome::Plains | Biome::ShrubLand | Biome::Savanna)
    }

    /// The air cell directly above the highest solid, non-water surface block in the
    /// column, i.e. where a decoration's base would sit.
    fn surface_air(blocks: &BlockTypes, x: usize, z: usize) -> Option<usize> {
        let mut top = None;
        for y in 1..CHUNK_HEIGHT {
            if blocks.get(x, z, y) == block::AIR
                && blocks.get(x, z, y - 1) != block::AIR
                && blocks.get(x, z, y - 1) != block::WATER_STILL
            {
                top = Some(y);
            }
        }
        top
    }
}

impl FinishGen for DecorateFinishGen {
    fn gen_finish(
        &self,
        cx: i32,
        cz: i32,
        blocks: &mut BlockTypes,
        nibbles: &mut BlockNibbles,
        _heights: &mut crate::chunk::HeightMap,
        biomes: &BiomeMap,
        _entities: &mut EntityList,
        _block_entities: &mut BlockEntityList,
    ) -> Result<(), StageError> {
        let mut rand = ChunkRandom::for_chunk(self.seed, cx, cz, 2);

        for _ in 0..self.tree_tries {
            let x = rand.next_int_bounded(CHUNK_WIDTH as i32) as usize;
            let z = rand.next_int_bounded(CHUNK_WIDTH as i32) as usize;
            if !Self::wants_trees(biomes.get(x, z)) {
                continue;
            }
            if !rand.chance(4) {
                continue;
            }
            if let Some(base) = Self::surface_air(blocks, x, z) {
                let trunk_height = 3 + rand.next_int_bounded(3) as usize;
                if base + trunk_height + 1 >= CHUNK_HEIGHT {
                    continue;
                }
                for dy in 0..trunk_height {
                    blocks.set(x, z, base + dy, block::LOG);
                    nibbles.set(x, z, base + dy, 0);
                }
                let top = base + trunk_height;
                if top < CHUNK_HEIGHT {
                    blocks.set(x, z, top, block::LEAVES);
                }
            }
        }

        for _ in 0..self.grass_tries {
            let x = rand.next_int_bounded(CHUNK_WIDTH as i32) as usize;
            let z = rand.next_int_bounded(CHUNK_WIDTH as i32) as usize;
            if !Self::wants_grass(biomes.get(x, z)) {
                continue;
            }
            if let Some(base) = Self::surface_air(blocks, x, z) {
                if blocks.get(x, z, base) == block::AIR {
                    blocks.set(x, z, base, block::TALL_GRASS);
                    nibbles.set(x, z, base, 0);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::chunk::HeightMap;

    #[test]
    fn never_writes_below_existing_surface() {
        let mut blocks = BlockTypes::filled(block::AIR);
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                for y in 0..64 {
                    blocks.set(x, z, y, block::STONE);
                }
                blocks.set(x, z, 64, block::GRASS);
            }
        }
        let mut nibbles = BlockNibbles::filled(0);
        let mut heights = HeightMap::filled(64);
        let biomes = BiomeMap::filled(Biome::Forest);

        let gen = DecorateFinishGen::new(1, 8, 8);
        gen.gen_finish(0, 0, &mut blocks, &mut nibbles, &mut heights, &biomes, &mut Vec::new(), &mut Vec::new()).unwrap();

        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                for y in 0..64 {
                    assert_eq!(blocks.get(x, z, y), block::STONE);
                }
            }
        }
    }
}

//! Built-in [`TerrainCompositionGen`] implementations.

use crate::block;
use crate::chunk::{BlockNibbles, BlockTypes, HeightMap, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::error::StageError;
use crate::stage::{BiomeGen, TerrainCompositionGen, TerrainHeightGen};

const SEA_LEVEL: i16 = 64;

/// Minimal composition: solid stone up to the column's height, a single grass cap at
/// the surface, water filling up to sea level if the surface sits below it, air above.
/// No dirt transition layer. Selector: `classic`.
pub struct ClassicCompositionGen;

impl TerrainCompositionGen for ClassicCompositionGen {
    fn compose(
        &self,
        _cx: i32,
        _cz: i32,
        heights: &HeightMap,
        _biomes: &dyn BiomeGen,
        _height_gen: &dyn TerrainHeightGen,
    ) -> Result<(BlockTypes, BlockNibbles, crate::entity::EntityList, crate::entity::BlockEntityList), StageError> {
        let mut blocks = BlockTypes::filled(block::AIR);
        let nibbles = BlockNibbles::filled(0);

        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                let surface = heights.get(x, z).clamp(0, CHUNK_HEIGHT as i16 - 1) as usize;

                for y in 0..surface {
                    blocks.set(x, z, y, block::STONE);
                }
                blocks.set(x, z, surface, block::GRASS);

                if (surface as i16) < SEA_LEVEL {
                    for y in (surface + 1)..=(SEA_LEVEL as usize) {
                        blocks.set(x, z, y, block::WATER_STILL);
                    }
                }
            }
        }

        Ok((blocks, nibbles, Vec::new(), Vec::new()))
    }
}

/// A richer composition with a bedrock floor and a dirt transition layer under the
/// grass (or sand, for desert-like biomes), matching a production flat-world
/// generator's column layout more closely than [`ClassicCompositionGen`].
/// Selector: `layered`.
pub struct LayeredCompositionGen {
    dirt_depth: usize,
}

impl LayeredCompositionGen {
    pub fn new() -> Self {
        Self { dirt_depth: 3 }
    }
}

impl Default for LayeredCompositionGen {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainCompositionGen for LayeredCompositionGen {
    fn compose(
        &self,
        cx: i32,
        cz: i32,
        heights: &HeightMap,
        biomes: &dyn BiomeGen,
        _height_gen: &dyn TerrainHeightGen,
    ) -> Result<(BlockTypes, BlockNibbles, crate::entity::EntityList, crate::entity::BlockEntityList), StageError> {
        let biome_map = biomes.gen_biomes(cx, cz)?;

        let mut blocks = BlockTypes::filled(block::AIR);
        let nibbles = BlockNibbles::filled(0);

        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                let surface = heights.get(x, z).clamp(1, CHUNK_HEIGHT as i16 - 1) as usize;
                let biome = biome_map.get(x, z);

                let (surface_block, fill_block) = match biome {
                    crate::biome::Biome::Desert => (block::SAND, block::SANDSTONE),
                    crate::biome::Biome::Tundra | crate::biome::Biome::IceDesert => (block::SNOW, block::DIRT),
                    crate::biome::Biome::Ocean => (block::GRASS, block::DIRT),
                    _ => (block::GRASS, block::DIRT),
                };

                blocks.set(x, z, 0, block::BEDROCK);
                let dirt_start = surface.saturating_sub(self.dirt_depth);
                for y in 1..dirt_start.max(1) {
                    blocks.set(x, z, y, block::STONE);
                }
                for y in dirt_start.max(1)..surface {
                    blocks.set(x, z, y, fill_block);
                }
                blocks.set(x, z, surface, surface_block);

                if (surface as i16) < SEA_LEVEL {
                    for y in (surface + 1)..=(SEA_LEVEL as usize) {
                        blocks.set(x, z, y, block::WATER_STILL);
                    }
                }
            }
        }

        Ok((blocks, nibbles, Vec::new(), Vec::new()))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::biome::Biome;
    use crate::gen::biome::ConstantBiomeGen;
    use crate::gen::height::FlatHeightGen;
    use crate::stage::TerrainHeightGen;

    #[test]
    fn classic_s1_scenario() {
        let biomes = ConstantBiomeGen::new(Biome::Plains);
        let height_gen = FlatHeightGen::new(64);
        let heights = height_gen.gen_height_map(0, 0, &biomes).unwrap();

        let comp = ClassicCompositionGen;
        let (blocks, _nibbles, _e, _be) = comp.compose(0, 0, &heights, &biomes, &height_gen).unwrap();

        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                for y in 0..64 {
                    assert_eq!(blocks.get(x, z, y), block::STONE);
                }
                assert_eq!(blocks.get(x, z, 64), block::GRASS);
                for y in 65..CHUNK_HEIGHT {
                    assert_eq!(blocks.get(x, z, y), block::AIR);
                }
            }
        }
    }

    #[test]
    fn layered_fully_initializes_every_cell() {
        let biomes = ConstantBiomeGen::new(Biome::Forest);
        let height_gen = FlatHeightGen::new(70);
        let heights = height_gen.gen_height_map(1, 1, &biomes).unwrap();

        let comp = LayeredCompositionGen::new();
        let (blocks, nibbles, _e, _be) = comp.compose(1, 1, &heights, &biomes, &height_gen).unwrap();

        // No cell should be left at a sentinel; bedrock floor and a defined top are
        // present for every column.
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                assert_eq!(blocks.get(x, z, 0), block::BEDROCK);
                assert_eq!(nibbles.get(x, z, 0), 0);
            }
        }
    }
}

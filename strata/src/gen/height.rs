//! Built-in [`TerrainHeightGen`] implementations.

use crate::biome::Biome;
use crate::chunk::{HeightMap, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::coord::ChunkCoord;
use crate::error::StageError;
use crate::rand::ChunkRandom;
use crate::stage::{BiomeGen, TerrainHeightGen};

/// Every column gets the same fixed height. Selector: `flat:<height>`.
pub struct FlatHeightGen {
    height: i16,
}

impl FlatHeightGen {
    pub fn new(height: i16) -> Self {
        Self { height }
    }
}

impl TerrainHeightGen for FlatHeightGen {
    fn gen_height_map(&self, _cx: i32, _cz: i32, _biomes: &dyn BiomeGen) -> Result<HeightMap, StageError> {
        Ok(HeightMap::filled(self.height))
    }
}

/// A biome-aware height generator: each biome has a base height and an amplitude, and
/// small per-column jitter is added on top. Exercises the cross-stage query contract by
/// asking the passed-in [`BiomeGen`] for this chunk's biomes and for the east/south
/// neighboring chunks' biomes, blending their edge-column bases into this chunk's own
/// east/south edge columns so two adjacent chunks don't show an abrupt height seam.
/// Selector: `climate`.
pub struct ClimateHeightGen {
    seed: i64,
}

impl ClimateHeightGen {
    pub fn new(seed: i64) -> Self {
        Self { seed }
    }

    fn base_and_amplitude(biome: Biome) -> (i16, i16) {
        match biome {
            Biome::Ocean => (48, 4),
            Biome::Desert | Biome::Savanna => (63, 3),
            Biome::Plains | Biome::ShrubLand => (64, 4),
            Biome::Swampland => (61, 2),
            Biome::Forest | Biome::SeasonalForest | Biome::RainForest => (66, 6),
            Biome::Taiga | Biome::Tundra | Biome::IceDesert => (68, 8),
            Biome::Void => (64, 0),
        }
    }
}

impl TerrainHeightGen for ClimateHeightGen {
    fn gen_height_map(&self, cx: i32, cz: i32, biomes: &dyn BiomeGen) -> Result<HeightMap, StageError> {
        let here = ChunkCoord::new(cx, cz);
        let east_of = here.offset(1, 0);
        let south_of = here.offset(0, 1);

        let here_biomes = biomes.gen_biomes(here.x, here.z)?;
        let east = biomes.gen_biomes(east_of.x, east_of.z)?;
        let south = biomes.gen_biomes(south_of.x, south_of.z)?;

        let last = CHUNK_WIDTH - 1;
        let mut map = HeightMap::filled(0);
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                let biome = here_biomes.get(x, z);
                let (mut base, amplitude) = Self::base_and_amplitude(biome);

                // Blend the edge columns with the neighboring chunk's matching edge so
                // two adjacent chunks don't meet at an abrupt height seam.
                let mut samples = 1i32;
                let mut total = base as i32;
                if x == last {
                    let (neighbor_base, _) = Self::base_and_amplitude(east.get(0, z));
                    total += neighbor_base as i32;
                    samples += 1;
                }
                if z == last {
                    let (neighbor_base, _) = Self::base_and_amplitude(south.get(x, 0));
                    total += neighbor_base as i32;
                    samples += 1;
                }
                base = (total / samples) as i16;

                let block_x = cx * CHUNK_WIDTH as i32 + x as i32;
                let block_z = cz * CHUNK_WIDTH as i32 + z as i32;
                let mut rand = ChunkRandom::for_chunk(self.seed, block_x, block_z, 17);
                let jitter = rand.next_int_bounded((amplitude.max(1) as i32) * 2 + 1) - amplitude.max(1) as i32;

                let height = (base as i32 + jitter).clamp(1, CHUNK_HEIGHT as i32 - 1) as i16;
                map.set(x, z, height);
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::gen::biome::ConstantBiomeGen;

    #[test]
    fn flat_is_uniform() {
        let gen = FlatHeightGen::new(64);
        let biomes = ConstantBiomeGen::new(Biome::Plains);
        let map = gen.gen_height_map(0, 0, &biomes).unwrap();
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                assert_eq!(map.get(x, z), 64);
            }
        }
    }

    /// A biome generator returning Plains for chunk (0, z) and Ocean for every chunk
    /// east of it, so the east-edge blend in `ClimateHeightGen` has something to do.
    struct SplitBiomeGen;

    impl BiomeGen for SplitBiomeGen {
        fn gen_biomes(&self, cx: i32, _cz: i32) -> Result<crate::chunk::BiomeMap, StageError> {
            Ok(crate::chunk::BiomeMap::filled(if cx == 0 { Biome::Plains } else { Biome::Ocean }))
        }
    }

    #[test]
    fn east_edge_blends_toward_neighbor_base() {
        let gen = ClimateHeightGen::new(11);
        let biomes = SplitBiomeGen;
        let map = gen.gen_height_map(0, 0, &biomes).unwrap();

        // Plains alone: base 64, amplitude 4, so an interior column is in [60, 68].
        // Blended with Ocean's base 48 at the east edge, amplitude unchanged: [52, 60].
        // The ranges only touch at 60, so the edge column can never exceed the
        // interior column — with blending removed they'd share one range and this
        // would fail with overwhelming probability.
        let interior = map.get(0, 0);
        let edge = map.get(CHUNK_WIDTH - 1, 0);
        assert!((60..=68).contains(&interior));
        assert!((52..=60).contains(&edge));
        assert!(edge <= interior);
    }

    #[test]
    fn climate_is_deterministic() {
        let gen = ClimateHeightGen::new(11);
        let biomes = ConstantBiomeGen::new(Biome::Forest);
        let a = gen.gen_height_map(2, 2, &biomes).unwrap();
        let b = gen.gen_height_map(2, 2, &biomes).unwrap();
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                assert_eq!(a.get(x, z), b.get(x, z));
            }
        }
    }
}

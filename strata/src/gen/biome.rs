//! Built-in [`BiomeGen`] implementations.

use crate::biome::Biome;
use crate::chunk::{BiomeMap, CHUNK_WIDTH};
use crate::error::StageError;
use crate::rand::ChunkRandom;
use crate::stage::BiomeGen;

/// Every column of every chunk gets the same, fixed biome. Selector: `constant:<name>`.
pub struct ConstantBiomeGen {
    biome: Biome,
}

impl ConstantBiomeGen {
    pub fn new(biome: Biome) -> Self {
        Self { biome }
    }
}

impl BiomeGen for ConstantBiomeGen {
    fn gen_biomes(&self, _cx: i32, _cz: i32) -> Result<BiomeMap, StageError> {
        Ok(BiomeMap::filled(self.biome))
    }
}

/// A value-noise based biome generator that buckets a deterministic per-column
/// temperature/humidity pair into a biome, in the spirit of the classic temperature x
/// humidity lookup table, but using an integer hash instead of Perlin octaves to stay
/// within budget. Selector: `climate`.
pub struct ClimateBiomeGen {
    seed: i64,
}

impl ClimateBiomeGen {
    pub fn new(seed: i64) -> Self {
        Self { seed }
    }

    /// Cheap deterministic hash-based value noise in `[0.0, 1.0)`, smoothed by
    /// averaging the four lattice corners surrounding `(x, z)` at the given `scale`.
    fn sample(&self, salt: i64, x: i32, z: i32, scale: i32) -> f64 {
        let lx = x.div_euclid(scale);
        let lz = z.div_euclid(scale);
        let fx = (x.rem_euclid(scale)) as f64 / scale as f64;
        let fz = (z.rem_euclid(scale)) as f64 / scale as f64;

        let corner = |cx: i32, cz: i32| -> f64 {
            let mut r = ChunkRandom::for_chunk(self.seed, cx, cz, salt);
            r.next_double()
        };

        let c00 = corner(lx, lz);
        let c10 = corner(lx + 1, lz);
        let c01 = corner(lx, lz + 1);
        let c11 = corner(lx + 1, lz + 1);

        let top = c00 * (1.0 - fx) + c10 * fx;
        let bottom = c01 * (1.0 - fx) + c11 * fx;
        top * (1.0 - fz) + bottom * fz
    }

    fn biome_for(&self, block_x: i32, block_z: i32) -> Biome {
        const SCALE: i32 = 64;
        let temperature = self.sample(9871, block_x, block_z, SCALE);
        let humidity = self.sample(39811, block_x, block_z, SCALE) * temperature;

        if temperature < 0.1 {
            Biome::Tundra
        } else if humidity < 0.2 {
            if temperature < 0.5 { Biome::Tundra } else if temperature < 0.95 { Biome::Savanna } else { Biome::Desert }
        } else if humidity > 0.5 && temperature < 0.7 {
            Biome::Swampland
        } else if temperature < 0.5 {
            Biome::Taiga
        } else if temperature < 0.97 {
            if humidity < 0.35 { Biome::ShrubLand } else { Biome::Forest }
        } else if humidity < 0.45 {
            Biome::Plains
        } else if humidity < 0.9 {
            Biome::SeasonalForest
        } else {
            Biome::RainForest
        }
    }
}

impl BiomeGen for ClimateBiomeGen {
    fn gen_biomes(&self, cx: i32, cz: i32) -> Result<BiomeMap, StageError> {
        let mut map = BiomeMap::filled(Biome::Void);
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                let block_x = cx * CHUNK_WIDTH as i32 + x as i32;
                let block_z = cz * CHUNK_WIDTH as i32 + z as i32;
                map.set(x, z, self.biome_for(block_x, block_z));
            }
        }
        Ok(map)
    }
}

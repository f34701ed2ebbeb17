//! Built-in [`StructureGen`] implementations.

use glam::DVec3;

use crate::chunk::{BlockNibbles, BlockTypes, HeightMap, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::entity::{BlockEntityList, EntityList};
use crate::error::StageError;
use crate::rand::ChunkRandom;
use crate::stage::StructureGen;

/// Places small ellipsoidal ore veins (or clay patches) inside existing stone,
/// replacing `replace_id` cells with `place_id`. The placement algorithm interpolates
/// along a random line through the chunk column and carves a shrinking-then-growing
/// ellipsoid around each point on the line, the same shape a classic ore-vein
/// generator uses. Selector: `vein:<place_id>:<count>:<tries>:<min_y>:<max_y>`.
pub struct VeinStructureGen {
    seed: i64,
    salt: i64,
    replace_id: u8,
    place_id: u8,
    /// Number of blocks that make up one vein.
    count: u8,
    /// Number of vein attempts per chunk.
    tries: u32,
    min_y: i32,
    max_y: i32,
}

impl VeinStructureGen {
    pub fn new(seed: i64, salt: i64, replace_id: u8, place_id: u8, count: u8, tries: u32, min_y: i32, max_y: i32) -> Self {
        Self { seed, salt, replace_id, place_id, count, tries, min_y, max_y }
    }

    fn place_one(&self, rand: &mut ChunkRandom, origin: DVec3, blocks: &mut BlockTypes, nibbles: &mut BlockNibbles) {
        let angle = rand.next_float() * std::f32::consts::PI;
        let (angle_sin, angle_cos) = angle.sin_cos();
        let reach = self.count as f32 / 8.0;
        let dx = angle_sin * reach;
        let dz = angle_cos * reach;

        let line_start = DVec3::new(
            (origin.x as f32 + 8.0 + dx) as f64,
            origin.y + rand.next_int_bounded(3) as f64 + 2.0,
            (origin.z as f32 + 8.0 + dz) as f64,
        );
        let line_stop = DVec3::new(
            (origin.x as f32 + 8.0 - dx) as f64,
            origin.y + rand.next_int_bounded(3) as f64 + 2.0,
            (origin.z as f32 + 8.0 - dz) as f64,
        );

        for i in 0..=self.count {
            let t = i as f64 / self.count.max(1) as f64;
            let center = line_start + (line_stop - line_start) * t;

            let base_size = rand.next_double() * self.count as f64 / 16.0;
            let angular = (i as f32 * std::f32::consts::PI / self.count.max(1) as f32).sin();
            let size = (angular as f64 + 1.0) * base_size + 1.0;
            let half_size = size / 2.0;

            let start = (center - half_size).floor();
            let stop = (center + half_size).floor();

            for bx in start.x as i32..=stop.x as i32 {
                for bz in start.z as i32..=stop.z as i32 {
                    if bx < 0 || bx >= CHUNK_WIDTH as i32 || bz < 0 || bz >= CHUNK_WIDTH as i32 {
                        continue;
                    }
                    for by in start.y as i32..=stop.y as i32 {
                        if by < self.min_y || by >= self.max_y || by < 0 || by >= CHUNK_HEIGHT as i32 {
                            continue;
                        }
                        let place = DVec3::new(bx as f64, by as f64, bz as f64);
                        let delta = (place + 0.5 - center) / half_size;
                        if delta.length_squared() < 1.0 {
                            let (x, z, y) = (bx as usize, bz as usize, by as usize);
                            if blocks.get(x, z, y) == self.replace_id {
                                blocks.set(x, z, y, self.place_id);
                                nibbles.set(x, z, y, 0);
                            }
                        }
                    }
                }
            }
        }
    }
}

impl StructureGen for VeinStructureGen {
    fn gen_structures(
        &self,
        cx: i32,
        cz: i32,
        blocks: &mut BlockTypes,
        nibbles: &mut BlockNibbles,
        _heights: &mut HeightMap,
        _entities: &mut EntityList,
        _block_entities: &mut BlockEntityList,
    ) -> Result<(), StageError> {
        let mut rand = ChunkRandom::for_chunk(self.seed, cx, cz, self.salt);
        for _ in 0..self.tries {
            let x = rand.next_int_bounded(CHUNK_WIDTH as i32) as f64;
            let z = rand.next_int_bounded(CHUNK_WIDTH as i32) as f64;
            let y = rand.next_int_bounded((self.max_y - self.min_y).max(1)) as f64 + self.min_y as f64;
            self.place_one(&mut rand, DVec3::new(x - 8.0, y, z - 8.0), blocks, nibbles);
        }
        Ok(())
    }
}

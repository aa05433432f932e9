use karst_blocks::Block;

use crate::noise::NoiseField;
use crate::params::TerrainParams;

/// Chunks are cubic.
pub const CHUNK_SIZE: usize = 32;
pub const CHUNK_AREA: usize = CHUNK_SIZE * CHUNK_SIZE;
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_SIZE;

// Greedy meshing counts worst-case vertices in i32 with x100 headroom.
const _: () = assert!(CHUNK_VOLUME * 6 < (i32::MAX / 100) as usize);

/// Immutable description of one procedural world: the seed, the tuned
/// terrain parameters, and the noise field derived from them. Shared by
/// reference between the store, the generator, and the workers.
pub struct World {
    seed: u32,
    params: TerrainParams,
    noise: NoiseField,
}

/// Height and surface-material samples for one world column.
#[derive(Clone, Copy, Debug)]
pub struct ColumnSample {
    pub height: f32,
    pub material: f32,
}

impl World {
    pub fn new(seed: u32, params: TerrainParams) -> Self {
        let noise = NoiseField::new(seed, &params);
        Self {
            seed,
            params,
            noise,
        }
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    #[inline]
    pub fn sample_column(&self, wx: i32, wz: i32) -> ColumnSample {
        ColumnSample {
            height: self.noise.height_at(wx, wz),
            material: self.noise.material_at(wx, wz),
        }
    }

    /// Classify the voxel at world height `wy` within a sampled column. The
    /// material channel's sign picks the surface block only; the bands below
    /// are always dirt over stone.
    #[inline]
    pub fn classify(&self, wy: i32, column: &ColumnSample) -> Block {
        if (wy as f32) > column.height {
            return Block::Air;
        }
        let dist_from_surface = (column.height - wy as f32) as i32;
        if dist_from_surface == 0 {
            if column.material < 0.0 {
                Block::Sand
            } else {
                Block::Grass
            }
        } else if dist_from_surface <= self.params.surface_depth {
            Block::Dirt
        } else {
            Block::Stone
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_bands_from_surface_down() {
        let world = World::new(0, TerrainParams::default());
        let column = ColumnSample {
            height: 20.6,
            material: 0.25,
        };
        assert_eq!(world.classify(25, &column), Block::Air);
        assert_eq!(world.classify(21, &column), Block::Air);
        // 20.6 - 20 truncates to 0: still the surface cell.
        assert_eq!(world.classify(20, &column), Block::Grass);
        for wy in 15..20 {
            assert_eq!(world.classify(wy, &column), Block::Dirt, "wy={wy}");
        }
        assert_eq!(world.classify(14, &column), Block::Stone);
        assert_eq!(world.classify(-100, &column), Block::Stone);
    }

    #[test]
    fn negative_material_channel_selects_sand_at_surface_only() {
        let world = World::new(0, TerrainParams::default());
        let column = ColumnSample {
            height: 10.0,
            material: -0.5,
        };
        assert_eq!(world.classify(10, &column), Block::Sand);
        assert_eq!(world.classify(9, &column), Block::Dirt);
    }
}

//! Dense chunk buffer, chunk lifecycle states, and terrain generation.
#![forbid(unsafe_code)]

use karst_blocks::Block;
use karst_world::{CHUNK_AREA, CHUNK_SIZE, CHUNK_VOLUME, ChunkCoord, ColumnSample, World};

/// Lifecycle of a streamed chunk. Generation advances Empty to NeedsMesh,
/// meshing advances NeedsMesh to NeedsSend, the external upload step
/// advances NeedsSend to Done. Block edits rewind any state to NeedsMesh.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ChunkState {
    Empty,
    NeedsMesh,
    NeedsSend,
    Done,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }
}

/// Fixed-size dense block grid for one chunk. The buffer is always fully
/// populated to CHUNK_VOLUME entries; partially generated grids are never
/// observable outside `generate_chunk_buffer`.
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub blocks: Vec<Block>,
}

impl ChunkBuf {
    /// Linear index: z-major, then x, then y. Mesh output ordering depends
    /// on this exact layout.
    #[inline]
    pub const fn idx(x: usize, y: usize, z: usize) -> usize {
        z + x * CHUNK_SIZE + y * CHUNK_AREA
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[Self::idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, b: Block) {
        self.blocks[Self::idx(x, y, z)] = b;
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let (bx, by, bz) = self.coord.world_base();
        let s = CHUNK_SIZE as i32;
        wx >= bx && wx < bx + s && wy >= by && wy < by + s && wz >= bz && wz < bz + s
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (bx, by, bz) = self.coord.world_base();
        Some(self.get_local(
            (wx - bx) as usize,
            (wy - by) as usize,
            (wz - bz) as usize,
        ))
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| *b != Block::AIR)
    }

    #[inline]
    pub fn occupancy(&self) -> ChunkOccupancy {
        if self.has_non_air() {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChunkGenerateResult {
    pub buf: ChunkBuf,
    pub occupancy: ChunkOccupancy,
}

/// Generate a chunk's block grid. Pure function of (coord, world seed and
/// params): the same inputs always produce byte-identical buffers. Returns
/// None only when the block array cannot be allocated; the caller keeps the
/// chunk retryable in that case.
pub fn generate_chunk_buffer(world: &World, coord: ChunkCoord) -> Option<ChunkGenerateResult> {
    let mut blocks: Vec<Block> = Vec::new();
    if blocks.try_reserve_exact(CHUNK_VOLUME).is_err() {
        return None;
    }
    // Clear the whole grid up front so skipped all-air columns read as air.
    blocks.resize(CHUNK_VOLUME, Block::AIR);
    let mut buf = ChunkBuf { coord, blocks };

    let (base_x, base_y, base_z) = coord.world_base();

    let mut heights = [0.0f32; CHUNK_AREA];
    let mut materials = [0.0f32; CHUNK_AREA];
    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let column = world.sample_column(base_x + x as i32, base_z + z as i32);
            heights[x * CHUNK_SIZE + z] = column.height;
            materials[x * CHUNK_SIZE + z] = column.material;
        }
    }

    let mut has_blocks = false;
    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let column = ColumnSample {
                height: heights[x * CHUNK_SIZE + z],
                material: materials[x * CHUNK_SIZE + z],
            };
            // Chunks entirely above this column keep their cleared air.
            if base_y as f32 > column.height {
                continue;
            }
            for y in 0..CHUNK_SIZE {
                let block = world.classify(base_y + y as i32, &column);
                if block != Block::AIR {
                    has_blocks = true;
                }
                buf.set_local(x, y, z, block);
            }
        }
    }

    Some(ChunkGenerateResult {
        occupancy: if has_blocks {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        },
        buf,
    })
}

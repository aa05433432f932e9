use karst_blocks::Block;
use karst_chunk::{ChunkBuf, ChunkOccupancy, ChunkState, generate_chunk_buffer};
use karst_mesh::{ChunkMesh, MeshingMode, build_chunk};
use karst_world::{CHUNK_SIZE, ChunkCoord, World};

/// One streamed chunk: block grid, surface mesh, and lifecycle state.
/// Chunks always live behind `Arc<Mutex<Chunk>>` owned by the chunk map;
/// that mutex guards the grid, the mesh buffer, and the state tag together.
pub struct Chunk {
    coord: ChunkCoord,
    buf: Option<ChunkBuf>,
    mesh: Option<ChunkMesh>,
    state: ChunkState,
    occupancy: ChunkOccupancy,
}

impl Chunk {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            buf: None,
            mesh: None,
            state: ChunkState::Empty,
            occupancy: ChunkOccupancy::Empty,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    #[inline]
    pub fn occupancy(&self) -> ChunkOccupancy {
        self.occupancy
    }

    /// Fill the block grid from the world's terrain. Fires only from Empty;
    /// every other state is a no-op, which makes redundant queue entries
    /// harmless. Allocation failure leaves the chunk Empty and retryable.
    pub fn generate(&mut self, world: &World) -> bool {
        if self.state != ChunkState::Empty {
            return false;
        }
        let Some(generated) = generate_chunk_buffer(world, self.coord) else {
            log::warn!(
                "chunk ({},{},{}): block grid allocation failed, generation deferred",
                self.coord.cx,
                self.coord.cy,
                self.coord.cz
            );
            return false;
        };
        self.buf = Some(generated.buf);
        self.occupancy = generated.occupancy;
        self.state = ChunkState::NeedsMesh;
        true
    }

    /// Extract the surface mesh. Fires only from NeedsMesh. All-air chunks
    /// skip the mesher and advance with no buffer to upload.
    pub fn build_mesh(&mut self, mode: MeshingMode) -> bool {
        if self.state != ChunkState::NeedsMesh {
            return false;
        }
        let Some(buf) = self.buf.as_ref() else {
            return false;
        };
        if self.occupancy.is_empty() {
            self.mesh = None;
            self.state = ChunkState::NeedsSend;
            return true;
        }
        let Some(mesh) = build_chunk(buf, mode) else {
            return false;
        };
        self.mesh = Some(mesh);
        self.state = ChunkState::NeedsSend;
        true
    }

    /// The external upload step: hand out the CPU-side mesh and advance
    /// NeedsSend to Done. Any other state returns None with no transition;
    /// an all-air chunk transitions but has nothing to hand out.
    pub fn take_mesh_for_upload(&mut self) -> Option<ChunkMesh> {
        if self.state != ChunkState::NeedsSend {
            return None;
        }
        self.state = ChunkState::Done;
        self.mesh.take()
    }

    /// Read a block by local coordinates. None until the grid exists.
    pub fn get_block_local(&self, x: usize, y: usize, z: usize) -> Option<Block> {
        if x >= CHUNK_SIZE || y >= CHUNK_SIZE || z >= CHUNK_SIZE {
            return None;
        }
        self.buf.as_ref().map(|b| b.get_local(x, y, z))
    }

    /// Write a block by local coordinates. Rewinds the chunk to NeedsMesh
    /// from whatever state it was in, so the edit reaches the next mesh.
    pub fn set_block_local(&mut self, x: usize, y: usize, z: usize, block: Block) -> bool {
        if x >= CHUNK_SIZE || y >= CHUNK_SIZE || z >= CHUNK_SIZE {
            return false;
        }
        let Some(buf) = self.buf.as_mut() else {
            return false;
        };
        buf.set_local(x, y, z, block);
        self.occupancy = if block != Block::AIR {
            ChunkOccupancy::Populated
        } else {
            buf.occupancy()
        };
        self.state = ChunkState::NeedsMesh;
        true
    }
}

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use karst_blocks::Block;
use karst_geom::Vec3;
use karst_mesh::MeshingMode;
use karst_world::{ChunkCoord, World};

use crate::chunk::Chunk;
use crate::map::{ChunkMap, SharedChunk};
use crate::queue::WorkQueue;
use crate::raycast::{RayHit, raycast_voxels};

/// Streaming window radii, in chunks, per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderDistance {
    pub rdx: i32,
    pub rdy: i32,
    pub rdz: i32,
}

impl RenderDistance {
    pub const fn new(rdx: i32, rdy: i32, rdz: i32) -> Self {
        Self { rdx, rdy, rdz }
    }

    pub const fn cubic(r: i32) -> Self {
        Self::new(r, r, r)
    }
}

/// The world facade: owns the chunk map, the work queue, and the streaming
/// window, and serves block/ray queries in world coordinates.
pub struct ChunkStore {
    world: Arc<World>,
    map: ChunkMap,
    queue: WorkQueue,
    centre: Mutex<Option<ChunkCoord>>,
    radius: RenderDistance,
    mesher: MeshingMode,
}

impl ChunkStore {
    pub fn new(world: Arc<World>, radius: RenderDistance, mesher: MeshingMode) -> Self {
        Self {
            world,
            map: ChunkMap::new(),
            queue: WorkQueue::new(),
            centre: Mutex::new(None),
            radius,
            mesher,
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn radius(&self) -> RenderDistance {
        self.radius
    }

    pub fn centre(&self) -> Option<ChunkCoord> {
        self.centre.lock().ok().and_then(|c| *c)
    }

    pub fn loaded_count(&self) -> usize {
        self.map.len()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.map.contains(coord)
    }

    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<SharedChunk> {
        self.map.get(coord)
    }

    /// Visit every loaded chunk; the renderer's poll-and-upload pass.
    pub fn for_each_chunk<F: FnMut(&SharedChunk)>(&self, f: F) {
        self.map.for_each_chunk(f);
    }

    /// Move the streaming window. A repeat of the current centre is a
    /// no-op. Otherwise the window's new box is loaded first and the
    /// out-of-range sweep runs second, so the overlap region never goes
    /// empty in between.
    pub fn update_centre(&self, new_centre: ChunkCoord) {
        {
            let Ok(mut centre) = self.centre.lock() else {
                return;
            };
            if *centre == Some(new_centre) {
                return;
            }
            *centre = Some(new_centre);
        }

        let RenderDistance { rdx, rdy, rdz } = self.radius;
        let mut loaded = 0usize;
        for dx in -rdx..=rdx {
            for dy in -rdy..=rdy {
                for dz in -rdz..=rdz {
                    let coord = new_centre.offset(dx, dy, dz);
                    if self.map.contains(coord) {
                        continue;
                    }
                    let chunk: SharedChunk = Arc::new(Mutex::new(Chunk::new(coord)));
                    if !self.map.insert(coord, chunk) {
                        // Creation race: the first writer's chunk stands and
                        // this one drops.
                        continue;
                    }
                    if !self.queue.push(coord) {
                        // A chunk the queue never sees would stay Empty
                        // forever; back the insert out instead.
                        log::warn!(
                            "work queue rejected ({},{},{}); chunk unloaded",
                            coord.cx,
                            coord.cy,
                            coord.cz
                        );
                        self.map.remove(coord);
                        continue;
                    }
                    loaded += 1;
                }
            }
        }

        let evicted = self.map.evict_out_of_range(new_centre, self.radius);
        if loaded > 0 || evicted > 0 {
            log::debug!(
                "streaming centre ({},{},{}): {} loaded, {} evicted, {} queued",
                new_centre.cx,
                new_centre.cy,
                new_centre.cz,
                loaded,
                evicted,
                self.queue.len()
            );
        }
    }

    /// Read a block in world coordinates. None means "not loaded or not yet
    /// generated", a normal outcome callers treat as air or skip.
    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        let coord = ChunkCoord::of_world(wx, wy, wz);
        let chunk = self.map.get(coord)?;
        let guard = chunk.lock().ok()?;
        let (bx, by, bz) = coord.world_base();
        guard.get_block_local((wx - bx) as usize, (wy - by) as usize, (wz - bz) as usize)
    }

    /// Write a block in world coordinates. Edits outside the loaded region
    /// are dropped. A successful write rewinds the chunk to NeedsMesh and
    /// re-queues it for the worker.
    pub fn set_block(&self, block: Block, wx: i32, wy: i32, wz: i32) -> bool {
        let coord = ChunkCoord::of_world(wx, wy, wz);
        let Some(chunk) = self.map.get(coord) else {
            log::debug!("dropping edit at ({wx},{wy},{wz}): chunk not loaded");
            return false;
        };
        let Ok(mut guard) = chunk.lock() else {
            return false;
        };
        let (bx, by, bz) = coord.world_base();
        if !guard.set_block_local(
            (wx - bx) as usize,
            (wy - by) as usize,
            (wz - bz) as usize,
            block,
        ) {
            return false;
        }
        drop(guard);
        if !self.queue.push(coord) {
            log::warn!(
                "work queue rejected remesh of ({},{},{}); retried on the next streaming pass",
                coord.cx,
                coord.cy,
                coord.cz
            );
        }
        true
    }

    /// Float-position block read; floors into the containing cell.
    pub fn get_block_at(&self, pos: Vec3) -> Option<Block> {
        let (x, y, z) = pos.to_cell();
        self.get_block(x, y, z)
    }

    /// Float-position block write; floors into the containing cell.
    pub fn set_block_at(&self, block: Block, pos: Vec3) -> bool {
        let (x, y, z) = pos.to_cell();
        self.set_block(block, x, y, z)
    }

    /// Walk a ray through loaded voxels until it hits a solid block.
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<RayHit> {
        raycast_voxels(origin, dir, max_dist, |x, y, z| self.get_block(x, y, z))
    }

    /// Pop the queued coordinate nearest the streaming centre and run
    /// generation then meshing on its chunk, both under the chunk's own
    /// lock. Returns false when the queue is empty. A coordinate whose
    /// chunk was evicted after queuing is a wasted no-op, not an error.
    pub fn dispatch_next(&self) -> bool {
        let centre = self.centre().unwrap_or_default();
        let Some(coord) = self.queue.pop_nearest(centre) else {
            return false;
        };
        let Some(chunk) = self.map.get(coord) else {
            return true;
        };
        if let Ok(mut guard) = chunk.lock() {
            guard.generate(&self.world);
            guard.build_mesh(self.mesher);
        }
        true
    }

    /// Single-threaded mode: drain the queue inline, bounded by a time
    /// budget so a frame never stalls on a long backlog.
    pub fn drain_queue(&self, budget: Duration) -> usize {
        let start = Instant::now();
        let mut dispatched = 0usize;
        while start.elapsed() < budget && self.dispatch_next() {
            dispatched += 1;
        }
        dispatched
    }

    /// Drain everything; test and shutdown helper.
    pub fn drain_queue_to_empty(&self) -> usize {
        let mut dispatched = 0usize;
        while self.dispatch_next() {
            dispatched += 1;
        }
        dispatched
    }
}

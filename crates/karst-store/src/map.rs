use std::sync::{Arc, Mutex};

use karst_world::ChunkCoord;

use crate::chunk::Chunk;
use crate::store::RenderDistance;

/// Bucket count is a power of two so the mixed hash can be masked.
pub const BUCKET_COUNT: usize = 4096;

pub type SharedChunk = Arc<Mutex<Chunk>>;

/// Fixed-bucket concurrent hash map from chunk coordinates to chunks. Each
/// bucket is independently locked, so operations on different buckets never
/// contend. A bucket lock is always released before any chunk lock is
/// taken, which keeps the lock order acyclic.
pub struct ChunkMap {
    buckets: Vec<Mutex<Vec<(ChunkCoord, SharedChunk)>>>,
}

/// Spatial mix: a distinct large prime per axis, folded, then avalanched.
/// Only dispersion matters here; the low bits select the bucket.
fn hash_coords(c: ChunkCoord) -> u32 {
    let mut h = (c.cx as i64 as u64).wrapping_mul(73_856_093);
    h ^= (c.cy as i64 as u64).wrapping_mul(19_349_663);
    h ^= (c.cz as i64 as u64).wrapping_mul(83_492_791);
    h ^= h >> 13;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 16;
    h as u32
}

#[inline]
fn bucket_of(coord: ChunkCoord) -> usize {
    hash_coords(coord) as usize & (BUCKET_COUNT - 1)
}

impl ChunkMap {
    pub fn new() -> Self {
        let mut buckets = Vec::with_capacity(BUCKET_COUNT);
        buckets.resize_with(BUCKET_COUNT, || Mutex::new(Vec::new()));
        Self { buckets }
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<SharedChunk> {
        let bucket = self.buckets[bucket_of(coord)].lock().ok()?;
        bucket
            .iter()
            .find(|(c, _)| *c == coord)
            .map(|(_, chunk)| Arc::clone(chunk))
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.buckets[bucket_of(coord)]
            .lock()
            .map(|b| b.iter().any(|(c, _)| *c == coord))
            .unwrap_or(false)
    }

    /// First-writer-wins insert. When another chunk already occupies the
    /// coordinate, the existing entry stands and false is returned; the
    /// caller's chunk is the race loser and simply drops.
    pub fn insert(&self, coord: ChunkCoord, chunk: SharedChunk) -> bool {
        let Ok(mut bucket) = self.buckets[bucket_of(coord)].lock() else {
            return false;
        };
        if bucket.iter().any(|(c, _)| *c == coord) {
            return false;
        }
        bucket.push((coord, chunk));
        true
    }

    pub fn remove(&self, coord: ChunkCoord) -> Option<SharedChunk> {
        let mut bucket = self.buckets[bucket_of(coord)].lock().ok()?;
        let idx = bucket.iter().position(|(c, _)| *c == coord)?;
        Some(bucket.swap_remove(idx).1)
    }

    /// Unlink every chunk whose per-axis distance from `centre` exceeds the
    /// matching radius. Buckets are swept one at a time, so lookups and
    /// inserts on other buckets proceed concurrently. A worker still holding
    /// a handle to an evicted chunk finishes its wasted work safely; the
    /// chunk itself frees when the last handle drops.
    pub fn evict_out_of_range(&self, centre: ChunkCoord, radius: RenderDistance) -> usize {
        let mut evicted = 0;
        for bucket in &self.buckets {
            let Ok(mut bucket) = bucket.lock() else {
                continue;
            };
            bucket.retain(|(c, _)| {
                let keep = (c.cx - centre.cx).abs() <= radius.rdx
                    && (c.cy - centre.cy).abs() <= radius.rdy
                    && (c.cz - centre.cz).abs() <= radius.rdz;
                if !keep {
                    evicted += 1;
                }
                keep
            });
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.lock().map(|v| v.len()).unwrap_or(0))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit every loaded chunk. Handles are cloned out of each bucket
    /// before the callback runs, so no bucket lock is held while the caller
    /// locks a chunk.
    pub fn for_each_chunk<F: FnMut(&SharedChunk)>(&self, mut f: F) {
        for bucket in &self.buckets {
            let chunks: Vec<SharedChunk> = match bucket.lock() {
                Ok(b) => b.iter().map(|(_, c)| Arc::clone(c)).collect(),
                Err(_) => continue,
            };
            for chunk in &chunks {
                f(chunk);
            }
        }
    }
}

impl Default for ChunkMap {
    fn default() -> Self {
        Self::new()
    }
}

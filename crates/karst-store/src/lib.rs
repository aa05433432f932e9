//! Concurrent chunk store: spatial hash map with per-bucket locking, a
//! distance-prioritized work queue, the streaming window that loads and
//! evicts chunks around a moving centre, and the background worker runtime
//! that generates and meshes chunks off the critical path.
#![forbid(unsafe_code)]

mod chunk;
mod map;
mod queue;
mod raycast;
mod runtime;
mod store;

pub use chunk::Chunk;
pub use map::{BUCKET_COUNT, ChunkMap, SharedChunk};
pub use queue::WorkQueue;
pub use raycast::{RayHit, raycast_voxels};
pub use runtime::Runtime;
pub use store::{ChunkStore, RenderDistance};

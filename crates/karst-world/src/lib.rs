//! World sizing, terrain parameters, and the seeded noise field.
#![forbid(unsafe_code)]

mod chunk_coord;
mod noise;
pub mod params;
mod world;

pub use chunk_coord::ChunkCoord;
pub use noise::NoiseField;
pub use params::TerrainParams;
pub use world::{CHUNK_AREA, CHUNK_SIZE, CHUNK_VOLUME, ColumnSample, World};

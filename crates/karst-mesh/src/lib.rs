//! CPU surface extraction: a face-culled mesher and a greedy mesher that
//! emit the same vertex record format.
//!
//! Both meshers treat neighbours outside the chunk as air, so chunk
//! boundaries always render a face; cross-chunk culling is a renderer
//! concern, not handled here.
#![forbid(unsafe_code)]

mod culled;
mod greedy;
mod vertex;

pub use culled::build_chunk_culled;
pub use greedy::build_chunk_greedy;
pub use vertex::{BlockVertex, ChunkMesh};

use karst_blocks::Block;
use karst_chunk::ChunkBuf;
use karst_world::CHUNK_VOLUME;

/// Which surface extraction variant the pipeline runs. Greedy is the
/// default; the culled variant is kept for debugging and regression
/// comparisons.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum MeshingMode {
    Culled,
    #[default]
    Greedy,
}

/// Build a chunk mesh with the selected variant. None means the vertex
/// buffer could not be allocated; the chunk stays meshable.
pub fn build_chunk(buf: &ChunkBuf, mode: MeshingMode) -> Option<ChunkMesh> {
    match mode {
        MeshingMode::Culled => build_chunk_culled(buf),
        MeshingMode::Greedy => build_chunk_greedy(buf),
    }
}

/// U/V axes spanning the quad plane perpendicular to each principal axis.
pub(crate) const AXIS_UV: [[usize; 2]; 3] = [[1, 2], [0, 2], [0, 1]];

/// Texture layer index per face direction: Z -> 0/1, X -> 3/2, Y -> 4/5.
pub(crate) fn side_index(axis: usize, face_positive: bool) -> i32 {
    match (axis, face_positive) {
        (0, true) => 3,
        (0, false) => 2,
        (1, true) => 4,
        (1, false) => 5,
        (2, true) => 0,
        (2, false) => 1,
        _ => unreachable!("axis out of range"),
    }
}

pub(crate) fn reserve_mesh() -> Option<ChunkMesh> {
    let mut verts: Vec<BlockVertex> = Vec::new();
    if verts.try_reserve_exact(CHUNK_VOLUME * 6).is_err() {
        log::warn!("chunk mesh vertex buffer allocation failed");
        return None;
    }
    Some(ChunkMesh::with_reserved(verts))
}

/// Append one quad (two triangles, six vertices) to the mesh. `base` is the
/// quad's world-space origin corner; `width`/`height` are its extents along
/// the plane's U and V axes.
pub(crate) fn emit_quad(
    mesh: &mut ChunkMesh,
    axis: usize,
    base: [i32; 3],
    width: usize,
    height: usize,
    face_positive: bool,
    block: Block,
) {
    let [u_axis, v_axis] = AXIS_UV[axis];
    let w = width as f32;
    let h = height as f32;

    let mut du = [0i32; 3];
    du[u_axis] = width as i32;
    let mut dv = [0i32; 3];
    dv[v_axis] = height as i32;

    let corner = |ox: i32, oy: i32, oz: i32| {
        [
            (base[0] + ox) as f32,
            (base[1] + oy) as f32,
            (base[2] + oz) as f32,
        ]
    };
    let p = [
        corner(0, 0, 0),
        corner(du[0], du[1], du[2]),
        corner(dv[0], dv[1], dv[2]),
        corner(du[0] + dv[0], du[1] + dv[1], du[2] + dv[2]),
    ];

    // Texcoords rotate 90 degrees when the U axis is vertical so textures
    // stay upright on X faces.
    let (mut s, t) = if u_axis == 1 && v_axis != 1 {
        ([0.0, 0.0, h, h], [0.0, w, 0.0, w])
    } else {
        ([0.0, w, 0.0, w], [0.0, 0.0, h, h])
    };
    // Mirror U on the face parities that would otherwise tile backwards.
    if !((u_axis != 1 && face_positive) || (v_axis != 1 && !face_positive)) {
        for sv in &mut s {
            *sv = w - *sv;
        }
    }

    // Winding flips for Y-axis quads and flips again for negative faces,
    // keeping normals outward.
    const WINDINGS: [[usize; 6]; 2] = [[0, 1, 2, 2, 1, 3], [0, 2, 1, 1, 2, 3]];
    let mut flipped = axis == 1;
    if !face_positive {
        flipped = !flipped;
    }
    let order = &WINDINGS[flipped as usize];

    let side = side_index(axis, face_positive);
    for &i in order {
        mesh.push(BlockVertex {
            pos: p[i],
            uv: [s[i], t[i]],
            side,
            block: i32::from(block.id()),
        });
    }
}

use std::collections::HashSet;

use karst_blocks::Block;
use karst_chunk::{ChunkBuf, generate_chunk_buffer};
use karst_mesh::{BlockVertex, ChunkMesh, build_chunk_culled, build_chunk_greedy};
use karst_world::{CHUNK_SIZE, CHUNK_VOLUME, ChunkCoord, TerrainParams, World};
use proptest::prelude::*;

const AXIS_UV: [[usize; 2]; 3] = [[1, 2], [0, 2], [0, 1]];

/// Identity of one visible unit face: (axis, orientation, plane coordinate,
/// cell along U, cell along V, material).
type UnitFace = (usize, bool, i32, i32, i32, i32);

fn axis_of_side(side: i32) -> (usize, bool) {
    match side {
        0 => (2, true),
        1 => (2, false),
        2 => (0, false),
        3 => (0, true),
        4 => (1, true),
        5 => (1, false),
        _ => panic!("bad side index {side}"),
    }
}

/// Decompose a mesh's quads back into the unit faces they cover.
fn unit_faces(mesh: &ChunkMesh) -> HashSet<UnitFace> {
    let mut out = HashSet::new();
    for quad in mesh.verts().chunks(6) {
        assert_eq!(quad.len(), 6, "vertex count is not a whole number of quads");
        let (axis, face_positive) = axis_of_side(quad[0].side);
        let [u_axis, v_axis] = AXIS_UV[axis];
        assert!(quad.iter().all(|v| v.side == quad[0].side));
        assert!(quad.iter().all(|v| v.block == quad[0].block));

        let coord = |v: &BlockVertex, a: usize| v.pos[a].round() as i32;
        let plane = coord(&quad[0], axis);
        assert!(quad.iter().all(|v| coord(v, axis) == plane));

        let us: Vec<i32> = quad.iter().map(|v| coord(v, u_axis)).collect();
        let vs: Vec<i32> = quad.iter().map(|v| coord(v, v_axis)).collect();
        let (u0, u1) = (*us.iter().min().unwrap(), *us.iter().max().unwrap());
        let (v0, v1) = (*vs.iter().min().unwrap(), *vs.iter().max().unwrap());
        assert!(u1 > u0 && v1 > v0, "degenerate quad");

        for cu in u0..u1 {
            for cv in v0..v1 {
                let fresh = out.insert((axis, face_positive, plane, cu, cv, quad[0].block));
                assert!(fresh, "overlapping quads in one mesh");
            }
        }
    }
    out
}

fn assert_equivalent(buf: &ChunkBuf) {
    let culled = build_chunk_culled(buf).unwrap();
    let greedy = build_chunk_greedy(buf).unwrap();
    assert_eq!(culled.len() % 6, 0);
    assert_eq!(greedy.len() % 6, 0);
    assert!(greedy.len() <= culled.len());
    assert_eq!(unit_faces(&greedy), unit_faces(&culled));
}

fn empty_buf() -> ChunkBuf {
    ChunkBuf {
        coord: ChunkCoord::new(0, 0, 0),
        blocks: vec![Block::AIR; CHUNK_VOLUME],
    }
}

#[test]
fn equivalent_on_generated_terrain() {
    let world = World::new(20_220_131, TerrainParams::default());
    for coord in [
        ChunkCoord::new(0, 0, 0),
        ChunkCoord::new(3, 1, -2),
        ChunkCoord::new(-7, 0, 5),
        ChunkCoord::new(-1, -1, -1),
    ] {
        let generated = generate_chunk_buffer(&world, coord).unwrap();
        assert_equivalent(&generated.buf);
    }
}

#[test]
fn equivalent_on_checkerboard() {
    let mut buf = empty_buf();
    for x in 0..8 {
        for y in 0..8 {
            for z in 0..8 {
                if (x + y + z) % 2 == 0 {
                    buf.set_local(x, y, z, Block::Stone);
                }
            }
        }
    }
    // Nothing can merge on a checkerboard, so the meshes match vertex for
    // vertex in count.
    let culled = build_chunk_culled(&buf).unwrap();
    let greedy = build_chunk_greedy(&buf).unwrap();
    assert_eq!(culled.len(), greedy.len());
    assert_equivalent(&buf);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // Random sparse voxel patterns: the two meshers agree on the visible
    // unit-face set.
    #[test]
    fn equivalent_on_random_patterns(
        cells in proptest::collection::vec(
            (0usize..CHUNK_SIZE, 0usize..CHUNK_SIZE, 0usize..CHUNK_SIZE, 1u8..=4),
            1..200,
        )
    ) {
        let mut buf = empty_buf();
        for (x, y, z, m) in cells {
            let block = match m {
                1 => Block::Grass,
                2 => Block::Dirt,
                3 => Block::Sand,
                _ => Block::Stone,
            };
            buf.set_local(x, y, z, block);
        }
        let culled = build_chunk_culled(&buf).unwrap();
        let greedy = build_chunk_greedy(&buf).unwrap();
        prop_assert!(greedy.len() <= culled.len());
        prop_assert_eq!(unit_faces(&greedy), unit_faces(&culled));
    }
}

#[test]
fn vertex_bytes_are_stable_records() {
    let mut buf = empty_buf();
    buf.set_local(0, 0, 0, Block::Grass);
    let mesh = build_chunk_greedy(&buf).unwrap();
    // 7 f32-sized fields per record.
    assert_eq!(mesh.bytes().len(), mesh.len() * 28);
}

use karst_chunk::ChunkBuf;
use karst_world::CHUNK_SIZE;

use crate::{ChunkMesh, emit_quad, reserve_mesh};

/// Face-culled mesher: one quad per exposed voxel face, no merging. A face
/// is exposed when the neighbouring voxel has a different render class;
/// neighbours outside the chunk count as air.
pub fn build_chunk_culled(buf: &ChunkBuf) -> Option<ChunkMesh> {
    let mut mesh = reserve_mesh()?;
    let (bx, by, bz) = buf.coord.world_base();
    let world_base = [bx, by, bz];
    let dim = CHUNK_SIZE as i32;

    for x in 0..CHUNK_SIZE {
        for y in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let block = buf.get_local(x, y, z);
                if !block.is_solid() {
                    continue;
                }
                let cell = [x as i32, y as i32, z as i32];
                for axis in 0..3 {
                    for face_positive in [false, true] {
                        let mut nb = cell;
                        nb[axis] += if face_positive { 1 } else { -1 };
                        let covered = in_bounds(nb, dim)
                            && buf
                                .get_local(nb[0] as usize, nb[1] as usize, nb[2] as usize)
                                .render_class()
                                == block.render_class();
                        if covered {
                            continue;
                        }
                        // Quad plane: on the far side of the voxel for
                        // positive faces, on the voxel itself for negative.
                        let mut base = [
                            world_base[0] + cell[0],
                            world_base[1] + cell[1],
                            world_base[2] + cell[2],
                        ];
                        if face_positive {
                            base[axis] += 1;
                        }
                        emit_quad(&mut mesh, axis, base, 1, 1, face_positive, block);
                    }
                }
            }
        }
    }
    Some(mesh)
}

#[inline]
fn in_bounds(cell: [i32; 3], dim: i32) -> bool {
    cell.iter().all(|&c| c >= 0 && c < dim)
}

#[cfg(test)]
mod tests {
    use super::build_chunk_culled;
    use karst_blocks::Block;
    use karst_chunk::ChunkBuf;
    use karst_world::{CHUNK_VOLUME, ChunkCoord};

    fn empty_buf() -> ChunkBuf {
        ChunkBuf {
            coord: ChunkCoord::new(0, 0, 0),
            blocks: vec![Block::AIR; CHUNK_VOLUME],
        }
    }

    #[test]
    fn lone_voxel_emits_six_faces() {
        let mut buf = empty_buf();
        buf.set_local(5, 6, 7, Block::Stone);
        let mesh = build_chunk_culled(&buf).unwrap();
        assert_eq!(mesh.len(), 6 * 6);
        let sides: Vec<i32> = mesh.verts().iter().map(|v| v.side).collect();
        for side in 0..6 {
            assert_eq!(
                sides.iter().filter(|&&s| s == side).count(),
                6,
                "side {side}"
            );
        }
        assert!(
            mesh.verts()
                .iter()
                .all(|v| v.block == i32::from(Block::Stone.id()))
        );
    }

    #[test]
    fn buried_voxel_emits_nothing_for_itself() {
        let mut buf = empty_buf();
        // 3x3x3 cube: the centre voxel is fully covered, so only the hull
        // contributes faces. Hull = 27 voxels minus centre, and each hull
        // voxel exposes the faces not shared with another cube voxel.
        for x in 4..7 {
            for y in 4..7 {
                for z in 4..7 {
                    buf.set_local(x, y, z, Block::Dirt);
                }
            }
        }
        let mesh = build_chunk_culled(&buf).unwrap();
        // Surface of a 3x3x3 cube: 6 sides x 9 unit faces.
        assert_eq!(mesh.len(), 6 * 9 * 6);
    }

    #[test]
    fn empty_chunk_meshes_empty() {
        let mesh = build_chunk_culled(&empty_buf()).unwrap();
        assert!(mesh.is_empty());
    }
}

use karst_blocks::Block;
use karst_chunk::ChunkBuf;
use karst_world::{CHUNK_AREA, CHUNK_SIZE};

use crate::{AXIS_UV, ChunkMesh, emit_quad, reserve_mesh};

/// Greedy mesher: for each principal axis, walks slices through the chunk,
/// builds a mask of cells where the render class changes across the slice,
/// and merges the mask into maximal same-material rectangles. Flat regions
/// collapse to single large quads; a 1x1 merge emits exactly the quad the
/// culled mesher would.
pub fn build_chunk_greedy(buf: &ChunkBuf) -> Option<ChunkMesh> {
    let mut mesh = reserve_mesh()?;
    let (bx, by, bz) = buf.coord.world_base();
    let world_base = [bx, by, bz];
    let dim = CHUNK_SIZE as i32;

    // (block, face_positive) per mask cell; AIR marks an empty cell.
    let mut mask = [(Block::AIR, false); CHUNK_AREA];

    for axis in 0..3 {
        let [u_axis, v_axis] = AXIS_UV[axis];

        // The -1 slice is the boundary against implicit air before the chunk.
        for slice in -1..dim {
            for v in 0..CHUNK_SIZE {
                for u in 0..CHUNK_SIZE {
                    let mut cell = [0i32; 3];
                    cell[u_axis] = u as i32;
                    cell[v_axis] = v as i32;
                    cell[axis] = slice;
                    let block_a = sample(buf, cell);
                    cell[axis] = slice + 1;
                    let block_b = sample(buf, cell);

                    let ra = block_a.render_class();
                    let rb = block_b.render_class();
                    // A quad separates the two voxels iff their render
                    // classes differ; the more solid side owns the face.
                    mask[v * CHUNK_SIZE + u] = if ra != rb {
                        (if ra > rb { block_a } else { block_b }, rb < ra)
                    } else {
                        (Block::AIR, false)
                    };
                }
            }

            for v in 0..CHUNK_SIZE {
                let mut u = 0;
                while u < CHUNK_SIZE {
                    let (current, face_positive) = mask[v * CHUNK_SIZE + u];
                    if current == Block::AIR {
                        u += 1;
                        continue;
                    }

                    // Grow along the row while material and orientation match.
                    let mut width = 1;
                    while u + width < CHUNK_SIZE
                        && mask[v * CHUNK_SIZE + u + width] == (current, face_positive)
                    {
                        width += 1;
                    }

                    // Grow across rows while the full width keeps matching.
                    let mut height = 1;
                    'grow: while v + height < CHUNK_SIZE {
                        for k in 0..width {
                            if mask[(v + height) * CHUNK_SIZE + u + k] != (current, face_positive)
                            {
                                break 'grow;
                            }
                        }
                        height += 1;
                    }

                    let mut base = [0i32; 3];
                    base[u_axis] = u as i32;
                    base[v_axis] = v as i32;
                    base[axis] = slice + 1;
                    for (b, w) in base.iter_mut().zip(world_base) {
                        *b += w;
                    }
                    emit_quad(&mut mesh, axis, base, width, height, face_positive, current);

                    // Zero the consumed rectangle.
                    for row in 0..height {
                        for col in 0..width {
                            mask[(v + row) * CHUNK_SIZE + u + col] = (Block::AIR, false);
                        }
                    }

                    u += width;
                }
            }
        }
    }

    Some(mesh)
}

#[inline]
fn sample(buf: &ChunkBuf, cell: [i32; 3]) -> Block {
    let dim = CHUNK_SIZE as i32;
    if cell.iter().any(|&c| c < 0 || c >= dim) {
        Block::AIR
    } else {
        buf.get_local(cell[0] as usize, cell[1] as usize, cell[2] as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::build_chunk_greedy;
    use crate::build_chunk_culled;
    use karst_blocks::Block;
    use karst_chunk::ChunkBuf;
    use karst_world::{CHUNK_SIZE, CHUNK_VOLUME, ChunkCoord};

    fn empty_buf() -> ChunkBuf {
        ChunkBuf {
            coord: ChunkCoord::new(0, 0, 0),
            blocks: vec![Block::AIR; CHUNK_VOLUME],
        }
    }

    #[test]
    fn lone_voxel_matches_culled_exactly() {
        let mut buf = empty_buf();
        buf.set_local(10, 11, 12, Block::Sand);
        let greedy = build_chunk_greedy(&buf).unwrap();
        let culled = build_chunk_culled(&buf).unwrap();
        assert_eq!(greedy.len(), culled.len());
        // Same six quads; traversal order differs, so compare as sets of
        // whole vertices.
        for v in greedy.verts() {
            assert!(culled.verts().contains(v), "missing vertex {v:?}");
        }
    }

    #[test]
    fn full_slab_collapses_to_six_quads() {
        let mut buf = empty_buf();
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                buf.set_local(x, 0, z, Block::Stone);
            }
        }
        let mesh = build_chunk_greedy(&buf).unwrap();
        // One merged quad per slab face: top, bottom, and four sides.
        assert_eq!(mesh.len(), 6 * 6);
    }

    #[test]
    fn different_materials_do_not_merge() {
        let mut buf = empty_buf();
        buf.set_local(0, 0, 0, Block::Stone);
        buf.set_local(1, 0, 0, Block::Dirt);
        let mesh = build_chunk_greedy(&buf).unwrap();
        // Two voxels side by side: 10 exposed faces, no shared-material
        // merge anywhere, and no face on the hidden seam between them.
        assert_eq!(mesh.len(), 10 * 6);
    }

    #[test]
    fn empty_chunk_meshes_empty() {
        let mesh = build_chunk_greedy(&empty_buf()).unwrap();
        assert!(mesh.is_empty());
    }
}

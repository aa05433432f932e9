use karst_blocks::Block;
use karst_geom::Vec3;

/// Hard cap on traversal steps, independent of `max_dist`.
const MAX_STEPS: usize = 512;

/// Result of a voxel ray walk: the solid cell that stopped the ray, the
/// cell visited immediately before it (where an adjacent placement goes),
/// the face normal stepped through, and the block that was hit.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub bx: i32,
    pub by: i32,
    pub bz: i32,
    pub px: i32,
    pub py: i32,
    pub pz: i32,
    pub nx: i32,
    pub ny: i32,
    pub nz: i32,
    pub block: Block,
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

/// Amanatides-Woo voxel traversal: visit exactly the cells the ray passes
/// through, in order, stepping along whichever axis has the nearest
/// boundary, until `lookup` yields a solid block or the ray runs past
/// `max_dist`. Cells that are not loaded (`lookup` returns None) pass as
/// air. A zero-length direction is rejected.
pub fn raycast_voxels<F>(origin: Vec3, dir: Vec3, max_dist: f32, mut lookup: F) -> Option<RayHit>
where
    F: FnMut(i32, i32, i32) -> Option<Block>,
{
    let len = dir.length();
    if len < 1e-6 {
        return None;
    }
    let d = dir / len;

    let (mut vx, mut vy, mut vz) = origin.to_cell();

    let stepx = if d.x > 0.0 {
        1
    } else if d.x < 0.0 {
        -1
    } else {
        0
    };
    let stepy = if d.y > 0.0 {
        1
    } else if d.y < 0.0 {
        -1
    } else {
        0
    };
    let stepz = if d.z > 0.0 {
        1
    } else if d.z < 0.0 {
        -1
    } else {
        0
    };

    let invx = inv_or_max(d.x);
    let invy = inv_or_max(d.y);
    let invz = inv_or_max(d.z);
    let tdx = if stepx == 0 { f32::MAX } else { invx };
    let tdy = if stepy == 0 { f32::MAX } else { invy };
    let tdz = if stepz == 0 { f32::MAX } else { invz };

    // Distance to the first boundary crossing on each axis.
    let fx = origin.x - origin.x.floor();
    let fy = origin.y - origin.y.floor();
    let fz = origin.z - origin.z.floor();
    let mut tmx = match stepx {
        1 => (1.0 - fx) * invx,
        -1 => fx * invx,
        _ => f32::MAX,
    };
    let mut tmy = match stepy {
        1 => (1.0 - fy) * invy,
        -1 => fy * invy,
        _ => f32::MAX,
    };
    let mut tmz = match stepz {
        1 => (1.0 - fz) * invz,
        -1 => fz * invz,
        _ => f32::MAX,
    };

    let (mut prevx, mut prevy, mut prevz) = (vx, vy, vz);
    let mut t = 0.0f32;

    for _ in 0..MAX_STEPS {
        if t > max_dist {
            break;
        }
        if let Some(block) = lookup(vx, vy, vz) {
            if block.is_solid() {
                // Face normal from the step between the previous cell and
                // this one; zero when the ray started inside the block.
                let (dx, dy, dz) = (vx - prevx, vy - prevy, vz - prevz);
                let (mut nx, mut ny, mut nz) = (0, 0, 0);
                if dx != 0 {
                    nx = -dx;
                } else if dy != 0 {
                    ny = -dy;
                } else if dz != 0 {
                    nz = -dz;
                }
                return Some(RayHit {
                    bx: vx,
                    by: vy,
                    bz: vz,
                    px: prevx,
                    py: prevy,
                    pz: prevz,
                    nx,
                    ny,
                    nz,
                    block,
                });
            }
        }
        prevx = vx;
        prevy = vy;
        prevz = vz;
        // Step through the smallest accumulated boundary distance.
        if tmx < tmy {
            if tmx < tmz {
                vx += stepx;
                t = tmx;
                tmx += tdx;
            } else {
                vz += stepz;
                t = tmz;
                tmz += tdz;
            }
        } else if tmy < tmz {
            vy += stepy;
            t = tmy;
            tmy += tdy;
        } else {
            vz += stepz;
            t = tmz;
            tmz += tdz;
        }
    }
    None
}

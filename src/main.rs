mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use hashbrown::HashMap;

use karst_blocks::Block;
use karst_geom::Vec3;
use karst_mesh::MeshingMode;
use karst_store::{ChunkStore, RenderDistance, Runtime};
use karst_world::{ChunkCoord, World};

use crate::config::AppConfig;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MesherArg {
    Culled,
    Greedy,
}

/// Headless driver: streams terrain around a wandering point, stands in for
/// the renderer's upload pass, and pokes the edit path with raycast digs.
#[derive(Parser, Debug)]
#[command(name = "karst", about = "chunked voxel world core, headless demo")]
struct Args {
    /// Config file path
    #[arg(long, default_value = "karst.toml")]
    config: PathBuf,
    /// World seed (overrides the config)
    #[arg(long)]
    seed: Option<u32>,
    /// Cubic render distance in chunks (overrides the config)
    #[arg(long)]
    radius: Option<i32>,
    /// Simulation steps to run
    #[arg(long, default_value_t = 240)]
    steps: u32,
    /// Drain the work queue on the driver thread instead of a worker
    #[arg(long)]
    single_thread: bool,
    /// Surface extraction variant
    #[arg(long, value_enum, default_value = "greedy")]
    mesher: MesherArg,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let cfg = AppConfig::load_or_default(&args.config);

    let seed = args.seed.unwrap_or(cfg.seed);
    let radius = args
        .radius
        .map(RenderDistance::cubic)
        .unwrap_or_else(|| cfg.radius());
    let mesher = match args.mesher {
        MesherArg::Culled => MeshingMode::Culled,
        MesherArg::Greedy => MeshingMode::Greedy,
    };
    log::info!(
        "seed {seed}, radius ({}, {}, {}), {:?} mesher, {}",
        radius.rdx,
        radius.rdy,
        radius.rdz,
        mesher,
        if args.single_thread {
            "single-threaded drain"
        } else {
            "background worker"
        }
    );

    let world = Arc::new(World::new(seed, cfg.terrain));
    let store = Arc::new(ChunkStore::new(Arc::clone(&world), radius, mesher));
    let mut runtime = (!args.single_thread).then(|| Runtime::spawn(Arc::clone(&store)));

    // GPU stand-in: resident "uploaded" meshes by chunk, as vertex counts.
    let mut uploads: HashMap<ChunkCoord, usize> = HashMap::new();
    let mut uploaded_verts: usize = 0;

    let mut pos = Vec3::new(0.5, 40.0, 0.5);
    for step in 0..args.steps {
        // Wander diagonally, fast enough to exercise load and evict.
        pos += Vec3::new(2.9, 0.0, 1.7);
        let (wx, wy, wz) = pos.to_cell();
        store.update_centre(ChunkCoord::of_world(wx, wy, wz));

        if args.single_thread {
            store.drain_queue(Duration::from_millis(8));
        }

        // Upload pass: pull NeedsSend meshes, retire evicted residents.
        store.for_each_chunk(|chunk| {
            if let Ok(mut guard) = chunk.lock() {
                if let Some(mesh) = guard.take_mesh_for_upload() {
                    uploaded_verts += mesh.len();
                    uploads.insert(guard.coord(), mesh.len());
                }
            }
        });
        uploads.retain(|coord, _| store.contains(*coord));

        // Periodic dig: select the surface block under the walker and clear
        // it, driving the edit -> remesh path.
        if step % 16 == 0 {
            if let Some(hit) = store.raycast(pos, Vec3::new(0.0, -1.0, 0.0), 64.0) {
                store.set_block(Block::Air, hit.bx, hit.by, hit.bz);
                log::debug!(
                    "dug {:?} at ({}, {}, {})",
                    hit.block,
                    hit.bx,
                    hit.by,
                    hit.bz
                );
            }
        }

        if step % 30 == 0 {
            log::info!(
                "step {step}: {} loaded, {} queued, {} meshes resident, {} verts uploaded",
                store.loaded_count(),
                store.queued_count(),
                uploads.len(),
                uploaded_verts
            );
        }

        thread::sleep(Duration::from_millis(5));
    }

    if let Some(rt) = runtime.as_mut() {
        rt.shutdown();
    }
    log::info!(
        "done: {} chunks loaded, {} meshes resident, {} verts uploaded",
        store.loaded_count(),
        uploads.len(),
        uploaded_verts
    );
}

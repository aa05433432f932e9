use std::path::Path;

use serde::Deserialize;

use karst_store::RenderDistance;
use karst_world::TerrainParams;

/// Driver configuration, loadable from `karst.toml`. A missing file or
/// missing fields fall back to the defaults below.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub seed: u32,
    /// Render-distance radii in chunks, per axis.
    pub radius: [i32; 3],
    pub terrain: TerrainParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            radius: [4, 2, 4],
            terrain: TerrainParams::default(),
        }
    }
}

impl AppConfig {
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(txt) => match toml::from_str(&txt) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("{}: parse error: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn radius(&self) -> RenderDistance {
        RenderDistance::new(self.radius[0], self.radius[1], self.radius[2])
    }
}

use serde::Deserialize;

/// Fractal terrain parameters. Every field has a serde default so a config
/// file can override any subset; the defaults are the tuned values the
/// generator ships with.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TerrainParams {
    /// Base noise frequency in inverse world units.
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_octaves")]
    pub octaves: i32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    /// Per-octave amplitude falloff (persistence).
    #[serde(default = "default_gain")]
    pub gain: f32,
    /// Terrain height in blocks at the top of the noise range.
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    /// Depth of the dirt band below the surface block.
    #[serde(default = "default_surface_depth")]
    pub surface_depth: i32,
    /// Sample offset separating the surface-material channel from the
    /// height channel.
    #[serde(default = "default_material_offset")]
    pub material_offset: f32,
}

fn default_frequency() -> f32 {
    0.005
}
fn default_octaves() -> i32 {
    3
}
fn default_lacunarity() -> f32 {
    2.3
}
fn default_gain() -> f32 {
    0.4
}
fn default_height_scale() -> f32 {
    50.0
}
fn default_surface_depth() -> i32 {
    5
}
fn default_material_offset() -> f32 {
    1000.0
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            octaves: default_octaves(),
            lacunarity: default_lacunarity(),
            gain: default_gain(),
            height_scale: default_height_scale(),
            surface_depth: default_surface_depth(),
            material_offset: default_material_offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let params: TerrainParams = toml::from_str("").unwrap();
        assert_eq!(params, TerrainParams::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let params: TerrainParams = toml::from_str("octaves = 4\ngain = 0.5\n").unwrap();
        assert_eq!(params.octaves, 4);
        assert_eq!(params.gain, 0.5);
        assert_eq!(params.frequency, TerrainParams::default().frequency);
        assert_eq!(params.surface_depth, TerrainParams::default().surface_depth);
    }
}

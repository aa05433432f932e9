use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

use crate::params::TerrainParams;

/// Seeded, octave-summed 2D coherent noise. Built once from the world seed
/// and terrain parameters; immutable afterwards, so sampling is freely
/// shareable across threads.
pub struct NoiseField {
    fbm: FastNoiseLite,
    height_scale: f32,
    material_offset: f32,
}

impl NoiseField {
    pub fn new(seed: u32, params: &TerrainParams) -> Self {
        let mut fbm = FastNoiseLite::with_seed(seed as i32);
        fbm.set_noise_type(Some(NoiseType::OpenSimplex2));
        fbm.set_frequency(Some(params.frequency));
        fbm.set_fractal_type(Some(FractalType::FBm));
        fbm.set_fractal_octaves(Some(params.octaves));
        fbm.set_fractal_lacunarity(Some(params.lacunarity));
        fbm.set_fractal_gain(Some(params.gain));
        Self {
            fbm,
            height_scale: params.height_scale,
            material_offset: params.material_offset,
        }
    }

    /// Terrain height for a world column, in blocks. Noise is mapped from
    /// [-1, 1] into [0, height_scale].
    #[inline]
    pub fn height_at(&self, wx: i32, wz: i32) -> f32 {
        let n = self.fbm.get_noise_2d(wx as f32, wz as f32);
        (n / 2.0 + 0.5) * self.height_scale
    }

    /// Raw surface-material channel for a world column. Sampled away from
    /// the height channel; the sign picks the surface block, so this stays
    /// an unclamped float.
    #[inline]
    pub fn material_at(&self, wx: i32, wz: i32) -> f32 {
        self.fbm.get_noise_2d(
            wx as f32 + self.material_offset,
            wz as f32 + self.material_offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::NoiseField;
    use crate::params::TerrainParams;

    #[test]
    fn same_seed_same_samples() {
        let params = TerrainParams::default();
        let a = NoiseField::new(42, &params);
        let b = NoiseField::new(42, &params);
        for (wx, wz) in [(0, 0), (17, -93), (-1024, 511), (100_000, -100_000)] {
            assert_eq!(a.height_at(wx, wz).to_bits(), b.height_at(wx, wz).to_bits());
            assert_eq!(
                a.material_at(wx, wz).to_bits(),
                b.material_at(wx, wz).to_bits()
            );
        }
    }

    #[test]
    fn different_seeds_diverge_somewhere() {
        let params = TerrainParams::default();
        let a = NoiseField::new(1, &params);
        let b = NoiseField::new(2, &params);
        let diverged = (0..64).any(|i| {
            let (wx, wz) = (i * 37, i * 91);
            a.height_at(wx, wz) != b.height_at(wx, wz)
        });
        assert!(diverged);
    }

    #[test]
    fn height_stays_in_scaled_range() {
        let params = TerrainParams::default();
        let field = NoiseField::new(7, &params);
        for i in -100..100 {
            let h = field.height_at(i * 13, i * -29);
            assert!((0.0..=params.height_scale).contains(&h), "height {h}");
        }
    }
}

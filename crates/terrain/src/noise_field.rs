//! Seeded scalar noise over 3D points with water flattening.

use glam::Vec3;
use noise::{NoiseFn, Simplex};

use crate::error::{GenerationError, ensure_unit};

/// Deterministic noise in `[0, 1]`.
///
/// Raw simplex output is remapped from `[-1, 1]` to `[0, 1]`. Any raw value at
/// or below `water_threshold` is replaced by `water_level`, which flattens
/// ocean basins to one common radius once the value drives displacement.
#[derive(Clone)]
pub struct NoiseField {
    simplex: Simplex,
    seed: u32,
    water_threshold: f32,
    water_level: f32,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .field("water_threshold", &self.water_threshold)
            .field("water_level", &self.water_level)
            .finish()
    }
}

impl NoiseField {
    pub fn new(seed: u32, water_threshold: f32, water_level: f32) -> Result<Self, GenerationError> {
        ensure_unit("water_threshold", water_threshold)?;
        ensure_unit("water_level", water_level)?;
        Ok(Self {
            simplex: Simplex::new(seed),
            seed,
            water_threshold,
            water_level,
        })
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn water_level(&self) -> f32 {
        self.water_level
    }

    pub fn water_threshold(&self) -> f32 {
        self.water_threshold
    }

    /// Unthresholded noise in `[0, 1]`.
    pub fn raw(&self, point: Vec3) -> f32 {
        let n = self
            .simplex
            .get([point.x as f64, point.y as f64, point.z as f64]);
        (((n + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
    }

    /// Noise with the water rule applied.
    pub fn value(&self, point: Vec3) -> f32 {
        let n = self.raw(point);
        if n <= self.water_threshold {
            self.water_level
        } else {
            n
        }
    }

    /// True when `value` is exactly the flattened water level.
    pub fn is_water(&self, value: f32) -> bool {
        value == self.water_level
    }
}

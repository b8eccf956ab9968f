use glam::Vec3;

use crate::error::{GenerationError, ensure_finite, ensure_positive};
use crate::noise_field::NoiseField;

/// Per-vertex noise values recorded during displacement, addressed by vertex index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoiseCache {
    values: Vec<Option<f32>>,
}

impl NoiseCache {
    pub fn with_len(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn record(&mut self, index: usize, value: f32) {
        if index >= self.values.len() {
            self.values.resize(index + 1, None);
        }
        self.values[index] = Some(value);
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every slot has been written.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().filter_map(|v| *v)
    }
}

/// Result of displacing one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displaced {
    pub position: Vec3,
    pub noise: f32,
}

/// Pushes points outward along their own direction by `noise * depth`.
#[derive(Debug, Clone)]
pub struct TerrainDisplacer {
    field: NoiseField,
    frequency: f32,
    depth: f32,
    cache: NoiseCache,
}

impl TerrainDisplacer {
    pub fn new(field: NoiseField, frequency: f32, depth: f32) -> Result<Self, GenerationError> {
        ensure_positive("noise_frequency", frequency)?;
        ensure_finite("displacement_depth", depth)?;
        Ok(Self {
            field,
            frequency,
            depth,
            cache: NoiseCache::default(),
        })
    }

    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Thresholded noise at `point * frequency`.
    pub fn sample(&self, point: Vec3) -> f32 {
        self.field.value(point * self.frequency)
    }

    /// Displace `vertex`. With an index the noise value is also written to the
    /// cache; anonymous samples leave the cache untouched.
    pub fn displace(&mut self, vertex: Vec3, index: Option<usize>) -> Displaced {
        let noise = self.sample(vertex);
        if let Some(i) = index {
            self.cache.record(i, noise);
        }
        Displaced {
            position: vertex + vertex.normalize_or_zero() * noise * self.depth,
            noise,
        }
    }

    /// Pre-size the cache for an indexed pass.
    pub fn reserve_cache(&mut self, len: usize) {
        self.cache = NoiseCache::with_len(len);
    }

    pub fn cache(&self) -> &NoiseCache {
        &self.cache
    }

    /// Hand the cache to its owner, leaving an empty one behind.
    pub fn take_cache(&mut self) -> NoiseCache {
        std::mem::take(&mut self.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displacer() -> TerrainDisplacer {
        let field = NoiseField::new(42, 0.4, 0.2).unwrap();
        TerrainDisplacer::new(field, 0.015, 15.0).unwrap()
    }

    #[test]
    fn displaced_distance_is_radius_plus_noise_depth() {
        let mut d = displacer();
        let v = Vec3::new(60.0, 0.0, 80.0);
        let out = d.displace(v, Some(0));
        let expected = 100.0 + out.noise * 15.0;
        assert!((out.position.length() - expected).abs() < 1e-3);
        assert!((out.position.normalize() - v.normalize()).length() < 1e-5);
    }

    #[test]
    fn indexed_displacement_writes_cache() {
        let mut d = displacer();
        d.reserve_cache(3);
        let out = d.displace(Vec3::new(0.0, 100.0, 0.0), Some(2));
        assert_eq!(d.cache().get(2), Some(out.noise));
        assert_eq!(d.cache().get(0), None);
        assert!(!d.cache().is_complete());
    }

    #[test]
    fn anonymous_displacement_leaves_cache_alone() {
        let mut d = displacer();
        d.displace(Vec3::new(0.0, 100.0, 0.0), None);
        assert!(d.cache().is_empty());
    }

    #[test]
    fn cache_grows_for_late_index() {
        let mut cache = NoiseCache::default();
        cache.record(4, 0.5);
        assert_eq!(cache.len(), 5);
        assert_eq!(cache.get(4), Some(0.5));
        assert_eq!(cache.iter().count(), 1);
    }

    #[test]
    fn rejects_bad_parameters() {
        let field = NoiseField::new(1, 0.4, 0.2).unwrap();
        assert!(TerrainDisplacer::new(field.clone(), 0.0, 15.0).is_err());
        assert!(TerrainDisplacer::new(field, 0.015, f32::NAN).is_err());
    }
}

//! Terrain: noise field, radial displacement, planet mesh, surface sampling.
//!
//! # Invariants
//! - Noise is deterministic for a given seed and point.
//! - Planet vertices are displaced exactly once; normals are recomputed afterwards.
//! - The noise cache is complete before any consumer reads it.
//! - Invalid parameters fail with [`GenerationError`] before geometry exists.

mod displace;
mod error;
mod icosphere;
mod noise_field;
mod planet;
mod sampler;

pub use displace::{Displaced, NoiseCache, TerrainDisplacer};
pub use error::{GenerationError, ensure_finite, ensure_positive, ensure_unit};
pub use icosphere::{MAX_SUBDIVISIONS, icosphere, icosphere_vertex_count};
pub use noise_field::NoiseField;
pub use planet::PlanetMesh;
pub use sampler::{SurfaceSample, fibonacci_sphere, fibonacci_sphere_with_phase, golden_angle};

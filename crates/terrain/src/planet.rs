use planetoid_assets::MeshData;

use crate::displace::{NoiseCache, TerrainDisplacer};
use crate::error::GenerationError;
use crate::icosphere::icosphere;

/// Displaced icosphere plus the noise recorded for each of its vertices.
///
/// Displacement runs exactly once, in [`PlanetMesh::build`]; the mesh is
/// immutable afterwards and only replaced wholesale on rebuild.
#[derive(Debug, Clone)]
pub struct PlanetMesh {
    mesh: MeshData,
    base_radius: f32,
    noises: NoiseCache,
    water_level: f32,
}

impl PlanetMesh {
    pub fn build(
        base_radius: f32,
        subdivisions: u32,
        displacer: &mut TerrainDisplacer,
    ) -> Result<Self, GenerationError> {
        let _span = tracing::info_span!("planet_build", base_radius, subdivisions).entered();
        let mut mesh = icosphere(base_radius, subdivisions)?;

        displacer.reserve_cache(mesh.vertex_count());
        for (i, p) in mesh.positions.iter_mut().enumerate() {
            *p = displacer.displace(*p, Some(i)).position;
        }
        mesh.compute_vertex_normals();
        let noises = displacer.take_cache();
        debug_assert!(noises.is_complete());

        let planet = Self {
            mesh,
            base_radius,
            noises,
            water_level: displacer.field().water_level(),
        };
        tracing::debug!(
            vertices = planet.mesh.vertex_count(),
            water_fraction = planet.water_fraction(),
            "planet displaced"
        );
        Ok(planet)
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn into_mesh(self) -> MeshData {
        self.mesh
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn noises(&self) -> &NoiseCache {
        &self.noises
    }

    /// Noise recorded for vertex `index`.
    pub fn elevation(&self, index: usize) -> Option<f32> {
        self.noises.get(index)
    }

    pub fn is_water_vertex(&self, index: usize) -> bool {
        self.elevation(index) == Some(self.water_level)
    }

    /// Share of vertices sitting at the flattened water level.
    pub fn water_fraction(&self) -> f32 {
        if self.noises.is_empty() {
            return 0.0;
        }
        let water = self.noises.iter().filter(|n| *n == self.water_level).count();
        water as f32 / self.noises.len() as f32
    }
}

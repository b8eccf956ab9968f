use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::mesh::{Material, MeshData};

/// A handle referencing registered geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

/// A handle referencing a registered material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialHandle(pub u64);

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("mesh not found: {0:?}")]
    MeshNotFound(MeshHandle),
    #[error("material not found: {0:?}")]
    MaterialNotFound(MaterialHandle),
    #[error("mesh '{0}' has non-finite vertex data")]
    NonFiniteGeometry(String),
    #[error("mesh '{0}' has an index out of range")]
    IndexOutOfRange(String),
}

/// Allocation counters, used to verify rebuilds do not leak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetStats {
    pub meshes_registered: u64,
    pub meshes_disposed: u64,
    pub materials_registered: u64,
    pub materials_disposed: u64,
}

/// Owner of every mesh and material a scene draws.
///
/// Handles are never reused. The shared placeholder pair is created on first
/// request and lives as long as the store.
#[derive(Debug, Default)]
pub struct AssetStore {
    meshes: BTreeMap<MeshHandle, MeshData>,
    materials: BTreeMap<MaterialHandle, Material>,
    placeholder: Option<(MeshHandle, MaterialHandle)>,
    next_id: u64,
    stats: AssetStats,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register geometry. Rejects NaN/infinite positions and dangling indices.
    pub fn register_mesh(&mut self, mesh: MeshData) -> Result<MeshHandle, AssetError> {
        validate(&mesh)?;
        let handle = MeshHandle(self.allocate());
        tracing::trace!(
            ?handle,
            name = %mesh.name,
            vertices = mesh.vertex_count(),
            "mesh registered"
        );
        self.meshes.insert(handle, mesh);
        self.stats.meshes_registered += 1;
        Ok(handle)
    }

    pub fn register_material(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.allocate());
        self.materials.insert(handle, material);
        self.stats.materials_registered += 1;
        handle
    }

    /// Swap the geometry behind `handle`, dropping the old data first.
    pub fn replace_mesh(&mut self, handle: MeshHandle, mesh: MeshData) -> Result<(), AssetError> {
        validate(&mesh)?;
        let slot = self
            .meshes
            .get_mut(&handle)
            .ok_or(AssetError::MeshNotFound(handle))?;
        *slot = mesh;
        self.stats.meshes_disposed += 1;
        self.stats.meshes_registered += 1;
        Ok(())
    }

    pub fn dispose_mesh(&mut self, handle: MeshHandle) -> Result<MeshData, AssetError> {
        let mesh = self
            .meshes
            .remove(&handle)
            .ok_or(AssetError::MeshNotFound(handle))?;
        self.stats.meshes_disposed += 1;
        Ok(mesh)
    }

    pub fn dispose_material(&mut self, handle: MaterialHandle) -> Result<Material, AssetError> {
        let material = self
            .materials
            .remove(&handle)
            .ok_or(AssetError::MaterialNotFound(handle))?;
        self.stats.materials_disposed += 1;
        Ok(material)
    }

    pub fn get_mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(&handle)
    }

    pub fn get_material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(&handle)
    }

    /// Shared flat-colored fallback primitive (a coarse octahedron).
    pub fn placeholder(&mut self) -> (MeshHandle, MaterialHandle) {
        if let Some(pair) = self.placeholder {
            return pair;
        }
        let mesh = crate::placeholder_octahedron();
        let mesh_handle = MeshHandle(self.allocate());
        self.meshes.insert(mesh_handle, mesh);
        self.stats.meshes_registered += 1;
        let material = self.register_material(Material::flat("placeholder", [1.0, 0.0, 1.0]));
        self.placeholder = Some((mesh_handle, material));
        (mesh_handle, material)
    }

    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.materials.is_empty()
    }

    pub fn stats(&self) -> AssetStats {
        self.stats
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn validate(mesh: &MeshData) -> Result<(), AssetError> {
    if !mesh.is_finite() {
        return Err(AssetError::NonFiniteGeometry(mesh.name.clone()));
    }
    let count = mesh.positions.len() as u32;
    if mesh.indices.iter().any(|i| *i >= count) {
        return Err(AssetError::IndexOutOfRange(mesh.name.clone()));
    }
    Ok(())
}

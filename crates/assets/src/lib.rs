//! Asset ownership: geometry and materials behind handles.
//!
//! The renderer consumes assets by handle. Every replace or teardown goes
//! through the store so allocations and disposals can be counted.
//!
//! # Invariants
//! - Registered geometry is finite and every index is in range.
//! - Handles are never reused after disposal.

mod mesh;
mod store;

use glam::Vec3;

pub use mesh::{Material, MeshData};
pub use store::{AssetError, AssetStats, AssetStore, MaterialHandle, MeshHandle};

/// Unit octahedron used as the stand-in when a prop cannot be built.
fn placeholder_octahedron() -> MeshData {
    let positions = vec![
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    let indices = vec![
        0, 2, 4, 4, 2, 1, 1, 2, 5, 5, 2, 0, //
        4, 3, 0, 1, 3, 4, 5, 3, 1, 0, 3, 5,
    ];
    MeshData::new("placeholder", positions, indices)
}

pub fn crate_info() -> &'static str {
    "planetoid-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }

    #[test]
    fn placeholder_normals_point_outward() {
        let mesh = placeholder_octahedron();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(p.dot(*n) > 0.0);
        }
    }
}

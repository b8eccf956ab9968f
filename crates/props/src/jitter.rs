use planetoid_assets::MeshData;
use rand::{Rng, RngCore};

/// Fraction of a part's characteristic size used as the per-axis jitter bound.
pub const JITTER_FRACTION: f32 = 0.2;

/// Offset every vertex by an independent uniform draw in `[-amount, amount]`
/// per axis, then recompute normals for the faceted look.
pub fn jitter_vertices(mesh: &mut MeshData, amount: f32, rng: &mut dyn RngCore) {
    let amount = amount.abs();
    for p in &mut mesh.positions {
        p.x += symmetric(rng) * amount;
        p.y += symmetric(rng) * amount;
        p.z += symmetric(rng) * amount;
    }
    mesh.compute_vertex_normals();
}

fn symmetric(rng: &mut dyn RngCore) -> f32 {
    rng.random::<f32>() * 2.0 - 1.0
}

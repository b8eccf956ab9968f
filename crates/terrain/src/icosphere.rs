use std::collections::HashMap;

use glam::Vec3;
use planetoid_assets::MeshData;

use crate::error::{GenerationError, ensure_positive};

/// Highest subdivision level accepted (163 842 vertices).
pub const MAX_SUBDIVISIONS: u32 = 7;

/// Indexed icosphere of `radius`, each face split into four `subdivisions` times.
pub fn icosphere(radius: f32, subdivisions: u32) -> Result<MeshData, GenerationError> {
    ensure_positive("planet_radius", radius)?;
    if subdivisions > MAX_SUBDIVISIONS {
        return Err(GenerationError::invalid("planet_subdivisions", subdivisions));
    }

    let phi = (1.0 + 5.0f32.sqrt()) / 2.0;
    let mut verts: Vec<Vec3> = vec![
        Vec3::new(-1.0, phi, 0.0).normalize(),
        Vec3::new(1.0, phi, 0.0).normalize(),
        Vec3::new(-1.0, -phi, 0.0).normalize(),
        Vec3::new(1.0, -phi, 0.0).normalize(),
        Vec3::new(0.0, -1.0, phi).normalize(),
        Vec3::new(0.0, 1.0, phi).normalize(),
        Vec3::new(0.0, -1.0, -phi).normalize(),
        Vec3::new(0.0, 1.0, -phi).normalize(),
        Vec3::new(phi, 0.0, -1.0).normalize(),
        Vec3::new(phi, 0.0, 1.0).normalize(),
        Vec3::new(-phi, 0.0, -1.0).normalize(),
        Vec3::new(-phi, 0.0, 1.0).normalize(),
    ];

    #[rustfmt::skip]
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut next = Vec::with_capacity(faces.len() * 4);
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        for &[a, b, c] in &faces {
            let ab = midpoint(&mut verts, &mut midpoints, a, b);
            let bc = midpoint(&mut verts, &mut midpoints, b, c);
            let ca = midpoint(&mut verts, &mut midpoints, c, a);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    let positions = verts.into_iter().map(|v| v * radius).collect();
    let indices = faces.into_iter().flatten().collect();
    Ok(MeshData::new("planet", positions, indices))
}

fn midpoint(
    verts: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }
    let mid = ((verts[a as usize] + verts[b as usize]) * 0.5).normalize();
    let idx = verts.len() as u32;
    verts.push(mid);
    cache.insert(key, idx);
    idx
}

/// Vertex count of an icosphere at `subdivisions`: `10 * 4^n + 2`.
pub fn icosphere_vertex_count(subdivisions: u32) -> usize {
    10 * 4usize.pow(subdivisions) + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_face_counts() {
        for n in 0..4 {
            let mesh = icosphere(1.0, n).unwrap();
            assert_eq!(mesh.vertex_count(), icosphere_vertex_count(n));
            assert_eq!(mesh.triangle_count(), 20 * 4usize.pow(n));
        }
    }

    #[test]
    fn all_vertices_on_radius() {
        let mesh = icosphere(100.0, 3).unwrap();
        for p in &mesh.positions {
            assert!((p.length() - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn normals_face_outward() {
        let mesh = icosphere(10.0, 2).unwrap();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(p.normalize().dot(*n) > 0.9);
        }
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(icosphere(0.0, 2).is_err());
        assert!(icosphere(f32::NAN, 2).is_err());
        assert!(icosphere(1.0, MAX_SUBDIVISIONS + 1).is_err());
    }
}

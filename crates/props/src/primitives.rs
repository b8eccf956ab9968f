//! Low-poly parametric shapes. All primitives share vertices between
//! neighbouring faces so a per-vertex jitter keeps the surface closed.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use planetoid_assets::MeshData;

/// Open-ended tapered tube along +Y from `y = 0` to `y = height`.
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> MeshData {
    let radial = radial_segments.max(3);
    let rows = height_segments.max(1);

    let mut positions = Vec::with_capacity(((rows + 1) * radial) as usize);
    for row in 0..=rows {
        let v = row as f32 / rows as f32;
        let radius = radius_bottom + (radius_top - radius_bottom) * v;
        let y = v * height;
        for seg in 0..radial {
            let theta = seg as f32 / radial as f32 * TAU;
            positions.push(Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
        }
    }

    let mut indices = Vec::with_capacity((rows * radial * 6) as usize);
    for row in 0..rows {
        for seg in 0..radial {
            let next = (seg + 1) % radial;
            let a = row * radial + seg;
            let b = row * radial + next;
            let c = (row + 1) * radial + seg;
            let d = (row + 1) * radial + next;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    MeshData::new("cylinder", positions, indices)
}

/// Latitude/longitude sphere centered at the origin with single pole vertices.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width = width_segments.max(3);
    let height = height_segments.max(2);

    let mut positions = Vec::with_capacity(((height - 1) * width + 2) as usize);
    positions.push(Vec3::new(0.0, radius, 0.0));
    for ring in 1..height {
        let theta = ring as f32 / height as f32 * PI;
        for seg in 0..width {
            let phi = seg as f32 / width as f32 * TAU;
            positions.push(Vec3::new(
                radius * theta.sin() * phi.sin(),
                radius * theta.cos(),
                radius * theta.sin() * phi.cos(),
            ));
        }
    }
    let south = positions.len() as u32;
    positions.push(Vec3::new(0.0, -radius, 0.0));

    let ring_start = |ring: u32| 1 + (ring - 1) * width;
    let mut indices = Vec::new();
    for seg in 0..width {
        let next = (seg + 1) % width;
        indices.extend_from_slice(&[0, ring_start(1) + seg, ring_start(1) + next]);
    }
    for ring in 1..height - 1 {
        for seg in 0..width {
            let next = (seg + 1) % width;
            let a = ring_start(ring) + seg;
            let b = ring_start(ring) + next;
            let c = ring_start(ring + 1) + seg;
            let d = ring_start(ring + 1) + next;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    let last = ring_start(height - 1);
    for seg in 0..width {
        let next = (seg + 1) % width;
        indices.extend_from_slice(&[south, last + next, last + seg]);
    }

    MeshData::new("sphere", positions, indices)
}

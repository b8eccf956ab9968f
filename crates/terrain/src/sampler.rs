use glam::Vec3;
use rand::Rng;

use crate::error::{GenerationError, ensure_finite, ensure_positive};

/// A placement candidate on the sphere surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub index: usize,
    pub position: Vec3,
}

/// Golden-angle increment, `π(3 − √5)`.
pub fn golden_angle() -> f32 {
    std::f32::consts::PI * (3.0 - 5.0f32.sqrt())
}

/// `count` near-uniform points on a sphere of `radius`.
///
/// One global phase in `[0, count)` is drawn from `rng` per call, rotating the
/// spiral so repeated passes differ while each pass stays self-consistent.
pub fn fibonacci_sphere<R: Rng + ?Sized>(
    count: usize,
    radius: f32,
    rng: &mut R,
) -> Result<Vec<SurfaceSample>, GenerationError> {
    let phase = rng.random::<f32>() * count as f32;
    fibonacci_sphere_with_phase(count, radius, phase)
}

/// Deterministic core of [`fibonacci_sphere`] with an explicit phase.
pub fn fibonacci_sphere_with_phase(
    count: usize,
    radius: f32,
    phase: f32,
) -> Result<Vec<SurfaceSample>, GenerationError> {
    if count == 0 {
        return Err(GenerationError::EmptySampleCount);
    }
    ensure_positive("sample_radius", radius)?;
    ensure_finite("sample_phase", phase)?;

    let n = count as f32;
    let offset = 2.0 / n;
    let increment = golden_angle();

    let samples = (0..count)
        .map(|i| {
            let fi = i as f32;
            let y = ((fi * offset - 1.0) + offset / 2.0) * radius;
            let ring = (radius * radius - y * y).max(0.0).sqrt();
            let phi = ((fi + phase) % n) * increment;
            SurfaceSample {
                index: i,
                position: Vec3::new(phi.cos() * ring, y, phi.sin() * ring),
            }
        })
        .collect();
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn returns_exactly_count_points_on_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for count in [1usize, 2, 7, 100, 800] {
            let pts = fibonacci_sphere(count, 100.0, &mut rng).unwrap();
            assert_eq!(pts.len(), count);
            for s in &pts {
                assert!((s.position.length() - 100.0).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn indices_are_sequential() {
        let pts = fibonacci_sphere_with_phase(10, 1.0, 0.0).unwrap();
        for (i, s) in pts.iter().enumerate() {
            assert_eq!(s.index, i);
        }
    }

    #[test]
    fn same_phase_is_deterministic() {
        let a = fibonacci_sphere_with_phase(64, 5.0, 12.5).unwrap();
        let b = fibonacci_sphere_with_phase(64, 5.0, 12.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn phase_rotates_but_keeps_heights() {
        let a = fibonacci_sphere_with_phase(64, 5.0, 0.0).unwrap();
        let b = fibonacci_sphere_with_phase(64, 5.0, 3.0).unwrap();
        assert_ne!(a, b);
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.position.y, pb.position.y);
        }
    }

    #[test]
    fn covers_both_hemispheres_evenly() {
        let pts = fibonacci_sphere_with_phase(800, 1.0, 0.0).unwrap();
        let north = pts.iter().filter(|s| s.position.y > 0.0).count();
        assert_eq!(north, 400);
    }

    #[test]
    fn rejects_empty_and_bad_radius() {
        assert_eq!(
            fibonacci_sphere_with_phase(0, 1.0, 0.0),
            Err(GenerationError::EmptySampleCount)
        );
        assert!(fibonacci_sphere_with_phase(4, -1.0, 0.0).is_err());
        assert!(fibonacci_sphere_with_phase(4, 1.0, f32::NAN).is_err());
    }
}

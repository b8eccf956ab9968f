use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// A half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; `direction` is normalized here.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Geometry used for pointer hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundingVolume {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    /// A flat rectangle spanned by two orthogonal unit axes.
    Quad {
        center: Vec3,
        right: Vec3,
        up: Vec3,
        half_width: f32,
        half_height: f32,
    },
}

impl BoundingVolume {
    /// Distance along `ray` to the nearest intersection in front of its origin.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Self::Sphere { center, radius } => ray_sphere(ray, center, radius),
            Self::Quad {
                center,
                right,
                up,
                half_width,
                half_height,
            } => {
                let normal = right.cross(up);
                let denom = normal.dot(ray.direction);
                if denom.abs() < 1e-6 {
                    return None;
                }
                let t = normal.dot(center - ray.origin) / denom;
                if t < 0.0 {
                    return None;
                }
                let local = ray.at(t) - center;
                let inside = local.dot(right).abs() <= half_width
                    && local.dot(up).abs() <= half_height;
                inside.then_some(t)
            }
        }
    }

    /// Apply a parent transform. Sphere radii scale by the largest axis scale.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let (scale, _, _) = matrix.to_scale_rotation_translation();
        match *self {
            Self::Sphere { center, radius } => Self::Sphere {
                center: matrix.transform_point3(center),
                radius: radius * scale.abs().max_element(),
            },
            Self::Quad {
                center,
                right,
                up,
                half_width,
                half_height,
            } => Self::Quad {
                center: matrix.transform_point3(center),
                right: matrix.transform_vector3(right).normalize_or_zero(),
                up: matrix.transform_vector3(up).normalize_or_zero(),
                half_width: half_width * scale.x.abs(),
                half_height: half_height * scale.y.abs(),
            },
        }
    }

    pub fn center(&self) -> Vec3 {
        match *self {
            Self::Sphere { center, .. } | Self::Quad { center, .. } => center,
        }
    }
}

fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    if near >= 0.0 {
        return Some(near);
    }
    // Origin inside the sphere.
    let far = -b + sqrt_disc;
    (far >= 0.0).then_some(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_sphere_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let sphere = BoundingVolume::Sphere {
            center: Vec3::ZERO,
            radius: 2.0,
        };
        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 8.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_sphere_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let sphere = BoundingVolume::Sphere {
            center: Vec3::ZERO,
            radius: 2.0,
        };
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn ray_from_inside_sphere_hits_at_zero() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let sphere = BoundingVolume::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        assert_eq!(sphere.intersect(&ray), Some(0.0));
    }

    #[test]
    fn quad_hit_and_miss() {
        let quad = BoundingVolume::Quad {
            center: Vec3::ZERO,
            right: Vec3::X,
            up: Vec3::Y,
            half_width: 0.75,
            half_height: 0.75,
        };
        let hit = Ray::new(Vec3::new(0.5, -0.5, 7.0), Vec3::NEG_Z);
        assert!((quad.intersect(&hit).unwrap() - 7.0).abs() < 1e-5);
        let miss = Ray::new(Vec3::new(0.8, 0.0, 7.0), Vec3::NEG_Z);
        assert!(quad.intersect(&miss).is_none());
        let parallel = Ray::new(Vec3::new(0.0, 0.0, 7.0), Vec3::X);
        assert!(quad.intersect(&parallel).is_none());
    }

    #[test]
    fn transformed_sphere_follows_parent_scale() {
        let sphere = BoundingVolume::Sphere {
            center: Vec3::new(10.0, 0.0, 0.0),
            radius: 2.0,
        };
        let m = Mat4::from_scale(Vec3::splat(0.5));
        match sphere.transformed(&m) {
            BoundingVolume::Sphere { center, radius } => {
                assert!((center - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-6);
                assert!((radius - 1.0).abs() < 1e-6);
            }
            other => panic!("unexpected volume {other:?}"),
        }
    }
}

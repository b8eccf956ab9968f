use std::f32::consts::TAU;

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use planetoid_common::Ray;
use serde::{Deserialize, Serialize};

const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Camera parameters as they appear in scene configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit speed; `1.0` is one revolution per minute.
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            distance: 400.0,
            near: 0.1,
            far: 10_000.0,
            auto_rotate_speed: 0.1,
        }
    }
}

impl CameraConfig {
    pub fn is_valid(&self) -> bool {
        self.fov_degrees.is_finite()
            && self.fov_degrees > 0.0
            && self.fov_degrees < 180.0
            && self.distance.is_finite()
            && self.distance > 0.0
            && self.near > 0.0
            && self.far.is_finite()
            && self.far > self.near
            && self.auto_rotate_speed.is_finite()
    }
}

/// Camera orbiting a target at a fixed distance.
///
/// Yaw rotates about +Y, pitch raises the eye above the target's horizon.
/// At zero yaw and pitch the eye sits on +Z looking toward -Z.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub auto_rotate_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            distance: config.distance,
            yaw: 0.0,
            pitch: 0.0,
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            auto_rotate_speed: config.auto_rotate_speed,
        }
    }

    /// Re-aim so the eye sits at `eye` looking at `target`.
    pub fn look_from(&mut self, eye: Vec3, target: Vec3) {
        let offset = eye - target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        self.target = target;
        self.distance = distance;
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize_or_zero()
    }

    /// Advance auto-rotation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.yaw = (self.yaw + TAU / 60.0 * self.auto_rotate_speed * dt).rem_euclid(TAU);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let eye = self.position();
        Ray::new(eye, far - eye)
    }

    /// Project a world point to NDC. `None` when the point is behind the eye.
    pub fn world_to_ndc(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * point.extend(1.0);
        (clip.w > f32::EPSILON).then(|| clip.xyz() / clip.w)
    }
}

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("viewport must have a positive finite size, got {width}x{height}")]
    DegenerateViewport { width: f32, height: f32 },
}

/// Screen rectangle the scene renders into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, InputError> {
        Self::with_origin(0.0, 0.0, width, height)
    }

    pub fn with_origin(x: f32, y: f32, width: f32, height: f32) -> Result<Self, InputError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height) && x.is_finite() && y.is_finite()) {
            return Err(InputError::DegenerateViewport { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Normalized device coordinates: x right, y up, both in `[-1, 1]` inside
    /// the viewport.
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x - self.x) / self.width * 2.0 - 1.0,
            -((screen.y - self.y) / self.height) * 2.0 + 1.0,
        )
    }

    /// Inverse of [`Viewport::to_ndc`].
    pub fn to_screen(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.x + (ndc.x + 1.0) * 0.5 * self.width,
            self.y + (1.0 - ndc.y) * 0.5 * self.height,
        )
    }

    pub fn contains(&self, screen: Vec2) -> bool {
        screen.x >= self.x
            && screen.y >= self.y
            && screen.x <= self.x + self.width
            && screen.y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_and_center_map_to_ndc() {
        let vp = Viewport::new(800.0, 600.0).unwrap();
        assert_eq!(vp.to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
        assert_eq!(vp.to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn offset_viewport() {
        let vp = Viewport::with_origin(100.0, 50.0, 200.0, 100.0).unwrap();
        assert_eq!(vp.to_ndc(Vec2::new(200.0, 100.0)), Vec2::ZERO);
        assert!(!vp.contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn screen_round_trip() {
        let vp = Viewport::new(1024.0, 768.0).unwrap();
        let p = Vec2::new(123.0, 456.0);
        assert!((vp.to_screen(vp.to_ndc(p)) - p).length() < 1e-3);
    }

    #[test]
    fn rejects_degenerate_size() {
        assert!(Viewport::new(0.0, 600.0).is_err());
        assert!(Viewport::new(800.0, f32::NAN).is_err());
        assert!((Viewport::new(800.0, 400.0).unwrap().aspect() - 2.0).abs() < 1e-6);
    }
}

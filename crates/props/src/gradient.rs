use crate::color::Color;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("color gradient needs at least one stop")]
pub struct EmptyGradient;

/// Evenly spaced color stops over `[0, 1]`, linearly interpolated in RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGradient {
    stops: Vec<Color>,
}

impl ColorGradient {
    pub fn new(stops: Vec<Color>) -> Result<Self, EmptyGradient> {
        if stops.is_empty() {
            return Err(EmptyGradient);
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    /// Color at `t`; values outside `[0, 1]` clamp to the end stops.
    pub fn sample(&self, t: f32) -> Color {
        let last = self.stops.len() - 1;
        if last == 0 || !t.is_finite() {
            return self.stops[0];
        }
        let scaled = t.clamp(0.0, 1.0) * last as f32;
        let i = (scaled.floor() as usize).min(last - 1);
        self.stops[i].lerp(self.stops[i + 1], scaled - i as f32)
    }
}

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/// Normalized-time to normalized-progress mapping.
///
/// Every variant maps `0 → 0` and `1 → 1`; elastic curves overshoot in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// `1 − (1 − t)^(power + 1)`; `power: 1` is the common quadratic ease-out.
    PowerOut { power: u32 },
    /// Decaying sine that overshoots the target and settles on it.
    ElasticOut { amplitude: f32, period: f32 },
}

impl Easing {
    pub const fn power1_out() -> Self {
        Self::PowerOut { power: 1 }
    }

    pub const fn elastic_out(amplitude: f32, period: f32) -> Self {
        Self::ElasticOut { amplitude, period }
    }

    /// Progress at normalized time `t`, clamped to `[0, 1]` first.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Self::Linear => t,
            Self::PowerOut { power } => 1.0 - (1.0 - t).powi(power as i32 + 1),
            Self::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Linear | Self::PowerOut { .. } => true,
            Self::ElasticOut { amplitude, period } => {
                amplitude.is_finite() && amplitude > 0.0 && period.is_finite() && period > 0.0
            }
        }
    }
}

fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    let p1 = amplitude.max(1.0);
    let period = period / amplitude.min(1.0);
    let phase = period / TAU * (1.0 / p1).asin();
    p1 * 2f32.powf(-10.0 * t) * ((t - phase) * TAU / period).sin() + 1.0
}

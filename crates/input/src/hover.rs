use serde::{Deserialize, Serialize};

/// Discrete hover state. No terminal state: objects cycle for their lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverPhase {
    #[default]
    Idle,
    Hovering,
}

/// Exponential smoothing parameters for hover strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Smoothing {
    /// Fraction of the remaining distance covered per tick, in `(0, 1]`.
    pub factor: f32,
    /// Distance below which the strength snaps onto its target.
    pub epsilon: f32,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            factor: 0.08,
            epsilon: 0.01,
        }
    }
}

impl Smoothing {
    pub fn is_valid(&self) -> bool {
        self.factor.is_finite()
            && self.factor > 0.0
            && self.factor <= 1.0
            && self.epsilon.is_finite()
            && self.epsilon >= 0.0
    }
}

/// Per-object hover state with a continuous strength in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    pub phase: HoverPhase,
    pub hover_strength: f32,
    pub target_strength: f32,
}

impl InteractionState {
    pub fn is_hovering(&self) -> bool {
        self.phase == HoverPhase::Hovering
    }

    /// Enter `Hovering`. Returns true only on an Idle → Hovering transition.
    pub fn enter(&mut self) -> bool {
        self.target_strength = 1.0;
        let entered = self.phase == HoverPhase::Idle;
        self.phase = HoverPhase::Hovering;
        entered
    }

    /// Return to `Idle`. Returns true only on a Hovering → Idle transition.
    pub fn leave(&mut self) -> bool {
        self.target_strength = 0.0;
        let left = self.phase == HoverPhase::Hovering;
        self.phase = HoverPhase::Idle;
        left
    }

    /// Move `hover_strength` toward its target by one tick of smoothing.
    /// Never overshoots; snaps onto the target within `epsilon`.
    pub fn smooth(&mut self, smoothing: Smoothing) -> f32 {
        let diff = self.target_strength - self.hover_strength;
        if diff.abs() <= smoothing.epsilon {
            self.hover_strength = self.target_strength;
        } else {
            self.hover_strength += diff * smoothing.factor.clamp(0.0, 1.0);
        }
        self.hover_strength = self.hover_strength.clamp(0.0, 1.0);
        self.hover_strength
    }

    /// True once the strength has settled on its target.
    pub fn is_settled(&self) -> bool {
        self.hover_strength == self.target_strength
    }
}

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::TweenError;

/// A value a tween can drive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TweenValue {
    Scalar(f32),
    Vec3(Vec3),
}

impl TweenValue {
    fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Scalar(_), Self::Scalar(_)) | (Self::Vec3(_), Self::Vec3(_))
        )
    }

    fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(v) => v.is_finite(),
            Self::Vec3(v) => v.is_finite(),
        }
    }

    /// `self + (to − self)·t`. Mismatched kinds yield `to`.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        match (self, to) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(a + (b - a) * t),
            (Self::Vec3(a), Self::Vec3(b)) => Self::Vec3(a + (b - a) * t),
            (_, b) => b,
        }
    }

    /// Uniform scale from a scalar, or the vector itself.
    pub fn as_vec3(self) -> Vec3 {
        match self {
            Self::Scalar(v) => Vec3::splat(v),
            Self::Vec3(v) => v,
        }
    }
}

/// Which property of an entity a tween drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TweenProperty {
    Scale,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweenState {
    Pending,
    Running,
    Completed,
}

/// Parameters of one eased transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub from: TweenValue,
    pub to: TweenValue,
    pub duration: f32,
    pub easing: Easing,
    pub delay: f32,
}

impl TweenSpec {
    pub fn new(from: TweenValue, to: TweenValue, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            delay: 0.0,
        }
    }

    pub fn scalar(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenValue::Scalar(from), TweenValue::Scalar(to), duration, easing)
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn validate(&self) -> Result<(), TweenError> {
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(TweenError::InvalidDuration(self.duration));
        }
        if !(self.delay.is_finite() && self.delay >= 0.0) {
            return Err(TweenError::InvalidDelay(self.delay));
        }
        if !self.from.same_kind(&self.to) {
            return Err(TweenError::MismatchedValues);
        }
        if !(self.from.is_finite() && self.to.is_finite()) {
            return Err(TweenError::NonFiniteValue);
        }
        if !self.easing.is_valid() {
            return Err(TweenError::InvalidEasing(self.easing));
        }
        Ok(())
    }
}

/// A running interpolation. Advanced by [`Tween::advance`].
#[derive(Debug, Clone)]
pub struct Tween {
    spec: TweenSpec,
    delay_left: f32,
    elapsed: f32,
    state: TweenState,
}

impl Tween {
    pub fn new(spec: TweenSpec) -> Result<Self, TweenError> {
        spec.validate()?;
        Ok(Self {
            delay_left: spec.delay,
            spec,
            elapsed: 0.0,
            state: TweenState::Pending,
        })
    }

    pub fn spec(&self) -> &TweenSpec {
        &self.spec
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    /// Time spent running, excluding the delay.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `dt` seconds. Returns the value to write, or `None` while
    /// still waiting out the delay or after completion.
    ///
    /// Time left over when the delay expires mid-tick carries into the run.
    /// Once `elapsed ≥ duration` the value is exactly `to`.
    pub fn advance(&mut self, dt: f32) -> Option<TweenValue> {
        let mut dt = dt.max(0.0);
        if self.state == TweenState::Pending {
            self.delay_left -= dt;
            if self.delay_left > 0.0 {
                return None;
            }
            dt = -self.delay_left;
            self.delay_left = 0.0;
            self.state = TweenState::Running;
        }
        if self.state == TweenState::Completed {
            return None;
        }

        self.elapsed += dt;
        if self.elapsed >= self.spec.duration {
            self.state = TweenState::Completed;
            return Some(self.spec.to);
        }
        let progress = (self.elapsed / self.spec.duration).clamp(0.0, 1.0);
        Some(
            self.spec
                .from
                .lerp(self.spec.to, self.spec.easing.apply(progress)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_target_exactly_at_duration() {
        let mut tw = Tween::new(TweenSpec::scalar(0.0, 2.0, 1.0, Easing::Linear)).unwrap();
        assert_eq!(tw.advance(0.25), Some(TweenValue::Scalar(0.5)));
        assert_eq!(tw.advance(0.75), Some(TweenValue::Scalar(2.0)));
        assert_eq!(tw.state(), TweenState::Completed);
        assert_eq!(tw.advance(10.0), None);
    }

    #[test]
    fn snaps_to_target_even_with_overshooting_easing() {
        let spec = TweenSpec::scalar(0.01, 1.0, 3.0, Easing::elastic_out(1.0, 0.2));
        let mut tw = Tween::new(spec).unwrap();
        let mut last = None;
        for _ in 0..200 {
            if let Some(v) = tw.advance(1.0 / 60.0) {
                last = Some(v);
            }
        }
        assert_eq!(last, Some(TweenValue::Scalar(1.0)));
    }

    #[test]
    fn delay_holds_value_then_carries_leftover() {
        let spec = TweenSpec::scalar(0.0, 1.0, 1.0, Easing::Linear).with_delay(0.5);
        let mut tw = Tween::new(spec).unwrap();
        assert_eq!(tw.advance(0.3), None);
        assert_eq!(tw.state(), TweenState::Pending);
        let v = tw.advance(0.4).unwrap();
        assert_eq!(tw.state(), TweenState::Running);
        match v {
            TweenValue::Scalar(x) => assert!((x - 0.2).abs() < 1e-5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut tw = Tween::new(TweenSpec::scalar(0.0, 1.0, 0.0, Easing::Linear)).unwrap();
        assert_eq!(tw.advance(0.0), Some(TweenValue::Scalar(1.0)));
        assert_eq!(tw.state(), TweenState::Completed);
    }

    #[test]
    fn vec3_interpolates_componentwise() {
        let spec = TweenSpec::new(
            TweenValue::Vec3(Vec3::ZERO),
            TweenValue::Vec3(Vec3::new(2.0, 4.0, 6.0)),
            2.0,
            Easing::Linear,
        );
        let mut tw = Tween::new(spec).unwrap();
        assert_eq!(tw.advance(1.0), Some(TweenValue::Vec3(Vec3::new(1.0, 2.0, 3.0))));
    }

    #[test]
    fn invalid_specs_rejected() {
        let ok = TweenSpec::scalar(0.0, 1.0, 1.0, Easing::Linear);
        assert!(matches!(
            Tween::new(TweenSpec { duration: -1.0, ..ok }),
            Err(TweenError::InvalidDuration(_))
        ));
        assert!(matches!(
            Tween::new(ok.with_delay(f32::INFINITY)),
            Err(TweenError::InvalidDelay(_))
        ));
        assert!(matches!(
            Tween::new(TweenSpec {
                to: TweenValue::Vec3(Vec3::ONE),
                ..ok
            }),
            Err(TweenError::MismatchedValues)
        ));
        assert!(matches!(
            Tween::new(TweenSpec {
                from: TweenValue::Scalar(f32::NAN),
                ..ok
            }),
            Err(TweenError::NonFiniteValue)
        ));
    }

    #[test]
    fn scalar_widens_to_uniform_vec3() {
        assert_eq!(TweenValue::Scalar(0.5).as_vec3(), Vec3::splat(0.5));
    }
}

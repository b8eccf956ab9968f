use crate::easing::Easing;
use crate::scheduler::TweenHandle;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TweenError {
    #[error("tween duration must be finite and non-negative, got {0}")]
    InvalidDuration(f32),
    #[error("tween delay must be finite and non-negative, got {0}")]
    InvalidDelay(f32),
    #[error("tween endpoints must both be scalars or both be vectors")]
    MismatchedValues,
    #[error("tween endpoints must be finite")]
    NonFiniteValue,
    #[error("invalid easing parameters: {0:?}")]
    InvalidEasing(Easing),
    #[error("no active tween for {0:?}")]
    NotActive(TweenHandle),
}

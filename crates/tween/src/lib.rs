//! Tweens: time-driven eased interpolation of entity properties.
//!
//! # Invariants
//! - At most one active tween per (entity, property); rescheduling replaces.
//! - A delayed tween writes nothing until its delay has elapsed.
//! - A tween writes exactly its `to` value on the tick it completes, then
//!   leaves the active set.
//! - Easing functions are pure functions of normalized time.

mod easing;
mod error;
mod scheduler;
mod tween;

pub use easing::Easing;
pub use error::TweenError;
pub use scheduler::{TickStats, TweenHandle, TweenScheduler, TweenSink, TweenTarget};
pub use tween::{Tween, TweenProperty, TweenSpec, TweenState, TweenValue};

pub fn crate_info() -> &'static str {
    "planetoid-tween v0.1.0"
}

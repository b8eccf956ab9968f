//! Input: pointer and viewport actions, screen-to-NDC mapping, hover state.
//!
//! # Invariants
//! - Scenes consume [`Action`]s, never raw platform events.
//! - `0 ≤ hover_strength ≤ 1`; smoothing never overshoots its target.

pub mod action;
pub mod hover;
pub mod viewport;

pub use action::Action;
pub use hover::{HoverPhase, InteractionState, Smoothing};
pub use viewport::{InputError, Viewport};

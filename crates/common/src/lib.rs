//! Shared types for the planetoid scene core.
//!
//! # Invariants
//! - `Ray::direction` is always normalized (or zero for a degenerate ray).
//! - Hit distances are measured along the ray from its origin and never negative.

mod geometry;
mod types;

pub use geometry::{BoundingVolume, Ray};
pub use types::{EntityId, Transform};

//! Procedural props: trees and rocks built from parametric primitives.
//!
//! # Invariants
//! - Every vertex of a prop is jittered once at build time; normals are
//!   recomputed afterwards and geometry is immutable from then on.
//! - A prop owns its meshes and materials; placeholder props share the
//!   store's fallback pair and never dispose it.

mod builder;
mod color;
mod gradient;
mod jitter;
mod primitives;

pub use builder::{
    BuildError, PropFactory, PropKind, PropModel, PropPart, ProceduralProps, TreeParams,
    placeholder_model,
};
pub use color::{Color, ColorError};
pub use gradient::{ColorGradient, EmptyGradient};
pub use jitter::{JITTER_FRACTION, jitter_vertices};
pub use primitives::{cylinder, uv_sphere};

pub fn crate_info() -> &'static str {
    "planetoid-props v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("props"));
    }
}

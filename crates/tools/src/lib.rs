//! Developer tooling: read-only scene inspection.
//!
//! # Invariants
//! - Inspection never mutates the scene, its tweens or its hover state.

mod inspector;

pub use inspector::{ObjectInfo, SceneInspector, SceneSummary};

/// Crate identification for diagnostics.
pub fn crate_info() -> &'static str {
    "planetoid-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}

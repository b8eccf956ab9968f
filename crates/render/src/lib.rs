//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers cannot mutate scene state or assets.
//! - Render state derives from scene state and view, once per tick, after
//!   tweens and interaction have been advanced.
//!
//! # Workaround
//! Provides a trait-based renderer interface with a debug text renderer for
//! headless runs. A GPU backend implements the same trait without changing
//! consumers.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderFrame, RenderItem, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "planetoid-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}

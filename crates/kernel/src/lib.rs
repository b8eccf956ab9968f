//! Scene kernel: planet generation, prop scatter, hover/click resolution and
//! the per-frame driver, plus the media gallery scene.
//!
//! # Invariants
//! - Generation is reproducible from `SceneConfig::seed`; only entity ids differ.
//! - Every planet vertex is displaced exactly once and its noise cached.
//! - No prop stands on a water sample.
//! - At most one object is hovered at a time; hover strength stays in `[0, 1]`.
//! - A rebuild releases every mesh, material and tween of the previous pass.

pub mod config;
pub mod driver;
pub mod error;
pub mod gallery;
pub mod generator;
pub mod interaction;
pub mod scatter;
pub mod scene;
pub mod world;

pub use config::{
    ConfigError, GalleryConfig, GalleryLayout, InteractionConfig, NoiseConfig, PlanetConfig,
    Range, ScatterConfig, SceneConfig, TweenConfig,
};
pub use driver::{FrameDriver, FrameTimer};
pub use error::WorldError;
pub use gallery::{MediaGallery, MediaPanel, panel_mesh};
pub use generator::Generator;
pub use interaction::{ActivationLog, InteractionResolver, MediaActivation, nearest_hit};
pub use scatter::{ScatterEngine, ScatterObject, ScatterReport};
pub use scene::{PickTarget, Scene};
pub use world::{Planet, World, WorldEvent};

/// Crate identification for diagnostics.
pub fn crate_info() -> &'static str {
    "planetoid-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}

use planetoid_assets::AssetError;
use planetoid_common::EntityId;
use planetoid_input::InputError;
use planetoid_props::{BuildError, EmptyGradient};
use planetoid_terrain::GenerationError;
use planetoid_tween::TweenError;

use crate::config::ConfigError;

/// Umbrella error for scene generation and driving.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Tween(#[from] TweenError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gradient(#[from] EmptyGradient),
    #[error("unknown entity {}", .0.short())]
    UnknownEntity(EntityId),
}

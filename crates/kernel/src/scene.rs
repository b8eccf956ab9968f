use planetoid_assets::AssetStore;
use planetoid_camera::CameraConfig;
use planetoid_common::{BoundingVolume, EntityId};
use planetoid_input::{Smoothing, Viewport};
use planetoid_render::RenderItem;
use planetoid_tween::{TweenScheduler, TweenSink, TweenSpec};

use crate::error::WorldError;

/// Something the pointer can hit: one volume per logical object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget {
    pub id: EntityId,
    pub volume: BoundingVolume,
}

/// An interactive scene driven by [`crate::FrameDriver`].
///
/// Scenes own their objects and assets. Tween output arrives through
/// [`TweenSink`]; hover state is owned by the driver's interaction resolver.
pub trait Scene: TweenSink {
    fn name(&self) -> &str;

    fn assets(&self) -> &AssetStore;

    /// World-space hit volumes of every interactive object.
    fn pick_targets(&self) -> Vec<PickTarget>;

    /// Identifier handed to the activation callback when `id` is clicked.
    fn resource(&self, id: EntityId) -> Option<&str>;

    /// Drawables with world transforms. Hover strength is filled in by the driver.
    fn render_items(&self) -> Vec<RenderItem>;

    fn camera_config(&self) -> CameraConfig;

    fn smoothing(&self) -> Smoothing;

    /// Tween played on an object when it starts being hovered.
    fn pulse(&self) -> Option<TweenSpec> {
        None
    }

    /// Per-tick scene animation, before tweens run.
    fn advance(&mut self, _dt: f32) {}

    /// React to a new viewport. Returns true when object geometry was replaced
    /// and hover state must be reset.
    fn resize(&mut self, _viewport: &Viewport) -> Result<bool, WorldError> {
        Ok(false)
    }

    /// Tear down and regenerate all content.
    fn rebuild(&mut self, _tweens: &mut TweenScheduler) -> Result<(), WorldError> {
        Ok(())
    }
}

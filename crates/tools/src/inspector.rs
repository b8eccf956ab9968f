use std::fmt;

use planetoid_common::EntityId;
use planetoid_kernel::{FrameDriver, InteractionResolver, MediaActivation, Scene, World};
use planetoid_props::PropKind;
use planetoid_render::Renderer;
use planetoid_tween::{TweenScheduler, TweenTarget};
use serde::Serialize;

/// Read-only queries against a planet scene for debugging and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(
        world: &World,
        tweens: &TweenScheduler,
        interaction: &InteractionResolver,
    ) -> SceneSummary {
        let assets = world.assets();
        SceneSummary {
            seed: world.seed(),
            generation: world.generation(),
            trees: world.count_of(PropKind::Tree),
            rocks: world.count_of(PropKind::Rock),
            fallbacks: world.report().fallbacks,
            skipped_water: world.report().skipped_water,
            water_fraction: world.planet().water_fraction,
            active_tweens: tweens.active_count(),
            hovered: interaction.hovered(),
            fading: interaction.tracked(),
            live_meshes: assets.live_meshes(),
            live_materials: assets.live_materials(),
            pending_events: world.events().len(),
        }
    }

    /// Summary of the world a driver is running.
    pub fn from_driver<R, A>(driver: &FrameDriver<World, R, A>) -> SceneSummary
    where
        R: Renderer,
        A: MediaActivation,
    {
        Self::summary(driver.scene(), driver.tweens(), driver.interaction())
    }

    pub fn inspect_object(
        world: &World,
        tweens: &TweenScheduler,
        interaction: &InteractionResolver,
        id: EntityId,
    ) -> Option<ObjectInfo> {
        world.object(id).map(|object| {
            let p = object.transform.position;
            let s = object.transform.scale;
            ObjectInfo {
                id,
                kind: object.kind,
                sample_index: object.sample_index,
                position: [p.x, p.y, p.z],
                scale: s.x,
                noise: object.noise,
                placeholder: object.model.placeholder,
                resource: object.resource.clone(),
                tweening: tweens.active_handle(TweenTarget::scale(id)).is_some(),
                hover_strength: interaction.hover_strength(id),
            }
        })
    }

    /// Object ids in deterministic order.
    pub fn list_objects(world: &World) -> Vec<EntityId> {
        world.objects().keys().copied().collect()
    }
}

/// Snapshot of a planet scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub seed: u64,
    pub generation: u64,
    pub trees: usize,
    pub rocks: usize,
    pub fallbacks: usize,
    pub skipped_water: usize,
    pub water_fraction: f32,
    pub active_tweens: usize,
    pub hovered: Option<EntityId>,
    /// Objects with hover state, hovered or still fading out.
    pub fading: usize,
    pub live_meshes: usize,
    pub live_materials: usize,
    pub pending_events: usize,
}

impl SceneSummary {
    pub fn objects(&self) -> usize {
        self.trees + self.rocks
    }
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Planet: seed={} generation={} water={:.1}%",
            self.seed,
            self.generation,
            self.water_fraction * 100.0
        )?;
        writeln!(
            f,
            "Objects: {} (trees={} rocks={} fallbacks={}) skipped_water={}",
            self.objects(),
            self.trees,
            self.rocks,
            self.fallbacks,
            self.skipped_water
        )?;
        let hovered = self
            .hovered
            .map_or_else(|| "none".to_string(), |id| id.short());
        writeln!(
            f,
            "Tweens: {} active | hovered={} tracked={}",
            self.active_tweens, hovered, self.fading
        )?;
        write!(
            f,
            "Assets: meshes={} materials={} | events={}",
            self.live_meshes, self.live_materials, self.pending_events
        )
    }
}

/// Detailed info about a single prop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectInfo {
    pub id: EntityId,
    pub kind: PropKind,
    pub sample_index: usize,
    pub position: [f32; 3],
    pub scale: f32,
    pub noise: f32,
    pub placeholder: bool,
    pub resource: String,
    pub tweening: bool,
    pub hover_strength: f32,
}

impl fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] #{} pos=({:.2}, {:.2}, {:.2}) scale={:.2} noise={:.3} {}{}",
            self.kind,
            self.id.short(),
            self.sample_index,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale,
            self.noise,
            self.resource,
            if self.placeholder { " (placeholder)" } else { "" },
        )
    }
}

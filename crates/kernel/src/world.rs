use std::collections::BTreeMap;
use std::fmt;

use glam::Mat4;
use planetoid_assets::{AssetStore, Material, MaterialHandle, MeshHandle};
use planetoid_camera::CameraConfig;
use planetoid_common::{EntityId, Transform};
use planetoid_input::Smoothing;
use planetoid_props::{ProceduralProps, PropFactory, PropKind};
use planetoid_render::RenderItem;
use planetoid_terrain::{NoiseCache, PlanetMesh, fibonacci_sphere};
use planetoid_tween::{
    TweenProperty, TweenScheduler, TweenSink, TweenSpec, TweenTarget, TweenValue,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::error::WorldError;
use crate::generator::Generator;
use crate::scatter::{ScatterEngine, ScatterObject, ScatterReport};
use crate::scene::{PickTarget, Scene};

/// An event record produced by every generation-level mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A generation pass finished.
    Generated {
        generation: u64,
        seed: u64,
        report: ScatterReport,
    },
    /// A prop was placed on the surface.
    Placed {
        id: EntityId,
        kind: PropKind,
        sample_index: usize,
    },
    /// Previous content was released before a rebuild.
    Disposed { meshes: usize, materials: usize },
}

/// The displaced sphere every prop stands on.
#[derive(Debug, Clone)]
pub struct Planet {
    pub id: EntityId,
    pub transform: Transform,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    /// Per-vertex terrain noise, indexed like the mesh vertices.
    pub noises: NoiseCache,
    pub water_fraction: f32,
}

struct Generated {
    planet: Planet,
    objects: BTreeMap<EntityId, ScatterObject>,
    report: ScatterReport,
}

/// The planet scene: a displaced planet plus its scattered props.
///
/// Props are children of the planet, so their world transforms include the
/// planet's animated scale. Uses BTreeMap for deterministic iteration order.
/// Given the same config (seed included), generation produces the same
/// terrain and the same prop layout; only entity ids differ.
pub struct World {
    config: SceneConfig,
    seed: u64,
    generation: u64,
    planet: Planet,
    objects: BTreeMap<EntityId, ScatterObject>,
    report: ScatterReport,
    assets: AssetStore,
    factory: Box<dyn PropFactory>,
    event_log: Vec<WorldEvent>,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("seed", &self.seed)
            .field("generation", &self.generation)
            .field("objects", &self.objects.len())
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Generate with the procedural prop factory. Reveal tweens are scheduled on `tweens`.
    pub fn generate(config: SceneConfig, tweens: &mut TweenScheduler) -> Result<Self, WorldError> {
        let factory = Box::new(ProceduralProps::new(config.scatter.rock_color));
        Self::generate_with(config, factory, tweens)
    }

    pub fn generate_with(
        config: SceneConfig,
        mut factory: Box<dyn PropFactory>,
        tweens: &mut TweenScheduler,
    ) -> Result<Self, WorldError> {
        let mut assets = AssetStore::new();
        let seed = config.seed;
        let generated = generate_pass(&config, seed, factory.as_mut(), &mut assets, tweens)?;
        let mut world = Self {
            config,
            seed,
            generation: 0,
            planet: generated.planet,
            objects: generated.objects,
            report: generated.report,
            assets,
            factory,
            event_log: Vec::new(),
        };
        world.log_generation();
        Ok(world)
    }

    /// Current generation seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of completed rebuilds.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    /// Read-only access to all props (BTreeMap for deterministic iteration).
    pub fn objects(&self) -> &BTreeMap<EntityId, ScatterObject> {
        &self.objects
    }

    pub fn object(&self, id: EntityId) -> Option<&ScatterObject> {
        self.objects.get(&id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn count_of(&self, kind: PropKind) -> usize {
        self.objects.values().filter(|o| o.kind == kind).count()
    }

    pub fn report(&self) -> ScatterReport {
        self.report
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn planet_matrix(&self) -> Mat4 {
        self.planet.transform.to_matrix()
    }

    /// Release every tween, mesh and material this world owns.
    ///
    /// Tweens are cancelled first so nothing writes into objects being
    /// discarded. The shared placeholder pair is kept.
    fn teardown(&mut self, tweens: &mut TweenScheduler) -> Result<(), WorldError> {
        let before = self.assets.stats();
        tweens.cancel_entity(self.planet.id);
        for (id, object) in std::mem::take(&mut self.objects) {
            tweens.cancel_entity(id);
            object.model.dispose(&mut self.assets)?;
        }
        self.assets.dispose_mesh(self.planet.mesh)?;
        self.assets.dispose_material(self.planet.material)?;

        let after = self.assets.stats();
        let meshes = (after.meshes_disposed - before.meshes_disposed) as usize;
        let materials = (after.materials_disposed - before.materials_disposed) as usize;
        tracing::debug!(meshes, materials, "world content disposed");
        self.event_log.push(WorldEvent::Disposed { meshes, materials });
        Ok(())
    }

    fn log_generation(&mut self) {
        for object in self.objects.values() {
            self.event_log.push(WorldEvent::Placed {
                id: object.id,
                kind: object.kind,
                sample_index: object.sample_index,
            });
        }
        self.event_log.push(WorldEvent::Generated {
            generation: self.generation,
            seed: self.seed,
            report: self.report,
        });
        tracing::info!(
            generation = self.generation,
            seed = self.seed,
            objects = self.objects.len(),
            water_fraction = self.planet.water_fraction,
            "world generated"
        );
    }
}

impl TweenSink for World {
    fn apply(&mut self, target: TweenTarget, value: TweenValue) {
        let transform = if target.entity == self.planet.id {
            Some(&mut self.planet.transform)
        } else {
            self.objects
                .get_mut(&target.entity)
                .map(|object| &mut object.transform)
        };
        let Some(transform) = transform else {
            tracing::trace!(entity = %target.entity.short(), "tween output for unknown entity");
            return;
        };
        match target.property {
            TweenProperty::Scale => transform.scale = value.as_vec3(),
            TweenProperty::Position => transform.position = value.as_vec3(),
        }
    }
}

impl Scene for World {
    fn name(&self) -> &str {
        "planet"
    }

    fn assets(&self) -> &AssetStore {
        &self.assets
    }

    fn pick_targets(&self) -> Vec<PickTarget> {
        let parent = self.planet_matrix();
        self.objects
            .values()
            .map(|object| PickTarget {
                id: object.id,
                volume: object.pick_volume(&parent),
            })
            .collect()
    }

    fn resource(&self, id: EntityId) -> Option<&str> {
        self.objects.get(&id).map(|object| object.resource.as_str())
    }

    fn render_items(&self) -> Vec<RenderItem> {
        let parent = self.planet_matrix();
        let mut items = vec![RenderItem {
            entity: self.planet.id,
            label: "planet".into(),
            mesh: self.planet.mesh,
            material: self.planet.material,
            transform: parent,
            hover_strength: 0.0,
            time: 0.0,
        }];
        for object in self.objects.values() {
            let transform = parent * object.transform.to_matrix();
            for part in &object.model.parts {
                items.push(RenderItem {
                    entity: object.id,
                    label: object.kind.to_string(),
                    mesh: part.mesh,
                    material: part.material,
                    transform,
                    hover_strength: 0.0,
                    time: 0.0,
                });
            }
        }
        items
    }

    fn camera_config(&self) -> CameraConfig {
        self.config.camera
    }

    fn smoothing(&self) -> Smoothing {
        self.config.interaction.smoothing
    }

    fn pulse(&self) -> Option<TweenSpec> {
        self.config.interaction.pulse.map(|pulse| pulse.fixed_spec())
    }

    /// Generate under the next seed, then dispose the previous content and
    /// swap the new one in. A failed pass leaves the current world intact.
    fn rebuild(&mut self, tweens: &mut TweenScheduler) -> Result<(), WorldError> {
        let _span = tracing::info_span!("world_rebuild", generation = self.generation).entered();
        let seed = splitmix64(self.seed);
        let generated = generate_pass(
            &self.config,
            seed,
            self.factory.as_mut(),
            &mut self.assets,
            tweens,
        )?;
        self.teardown(tweens)?;
        self.seed = seed;
        self.generation += 1;
        self.planet = generated.planet;
        self.objects = generated.objects;
        self.report = generated.report;
        self.log_generation();
        Ok(())
    }
}

/// One complete generation: planet, samples, props, and their scale-in tweens.
fn generate_pass(
    config: &SceneConfig,
    seed: u64,
    factory: &mut dyn PropFactory,
    assets: &mut AssetStore,
    tweens: &mut TweenScheduler,
) -> Result<Generated, WorldError> {
    let _span = tracing::info_span!("world_generate", seed).entered();
    let mut generator = Generator::resolve(config, seed)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let terrain = PlanetMesh::build(
        config.planet.radius,
        config.planet.subdivisions,
        generator.displacer_mut(),
    )?;
    let noises = terrain.noises().clone();
    let water_fraction = terrain.water_fraction();
    let mesh = assets.register_mesh(terrain.into_mesh())?;
    let material = assets.register_material(Material::flat("planet", config.planet.color.to_rgb()));
    let planet = Planet {
        id: EntityId::new(),
        transform: Transform::default().with_uniform_scale(config.planet.intro.from),
        mesh,
        material,
        noises,
        water_fraction,
    };
    tweens.schedule(TweenTarget::scale(planet.id), config.planet.intro.spec(&mut rng))?;

    let samples = fibonacci_sphere(config.scatter.samples, config.planet.radius, &mut rng)?;
    let (placed, report) = ScatterEngine::new(&config.scatter, &mut generator, factory)
        .scatter(&samples, &mut rng, assets);

    let mut objects = BTreeMap::new();
    for object in placed {
        tweens.schedule(
            TweenTarget::scale(object.id),
            config.scatter.reveal.spec(&mut rng),
        )?;
        objects.insert(object.id, object);
    }
    Ok(Generated {
        planet,
        objects,
        report,
    })
}

/// Splitmix64 step; derives each rebuild's seed from the previous one.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use planetoid_terrain::icosphere_vertex_count;

    fn small_config() -> SceneConfig {
        let mut config = SceneConfig::default();
        config.seed = 42;
        config.planet.subdivisions = 3;
        config.scatter.samples = 200;
        config
    }

    fn expected_live_meshes(world: &World) -> usize {
        1 + world
            .objects()
            .values()
            .filter(|o| !o.model.placeholder)
            .map(|o| o.model.parts.len())
            .sum::<usize>()
    }

    #[test]
    fn generate_places_objects_and_schedules_reveals() {
        let mut tweens = TweenScheduler::new();
        let world = World::generate(small_config(), &mut tweens).unwrap();
        assert!(world.object_count() > 0);
        assert_eq!(tweens.active_count(), world.object_count() + 1);
        assert_eq!(world.planet().transform.scale, Vec3::splat(0.3));
        for object in world.objects().values() {
            assert_eq!(object.transform.scale, Vec3::splat(0.01));
            assert!(tweens.active_handle(TweenTarget::scale(object.id)).is_some());
        }
        assert_eq!(
            world.count_of(PropKind::Tree) + world.count_of(PropKind::Rock),
            world.object_count()
        );
    }

    #[test]
    fn planet_displaced_exactly_once() {
        let mut tweens = TweenScheduler::new();
        let world = World::generate(small_config(), &mut tweens).unwrap();
        let mesh = world.assets().get_mesh(world.planet().mesh).unwrap();
        assert_eq!(mesh.vertex_count(), icosphere_vertex_count(3));
        for (i, p) in mesh.positions.iter().enumerate() {
            let n = world.planet().noises.get(i).unwrap();
            assert!((p.length() - (100.0 + n * 15.0)).abs() < 1e-3);
        }
    }

    #[test]
    fn reveal_finishes_at_full_scale() {
        let mut tweens = TweenScheduler::new();
        let mut world = World::generate(small_config(), &mut tweens).unwrap();
        for _ in 0..(16 * 60) {
            tweens.tick(1.0 / 60.0, &mut world);
        }
        assert_eq!(tweens.active_count(), 0);
        assert_eq!(world.planet().transform.scale, Vec3::ONE);
        for object in world.objects().values() {
            assert_eq!(object.transform.scale, Vec3::ONE);
        }
    }

    #[test]
    fn delayed_reveals_hold_initial_scale() {
        let mut tweens = TweenScheduler::new();
        let mut world = World::generate(small_config(), &mut tweens).unwrap();
        tweens.tick(0.0, &mut world);
        let waiting = world
            .objects()
            .values()
            .filter(|o| (o.transform.scale.x - 0.01).abs() < 1e-3)
            .count();
        assert_eq!(waiting, world.object_count());
    }

    #[test]
    fn rebuild_releases_previous_assets() {
        let mut tweens = TweenScheduler::new();
        let mut world = World::generate(small_config(), &mut tweens).unwrap();
        let first_seed = world.seed();
        let old_ids: Vec<_> = world.objects().keys().copied().collect();

        for round in 1..=3 {
            world.rebuild(&mut tweens).unwrap();
            assert_eq!(world.generation(), round);
            assert_eq!(world.assets().live_meshes(), expected_live_meshes(&world));
            assert_eq!(tweens.active_count(), world.object_count() + 1);
        }
        assert_ne!(world.seed(), first_seed);
        assert!(old_ids.iter().all(|id| world.object(*id).is_none()));

        let stats = world.assets().stats();
        assert_eq!(
            stats.meshes_registered - stats.meshes_disposed,
            world.assets().live_meshes() as u64
        );
    }

    #[test]
    fn failed_rebuild_keeps_current_world() {
        let mut tweens = TweenScheduler::new();
        let mut world = World::generate(small_config(), &mut tweens).unwrap();
        let seed = world.seed();
        let objects = world.object_count();
        let live = world.assets().live_meshes();
        let scheduled = tweens.active_count();

        world.config.planet.noise.depth = f32::INFINITY;
        assert!(world.rebuild(&mut tweens).is_err());

        assert_eq!(world.seed(), seed);
        assert_eq!(world.generation(), 0);
        assert_eq!(world.object_count(), objects);
        assert_eq!(world.assets().live_meshes(), live);
        assert_eq!(tweens.active_count(), scheduled);
        assert!(world.assets().get_mesh(world.planet().mesh).is_some());
        assert!(
            world
                .objects()
                .values()
                .flat_map(|o| &o.model.parts)
                .all(|part| world.assets().get_mesh(part.mesh).is_some())
        );

        world.config.planet.noise.depth = 15.0;
        world.rebuild(&mut tweens).unwrap();
        assert_eq!(world.generation(), 1);
        assert_eq!(world.assets().live_meshes(), expected_live_meshes(&world));
    }

    #[test]
    fn same_seed_same_layout() {
        let mut tweens = TweenScheduler::new();
        let a = World::generate(small_config(), &mut tweens).unwrap();
        let b = World::generate(small_config(), &mut tweens).unwrap();
        let layout = |w: &World| {
            let mut v: Vec<_> = w
                .objects()
                .values()
                .map(|o| (o.sample_index, o.kind, o.transform.position))
                .collect();
            v.sort_by_key(|(i, _, _)| *i);
            v
        };
        assert_eq!(layout(&a), layout(&b));
        assert_eq!(a.report(), b.report());
    }

    #[test]
    fn events_recorded_and_drained() {
        let mut tweens = TweenScheduler::new();
        let mut world = World::generate(small_config(), &mut tweens).unwrap();
        let placed = world
            .events()
            .iter()
            .filter(|e| matches!(e, WorldEvent::Placed { .. }))
            .count();
        assert_eq!(placed, world.object_count());
        assert!(matches!(
            world.events().last(),
            Some(WorldEvent::Generated { generation: 0, .. })
        ));

        world.drain_events();
        world.rebuild(&mut tweens).unwrap();
        assert!(matches!(world.events()[0], WorldEvent::Disposed { .. }));
    }

    #[test]
    fn pick_targets_follow_planet_scale() {
        let mut tweens = TweenScheduler::new();
        let mut world = World::generate(small_config(), &mut tweens).unwrap();
        let targets = world.pick_targets();
        assert_eq!(targets.len(), world.object_count());
        let id = targets[0].id;
        let before = targets[0].volume.center().length();

        let planet = world.planet().id;
        world.apply(TweenTarget::scale(planet), TweenValue::Scalar(1.0));
        let after = world
            .pick_targets()
            .into_iter()
            .find(|t| t.id == id)
            .unwrap()
            .volume
            .center()
            .length();
        assert!((after / before - 1.0 / 0.3).abs() < 1e-2);
    }

    #[test]
    fn render_items_cover_planet_and_parts() {
        let mut tweens = TweenScheduler::new();
        let world = World::generate(small_config(), &mut tweens).unwrap();
        let parts: usize = world.objects().values().map(|o| o.model.parts.len()).sum();
        let items = world.render_items();
        assert_eq!(items.len(), 1 + parts);
        assert_eq!(items[0].label, "planet");
    }

    #[test]
    fn unknown_tween_target_is_ignored() {
        let mut tweens = TweenScheduler::new();
        let mut world = World::generate(small_config(), &mut tweens).unwrap();
        world.apply(TweenTarget::scale(EntityId::new()), TweenValue::Scalar(9.0));
        assert!(world.objects().values().all(|o| o.transform.scale != Vec3::splat(9.0)));
    }

    #[test]
    fn invalid_config_allocates_nothing() {
        let mut tweens = TweenScheduler::new();
        let mut config = small_config();
        config.planet.radius = f32::NAN;
        assert!(World::generate(config, &mut tweens).is_err());
        assert_eq!(tweens.active_count(), 0);
    }

    #[test]
    fn splitmix_advances() {
        assert_ne!(splitmix64(1), 1);
        assert_eq!(splitmix64(7), splitmix64(7));
    }
}

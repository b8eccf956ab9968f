use glam::{Mat4, Vec3};
use planetoid_assets::AssetStore;
use planetoid_common::{BoundingVolume, EntityId, Transform};
use planetoid_props::{PropFactory, PropKind, PropModel, TreeParams, placeholder_model};
use planetoid_terrain::SurfaceSample;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::ScatterConfig;
use crate::generator::Generator;

/// A decorative prop standing on the planet surface.
///
/// `transform` is relative to the planet; its scale is animated by tweens.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterObject {
    pub id: EntityId,
    pub kind: PropKind,
    pub sample_index: usize,
    pub transform: Transform,
    /// Terrain noise at the sample, from its own displacement pass.
    pub noise: f32,
    /// Thresholded noise re-sampled at the displaced position.
    pub surface_noise: f32,
    pub model: PropModel,
    pub resource: String,
}

impl ScatterObject {
    /// World-space hit volume under the given parent transform.
    pub fn pick_volume(&self, parent: &Mat4) -> BoundingVolume {
        self.model
            .bounds
            .transformed(&(*parent * self.transform.to_matrix()))
    }
}

/// Outcome counters of one scatter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterReport {
    pub samples: usize,
    pub placed: usize,
    pub skipped_water: usize,
    pub trees: usize,
    pub rocks: usize,
    pub fallbacks: usize,
}

/// Decides, per surface sample, whether and what to place.
pub struct ScatterEngine<'a> {
    config: &'a ScatterConfig,
    generator: &'a mut Generator,
    factory: &'a mut dyn PropFactory,
}

impl<'a> ScatterEngine<'a> {
    pub fn new(
        config: &'a ScatterConfig,
        generator: &'a mut Generator,
        factory: &'a mut dyn PropFactory,
    ) -> Self {
        Self {
            config,
            generator,
            factory,
        }
    }

    /// Place props on every sample whose displaced position is not water.
    /// Objects start at the reveal's `from` scale; scheduling the reveal is
    /// the caller's job.
    pub fn scatter(
        &mut self,
        samples: &[SurfaceSample],
        rng: &mut dyn RngCore,
        assets: &mut AssetStore,
    ) -> (Vec<ScatterObject>, ScatterReport) {
        let _span = tracing::info_span!("scatter", samples = samples.len()).entered();
        let mut report = ScatterReport {
            samples: samples.len(),
            ..Default::default()
        };
        let mut objects = Vec::new();

        for sample in samples {
            let displaced = self
                .generator
                .displacer_mut()
                .displace(sample.position, None);
            let surface_noise = self.generator.displacer().sample(displaced.position);
            if self.generator.field().is_water(surface_noise) {
                report.skipped_water += 1;
                continue;
            }

            let kind = if rng.random::<f32>() < self.config.tree_probability {
                PropKind::Tree
            } else {
                PropKind::Rock
            };
            let model = self.build(kind, displaced.position, rng, assets, &mut report);
            match kind {
                PropKind::Tree => report.trees += 1,
                PropKind::Rock => report.rocks += 1,
            }

            let resource = self.resource_for(kind, objects.len());
            let transform = Transform::standing_on(displaced.position, displaced.position)
                .with_uniform_scale(self.config.reveal.from);
            let object = ScatterObject {
                id: EntityId::new(),
                kind,
                sample_index: sample.index,
                transform,
                noise: displaced.noise,
                surface_noise,
                model,
                resource,
            };
            tracing::debug!(
                id = %object.id.short(),
                %kind,
                index = sample.index,
                noise = displaced.noise,
                "object placed"
            );
            objects.push(object);
        }

        report.placed = objects.len();
        tracing::info!(
            placed = report.placed,
            skipped_water = report.skipped_water,
            trees = report.trees,
            rocks = report.rocks,
            fallbacks = report.fallbacks,
            "scatter complete"
        );
        (objects, report)
    }

    fn build(
        &mut self,
        kind: PropKind,
        at: Vec3,
        rng: &mut dyn RngCore,
        assets: &mut AssetStore,
        report: &mut ScatterReport,
    ) -> PropModel {
        let built = match kind {
            PropKind::Tree => {
                let trunk_height = self.config.trunk_height.sample(rng);
                let params = TreeParams {
                    trunk_height,
                    canopy_size: trunk_height * self.config.canopy_ratio.sample(rng),
                    trunk_color: self.config.trunk_color,
                    canopy_color: self.generator.canopy_color(at),
                };
                self.factory.build_tree(&params, rng, assets)
            }
            PropKind::Rock => {
                let size = self.config.rock_size.sample(rng);
                self.factory.build_rock(size, rng, assets)
            }
        };
        built.unwrap_or_else(|error| {
            tracing::warn!(%kind, %error, "prop build failed, substituting placeholder");
            report.fallbacks += 1;
            placeholder_model(kind, assets)
        })
    }

    fn resource_for(&self, kind: PropKind, ordinal: usize) -> String {
        if self.config.media.is_empty() {
            format!("{kind}-{ordinal}")
        } else {
            self.config.media[ordinal % self.config.media.len()].clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use planetoid_props::{BuildError, ProceduralProps};
    use planetoid_terrain::fibonacci_sphere_with_phase;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct FailingRocks(ProceduralProps);

    impl PropFactory for FailingRocks {
        fn build_tree(
            &mut self,
            params: &TreeParams,
            rng: &mut dyn RngCore,
            assets: &mut AssetStore,
        ) -> Result<PropModel, BuildError> {
            self.0.build_tree(params, rng, assets)
        }

        fn build_rock(
            &mut self,
            _size: f32,
            _rng: &mut dyn RngCore,
            _assets: &mut AssetStore,
        ) -> Result<PropModel, BuildError> {
            Err(BuildError::InvalidSize {
                name: "rock_size",
                value: -1.0,
            })
        }
    }

    fn run(
        config: &SceneConfig,
        factory: &mut dyn PropFactory,
        assets: &mut AssetStore,
    ) -> (Vec<ScatterObject>, ScatterReport) {
        let mut generator = Generator::resolve(config, config.seed).unwrap();
        let samples = fibonacci_sphere_with_phase(
            config.scatter.samples,
            config.planet.radius,
            0.0,
        )
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        ScatterEngine::new(&config.scatter, &mut generator, factory)
            .scatter(&samples, &mut rng, assets)
    }

    #[test]
    fn skips_water_and_places_on_land() {
        let config = SceneConfig::default();
        let mut assets = AssetStore::new();
        let (objects, report) = run(&config, &mut ProceduralProps::default(), &mut assets);
        assert_eq!(report.samples, 800);
        assert!(report.placed >= 1);
        assert_eq!(report.placed + report.skipped_water, 800);
        assert_eq!(report.trees + report.rocks, report.placed);
        for o in &objects {
            assert_ne!(o.surface_noise, config.planet.noise.water_level);
        }
    }

    #[test]
    fn water_is_judged_at_the_displaced_position() {
        let config = SceneConfig::default();
        let generator = Generator::resolve(&config, config.seed).unwrap();
        let mut assets = AssetStore::new();
        let (objects, report) = run(&config, &mut ProceduralProps::default(), &mut assets);
        assert!(report.placed >= 1);
        for o in &objects {
            let resampled = generator.displacer().sample(o.transform.position);
            assert_eq!(resampled, o.surface_noise);
            assert!(!generator.field().is_water(resampled));
        }
    }

    #[test]
    fn objects_stand_on_displaced_surface() {
        let config = SceneConfig::default();
        let mut assets = AssetStore::new();
        let (objects, _) = run(&config, &mut ProceduralProps::default(), &mut assets);
        for o in &objects {
            let p = o.transform.position;
            let expected = 100.0 + o.noise * 15.0;
            assert!((p.length() - expected).abs() < 1e-2);
            assert!(o.transform.up().dot(p.normalize()) > 0.999);
            assert!((o.transform.scale - Vec3::splat(0.01)).length() < 1e-6);
        }
    }

    #[test]
    fn tree_share_is_roughly_seventy_percent() {
        let config = SceneConfig::default();
        let mut assets = AssetStore::new();
        let (_, report) = run(&config, &mut ProceduralProps::default(), &mut assets);
        let share = report.trees as f32 / report.placed as f32;
        assert!(share > 0.55 && share < 0.85, "tree share {share}");
    }

    #[test]
    fn failed_builds_fall_back_to_placeholder() {
        let config = SceneConfig::default();
        let mut assets = AssetStore::new();
        let mut factory = FailingRocks(ProceduralProps::default());
        let (objects, report) = run(&config, &mut factory, &mut assets);
        assert_eq!(report.fallbacks, report.rocks);
        let rocks: Vec<_> = objects.iter().filter(|o| o.kind == PropKind::Rock).collect();
        assert!(!rocks.is_empty());
        assert!(rocks.iter().all(|o| o.model.placeholder));
        assert!(
            objects
                .iter()
                .filter(|o| o.kind == PropKind::Tree)
                .all(|o| !o.model.placeholder)
        );
    }

    #[test]
    fn resources_round_robin_over_media() {
        let mut config = SceneConfig::default();
        config.scatter.media = vec!["a.jpg".into(), "b.jpg".into()];
        let mut assets = AssetStore::new();
        let (objects, _) = run(&config, &mut ProceduralProps::default(), &mut assets);
        assert_eq!(objects[0].resource, "a.jpg");
        assert_eq!(objects[1].resource, "b.jpg");
        assert_eq!(objects[2].resource, "a.jpg");
    }

    #[test]
    fn default_resources_are_unique() {
        let config = SceneConfig::default();
        let mut assets = AssetStore::new();
        let (objects, _) = run(&config, &mut ProceduralProps::default(), &mut assets);
        let mut names: Vec<_> = objects.iter().map(|o| o.resource.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), objects.len());
    }

    #[test]
    fn same_seed_same_layout() {
        let config = SceneConfig::default();
        let (a, _) = run(&config, &mut ProceduralProps::default(), &mut AssetStore::new());
        let (b, _) = run(&config, &mut ProceduralProps::default(), &mut AssetStore::new());
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.transform.position, y.transform.position);
        }
    }
}

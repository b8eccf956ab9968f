use glam::Vec3;
use planetoid_props::{Color, ColorGradient};
use planetoid_terrain::{NoiseField, TerrainDisplacer};

use crate::config::SceneConfig;
use crate::error::WorldError;

/// Collaborators a generation pass needs, resolved up front.
///
/// Construction validates the whole config and builds every collaborator, so
/// a pass either starts with all of them or not at all.
#[derive(Debug, Clone)]
pub struct Generator {
    displacer: TerrainDisplacer,
    color_frequency: f32,
    gradient: ColorGradient,
}

impl Generator {
    pub fn resolve(config: &SceneConfig, seed: u64) -> Result<Self, WorldError> {
        config.validate()?;
        let noise = &config.planet.noise;
        let field = NoiseField::new(
            noise_seed(seed),
            noise.water_threshold,
            noise.water_level,
        )?;
        let displacer = TerrainDisplacer::new(field, noise.frequency, noise.depth)?;
        let gradient = ColorGradient::new(config.scatter.gradient.clone())?;
        Ok(Self {
            displacer,
            color_frequency: noise.color_frequency,
            gradient,
        })
    }

    pub fn displacer(&self) -> &TerrainDisplacer {
        &self.displacer
    }

    pub fn displacer_mut(&mut self) -> &mut TerrainDisplacer {
        &mut self.displacer
    }

    pub fn field(&self) -> &NoiseField {
        self.displacer.field()
    }

    /// Coarse noise used for color banding. Water flattening applies, so
    /// low-lying samples all map to the gradient at `water_level`.
    pub fn color_noise(&self, point: Vec3) -> f32 {
        self.field().value(point * self.color_frequency)
    }

    pub fn canopy_color(&self, point: Vec3) -> Color {
        self.gradient.sample(self.color_noise(point))
    }
}

/// Fold a 64-bit scene seed into the noise generator's 32-bit seed.
fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

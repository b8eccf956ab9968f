use std::path::{Path, PathBuf};

use planetoid_camera::CameraConfig;
use planetoid_input::Smoothing;
use planetoid_props::Color;
use planetoid_terrain::{
    GenerationError, MAX_SUBDIVISIONS, ensure_finite, ensure_positive, ensure_unit,
};
use planetoid_tween::{Easing, TweenSpec};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format '{0}', expected .yaml, .yml or .json")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Invalid(#[from] GenerationError),
}

/// Inclusive `[min, max]` interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + (self.max - self.min) * rng.random::<f32>()
    }

    fn validate(&self, name: &'static str) -> Result<(), GenerationError> {
        ensure_finite(name, self.min)?;
        ensure_finite(name, self.max)?;
        if self.min > self.max {
            return Err(GenerationError::invalid(name, self.min));
        }
        Ok(())
    }

    fn validate_positive(&self, name: &'static str) -> Result<(), GenerationError> {
        self.validate(name)?;
        ensure_positive(name, self.min).map(|_| ())
    }

    fn validate_non_negative(&self, name: &'static str) -> Result<(), GenerationError> {
        self.validate(name)?;
        if self.min < 0.0 {
            return Err(GenerationError::invalid(name, self.min));
        }
        Ok(())
    }
}

/// A tween whose duration and delay are drawn per object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TweenConfig {
    pub from: f32,
    pub to: f32,
    pub duration: Range,
    pub delay: Range,
    pub easing: Easing,
}

impl TweenConfig {
    pub fn spec<R: Rng + ?Sized>(&self, rng: &mut R) -> TweenSpec {
        TweenSpec::scalar(self.from, self.to, self.duration.sample(rng), self.easing)
            .with_delay(self.delay.sample(rng))
    }

    /// Spec using the lower bounds, for tweens that must not consume randomness.
    pub fn fixed_spec(&self) -> TweenSpec {
        TweenSpec::scalar(self.from, self.to, self.duration.min, self.easing)
            .with_delay(self.delay.min)
    }

    fn validate(&self, name: &'static str) -> Result<(), GenerationError> {
        ensure_finite(name, self.from)?;
        ensure_finite(name, self.to)?;
        self.duration.validate_non_negative(name)?;
        self.delay.validate_non_negative(name)?;
        if !self.easing.is_valid() {
            return Err(GenerationError::invalid(name, f32::NAN));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Spatial frequency of the elevation noise.
    pub frequency: f32,
    /// Maximum outward displacement.
    pub depth: f32,
    pub water_threshold: f32,
    pub water_level: f32,
    /// Spatial frequency of the coarser noise that picks canopy colors.
    pub color_frequency: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            frequency: 0.015,
            depth: 15.0,
            water_threshold: 0.4,
            water_level: 0.2,
            color_frequency: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub radius: f32,
    pub subdivisions: u32,
    pub color: Color,
    pub noise: NoiseConfig,
    /// Scale-in of the whole planet.
    pub intro: TweenConfig,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            subdivisions: 4,
            color: Color::from_hex(0x417b2b),
            noise: NoiseConfig::default(),
            intro: TweenConfig {
                from: 0.3,
                to: 1.0,
                duration: Range::new(2.0, 5.0),
                delay: Range::fixed(0.0),
                easing: Easing::power1_out(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub samples: usize,
    /// Probability that an accepted sample becomes a tree rather than a rock.
    pub tree_probability: f32,
    pub trunk_height: Range,
    /// Canopy radius as a fraction of trunk height.
    pub canopy_ratio: Range,
    pub rock_size: Range,
    pub trunk_color: Color,
    pub rock_color: Color,
    /// Canopy color stops, sampled by the color noise.
    pub gradient: Vec<Color>,
    /// Staggered scale-in of each placed object.
    pub reveal: TweenConfig,
    /// Resource identifiers handed to the activation callback, assigned
    /// round-robin. Empty means objects are named `{kind}-{index}`.
    pub media: Vec<String>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            samples: 800,
            tree_probability: 0.7,
            trunk_height: Range::new(5.0, 15.0),
            canopy_ratio: Range::new(0.5, 0.7),
            rock_size: Range::new(2.0, 4.0),
            trunk_color: Color::from_hex(0x764114),
            rock_color: Color::from_hex(0x808080),
            gradient: [0x509a36, 0xff5a36, 0x509a36, 0xffc236, 0x509a36]
                .into_iter()
                .map(Color::from_hex)
                .collect(),
            reveal: TweenConfig {
                from: 0.01,
                to: 1.0,
                duration: Range::new(3.0, 10.0),
                delay: Range::new(0.0, 4.0),
                easing: Easing::elastic_out(1.0, 0.2),
            },
            media: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub smoothing: Smoothing,
    /// Shrink-then-return played when an object starts being hovered.
    pub pulse: Option<TweenConfig>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            smoothing: Smoothing::default(),
            pulse: Some(TweenConfig {
                from: 0.5,
                to: 1.0,
                duration: Range::fixed(1.5),
                delay: Range::fixed(0.0),
                easing: Easing::elastic_out(1.0, 0.2),
            }),
        }
    }
}

impl InteractionConfig {
    fn validate(&self) -> Result<(), GenerationError> {
        if !self.smoothing.is_valid() {
            return Err(GenerationError::invalid(
                "hover_smoothing",
                self.smoothing.factor,
            ));
        }
        if let Some(pulse) = &self.pulse {
            pulse.validate("pulse")?;
        }
        Ok(())
    }
}

/// Everything needed to generate and drive the planet scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    pub planet: PlanetConfig,
    pub scatter: ScatterConfig,
    pub interaction: InteractionConfig,
    pub camera: CameraConfig,
}

impl SceneConfig {
    /// Load from `.yaml`/`.yml` or `.json` and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = read_config(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject parameters that would produce NaN or degenerate geometry.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let planet = &self.planet;
        ensure_positive("planet_radius", planet.radius)?;
        if planet.subdivisions > MAX_SUBDIVISIONS {
            return Err(GenerationError::invalid(
                "planet_subdivisions",
                planet.subdivisions,
            ));
        }
        let noise = &planet.noise;
        ensure_positive("noise_frequency", noise.frequency)?;
        ensure_finite("noise_depth", noise.depth)?;
        ensure_unit("water_threshold", noise.water_threshold)?;
        ensure_unit("water_level", noise.water_level)?;
        ensure_positive("color_frequency", noise.color_frequency)?;
        planet.intro.validate("planet_intro")?;

        let scatter = &self.scatter;
        if scatter.samples == 0 {
            return Err(GenerationError::EmptySampleCount);
        }
        ensure_unit("tree_probability", scatter.tree_probability)?;
        scatter.trunk_height.validate_positive("trunk_height")?;
        scatter.canopy_ratio.validate_positive("canopy_ratio")?;
        scatter.rock_size.validate_positive("rock_size")?;
        if scatter.gradient.is_empty() {
            return Err(GenerationError::invalid("gradient_stops", 0));
        }
        scatter.reveal.validate("reveal")?;

        self.interaction.validate()?;
        if !self.camera.is_valid() {
            return Err(GenerationError::invalid("camera", self.camera.fov_degrees));
        }
        Ok(())
    }
}

/// Column/row arrangement of gallery panels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalleryLayout {
    pub columns: u32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub panel_size: f32,
}

impl GalleryLayout {
    pub const WIDE: Self = Self {
        columns: 3,
        spacing_x: 1.8,
        spacing_y: 1.8,
        panel_size: 1.5,
    };

    pub const NARROW: Self = Self {
        columns: 1,
        spacing_x: 0.0,
        spacing_y: 1.6,
        panel_size: 2.5,
    };
}

/// The media gallery scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub media: Vec<String>,
    pub wide: GalleryLayout,
    pub narrow: GalleryLayout,
    /// Viewport widths below this use the narrow layout.
    pub narrow_below: f32,
    /// Grid resolution of each panel mesh per side.
    pub panel_segments: u32,
    /// Per-tick increments of the panel animation clocks.
    pub time_step: f32,
    pub hover_time_step: f32,
    /// Per-panel phase offset, multiplied by the panel index.
    pub offset_step: f32,
    pub smoothing: Smoothing,
    pub camera: CameraConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            media: (1..=6).map(|i| format!("media/project-{i}.jpg")).collect(),
            wide: GalleryLayout::WIDE,
            narrow: GalleryLayout::NARROW,
            narrow_below: 600.0,
            panel_segments: 30,
            time_step: 0.012,
            hover_time_step: 0.015,
            offset_step: 0.3,
            smoothing: Smoothing::default(),
            camera: CameraConfig {
                fov_degrees: 45.0,
                distance: 7.0,
                near: 0.1,
                far: 100.0,
                auto_rotate_speed: 0.0,
            },
        }
    }
}

impl GalleryConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = read_config(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn layout_for_width(&self, width: f32) -> GalleryLayout {
        if width < self.narrow_below {
            self.narrow
        } else {
            self.wide
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        for layout in [&self.wide, &self.narrow] {
            if layout.columns == 0 {
                return Err(GenerationError::invalid("gallery_columns", 0));
            }
            ensure_positive("panel_size", layout.panel_size)?;
            ensure_finite("panel_spacing", layout.spacing_x)?;
            ensure_finite("panel_spacing", layout.spacing_y)?;
        }
        if self.panel_segments == 0 {
            return Err(GenerationError::invalid("panel_segments", 0));
        }
        ensure_finite("time_step", self.time_step)?;
        ensure_finite("hover_time_step", self.hover_time_step)?;
        ensure_finite("offset_step", self.offset_step)?;
        if !self.smoothing.is_valid() {
            return Err(GenerationError::invalid(
                "hover_smoothing",
                self.smoothing.factor,
            ));
        }
        if !self.camera.is_valid() {
            return Err(GenerationError::invalid("camera", self.camera.fov_degrees));
        }
        Ok(())
    }
}

fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&text)?),
        "json" => Ok(serde_json::from_str(&text)?),
        _ => Err(ConfigError::UnsupportedFormat(ext)),
    }
}

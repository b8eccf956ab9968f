use std::fmt;

use glam::Vec3;
use planetoid_assets::{AssetError, AssetStore, Material, MaterialHandle, MeshData, MeshHandle};
use planetoid_common::BoundingVolume;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::jitter::{JITTER_FRACTION, jitter_vertices};
use crate::primitives::{cylinder, uv_sphere};

/// Trunk radius as a fraction of trunk height.
const TRUNK_RADIUS_RATIO: f32 = 0.1;
/// Top radius of the trunk relative to its base.
const TRUNK_TAPER: f32 = 0.7;
/// Canopy center sits this many canopy radii above the trunk top.
const CANOPY_LIFT: f32 = 0.7;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid prop size {name} = {value}")]
    InvalidSize { name: &'static str, value: f32 },
    #[error(transparent)]
    Asset(#[from] AssetError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    Tree,
    Rock,
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => write!(f, "tree"),
            Self::Rock => write!(f, "rock"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub trunk_height: f32,
    pub canopy_size: f32,
    pub trunk_color: Color,
    pub canopy_color: Color,
}

/// One drawable piece of a prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropPart {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
}

/// A built prop: registered parts plus a local-space hit volume.
///
/// Local +Y is the prop's up axis; the base sits at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PropModel {
    pub kind: PropKind,
    pub parts: Vec<PropPart>,
    pub bounds: BoundingVolume,
    pub placeholder: bool,
}

impl PropModel {
    /// Dispose every owned mesh and material. Placeholder parts are shared and left alone.
    pub fn dispose(self, assets: &mut AssetStore) -> Result<(), AssetError> {
        if self.placeholder {
            return Ok(());
        }
        for part in self.parts {
            assets.dispose_mesh(part.mesh)?;
            assets.dispose_material(part.material)?;
        }
        Ok(())
    }
}

/// Synthesizes decorative props into an [`AssetStore`].
pub trait PropFactory {
    fn build_tree(
        &mut self,
        params: &TreeParams,
        rng: &mut dyn RngCore,
        assets: &mut AssetStore,
    ) -> Result<PropModel, BuildError>;

    fn build_rock(
        &mut self,
        size: f32,
        rng: &mut dyn RngCore,
        assets: &mut AssetStore,
    ) -> Result<PropModel, BuildError>;
}

/// Low-poly jittered trees and rocks.
#[derive(Debug, Clone)]
pub struct ProceduralProps {
    pub rock_color: Color,
}

impl ProceduralProps {
    pub fn new(rock_color: Color) -> Self {
        Self { rock_color }
    }
}

impl Default for ProceduralProps {
    fn default() -> Self {
        Self::new(Color::from_hex(0x808080))
    }
}

impl PropFactory for ProceduralProps {
    fn build_tree(
        &mut self,
        params: &TreeParams,
        rng: &mut dyn RngCore,
        assets: &mut AssetStore,
    ) -> Result<PropModel, BuildError> {
        let height = ensure_size("trunk_height", params.trunk_height)?;
        let canopy_size = ensure_size("canopy_size", params.canopy_size)?;

        let trunk_radius = height * TRUNK_RADIUS_RATIO;
        let mut trunk = cylinder(trunk_radius * TRUNK_TAPER, trunk_radius, height, 5, 3);
        trunk.name = "trunk".into();
        jitter_vertices(&mut trunk, trunk_radius * JITTER_FRACTION, rng);

        let mut canopy = uv_sphere(canopy_size, 4, 4);
        canopy.name = "canopy".into();
        jitter_vertices(&mut canopy, canopy_size * JITTER_FRACTION, rng);
        canopy.translate(Vec3::Y * (height + canopy_size * CANOPY_LIFT));

        let bounds = enclosing(&[&trunk, &canopy]);
        let parts = vec![
            register(assets, trunk, params.trunk_color)?,
            register(assets, canopy, params.canopy_color)?,
        ];
        Ok(PropModel {
            kind: PropKind::Tree,
            parts,
            bounds,
            placeholder: false,
        })
    }

    fn build_rock(
        &mut self,
        size: f32,
        rng: &mut dyn RngCore,
        assets: &mut AssetStore,
    ) -> Result<PropModel, BuildError> {
        let size = ensure_size("rock_size", size)?;
        let mut rock = uv_sphere(size, 5, 4);
        rock.name = "rock".into();
        jitter_vertices(&mut rock, size * JITTER_FRACTION, rng);

        let bounds = enclosing(&[&rock]);
        let parts = vec![register(assets, rock, self.rock_color)?];
        Ok(PropModel {
            kind: PropKind::Rock,
            parts,
            bounds,
            placeholder: false,
        })
    }
}

/// Fallback prop drawn with the store's shared placeholder primitive.
pub fn placeholder_model(kind: PropKind, assets: &mut AssetStore) -> PropModel {
    let (mesh, material) = assets.placeholder();
    PropModel {
        kind,
        parts: vec![PropPart { mesh, material }],
        bounds: BoundingVolume::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        },
        placeholder: true,
    }
}

fn ensure_size(name: &'static str, value: f32) -> Result<f32, BuildError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(BuildError::InvalidSize { name, value })
    }
}

fn register(assets: &mut AssetStore, mesh: MeshData, color: Color) -> Result<PropPart, BuildError> {
    let material = Material::flat(mesh.name.clone(), color.to_rgb());
    let mesh = assets.register_mesh(mesh)?;
    let material = assets.register_material(material);
    Ok(PropPart { mesh, material })
}

fn enclosing(meshes: &[&MeshData]) -> BoundingVolume {
    let mut all = MeshData::default();
    for mesh in meshes {
        all.append(mesh);
    }
    let (center, radius) = all.bounding_sphere();
    BoundingVolume::Sphere { center, radius }
}

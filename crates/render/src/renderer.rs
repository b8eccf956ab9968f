use std::fmt::Write;

use glam::{Mat4, Vec3};
use planetoid_assets::{AssetStore, MaterialHandle, MeshHandle};
use planetoid_camera::OrbitCamera;
use planetoid_common::EntityId;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 400.0),
            target: Vec3::ZERO,
            fov_degrees: 50.0,
        }
    }
}

impl From<&OrbitCamera> for RenderView {
    fn from(camera: &OrbitCamera) -> Self {
        Self {
            eye: camera.position(),
            target: camera.target,
            fov_degrees: camera.fov.to_degrees(),
        }
    }
}

/// One drawable: geometry + material + world transform, plus the per-object
/// uniforms a shader would read.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub entity: EntityId,
    pub label: String,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub transform: Mat4,
    pub hover_strength: f32,
    pub time: f32,
}

/// Everything drawn in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub tick: u64,
    pub scene: String,
    pub view: RenderView,
    pub items: Vec<RenderItem>,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a frame description and the asset store, then produces
/// output. It never mutates scene state or assets.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &RenderFrame, assets: &AssetStore) -> Self::Output;
}

/// Headless renderer producing a human-readable frame summary.
///
/// Handles that no longer resolve are reported inline, not treated as errors.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Maximum item lines per frame; the rest are summarized.
    pub max_items: usize,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self { max_items: 16 }
    }

    pub fn with_max_items(max_items: usize) -> Self {
        Self { max_items }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &RenderFrame, assets: &AssetStore) -> String {
        let mut out = String::new();
        let view = &frame.view;
        let _ = writeln!(
            out,
            "=== {} (tick={}) ===",
            if frame.scene.is_empty() { "scene" } else { frame.scene.as_str() },
            frame.tick
        );
        let _ = writeln!(out, "Items: {}", frame.items.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );

        let mut missing = 0usize;
        for (i, item) in frame.items.iter().enumerate() {
            let mesh = assets.get_mesh(item.mesh);
            let material = assets.get_material(item.material);
            if mesh.is_none() || material.is_none() {
                missing += 1;
            }
            if i >= self.max_items {
                continue;
            }
            let (scale, _, p) = item.transform.to_scale_rotation_translation();
            let tris = mesh.map_or_else(
                || "missing".to_string(),
                |m| m.triangle_count().to_string(),
            );
            let mat = material.map_or("missing", |m| m.name.as_str());
            let _ = writeln!(
                out,
                "  [{}] {} pos=({:.2}, {:.2}, {:.2}) scale={:.3} tris={} mat={} hover={:.2}",
                item.entity.short(),
                item.label,
                p.x,
                p.y,
                p.z,
                scale.max_element(),
                tris,
                mat,
                item.hover_strength
            );
        }
        if frame.items.len() > self.max_items {
            let _ = writeln!(out, "  ... {} more", frame.items.len() - self.max_items);
        }
        if missing > 0 {
            tracing::warn!(missing, "render items reference disposed assets");
            let _ = writeln!(out, "Missing assets: {missing}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetoid_assets::{Material, MeshData};

    fn item(assets: &mut AssetStore, label: &str) -> RenderItem {
        let mesh = MeshData::new(
            "tri",
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
        );
        RenderItem {
            entity: EntityId::new(),
            label: label.into(),
            mesh: assets.register_mesh(mesh).unwrap(),
            material: assets.register_material(Material::flat("leaf", [0.0, 1.0, 0.0])),
            transform: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            hover_strength: 0.5,
            time: 0.0,
        }
    }

    #[test]
    fn debug_renderer_empty_frame() {
        let assets = AssetStore::new();
        let output = DebugTextRenderer::new().render(&RenderFrame::default(), &assets);
        assert!(output.contains("tick=0"));
        assert!(output.contains("Items: 0"));
    }

    #[test]
    fn debug_renderer_lists_items() {
        let mut assets = AssetStore::new();
        let frame = RenderFrame {
            tick: 7,
            scene: "planet".into(),
            view: RenderView::default(),
            items: vec![item(&mut assets, "tree"), item(&mut assets, "rock")],
        };
        let output = DebugTextRenderer::new().render(&frame, &assets);
        assert!(output.contains("=== planet (tick=7) ==="));
        assert!(output.contains("Items: 2"));
        assert!(output.contains("tree pos=(1.00, 2.00, 3.00)"));
        assert!(output.contains("tris=1 mat=leaf hover=0.50"));
    }

    #[test]
    fn disposed_assets_reported_not_fatal() {
        let mut assets = AssetStore::new();
        let it = item(&mut assets, "rock");
        assets.dispose_mesh(it.mesh).unwrap();
        let frame = RenderFrame {
            items: vec![it],
            ..Default::default()
        };
        let output = DebugTextRenderer::new().render(&frame, &assets);
        assert!(output.contains("tris=missing"));
        assert!(output.contains("Missing assets: 1"));
    }

    #[test]
    fn item_lines_are_capped() {
        let mut assets = AssetStore::new();
        let items = (0..5).map(|_| item(&mut assets, "rock")).collect();
        let frame = RenderFrame {
            items,
            ..Default::default()
        };
        let output = DebugTextRenderer::with_max_items(2).render(&frame, &assets);
        assert_eq!(output.matches("rock pos=").count(), 2);
        assert!(output.contains("... 3 more"));
    }

    #[test]
    fn view_from_camera() {
        let view = RenderView::from(&OrbitCamera::default());
        assert!((view.fov_degrees - 50.0).abs() < 1e-3);
        assert_eq!(view.target, Vec3::ZERO);
    }
}

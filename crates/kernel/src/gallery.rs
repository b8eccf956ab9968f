use glam::{Mat4, Quat, Vec3};
use planetoid_assets::{AssetStore, Material, MaterialHandle, MeshData, MeshHandle};
use planetoid_camera::CameraConfig;
use planetoid_common::{BoundingVolume, EntityId};
use planetoid_input::{Smoothing, Viewport};
use planetoid_render::RenderItem;
use planetoid_tween::{TweenProperty, TweenSink, TweenTarget, TweenValue};

use crate::config::{GalleryConfig, GalleryLayout};
use crate::error::WorldError;
use crate::scene::{PickTarget, Scene};

/// One media panel of the gallery grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPanel {
    pub id: EntityId,
    pub index: usize,
    pub resource: String,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub position: Vec3,
    pub scale: Vec3,
    /// Edge length of the square panel mesh.
    pub size: f32,
    pub time: f32,
    pub hover_time: f32,
    /// Phase added to `time` when drawing, so panels do not animate in lockstep.
    pub offset: f32,
}

impl MediaPanel {
    pub fn pick_volume(&self) -> BoundingVolume {
        let half = self.size * 0.5;
        BoundingVolume::Quad {
            center: self.position,
            right: Vec3::X,
            up: Vec3::Y,
            half_width: half * self.scale.x.abs(),
            half_height: half * self.scale.y.abs(),
        }
    }
}

/// A responsive grid of clickable media panels facing the camera.
#[derive(Debug)]
pub struct MediaGallery {
    config: GalleryConfig,
    layout: GalleryLayout,
    panels: Vec<MediaPanel>,
    assets: AssetStore,
    relayouts: u64,
}

impl MediaGallery {
    pub fn new(config: GalleryConfig, viewport: &Viewport) -> Result<Self, WorldError> {
        config.validate()?;
        let layout = config.layout_for_width(viewport.width);
        let mut assets = AssetStore::new();
        let mut panels = Vec::with_capacity(config.media.len());
        for (index, resource) in config.media.iter().enumerate() {
            let mesh =
                assets.register_mesh(panel_mesh(layout.panel_size, config.panel_segments))?;
            let material =
                assets.register_material(Material::flat(format!("panel-{index}"), [1.0; 3]));
            panels.push(MediaPanel {
                id: EntityId::new(),
                index,
                resource: resource.clone(),
                mesh,
                material,
                position: panel_position(&layout, index),
                scale: Vec3::ONE,
                size: layout.panel_size,
                time: 0.0,
                hover_time: 0.0,
                offset: index as f32 * config.offset_step,
            });
        }
        tracing::info!(panels = panels.len(), columns = layout.columns, "gallery created");
        Ok(Self {
            config,
            layout,
            panels,
            assets,
            relayouts: 0,
        })
    }

    pub fn panels(&self) -> &[MediaPanel] {
        &self.panels
    }

    pub fn panel(&self, id: EntityId) -> Option<&MediaPanel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn layout(&self) -> GalleryLayout {
        self.layout
    }

    /// Number of times panel geometry was replaced.
    pub fn relayouts(&self) -> u64 {
        self.relayouts
    }

    /// Replace every panel's geometry for the layout matching `width`.
    pub fn relayout(&mut self, width: f32) -> Result<(), WorldError> {
        self.layout = self.config.layout_for_width(width);
        for panel in &mut self.panels {
            self.assets.replace_mesh(
                panel.mesh,
                panel_mesh(self.layout.panel_size, self.config.panel_segments),
            )?;
            panel.position = panel_position(&self.layout, panel.index);
            panel.scale = Vec3::ONE;
            panel.size = self.layout.panel_size;
            panel.offset = panel.index as f32 * self.config.offset_step;
        }
        self.relayouts += 1;
        tracing::debug!(
            columns = self.layout.columns,
            size = self.layout.panel_size,
            "gallery relayout"
        );
        Ok(())
    }
}

impl TweenSink for MediaGallery {
    fn apply(&mut self, target: TweenTarget, value: TweenValue) {
        let Some(panel) = self.panels.iter_mut().find(|p| p.id == target.entity) else {
            return;
        };
        match target.property {
            TweenProperty::Scale => panel.scale = value.as_vec3(),
            TweenProperty::Position => panel.position = value.as_vec3(),
        }
    }
}

impl Scene for MediaGallery {
    fn name(&self) -> &str {
        "gallery"
    }

    fn assets(&self) -> &AssetStore {
        &self.assets
    }

    fn pick_targets(&self) -> Vec<PickTarget> {
        self.panels
            .iter()
            .map(|panel| PickTarget {
                id: panel.id,
                volume: panel.pick_volume(),
            })
            .collect()
    }

    fn resource(&self, id: EntityId) -> Option<&str> {
        self.panel(id).map(|panel| panel.resource.as_str())
    }

    fn render_items(&self) -> Vec<RenderItem> {
        self.panels
            .iter()
            .map(|panel| RenderItem {
                entity: panel.id,
                label: format!("panel-{}", panel.index),
                mesh: panel.mesh,
                material: panel.material,
                transform: Mat4::from_scale_rotation_translation(
                    panel.scale,
                    Quat::IDENTITY,
                    panel.position,
                ),
                hover_strength: 0.0,
                time: panel.time + panel.offset,
            })
            .collect()
    }

    fn camera_config(&self) -> CameraConfig {
        self.config.camera
    }

    fn smoothing(&self) -> Smoothing {
        self.config.smoothing
    }

    /// Panel clocks advance by a fixed amount per tick, independent of `dt`.
    fn advance(&mut self, _dt: f32) {
        for panel in &mut self.panels {
            panel.time += self.config.time_step;
            panel.hover_time += self.config.hover_time_step;
        }
    }

    fn resize(&mut self, viewport: &Viewport) -> Result<bool, WorldError> {
        self.relayout(viewport.width)?;
        Ok(true)
    }
}

/// Grid position of panel `index`, centered on the origin horizontally.
fn panel_position(layout: &GalleryLayout, index: usize) -> Vec3 {
    let columns = layout.columns.max(1) as usize;
    let col = (index % columns) as f32;
    let row = (index / columns) as f32;
    Vec3::new(
        (col - (columns as f32 - 1.0) / 2.0) * layout.spacing_x,
        (row - 0.5) * -layout.spacing_y,
        0.0,
    )
}

/// Square grid of `segments × segments` cells in the XY plane, facing +Z.
pub fn panel_mesh(size: f32, segments: u32) -> MeshData {
    let segments = segments.max(1);
    let row = segments + 1;
    let step = size / segments as f32;
    let half = size * 0.5;

    let mut positions = Vec::with_capacity((row * row) as usize);
    for y in 0..row {
        for x in 0..row {
            positions.push(Vec3::new(
                x as f32 * step - half,
                y as f32 * step - half,
                0.0,
            ));
        }
    }
    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for y in 0..segments {
        for x in 0..segments {
            let i = y * row + x;
            indices.extend_from_slice(&[i, i + 1, i + row, i + 1, i + row + 1, i + row]);
        }
    }
    MeshData::new("panel", positions, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::FrameDriver;
    use crate::interaction::ActivationLog;
    use glam::Vec2;
    use planetoid_input::Action;
    use planetoid_render::DebugTextRenderer;
    use planetoid_tween::TweenScheduler;

    fn gallery_driver(width: f32) -> FrameDriver<MediaGallery, DebugTextRenderer> {
        let viewport = Viewport::new(width, 600.0).unwrap();
        let gallery = MediaGallery::new(GalleryConfig::default(), &viewport).unwrap();
        FrameDriver::new(
            gallery,
            TweenScheduler::new(),
            DebugTextRenderer::new(),
            ActivationLog::default(),
            viewport,
        )
    }

    fn screen_of(driver: &FrameDriver<MediaGallery, DebugTextRenderer>, p: Vec3) -> Vec2 {
        let ndc = driver.camera().world_to_ndc(p).unwrap();
        driver.viewport().to_screen(ndc.truncate())
    }

    #[test]
    fn wide_layout_is_centered() {
        let viewport = Viewport::new(1200.0, 800.0).unwrap();
        let g = MediaGallery::new(GalleryConfig::default(), &viewport).unwrap();
        let p: Vec<_> = g.panels().iter().map(|p| p.position).collect();
        assert_eq!(p[0], Vec3::new(-1.8, 0.9, 0.0));
        assert_eq!(p[1], Vec3::new(0.0, 0.9, 0.0));
        assert_eq!(p[2], Vec3::new(1.8, 0.9, 0.0));
        assert_eq!(p[3], Vec3::new(-1.8, -0.9, 0.0));
        assert_eq!(g.panels()[4].offset, 4.0 * 0.3);
        assert_eq!(g.layout(), GalleryLayout::WIDE);
    }

    #[test]
    fn narrow_layout_stacks_in_one_column() {
        let viewport = Viewport::new(400.0, 800.0).unwrap();
        let g = MediaGallery::new(GalleryConfig::default(), &viewport).unwrap();
        assert_eq!(g.layout(), GalleryLayout::NARROW);
        assert!(g.panels().iter().all(|p| p.position.x == 0.0));
        assert!((g.panels()[1].position.y - -0.8).abs() < 1e-6);
        assert_eq!(g.panels()[0].size, 2.5);
    }

    #[test]
    fn panel_mesh_faces_camera() {
        let mesh = panel_mesh(1.5, 30);
        assert_eq!(mesh.vertex_count(), 31 * 31);
        assert_eq!(mesh.triangle_count(), 30 * 30 * 2);
        assert!(mesh.normals.iter().all(|n| (*n - Vec3::Z).length() < 1e-5));
        let (_, radius) = mesh.bounding_sphere();
        assert!(radius <= 1.5 * std::f32::consts::FRAC_1_SQRT_2 + 1e-4);
    }

    #[test]
    fn click_on_projected_panel_activates_its_media() {
        let mut driver = gallery_driver(800.0);
        let panel = driver.scene().panels()[4].clone();
        let at = screen_of(&driver, panel.position);
        driver
            .handle(Action::PointerClicked { x: at.x, y: at.y })
            .unwrap();
        assert_eq!(
            driver.activation().entries,
            vec![(panel.id, "media/project-5.jpg".to_string())]
        );
    }

    #[test]
    fn hover_strength_reaches_render_items() {
        let mut driver = gallery_driver(800.0);
        let panel = driver.scene().panels()[0].clone();
        let at = screen_of(&driver, panel.position);
        driver.handle(Action::PointerMoved { x: at.x, y: at.y }).unwrap();
        driver.tick(1.0 / 60.0).unwrap();
        let frame = driver.frame();
        let item = frame.items.iter().find(|i| i.entity == panel.id).unwrap();
        assert!((item.hover_strength - 0.08).abs() < 1e-6);
        assert!((item.time - 0.012).abs() < 1e-6);
        let other = frame.items.iter().find(|i| i.entity != panel.id).unwrap();
        assert_eq!(other.hover_strength, 0.0);
    }

    #[test]
    fn resize_replaces_geometry_and_resets_hover() {
        let mut driver = gallery_driver(800.0);
        let panel = driver.scene().panels()[0].clone();
        let at = screen_of(&driver, panel.position);
        driver.handle(Action::PointerMoved { x: at.x, y: at.y }).unwrap();
        driver.tick(1.0 / 60.0).unwrap();
        assert!(driver.interaction().hover_strength(panel.id) > 0.0);

        let before = driver.scene().assets().stats();
        driver
            .handle(Action::Resized { width: 500.0, height: 600.0 })
            .unwrap();
        let after = driver.scene().assets().stats();

        assert_eq!(after.meshes_disposed - before.meshes_disposed, 6);
        assert_eq!(driver.scene().assets().live_meshes(), 6);
        assert_eq!(driver.scene().layout(), GalleryLayout::NARROW);
        assert_eq!(driver.scene().relayouts(), 1);
        assert_eq!(driver.interaction().hover_strength(panel.id), 0.0);
        assert_eq!(driver.interaction().hovered(), None);
        let mesh = driver.scene().assets().get_mesh(panel.mesh).unwrap();
        let (_, radius) = mesh.bounding_sphere();
        assert!(radius > 1.7);
    }

    #[test]
    fn clocks_advance_per_tick() {
        let mut driver = gallery_driver(800.0);
        for _ in 0..10 {
            driver.tick(0.1).unwrap();
        }
        let p = &driver.scene().panels()[2];
        assert!((p.time - 0.12).abs() < 1e-5);
        assert!((p.hover_time - 0.15).abs() < 1e-5);
    }
}

use std::time::{Duration, Instant};

use glam::Vec2;
use planetoid_camera::OrbitCamera;
use planetoid_common::Ray;
use planetoid_input::{Action, Viewport};
use planetoid_render::{RenderFrame, RenderView, Renderer};
use planetoid_tween::TweenScheduler;

use crate::error::WorldError;
use crate::interaction::{ActivationLog, InteractionResolver, MediaActivation};
use crate::scene::Scene;

/// Rolling window of recent ticks: simulated step and wall-clock work.
#[derive(Debug)]
pub struct FrameTimer {
    steps: Vec<f32>,
    work: Vec<Duration>,
    capacity: usize,
    next: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            steps: vec![0.0; capacity],
            work: vec![Duration::ZERO; capacity],
            capacity,
            next: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: f32, work: Duration) {
        self.steps[self.next] = dt;
        self.work[self.next] = work;
        self.next = (self.next + 1) % self.capacity;
        if self.next == 0 {
            self.filled = true;
        }
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.next }
    }

    pub fn average_work(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        self.work[..count].iter().sum::<Duration>() / count as u32
    }

    pub fn max_work(&self) -> Duration {
        self.work[..self.count()]
            .iter()
            .copied()
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Mean simulated step in seconds.
    pub fn average_step(&self) -> f32 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        self.steps[..count].iter().sum::<f32>() / count as f32
    }

    /// Simulated frames per second, or 0 before any non-zero step.
    pub fn fps(&self) -> f32 {
        let step = self.average_step();
        if step > 0.0 { 1.0 / step } else { 0.0 }
    }
}

/// Runs one scene: input actions in, one rendered frame per tick out.
///
/// Per tick, in order: camera update, scene advance, tweens, hover
/// re-evaluation under the last pointer position, smoothing, render.
pub struct FrameDriver<S: Scene, R: Renderer, A: MediaActivation = ActivationLog> {
    scene: S,
    renderer: R,
    activation: A,
    camera: OrbitCamera,
    viewport: Viewport,
    tweens: TweenScheduler,
    interaction: InteractionResolver,
    pointer: Option<Vec2>,
    tick: u64,
    timer: FrameTimer,
}

impl<S: Scene, R: Renderer, A: MediaActivation> FrameDriver<S, R, A> {
    pub fn new(
        scene: S,
        tweens: TweenScheduler,
        renderer: R,
        activation: A,
        viewport: Viewport,
    ) -> Self {
        let camera = OrbitCamera::from_config(&scene.camera_config(), viewport.aspect());
        let interaction = InteractionResolver::new(scene.smoothing(), scene.pulse());
        Self {
            scene,
            renderer,
            activation,
            camera,
            viewport,
            tweens,
            interaction,
            pointer: None,
            tick: 0,
            timer: FrameTimer::new(120),
        }
    }

    pub fn handle(&mut self, action: Action) -> Result<(), WorldError> {
        match action {
            Action::PointerMoved { x, y } => {
                let screen = Vec2::new(x, y);
                if self.viewport.contains(screen) {
                    self.pointer = Some(screen);
                    self.resolve_hover(screen)?;
                } else {
                    self.pointer_left();
                }
            }
            Action::PointerClicked { x, y } => {
                let ray = self.ray_at(Vec2::new(x, y));
                self.interaction
                    .on_pointer_click(&ray, &self.scene, &mut self.activation);
            }
            Action::PointerLeft => self.pointer_left(),
            Action::Resized { width, height } => self.resize(width, height)?,
            Action::Noop => {}
        }
        Ok(())
    }

    /// Apply a new canvas size. Invalid sizes are rejected and change nothing.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), WorldError> {
        let viewport = Viewport::new(width, height)?;
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        if self.scene.resize(&viewport)? {
            tracing::debug!(width, height, "scene geometry replaced, hover reset");
            self.interaction.clear();
        }
        Ok(())
    }

    /// Tear down and regenerate the scene content.
    pub fn rebuild(&mut self) -> Result<(), WorldError> {
        self.scene.rebuild(&mut self.tweens)?;
        self.interaction.clear();
        Ok(())
    }

    pub fn tick(&mut self, dt: f32) -> Result<R::Output, WorldError> {
        let start = Instant::now();
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.tick += 1;

        self.camera.update(dt);
        self.scene.advance(dt);
        let stats = self.tweens.tick(dt, &mut self.scene);
        tracing::trace!(
            tick = self.tick,
            applied = stats.applied,
            completed = stats.completed,
            pending = stats.pending,
            "tweens advanced"
        );
        if let Some(pointer) = self.pointer {
            self.resolve_hover(pointer)?;
        }
        self.interaction.smooth();

        let output = self.renderer.render(&self.frame(), self.scene.assets());
        self.timer.record(dt, start.elapsed());
        Ok(output)
    }

    /// Snapshot of what would be drawn now, hover strengths included.
    pub fn frame(&self) -> RenderFrame {
        let mut items = self.scene.render_items();
        for item in &mut items {
            item.hover_strength = self.interaction.hover_strength(item.entity);
        }
        RenderFrame {
            tick: self.tick,
            scene: self.scene.name().to_owned(),
            view: RenderView::from(&self.camera),
            items,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn tweens(&self) -> &TweenScheduler {
        &self.tweens
    }

    pub fn interaction(&self) -> &InteractionResolver {
        &self.interaction
    }

    pub fn activation(&self) -> &A {
        &self.activation
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn ray_at(&self, screen: Vec2) -> Ray {
        self.camera.ray_from_ndc(self.viewport.to_ndc(screen))
    }

    fn resolve_hover(&mut self, screen: Vec2) -> Result<(), WorldError> {
        let ray = self.ray_at(screen);
        let targets = self.scene.pick_targets();
        self.interaction
            .on_pointer_move(&ray, &targets, &mut self.tweens)?;
        Ok(())
    }

    fn pointer_left(&mut self) {
        self.pointer = None;
        self.interaction.on_pointer_leave();
    }
}

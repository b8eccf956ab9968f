use std::collections::BTreeMap;

use planetoid_common::{EntityId, Ray};
use planetoid_input::{InteractionState, Smoothing};
use planetoid_tween::{TweenError, TweenHandle, TweenScheduler, TweenSpec, TweenTarget};

use crate::scene::{PickTarget, Scene};

/// Receives the resource of a clicked object.
pub trait MediaActivation {
    fn activate(&mut self, id: EntityId, resource: &str);
}

impl<F: FnMut(EntityId, &str)> MediaActivation for F {
    fn activate(&mut self, id: EntityId, resource: &str) {
        self(id, resource)
    }
}

/// Records activations instead of opening anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivationLog {
    pub entries: Vec<(EntityId, String)>,
}

impl MediaActivation for ActivationLog {
    fn activate(&mut self, id: EntityId, resource: &str) {
        tracing::info!(id = %id.short(), resource, "media activated");
        self.entries.push((id, resource.to_owned()));
    }
}

/// Closest target hit by `ray`, with its distance.
pub fn nearest_hit(ray: &Ray, targets: &[PickTarget]) -> Option<(EntityId, f32)> {
    targets
        .iter()
        .filter_map(|target| target.volume.intersect(ray).map(|t| (target.id, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Turns pointer rays into hover transitions, pulses, and activations.
///
/// At most one object is hovered at a time. Objects that have left hover keep
/// their state until the strength has decayed to zero.
#[derive(Debug, Clone, Default)]
pub struct InteractionResolver {
    states: BTreeMap<EntityId, InteractionState>,
    pulses: BTreeMap<EntityId, TweenHandle>,
    smoothing: Smoothing,
    pulse: Option<TweenSpec>,
    hovered: Option<EntityId>,
}

impl InteractionResolver {
    pub fn new(smoothing: Smoothing, pulse: Option<TweenSpec>) -> Self {
        Self {
            smoothing,
            pulse,
            ..Default::default()
        }
    }

    /// Resolve hover for a pointer ray. Returns the hovered object, if any.
    ///
    /// An Idle → Hovering transition starts the pulse tween unless a previous
    /// pulse on that object is still running.
    pub fn on_pointer_move(
        &mut self,
        ray: &Ray,
        targets: &[PickTarget],
        tweens: &mut TweenScheduler,
    ) -> Result<Option<EntityId>, TweenError> {
        self.prune_pulses(tweens);
        let hit = nearest_hit(ray, targets).map(|(id, _)| id);
        if hit != self.hovered {
            if let Some(previous) = self.hovered {
                if let Some(state) = self.states.get_mut(&previous) {
                    state.leave();
                }
            }
            if let Some(id) = hit {
                let entered = self.states.entry(id).or_default().enter();
                if entered {
                    tracing::debug!(id = %id.short(), "hover enter");
                    self.start_pulse(id, tweens)?;
                }
            }
            self.hovered = hit;
        }
        Ok(hit)
    }

    /// Activate the clicked object's resource. Returns the object clicked.
    pub fn on_pointer_click<S, A>(
        &self,
        ray: &Ray,
        scene: &S,
        activation: &mut A,
    ) -> Option<EntityId>
    where
        S: Scene + ?Sized,
        A: MediaActivation + ?Sized,
    {
        let (id, _) = nearest_hit(ray, &scene.pick_targets())?;
        let resource = scene.resource(id)?;
        activation.activate(id, resource);
        Some(id)
    }

    /// The pointer left the canvas: nothing is hovered anymore.
    pub fn on_pointer_leave(&mut self) {
        if let Some(previous) = self.hovered.take() {
            if let Some(state) = self.states.get_mut(&previous) {
                state.leave();
            }
        }
    }

    /// One smoothing step for every tracked object. Settled idle states are dropped.
    pub fn smooth(&mut self) {
        let smoothing = self.smoothing;
        for state in self.states.values_mut() {
            state.smooth(smoothing);
        }
        self.states
            .retain(|_, state| state.is_hovering() || !state.is_settled());
    }

    pub fn hover_strength(&self, id: EntityId) -> f32 {
        self.states.get(&id).map_or(0.0, |s| s.hover_strength)
    }

    pub fn state(&self, id: EntityId) -> Option<&InteractionState> {
        self.states.get(&id)
    }

    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    /// Objects with non-idle state, including ones still fading out.
    pub fn tracked(&self) -> usize {
        self.states.len()
    }

    /// Forget all hover state, e.g. after the scene replaced its objects.
    pub fn clear(&mut self) {
        self.states.clear();
        self.pulses.clear();
        self.hovered = None;
    }

    fn start_pulse(&mut self, id: EntityId, tweens: &mut TweenScheduler) -> Result<(), TweenError> {
        let Some(spec) = self.pulse else {
            return Ok(());
        };
        if let Some(handle) = self.pulses.get(&id) {
            if tweens.is_active(*handle) {
                return Ok(());
            }
        }
        let handle = tweens.schedule(TweenTarget::scale(id), spec)?;
        self.pulses.insert(id, handle);
        Ok(())
    }

    /// Forget pulses the scheduler has finished or replaced.
    fn prune_pulses(&mut self, tweens: &TweenScheduler) {
        self.pulses
            .retain(|id, handle| tweens.active_handle(TweenTarget::scale(*id)) == Some(*handle));
    }
}

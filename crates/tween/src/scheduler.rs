use std::collections::BTreeMap;

use planetoid_common::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::TweenError;
use crate::tween::{Tween, TweenProperty, TweenSpec, TweenState, TweenValue};

/// Identifies one scheduled tween. Never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TweenHandle(pub u64);

/// The property a tween writes: at most one active tween per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TweenTarget {
    pub entity: EntityId,
    pub property: TweenProperty,
}

impl TweenTarget {
    pub fn scale(entity: EntityId) -> Self {
        Self {
            entity,
            property: TweenProperty::Scale,
        }
    }

    pub fn position(entity: EntityId) -> Self {
        Self {
            entity,
            property: TweenProperty::Position,
        }
    }
}

/// Receives tween output. Implemented by whatever owns the animated properties.
pub trait TweenSink {
    fn apply(&mut self, target: TweenTarget, value: TweenValue);
}

/// Counters from one [`TweenScheduler::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub applied: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Owns every active tween, keyed by the property it drives.
///
/// Scheduling onto a target that already has a tween replaces it. Completed
/// tweens are dropped during the tick that completes them.
#[derive(Debug, Default)]
pub struct TweenScheduler {
    active: BTreeMap<TweenTarget, (TweenHandle, Tween)>,
    next_handle: u64,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        target: TweenTarget,
        spec: TweenSpec,
    ) -> Result<TweenHandle, TweenError> {
        let tween = Tween::new(spec)?;
        let handle = TweenHandle(self.next_handle);
        self.next_handle += 1;
        if let Some((old, _)) = self.active.insert(target, (handle, tween)) {
            tracing::trace!(?old, ?handle, entity = %target.entity.short(), "tween replaced");
        }
        Ok(handle)
    }

    /// Advance every active tween by `dt` seconds and write results into `sink`.
    pub fn tick(&mut self, dt: f32, sink: &mut impl TweenSink) -> TickStats {
        let mut stats = TickStats::default();
        for (target, (_, tween)) in self.active.iter_mut() {
            if let Some(value) = tween.advance(dt) {
                sink.apply(*target, value);
                stats.applied += 1;
            }
            match tween.state() {
                TweenState::Completed => stats.completed += 1,
                TweenState::Pending => stats.pending += 1,
                TweenState::Running => {}
            }
        }
        self.active
            .retain(|_, (_, tween)| tween.state() != TweenState::Completed);
        tracing::trace!(
            applied = stats.applied,
            completed = stats.completed,
            remaining = self.active.len(),
            "tweens advanced"
        );
        stats
    }

    pub fn cancel(&mut self, handle: TweenHandle) -> Result<(), TweenError> {
        let target = self
            .active
            .iter()
            .find(|(_, (h, _))| *h == handle)
            .map(|(t, _)| *t)
            .ok_or(TweenError::NotActive(handle))?;
        self.active.remove(&target);
        Ok(())
    }

    /// Drop every tween driving `entity`. Returns how many were removed.
    pub fn cancel_entity(&mut self, entity: EntityId) -> usize {
        let before = self.active.len();
        self.active.retain(|target, _| target.entity != entity);
        before - self.active.len()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.active.values().any(|(h, _)| *h == handle)
    }

    pub fn active_handle(&self, target: TweenTarget) -> Option<TweenHandle> {
        self.active.get(&target).map(|(h, _)| *h)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

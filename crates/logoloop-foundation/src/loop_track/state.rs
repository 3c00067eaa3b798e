//! Loop state management.
//!
//! Provides [`LoopState`], the per-instance holder of geometry, motion and
//! hover state.

use std::cell::RefCell;
use std::rc::Rc;

use logoloop_core::FrameTime;

use super::config::{HoverBehavior, LoopConfig};
use super::geometry::{GeometryUpdate, Orientation, SequenceGeometry, SequenceMeasurement};
use super::motion::{FrameOutcome, MotionIntegrator};

/// Counters about a loop's lifetime. Used by tests and the demo.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoopStats {
    /// Motion steps executed.
    pub frames: u64,
    /// Transform writes requested by the integrator.
    pub transform_writes: u64,
    /// Geometry passes that produced a measured sequence.
    pub geometry_passes: u64,
    /// Geometry passes skipped because the sequence had no extent.
    pub skipped_geometry_passes: u64,
}

/// Why a [`LoopState`] invalidated its observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopInvalidation {
    /// The copy count changed; the track must be re-rendered.
    CopyCount(usize),
}

/// Result of [`LoopState::apply_measurement`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasurementOutcome {
    pub update: GeometryUpdate,
    /// Offset to write right away because the sequence extent changed.
    pub transform: Option<f32>,
}

/// Shared state of one mounted loop.
///
/// Cheap to clone; clones observe the same loop. Not shared across loops.
#[derive(Clone)]
pub struct LoopState {
    inner: Rc<RefCell<LoopStateInner>>,
}

struct LoopStateInner {
    geometry: SequenceGeometry,
    motion: MotionIntegrator,
    orientation: Orientation,
    base_velocity: f32,
    hover: HoverBehavior,
    hovered: bool,
    stats: LoopStats,
    invalidate_callbacks: Vec<(u64, Rc<dyn Fn(LoopInvalidation)>)>,
    next_callback_id: u64,
}

impl LoopState {
    pub fn new(config: &LoopConfig) -> Self {
        Self::with_integrator(config, MotionIntegrator::new())
    }

    pub fn with_integrator(config: &LoopConfig, motion: MotionIntegrator) -> Self {
        Self {
            inner: Rc::new(RefCell::new(LoopStateInner {
                geometry: SequenceGeometry::default(),
                motion,
                orientation: config.orientation(),
                base_velocity: config.target_velocity(),
                hover: config.hover,
                hovered: false,
                stats: LoopStats::default(),
                invalidate_callbacks: Vec::new(),
                next_callback_id: 1,
            })),
        }
    }

    pub fn geometry(&self) -> SequenceGeometry {
        self.inner.borrow().geometry
    }

    pub fn copy_count(&self) -> usize {
        self.inner.borrow().geometry.copy_count()
    }

    pub fn sequence_extent(&self) -> f32 {
        self.inner.borrow().geometry.sequence_extent()
    }

    pub fn orientation(&self) -> Orientation {
        self.inner.borrow().orientation
    }

    pub fn offset(&self) -> f32 {
        self.inner.borrow().motion.offset()
    }

    pub fn velocity(&self) -> f32 {
        self.inner.borrow().motion.velocity()
    }

    pub fn is_hovered(&self) -> bool {
        self.inner.borrow().hovered
    }

    pub fn stats(&self) -> LoopStats {
        self.inner.borrow().stats.clone()
    }

    /// Velocity the integrator currently steers toward.
    pub fn effective_target_velocity(&self) -> f32 {
        let inner = self.inner.borrow();
        super::config::effective_target_velocity(inner.base_velocity, inner.hovered, inner.hover)
    }

    /// Adopts a new configuration. Returns `true` when measured geometry was
    /// invalidated and a new geometry pass is needed.
    pub fn apply_config(&self, previous: &LoopConfig, config: &LoopConfig) -> bool {
        let mut inner = self.inner.borrow_mut();
        inner.base_velocity = config.target_velocity();
        inner.hover = config.hover;
        if !config.hover.tracks_hover() {
            inner.hovered = false;
        }
        inner.orientation = config.orientation();
        if previous.layout_differs(config) {
            drop(inner);
            self.invalidate_geometry();
            return true;
        }
        false
    }

    /// Drops the measured extent, keeping the rendered copy count.
    pub fn invalidate_geometry(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.geometry = inner.geometry.invalidated();
        inner.motion.set_sequence_extent(0.0);
    }

    /// Runs one geometry pass over fresh host measurements.
    pub fn apply_measurement(&self, measurement: &SequenceMeasurement) -> MeasurementOutcome {
        let (outcome, copy_count_changed) = {
            let mut inner = self.inner.borrow_mut();
            let update = inner.geometry.recompute(inner.orientation, measurement);
            if !update.geometry.is_measured() {
                inner.stats.skipped_geometry_passes += 1;
                return MeasurementOutcome {
                    update,
                    transform: None,
                };
            }
            inner.stats.geometry_passes += 1;

            let extent_changed =
                update.geometry.sequence_extent() != inner.geometry.sequence_extent();
            let copy_count_changed = update.geometry.copy_count() != inner.geometry.copy_count();
            inner.geometry = update.geometry;
            let transform = if extent_changed {
                inner
                    .motion
                    .set_sequence_extent(update.geometry.sequence_extent())
            } else {
                None
            };
            (MeasurementOutcome { update, transform }, copy_count_changed)
        };

        if copy_count_changed {
            log::debug!(
                "loop copy count -> {} (sequence {}px)",
                outcome.update.geometry.copy_count(),
                outcome.update.geometry.sequence_extent()
            );
            self.invalidate(LoopInvalidation::CopyCount(
                outcome.update.geometry.copy_count(),
            ));
        }
        outcome
    }

    /// Records a hover transition on the track. Ignored when hover has no
    /// effect. Returns `true` if the hover state changed.
    pub fn set_hovered(&self, hovered: bool) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.hover.tracks_hover() || inner.hovered == hovered {
            return false;
        }
        inner.hovered = hovered;
        true
    }

    /// Advances motion by one frame.
    pub fn step(&self, now: FrameTime) -> FrameOutcome {
        let mut inner = self.inner.borrow_mut();
        let target = super::config::effective_target_velocity(
            inner.base_velocity,
            inner.hovered,
            inner.hover,
        );
        let outcome = inner.motion.step(now, target);
        inner.stats.frames += 1;
        if outcome.write.is_some() {
            inner.stats.transform_writes += 1;
        }
        outcome
    }

    /// Forgets frame timing so a restarted loop begins with zero elapsed time.
    pub fn reset_timing(&self) {
        self.inner.borrow_mut().motion.reset_timing();
    }

    /// Adds an invalidation callback.
    pub fn add_invalidate_callback(&self, callback: Rc<dyn Fn(LoopInvalidation)>) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_callback_id;
        inner.next_callback_id += 1;
        inner.invalidate_callbacks.push((id, callback));
        id
    }

    /// Removes an invalidation callback.
    pub fn remove_invalidate_callback(&self, id: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.invalidate_callbacks.retain(|(cb_id, _)| *cb_id != id);
    }

    fn invalidate(&self, reason: LoopInvalidation) {
        // Callbacks may read this state, so run them without the borrow held.
        let callbacks: Vec<_> = self
            .inner
            .borrow()
            .invalidate_callbacks
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback(reason);
        }
    }
}

impl std::fmt::Debug for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("LoopState")
            .field("geometry", &inner.geometry)
            .field("motion", inner.motion.state())
            .field("hovered", &inner.hovered)
            .finish()
    }
}

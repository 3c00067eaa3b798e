//! Per-frame motion integration.
//!
//! Velocity follows the target through a first-order exponential filter
//! (time constant [`SMOOTH_TAU`]), and the offset integrates that velocity.
//! Elapsed time is clamped so a tab returning from the background does not
//! jump the track.

use logoloop_core::FrameTime;

/// Smoothing time constant in seconds.
pub const SMOOTH_TAU: f32 = 0.25;

/// Upper bound on the elapsed time of a single frame, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.05;

/// Minimum offset change, in pixels, that is worth a transform write.
pub const DEFAULT_WRITE_EPSILON: f32 = 0.5;

/// Wraps `offset` into `[0, extent)`, also for negative inputs.
///
/// A non-positive extent means nothing is laid out yet and the offset is
/// returned unchanged.
pub fn wrap_offset(offset: f32, extent: f32) -> f32 {
    if !extent.is_finite() || extent <= 0.0 {
        return offset;
    }
    if !offset.is_finite() {
        return 0.0;
    }
    let wrapped = ((offset % extent) + extent) % extent;
    // `-tiny % extent + extent` can round up to exactly `extent`.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// Mutable motion state of one mounted loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionState {
    pub offset: f32,
    pub velocity: f32,
    pub last_timestamp: Option<FrameTime>,
    /// Offset of the last transform actually written to the track.
    pub last_applied: Option<f32>,
    pub sequence_extent: f32,
}

/// What one integration step produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutcome {
    pub offset: f32,
    pub velocity: f32,
    /// Clamped elapsed seconds used for this step.
    pub elapsed: f32,
    /// Offset to write to the track, when the change is worth a write.
    pub write: Option<f32>,
}

#[derive(Clone, Debug)]
pub struct MotionIntegrator {
    state: MotionState,
    smooth_tau: f32,
    max_frame_delta: f32,
    write_epsilon: f32,
}

impl MotionIntegrator {
    pub fn new() -> Self {
        Self {
            state: MotionState::default(),
            smooth_tau: SMOOTH_TAU,
            max_frame_delta: MAX_FRAME_DELTA,
            write_epsilon: DEFAULT_WRITE_EPSILON,
        }
    }

    /// Overrides the transform-write threshold. The threshold only trades
    /// layout writes for precision.
    pub fn with_write_epsilon(mut self, epsilon: f32) -> Self {
        self.write_epsilon = epsilon.max(0.0);
        self
    }

    pub fn with_smoothing(mut self, tau: f32) -> Self {
        self.smooth_tau = tau.max(f32::EPSILON);
        self
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn offset(&self) -> f32 {
        self.state.offset
    }

    pub fn velocity(&self) -> f32 {
        self.state.velocity
    }

    pub fn sequence_extent(&self) -> f32 {
        self.state.sequence_extent
    }

    /// Adopts a new sequence extent and returns the offset to write
    /// immediately, if any.
    ///
    /// Going from no extent to a positive one restarts the offset at zero;
    /// otherwise the offset is re-wrapped into the new extent.
    pub fn set_sequence_extent(&mut self, extent: f32) -> Option<f32> {
        let previous = self.state.sequence_extent;
        if !extent.is_finite() || extent <= 0.0 {
            self.state.sequence_extent = 0.0;
            return None;
        }
        self.state.sequence_extent = extent;
        self.state.offset = if previous > 0.0 {
            wrap_offset(self.state.offset, extent)
        } else {
            0.0
        };
        self.state.last_applied = Some(self.state.offset);
        Some(self.state.offset)
    }

    /// Advances one frame toward `target_velocity`.
    pub fn step(&mut self, now: FrameTime, target_velocity: f32) -> FrameOutcome {
        let elapsed = match self.state.last_timestamp.replace(now) {
            Some(previous) => now.seconds_since(previous) as f32,
            None => 0.0,
        };
        // Negative or NaN elapsed (clock reset) counts as no time passing.
        let elapsed = if elapsed > 0.0 {
            elapsed.min(self.max_frame_delta)
        } else {
            0.0
        };

        let alpha = 1.0 - (-elapsed / self.smooth_tau).exp();
        self.state.velocity += (target_velocity - self.state.velocity) * alpha;

        let extent = self.state.sequence_extent;
        let mut write = None;
        if extent > 0.0 {
            let next = wrap_offset(self.state.offset + self.state.velocity * elapsed, extent);
            self.state.offset = next;
            let worth_writing = match self.state.last_applied {
                Some(applied) => (next - applied).abs() > self.write_epsilon,
                None => true,
            };
            if worth_writing {
                self.state.last_applied = Some(next);
                write = Some(next);
            }
        }

        FrameOutcome {
            offset: self.state.offset,
            velocity: self.state.velocity,
            elapsed,
            write,
        }
    }

    /// Forgets the previous frame timestamp so the next step starts with zero
    /// elapsed time.
    pub fn reset_timing(&mut self) {
        self.state.last_timestamp = None;
    }
}

impl Default for MotionIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

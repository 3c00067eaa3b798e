//! Frame timestamps and the clocks that produce them.

use std::cell::Cell;
use std::rc::Rc;
use web_time::Instant;

/// Timestamp handed to frame callbacks, in milliseconds since an arbitrary origin.
///
/// Mirrors the high-resolution timestamp a browser passes to
/// `requestAnimationFrame` callbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct FrameTime(f64);

impl FrameTime {
    pub const ZERO: Self = Self(0.0);

    pub fn from_millis(millis: f64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> f64 {
        self.0
    }

    /// Seconds elapsed since `earlier`. Negative when the clock went backwards.
    pub fn seconds_since(self, earlier: FrameTime) -> f64 {
        (self.0 - earlier.0) / 1000.0
    }
}

/// Source of frame timestamps.
pub trait FrameClock {
    fn now(&self) -> FrameTime;
}

/// Wall clock backed by `web_time::Instant`, usable on native and WASM targets.
#[derive(Clone, Debug)]
pub struct SystemFrameClock {
    origin: Instant,
}

impl SystemFrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemFrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemFrameClock {
    fn now(&self) -> FrameTime {
        FrameTime(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Manually advanced clock for tests and headless runs.
///
/// Clones share the same time source.
#[derive(Clone, Debug, Default)]
pub struct ManualFrameClock {
    millis: Rc<Cell<f64>>,
}

impl ManualFrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(millis: f64) -> Self {
        Self {
            millis: Rc::new(Cell::new(millis)),
        }
    }

    /// Moves the clock forward and returns the new time.
    pub fn advance(&self, millis: f64) -> FrameTime {
        let next = self.millis.get() + millis;
        self.millis.set(next);
        FrameTime(next)
    }

    pub fn set(&self, millis: f64) {
        self.millis.set(millis);
    }
}

impl FrameClock for ManualFrameClock {
    fn now(&self) -> FrameTime {
        FrameTime(self.millis.get())
    }
}

//! Owned frame loops built on [`FrameScheduler`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::frame::FrameTime;
use crate::scheduler::{FrameCallbackId, FrameScheduler, WeakFrameScheduler};

type StepFn = Box<dyn FnMut(FrameTime)>;

struct TickerShared {
    pending: Cell<Option<FrameCallbackId>>,
    running: Cell<bool>,
    step: RefCell<Option<StepFn>>,
    ticks: Cell<u64>,
}

/// A callback that re-schedules itself every frame until stopped.
///
/// Exactly one frame callback is pending while the ticker runs. Stopping
/// cancels it, and dropping the ticker stops it, so no step can run after the
/// owner is gone.
pub struct Ticker {
    scheduler: FrameScheduler,
    shared: Rc<TickerShared>,
}

impl Ticker {
    pub fn new(scheduler: FrameScheduler) -> Self {
        Self {
            scheduler,
            shared: Rc::new(TickerShared {
                pending: Cell::new(None),
                running: Cell::new(false),
                step: RefCell::new(None),
                ticks: Cell::new(0),
            }),
        }
    }

    /// Starts the loop with `step`, replacing any previous step.
    pub fn start<F>(&self, step: F)
    where
        F: FnMut(FrameTime) + 'static,
    {
        self.stop();
        *self.shared.step.borrow_mut() = Some(Box::new(step));
        self.shared.running.set(true);
        schedule_tick(&self.scheduler.downgrade(), &self.shared);
    }

    /// Stops the loop. Safe to call from inside the step itself.
    pub fn stop(&self) {
        self.shared.running.set(false);
        if let Some(id) = self.shared.pending.take() {
            self.scheduler.cancel(id);
        }
        // While the step is executing it is borrowed; the tick drops it once
        // the step returns and sees `running == false`.
        if let Ok(mut step) = self.shared.step.try_borrow_mut() {
            step.take();
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    /// Number of steps executed since construction.
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.get()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("running", &self.shared.running.get())
            .field("ticks", &self.shared.ticks.get())
            .finish()
    }
}

fn schedule_tick(scheduler: &WeakFrameScheduler, shared: &Rc<TickerShared>) {
    let Some(strong) = scheduler.upgrade() else {
        shared.running.set(false);
        return;
    };
    let weak_shared: Weak<TickerShared> = Rc::downgrade(shared);
    let weak_scheduler = scheduler.clone();
    let id = strong.request_frame(move |timestamp| {
        let Some(shared) = weak_shared.upgrade() else {
            return;
        };
        shared.pending.set(None);
        if !shared.running.get() {
            return;
        }

        {
            let Ok(mut step) = shared.step.try_borrow_mut() else {
                return;
            };
            if let Some(step) = step.as_mut() {
                step(timestamp);
                shared.ticks.set(shared.ticks.get() + 1);
            }
        }

        if shared.running.get() {
            schedule_tick(&weak_scheduler, &shared);
        } else {
            shared.step.borrow_mut().take();
        }
    });
    shared.pending.set(Some(id));
}

/// Collapses bursts of requests into at most one pending frame callback.
///
/// Used for resize and image-load notifications: many events inside one
/// frame produce a single recomputation on the next frame.
pub struct FrameDebouncer {
    scheduler: FrameScheduler,
    pending: Rc<Cell<Option<FrameCallbackId>>>,
}

impl FrameDebouncer {
    pub fn new(scheduler: FrameScheduler) -> Self {
        Self {
            scheduler,
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// Schedules `work` for the next frame unless a callback is already
    /// pending, in which case the request is absorbed and `false` is returned.
    pub fn request<F>(&self, work: F) -> bool
    where
        F: FnOnce(FrameTime) + 'static,
    {
        if self.pending.get().is_some() {
            return false;
        }
        let pending = Rc::downgrade(&self.pending);
        let id = self.scheduler.request_frame(move |timestamp| {
            let Some(pending) = pending.upgrade() else {
                return;
            };
            pending.set(None);
            work(timestamp);
        });
        self.pending.set(Some(id));
        true
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

impl Drop for FrameDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
